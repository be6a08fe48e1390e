//! Numeric keypad / IR remote to mouse and shortcut mapper.
//!
//! Grabs a physical Linux input device, translates its key events through a
//! configurable mapping table, and re-emits the result on a virtual uinput
//! device: directional keypad presses become accelerating mouse motion,
//! other keys become shortcut chords or rate-limited external commands, and
//! everything unmapped passes through verbatim.

pub mod config;
pub mod engine;
pub mod event;
pub mod keysym;
pub mod mapping;
pub mod rate_limit;
pub mod run;
pub mod sink;
pub mod velocity;

pub use config::{RawConfig, Settings};
pub use engine::{Engine, Outcome};
pub use event::RawEvent;
pub use mapping::{Action, MappingEntry, MappingTable, MAX_COMBO};
pub use rate_limit::CooldownGate;
pub use sink::{Emitted, EmitError, EventSink, RecordingSink, UinputSink};
pub use velocity::VelocityTracker;
