//! The event translation engine.
//!
//! One [`Engine`] per process owns the mapping table and the velocity
//! tracker. For each key-class event it advances the tracker, looks the
//! key up in the table, and either executes the matched action against
//! the sink or tells the caller to forward the raw event unchanged.

use crate::event::{RawEvent, KEY_PRESS};
use crate::keysym;
use crate::mapping::{Action, MappingTable};
use crate::sink::{EmitError, EventSink};
use crate::velocity::VelocityTracker;
use evdev::Key;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// What the caller should do with the raw event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event was translated; suppress the raw event.
    Handled,
    /// No translation applies; forward the raw event verbatim.
    Forward,
}

pub struct Engine {
    table: MappingTable,
    velocity: VelocityTracker,
    combo_trailing_sync: bool,
}

impl Engine {
    pub fn new(table: MappingTable, velocity: VelocityTracker, combo_trailing_sync: bool) -> Self {
        Self {
            table,
            velocity,
            combo_trailing_sync,
        }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn speed(&self) -> i32 {
        self.velocity.speed()
    }

    /// Translate one event.
    ///
    /// The velocity tracker advances for every key-class event, mapped or
    /// not, so an unmapped key held down still primes the speed that a
    /// subsequent repeat inherits.
    pub fn dispatch<S: EventSink>(
        &mut self,
        event: &RawEvent,
        sink: &mut S,
    ) -> Result<Outcome, EmitError> {
        if !event.is_key() {
            return Ok(Outcome::Forward);
        }

        let speed = self.velocity.observe(event.value);

        let Some(action) = self.table.find_mut(event.code) else {
            return Ok(Outcome::Forward);
        };

        match action {
            Action::MoveMouse { dx, dy } => {
                let (mx, my) = (*dx * speed, *dy * speed);
                if mx != 0 || my != 0 {
                    sink.relative_move(mx, my)?;
                }
                Ok(Outcome::Handled)
            }
            Action::KeyCombination { keys } => {
                emit_combination(sink, keys, self.combo_trailing_sync)?;
                Ok(Outcome::Handled)
            }
            Action::Execute { command, gate } => {
                // Only the press transition fires the command; repeats and
                // releases are swallowed without side effects.
                if event.value == KEY_PRESS {
                    if gate.allow() {
                        spawn_command(command);
                    } else {
                        debug!(command = command.as_str(), "command rate limited");
                    }
                }
                Ok(Outcome::Handled)
            }
            Action::Passthrough => Ok(Outcome::Forward),
        }
    }
}

/// Emit an ordered chord: press each key with its own sync marker, then
/// release them in the same order.
///
/// With `trailing_sync` disabled the final release carries no marker of
/// its own — the forwarded release of the physical triggering key is
/// expected to supply it, which keeps the wire stream byte-compatible
/// with consumers tuned to that cadence.
fn emit_combination<S: EventSink>(
    sink: &mut S,
    keys: &[Key],
    trailing_sync: bool,
) -> Result<(), EmitError> {
    let Some((last, rest)) = keys.split_last() else {
        return Ok(());
    };
    for key in keys {
        sink.key_state(*key, true)?;
        sink.sync()?;
    }
    for key in rest {
        sink.key_state(*key, false)?;
        sink.sync()?;
    }
    sink.key_state(*last, false)?;
    if trailing_sync {
        sink.sync()?;
    }
    Ok(())
}

/// Spawn a shell command detached from the translation loop.
///
/// The child handle is discarded on purpose: the loop never waits for
/// completion or exit status.
fn spawn_command(command: &str) {
    match Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => {
            debug!(command, pid = child.id(), "spawned command");
        }
        Err(e) => warn!(command, error = %e, "failed to spawn command"),
    }
}

/// Log-friendly description of a key code.
pub fn describe_key(code: u16) -> String {
    match keysym::name(Key::new(code)) {
        Some(name) => name.to_string(),
        None => format!("{code:#x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KEY_RELEASE, KEY_REPEAT};
    use crate::mapping::MappingEntry;
    use crate::rate_limit::CooldownGate;
    use crate::sink::{Emitted, RecordingSink};
    use std::time::Duration;

    fn engine_with(entries: Vec<MappingEntry>, trailing_sync: bool) -> Engine {
        Engine::new(
            MappingTable::new(entries),
            VelocityTracker::default(),
            trailing_sync,
        )
    }

    fn move_entry(trigger: Key, dx: i32, dy: i32) -> MappingEntry {
        MappingEntry {
            trigger,
            action: Action::MoveMouse { dx, dy },
        }
    }

    #[test]
    fn unmapped_keys_are_forwarded() {
        let mut engine = engine_with(vec![], true);
        let mut sink = RecordingSink::new();
        let event = RawEvent::key(Key::KEY_NUMERIC_5.code(), KEY_PRESS);
        assert_eq!(engine.dispatch(&event, &mut sink).unwrap(), Outcome::Forward);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn non_key_events_are_forwarded() {
        let mut engine = engine_with(vec![move_entry(Key::KEY_NUMERIC_1, -1, -1)], true);
        let mut sink = RecordingSink::new();
        let motion = RawEvent::new(evdev::EventType::RELATIVE.0, 0, 4);
        assert_eq!(engine.dispatch(&motion, &mut sink).unwrap(), Outcome::Forward);
    }

    #[test]
    fn move_mouse_scales_signs_by_speed() {
        let mut engine = engine_with(vec![move_entry(Key::KEY_NUMERIC_1, -1, -1)], true);
        let mut sink = RecordingSink::new();
        let code = Key::KEY_NUMERIC_1.code();

        engine.dispatch(&RawEvent::key(code, KEY_PRESS), &mut sink).unwrap();
        engine.dispatch(&RawEvent::key(code, KEY_REPEAT), &mut sink).unwrap();
        assert_eq!(
            sink.events,
            vec![
                Emitted::Rel { dx: -5, dy: -5 },
                Emitted::Rel { dx: -15, dy: -15 },
            ]
        );
    }

    #[test]
    fn zero_speed_emits_no_motion_but_is_still_handled() {
        let mut engine = engine_with(vec![move_entry(Key::KEY_NUMERIC_1, -1, -1)], true);
        let mut sink = RecordingSink::new();
        let release = RawEvent::key(Key::KEY_NUMERIC_1.code(), KEY_RELEASE);
        assert_eq!(engine.dispatch(&release, &mut sink).unwrap(), Outcome::Handled);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn single_axis_moves_keep_the_other_axis_zero() {
        let mut engine = engine_with(vec![move_entry(Key::KEY_NUMERIC_2, 0, -1)], true);
        let mut sink = RecordingSink::new();
        let press = RawEvent::key(Key::KEY_NUMERIC_2.code(), KEY_PRESS);
        engine.dispatch(&press, &mut sink).unwrap();
        assert_eq!(sink.events, vec![Emitted::Rel { dx: 0, dy: -5 }]);
    }

    #[test]
    fn combination_wire_sequence_without_trailing_sync() {
        let keys = vec![Key::KEY_A, Key::KEY_B, Key::KEY_C];
        let mut engine = engine_with(
            vec![MappingEntry {
                trigger: Key::KEY_CLOSE,
                action: Action::KeyCombination { keys },
            }],
            false,
        );
        let mut sink = RecordingSink::new();
        let press = RawEvent::key(Key::KEY_CLOSE.code(), KEY_PRESS);
        assert_eq!(engine.dispatch(&press, &mut sink).unwrap(), Outcome::Handled);

        let a = Key::KEY_A.code();
        let b = Key::KEY_B.code();
        let c = Key::KEY_C.code();
        assert_eq!(
            sink.events,
            vec![
                Emitted::Key { code: a, pressed: true },
                Emitted::Sync,
                Emitted::Key { code: b, pressed: true },
                Emitted::Sync,
                Emitted::Key { code: c, pressed: true },
                Emitted::Sync,
                Emitted::Key { code: a, pressed: false },
                Emitted::Sync,
                Emitted::Key { code: b, pressed: false },
                Emitted::Sync,
                Emitted::Key { code: c, pressed: false },
            ]
        );
        // 2N-1 key events, N + N-1 sync markers minus the omitted trailing one
        assert_eq!(sink.sync_count(), 5);
    }

    #[test]
    fn combination_with_trailing_sync_adds_the_final_marker() {
        let keys = vec![Key::KEY_LEFTALT, Key::KEY_F4];
        let mut engine = engine_with(
            vec![MappingEntry {
                trigger: Key::KEY_CLOSE,
                action: Action::KeyCombination { keys },
            }],
            true,
        );
        let mut sink = RecordingSink::new();
        let press = RawEvent::key(Key::KEY_CLOSE.code(), KEY_PRESS);
        engine.dispatch(&press, &mut sink).unwrap();

        assert_eq!(sink.sync_count(), 4);
        assert_eq!(sink.events.last(), Some(&Emitted::Sync));
    }

    #[test]
    fn execute_fires_only_on_press() {
        let mut engine = engine_with(
            vec![MappingEntry {
                trigger: Key::KEY_RED,
                action: Action::Execute {
                    command: "true".to_string(),
                    gate: CooldownGate::new(Duration::from_secs(60)),
                },
            }],
            true,
        );
        let mut sink = RecordingSink::new();
        let code = Key::KEY_RED.code();

        // Repeat and release must not arm the gate
        engine.dispatch(&RawEvent::key(code, KEY_REPEAT), &mut sink).unwrap();
        engine.dispatch(&RawEvent::key(code, KEY_RELEASE), &mut sink).unwrap();
        let gate_state = |engine: &Engine| match &engine.table().entries()[0].action {
            Action::Execute { gate, .. } => gate.last_run(),
            _ => unreachable!(),
        };
        assert_eq!(gate_state(&engine), None);

        let outcome = engine.dispatch(&RawEvent::key(code, KEY_PRESS), &mut sink).unwrap();
        assert_eq!(outcome, Outcome::Handled);
        assert!(gate_state(&engine).is_some());
        // Nothing reaches the wire for an execute action
        assert!(sink.events.is_empty());
    }

    #[test]
    fn passthrough_action_behaves_as_not_handled() {
        let mut engine = engine_with(
            vec![MappingEntry {
                trigger: Key::KEY_OK,
                action: Action::Passthrough,
            }],
            true,
        );
        let mut sink = RecordingSink::new();
        let press = RawEvent::key(Key::KEY_OK.code(), KEY_PRESS);
        assert_eq!(engine.dispatch(&press, &mut sink).unwrap(), Outcome::Forward);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn velocity_advances_even_for_unmapped_keys() {
        let mut engine = engine_with(vec![move_entry(Key::KEY_NUMERIC_1, 1, 0)], true);
        let mut sink = RecordingSink::new();

        // Press an unmapped key, then feed a repeat of the mapped one: the
        // tracker carried the base speed over from the unmapped press.
        engine
            .dispatch(&RawEvent::key(Key::KEY_NUMERIC_5.code(), KEY_PRESS), &mut sink)
            .unwrap();
        engine
            .dispatch(&RawEvent::key(Key::KEY_NUMERIC_1.code(), KEY_REPEAT), &mut sink)
            .unwrap();
        assert_eq!(sink.events.last(), Some(&Emitted::Rel { dx: 15, dy: 0 }));
    }

    #[test]
    fn describe_key_prefers_canonical_names() {
        assert_eq!(describe_key(Key::KEY_CLOSE.code()), "KEY_CLOSE");
        assert_eq!(describe_key(0x2f0), "0x2f0");
    }
}
