//! Event sinks: the seam between the dispatcher and the wire.
//!
//! The dispatcher speaks four primitives — relative motion, key state,
//! sync marker, raw forward — through the [`EventSink`] trait.
//! [`UinputSink`] is the production implementation backed by a uinput
//! virtual device; [`RecordingSink`] captures the primitive stream in
//! memory for tests.

use crate::event::RawEvent;
use crate::keysym::KEY_CODE_LIMIT;
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, BusType, EventType, InputEvent, InputId, Key, RelativeAxisType,
};
use thiserror::Error;

/// Fixed identity of the virtual device, visible in `/proc/bus/input/devices`.
pub const VIRTUAL_DEVICE_NAME: &str = "remote-mouse-proxy";
pub const VIRTUAL_VENDOR_ID: u16 = 0x1234;
pub const VIRTUAL_PRODUCT_ID: u16 = 0x5678;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Primitive output operations of the translation engine.
pub trait EventSink {
    /// Queue relative pointer motion. Zero-magnitude axes are skipped,
    /// never emitted as zero-delta events.
    fn relative_move(&mut self, dx: i32, dy: i32) -> Result<(), EmitError>;

    /// Queue a key press or release.
    fn key_state(&mut self, key: Key, pressed: bool) -> Result<(), EmitError>;

    /// Emit a synchronization marker, delimiting the batch queued so far.
    fn sync(&mut self) -> Result<(), EmitError>;

    /// Forward a raw event from the physical device unchanged.
    fn forward(&mut self, event: &RawEvent) -> Result<(), EmitError>;
}

// ---------------------------------------------------------------------------
// UinputSink — the virtual output device
// ---------------------------------------------------------------------------

/// Virtual uinput device owning the synthetic end of the translation.
///
/// Announces relative X/Y motion, the left mouse button, and the full
/// contiguous key-code range below [`KEY_CODE_LIMIT`], so any key a
/// mapping or a passthrough can produce is within capability.
///
/// Events queue up between sync markers and reach the kernel as one
/// write per marker: the evdev crate appends the `SYN_REPORT` itself,
/// so a sync maps 1:1 onto a flush of the pending batch.
pub struct UinputSink {
    device: VirtualDevice,
    pending: Vec<InputEvent>,
}

impl UinputSink {
    pub fn new() -> Result<Self, EmitError> {
        let mut keys = AttributeSet::<Key>::new();
        for code in 0..KEY_CODE_LIMIT {
            keys.insert(Key::new(code));
        }

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);

        let device = VirtualDeviceBuilder::new()
            .map_err(EmitError::CreateDevice)?
            .name(VIRTUAL_DEVICE_NAME)
            .input_id(InputId::new(
                BusType::BUS_USB,
                VIRTUAL_VENDOR_ID,
                VIRTUAL_PRODUCT_ID,
                1,
            ))
            .with_keys(&keys)
            .map_err(EmitError::CreateDevice)?
            .with_relative_axes(&axes)
            .map_err(EmitError::CreateDevice)?
            .build()
            .map_err(EmitError::CreateDevice)?;

        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }

    /// The device node the kernel assigned (e.g. `/dev/input/eventX`).
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }

    fn flush(&mut self) -> Result<(), EmitError> {
        let batch = std::mem::take(&mut self.pending);
        self.device.emit(&batch).map_err(EmitError::EmitEvent)
    }
}

impl EventSink for UinputSink {
    fn relative_move(&mut self, dx: i32, dy: i32) -> Result<(), EmitError> {
        if dx != 0 {
            self.pending
                .push(InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, dx));
        }
        if dy != 0 {
            self.pending
                .push(InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, dy));
        }
        Ok(())
    }

    fn key_state(&mut self, key: Key, pressed: bool) -> Result<(), EmitError> {
        self.pending.push(InputEvent::new(
            EventType::KEY,
            key.code(),
            if pressed { 1 } else { 0 },
        ));
        Ok(())
    }

    fn sync(&mut self) -> Result<(), EmitError> {
        self.flush()
    }

    fn forward(&mut self, event: &RawEvent) -> Result<(), EmitError> {
        // The physical device's own SYN_REPORT delimits the batch.
        if event.is_sync_report() {
            return self.flush();
        }
        self.pending.push((*event).into());
        Ok(())
    }
}

impl Drop for UinputSink {
    fn drop(&mut self) {
        // Push out anything still queued; the kernel destroys the device
        // when the uinput handle closes.
        if !self.pending.is_empty() {
            let _ = self.flush();
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSink — in-memory capture for tests
// ---------------------------------------------------------------------------

/// One primitive captured by [`RecordingSink`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Rel { dx: i32, dy: i32 },
    Key { code: u16, pressed: bool },
    Sync,
    Forwarded(RawEvent),
}

/// Sink that records the primitive stream instead of touching uinput.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Emitted>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync_count(&self) -> usize {
        self.events.iter().filter(|e| **e == Emitted::Sync).count()
    }
}

impl EventSink for RecordingSink {
    fn relative_move(&mut self, dx: i32, dy: i32) -> Result<(), EmitError> {
        self.events.push(Emitted::Rel { dx, dy });
        Ok(())
    }

    fn key_state(&mut self, key: Key, pressed: bool) -> Result<(), EmitError> {
        self.events.push(Emitted::Key {
            code: key.code(),
            pressed,
        });
        Ok(())
    }

    fn sync(&mut self) -> Result<(), EmitError> {
        self.events.push(Emitted::Sync);
        Ok(())
    }

    fn forward(&mut self, event: &RawEvent) -> Result<(), EmitError> {
        self.events.push(Emitted::Forwarded(*event));
        Ok(())
    }
}
