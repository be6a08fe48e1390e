//! Raw input event model.
//!
//! [`RawEvent`] mirrors the kernel's `input_event` record minus the
//! timestamp, which is never interpreted: the kernel stamps events again
//! when they are written to the virtual device.

use evdev::{EventType, InputEvent};

/// Key event value for a release transition.
pub const KEY_RELEASE: i32 = 0;
/// Key event value for a press transition.
pub const KEY_PRESS: i32 = 1;
/// Key event value for an autorepeat notification.
pub const KEY_REPEAT: i32 = 2;

/// A single event read from the physical device: `(type, code, value)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// Shorthand for a key-class event.
    pub fn key(code: u16, value: i32) -> Self {
        Self::new(EventType::KEY.0, code, value)
    }

    /// True for key-class events (presses, releases, repeats).
    pub fn is_key(&self) -> bool {
        self.event_type == EventType::KEY.0
    }

    /// True for a `SYN_REPORT` batch delimiter.
    pub fn is_sync_report(&self) -> bool {
        self.event_type == EventType::SYNCHRONIZATION.0 && self.code == 0
    }
}

impl From<InputEvent> for RawEvent {
    fn from(ev: InputEvent) -> Self {
        Self {
            event_type: ev.event_type().0,
            code: ev.code(),
            value: ev.value(),
        }
    }
}

impl From<RawEvent> for InputEvent {
    fn from(ev: RawEvent) -> Self {
        InputEvent::new(EventType(ev.event_type), ev.code, ev.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_events_are_classified() {
        assert!(RawEvent::key(0x201, KEY_PRESS).is_key());
        assert!(!RawEvent::new(EventType::RELATIVE.0, 0, 3).is_key());
    }

    #[test]
    fn sync_report_detection() {
        assert!(RawEvent::new(EventType::SYNCHRONIZATION.0, 0, 0).is_sync_report());
        // SYN_DROPPED is not a report delimiter
        assert!(!RawEvent::new(EventType::SYNCHRONIZATION.0, 3, 0).is_sync_report());
        assert!(!RawEvent::key(0x201, KEY_PRESS).is_sync_report());
    }

    #[test]
    fn roundtrip_through_input_event() {
        let raw = RawEvent::new(EventType::RELATIVE.0, 1, -7);
        let ev: InputEvent = raw.into();
        assert_eq!(RawEvent::from(ev), raw);
    }
}
