//! Mapping table: trigger key codes to actions.
//!
//! The table is built once at startup by the config loader and is
//! read-only thereafter, except for the cooldown state inside `Execute`
//! actions, which the dispatching thread mutates in place. Lookup is a
//! linear first-match scan; tables are tens of entries at most, and
//! declaration order from the config file is preserved, so an earlier
//! entry shadows later ones with the same trigger.

use crate::rate_limit::CooldownGate;
use evdev::Key;

/// Maximum number of keys in a combination.
pub const MAX_COMBO: usize = 8;

/// What to do when a mapped key event arrives.
#[derive(Debug, Clone)]
pub enum Action {
    /// Relative pointer motion; each sign is scaled by the current speed.
    MoveMouse { dx: i32, dy: i32 },
    /// Press and release an ordered chord of keys.
    KeyCombination { keys: Vec<Key> },
    /// Spawn a detached external command, subject to the cooldown gate.
    Execute {
        command: String,
        gate: CooldownGate,
    },
    /// Explicitly forward the raw event unchanged.
    Passthrough,
}

#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub trigger: Key,
    pub action: Action,
}

#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    pub fn new(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }

    /// First entry whose trigger matches the code, if any.
    pub fn find_mut(&mut self, code: u16) -> Option<&mut Action> {
        self.entries
            .iter_mut()
            .find(|e| e.trigger.code() == code)
            .map(|e| &mut e.action)
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MappingTable {
        MappingTable::new(vec![
            MappingEntry {
                trigger: Key::KEY_NUMERIC_1,
                action: Action::MoveMouse { dx: -1, dy: -1 },
            },
            MappingEntry {
                trigger: Key::KEY_NUMERIC_1,
                action: Action::Passthrough,
            },
            MappingEntry {
                trigger: Key::KEY_CLOSE,
                action: Action::KeyCombination {
                    keys: vec![Key::KEY_LEFTALT, Key::KEY_F4],
                },
            },
        ])
    }

    #[test]
    fn lookup_is_first_match() {
        let mut t = table();
        match t.find_mut(Key::KEY_NUMERIC_1.code()) {
            Some(Action::MoveMouse { dx, dy }) => {
                assert_eq!((*dx, *dy), (-1, -1));
            }
            other => panic!("expected the first MoveMouse entry, got {other:?}"),
        }
    }

    #[test]
    fn missing_trigger_yields_none() {
        let mut t = table();
        assert!(t.find_mut(Key::KEY_NUMERIC_5.code()).is_none());
    }
}
