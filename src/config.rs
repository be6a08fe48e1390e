//! Mapping configuration.
//!
//! Loading happens in two stages: serde/TOML parses the file into raw,
//! string-keyed structures (syntax only), then [`validate`] resolves key
//! names through the symbol table and converts each entry into a typed
//! [`MappingEntry`] (semantics). An invalid entry is dropped with a
//! warning rather than failing the load — the engine tolerates a
//! partially populated or empty table and simply passes more through.

use crate::keysym;
use crate::mapping::{Action, MappingEntry, MappingTable, MAX_COMBO};
use crate::rate_limit::CooldownGate;
use crate::velocity::{DEFAULT_BASE_SPEED, DEFAULT_REPEAT_INCREMENT};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Raw config file contents, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    /// Speed assigned on a key press.
    #[serde(default = "default_base_speed")]
    pub base_speed: i32,
    /// Speed added per autorepeat notification.
    #[serde(default = "default_repeat_increment")]
    pub repeat_increment: i32,
    /// Emit a sync marker after the final release of a key combination.
    /// Disable for byte compatibility with consumers that expect the
    /// physical key's own release to delimit the chord.
    #[serde(default = "default_true")]
    pub combo_trailing_sync: bool,
    #[serde(default)]
    pub mappings: Vec<RawMapping>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMapping {
    /// Key identifier: symbolic name, decimal, or `0x`-prefixed hex.
    pub key: String,
    pub action: RawAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawAction {
    MoveMouse {
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
    },
    KeyCombination {
        keys: Vec<String>,
    },
    Execute {
        command: String,
        /// Minimum seconds between firings; 0 = unlimited.
        #[serde(default, alias = "rateLimitInSeconds")]
        rate_limit_secs: u64,
    },
    Passthrough,
}

fn default_base_speed() -> i32 {
    DEFAULT_BASE_SPEED
}
fn default_repeat_increment() -> i32 {
    DEFAULT_REPEAT_INCREMENT
}
fn default_true() -> bool {
    true
}

impl RawConfig {
    /// Default config file path (`~/.config/remote-mouse/config.toml`).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("remote-mouse")
            .join("config.toml")
    }

    /// Load from a file. A missing file is not an error: the engine runs
    /// with an empty table and passes every event through.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: RawConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            base_speed: DEFAULT_BASE_SPEED,
            repeat_increment: DEFAULT_REPEAT_INCREMENT,
            combo_trailing_sync: true,
            mappings: Vec::new(),
        }
    }
}

/// Validated engine settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub table: MappingTable,
    pub base_speed: i32,
    pub repeat_increment: i32,
    pub combo_trailing_sync: bool,
}

/// Convert raw config into engine settings, dropping invalid entries
/// individually with a warning.
pub fn validate(raw: RawConfig) -> Settings {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for (index, mapping) in raw.mappings.into_iter().enumerate() {
        match validate_mapping(&mapping) {
            Ok(entry) => {
                if !seen.insert(entry.trigger.code()) {
                    warn!(
                        index,
                        key = mapping.key.as_str(),
                        "mapping shadowed by an earlier entry for the same key; it will never match"
                    );
                }
                entries.push(entry);
            }
            Err(reason) => {
                warn!(
                    index,
                    key = mapping.key.as_str(),
                    reason = reason.as_str(),
                    "dropping invalid mapping"
                );
            }
        }
    }

    Settings {
        table: MappingTable::new(entries),
        base_speed: raw.base_speed,
        repeat_increment: raw.repeat_increment,
        combo_trailing_sync: raw.combo_trailing_sync,
    }
}

fn validate_mapping(mapping: &RawMapping) -> Result<MappingEntry, String> {
    let trigger = keysym::resolve(&mapping.key).map_err(|e| e.to_string())?;

    let action = match &mapping.action {
        RawAction::MoveMouse { x, y } => {
            if !(-1..=1).contains(x) || !(-1..=1).contains(y) {
                return Err(format!("move_mouse signs must be -1, 0 or 1, got ({x}, {y})"));
            }
            Action::MoveMouse { dx: *x, dy: *y }
        }
        RawAction::KeyCombination { keys } => {
            if keys.is_empty() || keys.len() > MAX_COMBO {
                return Err(format!(
                    "key_combination needs 1..={MAX_COMBO} keys, got {}",
                    keys.len()
                ));
            }
            let mut resolved = Vec::with_capacity(keys.len());
            for name in keys {
                resolved.push(keysym::resolve(name).map_err(|e| e.to_string())?);
            }
            Action::KeyCombination { keys: resolved }
        }
        RawAction::Execute {
            command,
            rate_limit_secs,
        } => {
            if command.trim().is_empty() {
                return Err("execute command must not be empty".to_string());
            }
            Action::Execute {
                command: command.clone(),
                gate: CooldownGate::new(Duration::from_secs(*rate_limit_secs)),
            }
        }
        RawAction::Passthrough => Action::Passthrough,
    };

    Ok(MappingEntry { trigger, action })
}
