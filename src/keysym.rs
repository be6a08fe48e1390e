//! Key name resolution.
//!
//! Maps the key identifiers used in config files to evdev key codes.
//! Three forms are accepted: a `0x`-prefixed hex literal, a decimal
//! literal, or a canonical symbolic name from the static table below.
//! Name lookup is a case-sensitive exact match, first match wins; an
//! unknown name is a hard error so the config loader can reject the
//! entry at load time instead of silently mapping to a bogus code.
//!
//! Name coverage follows the kernel's input-event-codes and the remote
//! control tables: numeric keypad, playback/media, navigation, modifier,
//! function, letter and digit keys, plus the three mouse buttons.

use evdev::Key;
use thiserror::Error;

/// Exclusive upper bound of the key-code space (`KEY_MAX`).
///
/// Numeric literals must fall below this, and the virtual device
/// announces exactly this range of key capabilities.
pub const KEY_CODE_LIMIT: u16 = 0x2ff;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeysymError {
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
    #[error("malformed key literal: {0:?}")]
    BadLiteral(String),
    #[error("key code {0:#x} outside the valid range 0..{KEY_CODE_LIMIT:#x}")]
    CodeOutOfRange(u32),
}

/// Resolve a key identifier to an evdev key code.
pub fn resolve(name: &str) -> Result<Key, KeysymError> {
    if let Some(hex) = name.strip_prefix("0x") {
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| KeysymError::BadLiteral(name.to_string()))?;
        return checked(code);
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        let code = name
            .parse::<u32>()
            .map_err(|_| KeysymError::BadLiteral(name.to_string()))?;
        return checked(code);
    }
    NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, key)| *key)
        .ok_or_else(|| KeysymError::UnknownKey(name.to_string()))
}

/// Reverse lookup: the canonical name for a key code, if the table has one.
pub fn name(key: Key) -> Option<&'static str> {
    NAMES.iter().find(|(_, k)| *k == key).map(|(n, _)| *n)
}

fn checked(code: u32) -> Result<Key, KeysymError> {
    if code >= KEY_CODE_LIMIT as u32 {
        return Err(KeysymError::CodeOutOfRange(code));
    }
    Ok(Key::new(code as u16))
}

#[rustfmt::skip]
static NAMES: &[(&str, Key)] = &[
    // Numeric keypad
    ("KEY_NUMERIC_0", Key::KEY_NUMERIC_0), ("KEY_NUMERIC_1", Key::KEY_NUMERIC_1),
    ("KEY_NUMERIC_2", Key::KEY_NUMERIC_2), ("KEY_NUMERIC_3", Key::KEY_NUMERIC_3),
    ("KEY_NUMERIC_4", Key::KEY_NUMERIC_4), ("KEY_NUMERIC_5", Key::KEY_NUMERIC_5),
    ("KEY_NUMERIC_6", Key::KEY_NUMERIC_6), ("KEY_NUMERIC_7", Key::KEY_NUMERIC_7),
    ("KEY_NUMERIC_8", Key::KEY_NUMERIC_8), ("KEY_NUMERIC_9", Key::KEY_NUMERIC_9),
    // Playback control
    ("KEY_FORWARD", Key::KEY_FORWARD), ("KEY_BACK", Key::KEY_BACK),
    ("KEY_FASTFORWARD", Key::KEY_FASTFORWARD), ("KEY_REWIND", Key::KEY_REWIND),
    ("KEY_NEXT", Key::KEY_NEXT), ("KEY_PREVIOUS", Key::KEY_PREVIOUS),
    ("KEY_AGAIN", Key::KEY_AGAIN), ("KEY_PAUSE", Key::KEY_PAUSE),
    ("KEY_PLAY", Key::KEY_PLAY), ("KEY_PLAYPAUSE", Key::KEY_PLAYPAUSE),
    ("KEY_STOP", Key::KEY_STOP), ("KEY_RECORD", Key::KEY_RECORD),
    ("KEY_CAMERA", Key::KEY_CAMERA), ("KEY_SHUFFLE", Key::KEY_SHUFFLE),
    ("KEY_TIME", Key::KEY_TIME), ("KEY_TITLE", Key::KEY_TITLE),
    ("KEY_SUBTITLE", Key::KEY_SUBTITLE),
    // Image control
    ("KEY_BRIGHTNESSDOWN", Key::KEY_BRIGHTNESSDOWN),
    ("KEY_BRIGHTNESSUP", Key::KEY_BRIGHTNESSUP),
    ("KEY_ANGLE", Key::KEY_ANGLE), ("KEY_EPG", Key::KEY_EPG),
    ("KEY_TEXT", Key::KEY_TEXT), ("KEY_ZOOM", Key::KEY_ZOOM),
    ("KEY_SCREEN", Key::KEY_SCREEN),
    // Audio control
    ("KEY_AUDIO", Key::KEY_AUDIO), ("KEY_MUTE", Key::KEY_MUTE),
    ("KEY_VOLUMEDOWN", Key::KEY_VOLUMEDOWN), ("KEY_VOLUMEUP", Key::KEY_VOLUMEUP),
    ("KEY_MODE", Key::KEY_MODE), ("KEY_LANGUAGE", Key::KEY_LANGUAGE),
    // Channel control
    ("KEY_CHANNEL", Key::KEY_CHANNEL), ("KEY_CHANNELDOWN", Key::KEY_CHANNELDOWN),
    ("KEY_CHANNELUP", Key::KEY_CHANNELUP), ("KEY_DIGITS", Key::KEY_DIGITS),
    ("KEY_SEARCH", Key::KEY_SEARCH),
    // Colored keys
    ("KEY_BLUE", Key::KEY_BLUE), ("KEY_GREEN", Key::KEY_GREEN),
    ("KEY_RED", Key::KEY_RED), ("KEY_YELLOW", Key::KEY_YELLOW),
    // Media selection
    ("KEY_CD", Key::KEY_CD), ("KEY_DVD", Key::KEY_DVD),
    ("KEY_EJECTCLOSECD", Key::KEY_EJECTCLOSECD), ("KEY_MEDIA", Key::KEY_MEDIA),
    ("KEY_PC", Key::KEY_PC), ("KEY_RADIO", Key::KEY_RADIO),
    ("KEY_TV", Key::KEY_TV), ("KEY_TV2", Key::KEY_TV2),
    ("KEY_VCR", Key::KEY_VCR), ("KEY_VIDEO", Key::KEY_VIDEO),
    // Power control
    ("KEY_POWER", Key::KEY_POWER), ("KEY_POWER2", Key::KEY_POWER2),
    ("KEY_SLEEP", Key::KEY_SLEEP), ("KEY_SUSPEND", Key::KEY_SUSPEND),
    // Window control
    ("KEY_CLEAR", Key::KEY_CLEAR), ("KEY_CLOSE", Key::KEY_CLOSE),
    ("KEY_CYCLEWINDOWS", Key::KEY_CYCLEWINDOWS),
    ("KEY_FAVORITES", Key::KEY_FAVORITES), ("KEY_MENU", Key::KEY_MENU),
    ("KEY_NEW", Key::KEY_NEW), ("KEY_OK", Key::KEY_OK),
    // Navigation
    ("KEY_ESC", Key::KEY_ESC), ("KEY_HELP", Key::KEY_HELP),
    ("KEY_HOMEPAGE", Key::KEY_HOMEPAGE), ("KEY_INFO", Key::KEY_INFO),
    ("KEY_WWW", Key::KEY_WWW),
    ("KEY_UP", Key::KEY_UP), ("KEY_DOWN", Key::KEY_DOWN),
    ("KEY_LEFT", Key::KEY_LEFT), ("KEY_RIGHT", Key::KEY_RIGHT),
    ("KEY_ENTER", Key::KEY_ENTER), ("KEY_TAB", Key::KEY_TAB),
    ("KEY_SPACE", Key::KEY_SPACE), ("KEY_BACKSPACE", Key::KEY_BACKSPACE),
    ("KEY_DELETE", Key::KEY_DELETE), ("KEY_INSERT", Key::KEY_INSERT),
    ("KEY_HOME", Key::KEY_HOME), ("KEY_END", Key::KEY_END),
    ("KEY_PAGEUP", Key::KEY_PAGEUP), ("KEY_PAGEDOWN", Key::KEY_PAGEDOWN),
    ("KEY_DOT", Key::KEY_DOT), ("KEY_FN", Key::KEY_FN),
    // Modifiers
    ("KEY_LEFTCTRL", Key::KEY_LEFTCTRL), ("KEY_LEFTSHIFT", Key::KEY_LEFTSHIFT),
    ("KEY_LEFTALT", Key::KEY_LEFTALT), ("KEY_LEFTMETA", Key::KEY_LEFTMETA),
    ("KEY_RIGHTCTRL", Key::KEY_RIGHTCTRL), ("KEY_RIGHTSHIFT", Key::KEY_RIGHTSHIFT),
    ("KEY_RIGHTALT", Key::KEY_RIGHTALT), ("KEY_RIGHTMETA", Key::KEY_RIGHTMETA),
    // Function keys
    ("KEY_F1", Key::KEY_F1), ("KEY_F2", Key::KEY_F2), ("KEY_F3", Key::KEY_F3),
    ("KEY_F4", Key::KEY_F4), ("KEY_F5", Key::KEY_F5), ("KEY_F6", Key::KEY_F6),
    ("KEY_F7", Key::KEY_F7), ("KEY_F8", Key::KEY_F8), ("KEY_F9", Key::KEY_F9),
    ("KEY_F10", Key::KEY_F10), ("KEY_F11", Key::KEY_F11), ("KEY_F12", Key::KEY_F12),
    // Letters
    ("KEY_A", Key::KEY_A), ("KEY_B", Key::KEY_B), ("KEY_C", Key::KEY_C),
    ("KEY_D", Key::KEY_D), ("KEY_E", Key::KEY_E), ("KEY_F", Key::KEY_F),
    ("KEY_G", Key::KEY_G), ("KEY_H", Key::KEY_H), ("KEY_I", Key::KEY_I),
    ("KEY_J", Key::KEY_J), ("KEY_K", Key::KEY_K), ("KEY_L", Key::KEY_L),
    ("KEY_M", Key::KEY_M), ("KEY_N", Key::KEY_N), ("KEY_O", Key::KEY_O),
    ("KEY_P", Key::KEY_P), ("KEY_Q", Key::KEY_Q), ("KEY_R", Key::KEY_R),
    ("KEY_S", Key::KEY_S), ("KEY_T", Key::KEY_T), ("KEY_U", Key::KEY_U),
    ("KEY_V", Key::KEY_V), ("KEY_W", Key::KEY_W), ("KEY_X", Key::KEY_X),
    ("KEY_Y", Key::KEY_Y), ("KEY_Z", Key::KEY_Z),
    // Number row
    ("KEY_0", Key::KEY_0), ("KEY_1", Key::KEY_1), ("KEY_2", Key::KEY_2),
    ("KEY_3", Key::KEY_3), ("KEY_4", Key::KEY_4), ("KEY_5", Key::KEY_5),
    ("KEY_6", Key::KEY_6), ("KEY_7", Key::KEY_7), ("KEY_8", Key::KEY_8),
    ("KEY_9", Key::KEY_9),
    // Keypad operators
    ("KEY_KPENTER", Key::KEY_KPENTER), ("KEY_KPPLUS", Key::KEY_KPPLUS),
    ("KEY_KPMINUS", Key::KEY_KPMINUS), ("KEY_KPASTERISK", Key::KEY_KPASTERISK),
    ("KEY_KPSLASH", Key::KEY_KPSLASH),
    // Mouse buttons
    ("BTN_LEFT", Key::BTN_LEFT), ("BTN_RIGHT", Key::BTN_RIGHT),
    ("BTN_MIDDLE", Key::BTN_MIDDLE),
];
