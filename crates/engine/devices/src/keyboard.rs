//! Keyboard key codes
//!
//! Only the keys the controller binds are modelled. Names follow the W3C
//! `KeyboardEvent.code` values so hosts can forward them verbatim.

use std::fmt;
use std::str::FromStr;

/// Platform-independent key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Number row digit 0-9
    Digit(u8),
    Space,
    Tab,
    D,
    O,
    X,
}

impl Key {
    /// Digit value for number row keys
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(n) => Some(n),
            _ => None,
        }
    }

    /// W3C code string for this key
    pub fn code(self) -> String {
        match self {
            Key::Digit(n) => format!("Digit{n}"),
            Key::Space => "Space".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::D => "KeyD".to_string(),
            Key::O => "KeyO".to_string(),
            Key::X => "KeyX".to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// Key code that is not bound to anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key code: {}", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim();
        if let Some(rest) = code.strip_prefix("Digit") {
            return match rest.as_bytes() {
                [d @ b'0'..=b'9'] => Ok(Key::Digit(d - b'0')),
                _ => Err(UnknownKey(code.to_string())),
            };
        }

        match code {
            "Space" => Ok(Key::Space),
            "Tab" => Ok(Key::Tab),
            "KeyD" => Ok(Key::D),
            "KeyO" => Ok(Key::O),
            "KeyX" => Ok(Key::X),
            _ => Err(UnknownKey(code.to_string())),
        }
    }
}
