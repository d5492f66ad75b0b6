//! Numeric entry editing and parsing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::events::Key;

pub const INITIAL_INPUT: &str = "1";

// Leading float prefix: sign, digits with optional fraction (or bare fraction), optional exponent.
// Using expect is safe here since this is a compile-time constant pattern
static RE_NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("Failed to compile numeric prefix pattern")
});

/// Parse the numeric prefix of an entry, ignoring trailing text.
///
/// Returns `None` for empty or non-numeric entries.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let caps = RE_NUMERIC_PREFIX.captures(text)?;
    caps[1].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Strip display grouping so a formatted result can be fed back as input
pub fn strip_grouping(formatted: &str) -> String {
    formatted.replace(',', "")
}

/// The raw text in the entry display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    value: String,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(INITIAL_INPUT)
    }
}

impl InputBuffer {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Keyboard entry replaces the whole value
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Clear => self.value = "0".to_string(),
            Key::Backspace => {
                if self.value.chars().count() > 1 {
                    self.value.pop();
                } else {
                    self.value = "0".to_string();
                }
            }
            Key::Decimal => {
                if !self.value.contains('.') {
                    self.value.push('.');
                }
            }
            Key::Digit(d) => {
                let Some(digit) = char::from_digit(u32::from(d), 10) else {
                    tracing::warn!("[InputBuffer] Ignoring invalid keypad digit {}", d);
                    return;
                };
                if self.value == "0" {
                    self.value = digit.to_string();
                } else {
                    self.value.push(digit);
                }
            }
        }
    }
}
