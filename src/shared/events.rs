use serde::{Deserialize, Serialize};

use super::types::{Favorite, UnitCategory};

/// Keypad buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value")]
pub enum Key {
    Digit(u8),
    Decimal,
    Clear,
    Backspace,
}

/// User events delivered by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum SessionEvent {
    SelectCategory(UnitCategory),
    SelectFromUnit(String),
    SelectToUnit(String),
    Keypad(Key),
    /// Keyboard entry replacing the whole input
    Type(String),
    SwapUnits,
    ToggleCurrentFavorite,
    /// Star a history row by record id
    ToggleFavoriteFromHistory(String),
    ClearHistory,
    /// Add or remove any favorite, including one whose units no longer exist
    ToggleFavorite(Favorite),
    SelectFavorite(Favorite),
    Reset,
}
