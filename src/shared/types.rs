use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::error::AppError;

/// Measurement categories. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum UnitCategory {
    Length,
    Weight,
    Temperature,
}

impl UnitCategory {
    /// All categories in display order
    pub const ALL: [UnitCategory; 3] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Temperature,
    ];

    /// Serialized identifier ("length", "weight", "temperature")
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Weight => "weight",
            UnitCategory::Temperature => "temperature",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(UnitCategory::Length),
            "weight" | "mass" => Ok(UnitCategory::Weight),
            "temperature" | "temp" => Ok(UnitCategory::Temperature),
            other => Err(AppError::Validation(format!("Unknown category: {}", other))),
        }
    }
}

/// One side of a conversion as it was displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ConversionSide {
    pub value: String,
    pub unit: String,
}

impl ConversionSide {
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }
}

/// A single entry of the conversion history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ConversionRecord {
    pub id: String,
    pub from: ConversionSide,
    pub to: ConversionSide,
    pub category: UnitCategory,
    /// Epoch milliseconds
    #[ts(type = "number")]
    pub timestamp: i64,
}

impl ConversionRecord {
    /// Create a record with a fresh id and the current time
    pub fn new(from: ConversionSide, to: ConversionSide, category: UnitCategory) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            to,
            category,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// A bookmarked unit pair. Identity is the whole triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct Favorite {
    pub from: String,
    pub to: String,
    pub category: UnitCategory,
}

impl Favorite {
    pub fn new(from: impl Into<String>, to: impl Into<String>, category: UnitCategory) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            category,
        }
    }

    pub fn matches(&self, other: &Favorite) -> bool {
        self.from == other.from && self.to == other.to && self.category == other.category
    }
}

// Unit data transfer object for front ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct UnitDTO {
    pub name: String,         // Unique within the category (e.g., "Meters")
    pub abbreviation: String, // Display string (e.g., "m")
}

/// Everything a presentation layer needs to render the converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct SessionView {
    pub category: UnitCategory,
    pub from_unit: String,
    pub to_unit: String,
    pub input_value: String,
    pub output_value: String,
    pub history: Vec<ConversionRecord>,
    pub favorites: Vec<Favorite>,
    pub is_current_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&UnitCategory::Temperature).unwrap();
        assert_eq!(json, "\"temperature\"");
        let back: UnitCategory = serde_json::from_str("\"weight\"").unwrap();
        assert_eq!(back, UnitCategory::Weight);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Length".parse::<UnitCategory>().unwrap(), UnitCategory::Length);
        assert_eq!(" temp ".parse::<UnitCategory>().unwrap(), UnitCategory::Temperature);
        assert!("volume".parse::<UnitCategory>().is_err());
    }

    #[test]
    fn test_record_layout_matches_persisted_format() {
        let record = ConversionRecord::new(
            ConversionSide::new("1", "Meters"),
            ConversionSide::new("3.2808", "Feet"),
            UnitCategory::Length,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["from"]["value"], "1");
        assert_eq!(json["to"]["unit"], "Feet");
        assert_eq!(json["category"], "length");
        assert!(json["timestamp"].is_i64());
        assert!(uuid::Uuid::parse_str(json["id"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_records_get_unique_ids() {
        let a = ConversionRecord::new(ConversionSide::new("1", "Grams"), ConversionSide::new("1.00", "Grams"), UnitCategory::Weight);
        let b = ConversionRecord::new(ConversionSide::new("1", "Grams"), ConversionSide::new("1.00", "Grams"), UnitCategory::Weight);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_favorite_matches_on_whole_triple() {
        let fav = Favorite::new("Meters", "Feet", UnitCategory::Length);
        assert!(fav.matches(&Favorite::new("Meters", "Feet", UnitCategory::Length)));
        assert!(!fav.matches(&Favorite::new("Feet", "Meters", UnitCategory::Length)));
    }
}
