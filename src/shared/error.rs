use thiserror::Error;
use serde::Serialize;

use crate::core::converter::ConversionError;

/// Crate-wide error type.
///
/// Payloads are plain strings so the error stays serializable for a front end.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Storage Error: {0}")]
    Storage(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Conversion Error: {0}")]
    Conversion(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        AppError::Conversion(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::UnitCategory;

    #[test]
    fn test_conversion_error_maps_to_conversion_variant() {
        let err: AppError = ConversionError::UnknownUnit {
            unit: "Furlongs".to_string(),
            category: UnitCategory::Length,
        }
        .into();
        assert!(matches!(err, AppError::Conversion(ref msg) if msg.contains("Furlongs")));
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(AppError::Validation("bad".to_string())).unwrap();
        assert_eq!(json["type"], "Validation");
        assert_eq!(json["message"], "bad");
    }
}
