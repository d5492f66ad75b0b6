use thiserror::Error;

use crate::shared::types::UnitCategory;

use super::registry::{rule_for, ConversionRule};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Unknown {category} unit: {unit}")]
    UnknownUnit { unit: String, category: UnitCategory },

    #[error("Input value is not a finite number")]
    NonFiniteInput,

    #[error("Result of converting {value} {from} to {to} is not finite")]
    NonFiniteResult { value: f64, from: String, to: String },
}

/// Convert `value` between two units of the same category.
///
/// Returns full double precision; rounding is left to the formatter.
pub fn convert(
    value: f64,
    from_unit: &str,
    to_unit: &str,
    category: UnitCategory,
) -> Result<f64, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::NonFiniteInput);
    }

    let rule = rule_for(category);
    for unit in [from_unit, to_unit] {
        if !rule.knows(unit) {
            return Err(ConversionError::UnknownUnit {
                unit: unit.to_string(),
                category,
            });
        }
    }

    // Same unit: skip the round trip through the base scale
    if from_unit == to_unit {
        return Ok(value);
    }

    let result = rule
        .to_base(value, from_unit)
        .and_then(|base| rule.from_base(base, to_unit))
        .ok_or_else(|| ConversionError::UnknownUnit {
            unit: from_unit.to_string(),
            category,
        })?;

    if !result.is_finite() {
        return Err(ConversionError::NonFiniteResult {
            value,
            from: from_unit.to_string(),
            to: to_unit.to_string(),
        });
    }

    tracing::debug!("[convert] {} {} -> {} {} ({})", value, from_unit, result, to_unit, category);
    Ok(result)
}
