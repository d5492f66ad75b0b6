//! Static unit catalog
//!
//! Each category carries its own conversion rule shape: length and weight are
//! plain factor tables against a base unit, temperature pivots through Celsius.

use enum_dispatch::enum_dispatch;
use once_cell::sync::Lazy;

use crate::shared::types::{UnitCategory, UnitDTO};

// ============================================================================
// Units
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub name: &'static str,
    pub abbreviation: &'static str,
}

const fn unit(name: &'static str, abbreviation: &'static str) -> Unit {
    Unit { name, abbreviation }
}

// ============================================================================
// Conversion rules
// ============================================================================

/// Moves values in and out of a category's base scale.
///
/// Both methods return `None` when the unit is not part of the rule.
#[enum_dispatch]
pub trait ConversionRule {
    fn to_base(&self, value: f64, unit: &str) -> Option<f64>;
    fn from_base(&self, value: f64, unit: &str) -> Option<f64>;

    fn knows(&self, unit: &str) -> bool {
        self.to_base(0.0, unit).is_some()
    }
}

/// Multiplicative factors relative to `base`
#[derive(Debug, Clone)]
pub struct FactorTable {
    pub base: &'static str,
    factors: &'static [(&'static str, f64)],
}

impl FactorTable {
    pub fn factor(&self, unit: &str) -> Option<f64> {
        self.factors
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, factor)| *factor)
    }
}

impl ConversionRule for FactorTable {
    fn to_base(&self, value: f64, unit: &str) -> Option<f64> {
        self.factor(unit).map(|factor| value * factor)
    }

    fn from_base(&self, value: f64, unit: &str) -> Option<f64> {
        self.factor(unit).map(|factor| value / factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Celsius" => Some(TemperatureScale::Celsius),
            "Fahrenheit" => Some(TemperatureScale::Fahrenheit),
            "Kelvin" => Some(TemperatureScale::Kelvin),
            _ => None,
        }
    }

    fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        }
    }

    fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => (celsius * 9.0 / 5.0) + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }
}

/// Affine conversion pivoting through Celsius
#[derive(Debug, Clone, Copy)]
pub struct CelsiusPivot;

impl ConversionRule for CelsiusPivot {
    fn to_base(&self, value: f64, unit: &str) -> Option<f64> {
        TemperatureScale::from_name(unit).map(|scale| scale.to_celsius(value))
    }

    fn from_base(&self, value: f64, unit: &str) -> Option<f64> {
        TemperatureScale::from_name(unit).map(|scale| scale.from_celsius(value))
    }
}

#[enum_dispatch(ConversionRule)]
#[derive(Debug, Clone)]
pub enum CategoryRule {
    Factor(FactorTable),
    Affine(CelsiusPivot),
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug)]
pub struct CategoryDefinition {
    pub display_name: &'static str,
    /// Display order; the first two form the default pair
    pub units: Vec<Unit>,
    pub rule: CategoryRule,
}

static LENGTH: Lazy<CategoryDefinition> = Lazy::new(|| CategoryDefinition {
    display_name: "Length",
    units: vec![
        unit("Meters", "m"),
        unit("Kilometers", "km"),
        unit("Centimeters", "cm"),
        unit("Millimeters", "mm"),
        unit("Miles", "mi"),
        unit("Yards", "yd"),
        unit("Feet", "ft"),
        unit("Inches", "in"),
    ],
    rule: CategoryRule::Factor(FactorTable {
        base: "Meters",
        factors: &[
            ("Meters", 1.0),
            ("Kilometers", 1000.0),
            ("Centimeters", 0.01),
            ("Millimeters", 0.001),
            ("Miles", 1609.34),
            ("Yards", 0.9144),
            ("Feet", 0.3048),
            ("Inches", 0.0254),
        ],
    }),
});

static WEIGHT: Lazy<CategoryDefinition> = Lazy::new(|| CategoryDefinition {
    display_name: "Weight",
    units: vec![
        unit("Kilograms", "kg"),
        unit("Grams", "g"),
        unit("Milligrams", "mg"),
        unit("Pounds", "lb"),
        unit("Ounces", "oz"),
    ],
    rule: CategoryRule::Factor(FactorTable {
        base: "Kilograms",
        factors: &[
            ("Kilograms", 1.0),
            ("Grams", 0.001),
            ("Milligrams", 0.000001),
            ("Pounds", 0.453592),
            ("Ounces", 0.0283495),
        ],
    }),
});

static TEMPERATURE: Lazy<CategoryDefinition> = Lazy::new(|| CategoryDefinition {
    display_name: "Temperature",
    units: vec![
        unit("Celsius", "°C"),
        unit("Fahrenheit", "°F"),
        unit("Kelvin", "K"),
    ],
    rule: CategoryRule::Affine(CelsiusPivot),
});

pub fn definition(category: UnitCategory) -> &'static CategoryDefinition {
    match category {
        UnitCategory::Length => &*LENGTH,
        UnitCategory::Weight => &*WEIGHT,
        UnitCategory::Temperature => &*TEMPERATURE,
    }
}

pub fn units_for(category: UnitCategory) -> &'static [Unit] {
    &definition(category).units
}

pub fn rule_for(category: UnitCategory) -> &'static CategoryRule {
    &definition(category).rule
}

pub fn display_name(category: UnitCategory) -> &'static str {
    definition(category).display_name
}

pub fn find_unit(category: UnitCategory, name: &str) -> Option<&'static Unit> {
    units_for(category).iter().find(|u| u.name == name)
}

pub fn is_known_unit(category: UnitCategory, name: &str) -> bool {
    find_unit(category, name).is_some()
}

/// Abbreviation for display, empty when the unit is unknown
pub fn abbreviation(category: UnitCategory, name: &str) -> &'static str {
    find_unit(category, name).map(|u| u.abbreviation).unwrap_or("")
}

/// Default (from, to) pair for a category
pub fn default_pair(category: UnitCategory) -> (&'static str, &'static str) {
    let units = units_for(category);
    let from = units[0].name;
    let to = units.get(1).map(|u| u.name).unwrap_or(from);
    (from, to)
}

pub fn unit_dtos(category: UnitCategory) -> Vec<UnitDTO> {
    units_for(category)
        .iter()
        .map(|u| UnitDTO {
            name: u.name.to_string(),
            abbreviation: u.abbreviation.to_string(),
        })
        .collect()
}
