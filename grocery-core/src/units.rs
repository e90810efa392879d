//! Measurement units and conversion between them.
//!
//! Every unit belongs to exactly one dimension. Only volume and weight units
//! convert, and only within their own dimension: volume through fluid ounces,
//! weight through ounces. Count and non-standard units never convert, not even
//! to another unit of the same kind.

use crate::error::UnitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Volume conversion factors, in fluid ounces per unit.
pub const FL_OZ_PER_TSP: f64 = 0.166667;
pub const FL_OZ_PER_TBSP: f64 = 0.5;
pub const FL_OZ_PER_FL_OZ: f64 = 1.0;
pub const FL_OZ_PER_CUP: f64 = 8.0;
pub const FL_OZ_PER_PINT: f64 = 16.0;
pub const FL_OZ_PER_QUART: f64 = 32.0;
pub const FL_OZ_PER_GALLON: f64 = 128.0;
pub const FL_OZ_PER_ML: f64 = 0.033814;
pub const FL_OZ_PER_LITER: f64 = 33.814;

/// Weight conversion factors, in ounces per unit.
pub const OZ_PER_OZ: f64 = 1.0;
pub const OZ_PER_LB: f64 = 16.0;
pub const OZ_PER_GRAM: f64 = 0.035274;
pub const OZ_PER_KG: f64 = 35.274;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Tsp,
    Tbsp,
    FlOz,
    Cup,
    Pint,
    Quart,
    Gallon,
    Ml,
    Liter,
    Oz,
    Lb,
    Gram,
    Kg,
    Whole,
    Clove,
    Slice,
    Piece,
    Pinch,
    Dash,
    ToTaste,
}

/// The physical dimension a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Volume,
    Weight,
    Count,
    NonStandard,
}

impl Unit {
    pub const ALL: &'static [Unit] = &[
        Unit::Tsp,
        Unit::Tbsp,
        Unit::FlOz,
        Unit::Cup,
        Unit::Pint,
        Unit::Quart,
        Unit::Gallon,
        Unit::Ml,
        Unit::Liter,
        Unit::Oz,
        Unit::Lb,
        Unit::Gram,
        Unit::Kg,
        Unit::Whole,
        Unit::Clove,
        Unit::Slice,
        Unit::Piece,
        Unit::Pinch,
        Unit::Dash,
        Unit::ToTaste,
    ];

    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Tsp
            | Unit::Tbsp
            | Unit::FlOz
            | Unit::Cup
            | Unit::Pint
            | Unit::Quart
            | Unit::Gallon
            | Unit::Ml
            | Unit::Liter => Dimension::Volume,
            Unit::Oz | Unit::Lb | Unit::Gram | Unit::Kg => Dimension::Weight,
            Unit::Whole | Unit::Clove | Unit::Slice | Unit::Piece => Dimension::Count,
            Unit::Pinch | Unit::Dash | Unit::ToTaste => Dimension::NonStandard,
        }
    }

    /// Multiplier to the dimension's base unit (fl oz for volume, oz for weight).
    /// `None` for units that never convert.
    pub fn base_factor(self) -> Option<f64> {
        let factor = match self {
            Unit::Tsp => FL_OZ_PER_TSP,
            Unit::Tbsp => FL_OZ_PER_TBSP,
            Unit::FlOz => FL_OZ_PER_FL_OZ,
            Unit::Cup => FL_OZ_PER_CUP,
            Unit::Pint => FL_OZ_PER_PINT,
            Unit::Quart => FL_OZ_PER_QUART,
            Unit::Gallon => FL_OZ_PER_GALLON,
            Unit::Ml => FL_OZ_PER_ML,
            Unit::Liter => FL_OZ_PER_LITER,
            Unit::Oz => OZ_PER_OZ,
            Unit::Lb => OZ_PER_LB,
            Unit::Gram => OZ_PER_GRAM,
            Unit::Kg => OZ_PER_KG,
            Unit::Whole
            | Unit::Clove
            | Unit::Slice
            | Unit::Piece
            | Unit::Pinch
            | Unit::Dash
            | Unit::ToTaste => return None,
        };
        Some(factor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Tsp => "tsp",
            Unit::Tbsp => "tbsp",
            Unit::FlOz => "fl_oz",
            Unit::Cup => "cup",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gallon",
            Unit::Ml => "ml",
            Unit::Liter => "liter",
            Unit::Oz => "oz",
            Unit::Lb => "lb",
            Unit::Gram => "gram",
            Unit::Kg => "kg",
            Unit::Whole => "whole",
            Unit::Clove => "clove",
            Unit::Slice => "slice",
            Unit::Piece => "piece",
            Unit::Pinch => "pinch",
            Unit::Dash => "dash",
            Unit::ToTaste => "to_taste",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    /// Parses canonical names plus the spellings recipes commonly use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let normalized = normalized.trim_end_matches('.');

        let unit = match normalized {
            "tsp" | "teaspoon" | "teaspoons" => Unit::Tsp,
            "tbsp" | "tbs" | "tablespoon" | "tablespoons" => Unit::Tbsp,
            "fl_oz" | "fl oz" | "fluid ounce" | "fluid ounces" => Unit::FlOz,
            "cup" | "cups" => Unit::Cup,
            "pint" | "pints" | "pt" => Unit::Pint,
            "quart" | "quarts" | "qt" => Unit::Quart,
            "gallon" | "gallons" | "gal" => Unit::Gallon,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Ml,
            "liter" | "liters" | "litre" | "litres" | "l" => Unit::Liter,
            "oz" | "ounce" | "ounces" => Unit::Oz,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Lb,
            "gram" | "grams" | "g" => Unit::Gram,
            "kg" | "kilogram" | "kilograms" => Unit::Kg,
            "whole" => Unit::Whole,
            "clove" | "cloves" => Unit::Clove,
            "slice" | "slices" => Unit::Slice,
            "piece" | "pieces" | "pc" => Unit::Piece,
            "pinch" | "pinches" => Unit::Pinch,
            "dash" | "dashes" => Unit::Dash,
            "to_taste" | "to taste" => Unit::ToTaste,
            _ => return Err(UnitError::UnknownUnit(s.to_string())),
        };
        Ok(unit)
    }
}

/// Convert `quantity` from one unit to another within the same dimension.
///
/// Converting a unit to itself returns the quantity untouched, for every unit.
/// Otherwise both units must be volume or both weight.
pub fn convert(quantity: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    if from == to {
        return Ok(quantity);
    }

    let incompatible = || UnitError::Incompatible { from, to };

    if from.dimension() != to.dimension() {
        return Err(incompatible());
    }
    let from_factor = from.base_factor().ok_or_else(incompatible)?;
    let to_factor = to.base_factor().ok_or_else(incompatible)?;

    Ok(quantity * from_factor / to_factor)
}
