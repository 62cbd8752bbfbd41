//! Unit conversion module
//!
//! Profile data is stored in SI units (kg, cm) and converted at the form
//! boundary. Two flavours of conversion are offered:
//!
//! 1. **Exact**: [`WeightUnit`] / [`HeightUnit`] methods, used for storage
//! 2. **Display**: [`kg_to_lbs`] and friends, rounded to whole numbers for
//!    form fields. Rounding is lossy, so display round-trips are not exact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pounds in one kilogram
pub const LBS_PER_KG: f64 = 2.20462;

/// Centimeters in one inch
pub const CM_PER_INCH: f64 = 2.54;

/// Round to the nearest integer, halves toward positive infinity
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

// ============================================================================
// Display converters
// ============================================================================

/// Kilograms to whole pounds
pub fn kg_to_lbs(kg: f64) -> f64 {
    round_half_up(kg * LBS_PER_KG)
}

/// Pounds to whole kilograms
pub fn lbs_to_kg(lbs: f64) -> f64 {
    round_half_up(lbs / LBS_PER_KG)
}

/// Centimeters to whole inches
pub fn cm_to_inches(cm: f64) -> f64 {
    round_half_up(cm / CM_PER_INCH)
}

/// Inches to whole centimeters
pub fn inches_to_cm(inches: f64) -> f64 {
    round_half_up(inches * CM_PER_INCH)
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value / LBS_PER_KG,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg * LBS_PER_KG,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    #[serde(rename = "in")]
    Inches,
}

impl HeightUnit {
    /// Convert from this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value,
            HeightUnit::Inches => value * CM_PER_INCH,
        }
    }

    /// Convert from centimeters to this unit
    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            HeightUnit::Cm => cm,
            HeightUnit::Inches => cm / CM_PER_INCH,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Inches => "in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "in" | "inch" | "inches" => Ok(HeightUnit::Inches),
            _ => Err(format!("Unknown height unit: {}", s)),
        }
    }
}
