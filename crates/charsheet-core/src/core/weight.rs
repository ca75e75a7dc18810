// crates/charsheet-core/src/core/weight.rs
// ============================================================================
// Module: Weight Values
// Description: Weight magnitudes with units and unit-normalized ordering.
// Purpose: Compare weights authored in different units without rounding.
// Dependencies: bigdecimal, serde
// ============================================================================

//! ## Overview
//! A [`Weight`] is an exact decimal magnitude plus a [`WeightUnit`]. Equality
//! and ordering use the magnitude normalized to pounds, so `1 kg` equals
//! `2 lb`. Metric conversions follow the ruleset's simplified table
//! (1 kg = 2 lb), not the physical constant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::core::qualifier::QualifierParseError;
use crate::core::qualifier::format_decimal;
use crate::core::qualifier::parse_decimal;

// ============================================================================
// SECTION: Units
// ============================================================================

/// Supported weight units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeightUnit {
    /// Ounce, 1/16 lb.
    Ounce,
    /// Pound, the normalization base.
    #[default]
    Pound,
    /// Short ton, 2000 lb.
    Ton,
    /// Gram, 1/500 lb.
    Gram,
    /// Kilogram, 2 lb.
    Kilogram,
    /// Metric ton, 2000 lb.
    MetricTon,
}

impl WeightUnit {
    /// All units in display order.
    pub const ALL: [Self; 6] =
        [Self::Ounce, Self::Pound, Self::Ton, Self::Gram, Self::Kilogram, Self::MetricTon];

    /// Returns the unit abbreviation used in text and records.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Ounce => "oz",
            Self::Pound => "lb",
            Self::Ton => "tn",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::MetricTon => "t",
        }
    }

    /// Returns pounds per unit as a `(numerator, denominator)` ratio.
    const fn pounds_ratio(self) -> (i64, i64) {
        match self {
            Self::Ounce => (1, 16),
            Self::Pound => (1, 1),
            Self::Ton | Self::MetricTon => (2000, 1),
            Self::Gram => (1, 500),
            Self::Kilogram => (2, 1),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = QualifierParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lowered = text.trim().to_ascii_lowercase();
        let normalized = if lowered == "lbs" { "lb" } else { lowered.as_str() };
        Self::ALL
            .into_iter()
            .find(|unit| unit.abbreviation() == normalized)
            .ok_or_else(|| QualifierParseError::UnknownUnit(text.trim().to_string()))
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

// ============================================================================
// SECTION: Weight
// ============================================================================

/// Weight magnitude with unit.
///
/// # Invariants
/// - Equality and ordering use [`Weight::normalized`]; the authored unit is kept
///   for display only.
#[derive(Debug, Clone, Default)]
pub struct Weight {
    /// Authored magnitude.
    magnitude: BigDecimal,
    /// Authored unit.
    unit: WeightUnit,
}

impl Weight {
    /// Creates a weight.
    #[must_use]
    pub const fn new(magnitude: BigDecimal, unit: WeightUnit) -> Self {
        Self {
            magnitude,
            unit,
        }
    }

    /// Creates a whole-pound weight.
    #[must_use]
    pub fn pounds(pounds: i64) -> Self {
        Self::new(BigDecimal::from(pounds), WeightUnit::Pound)
    }

    /// Returns the authored magnitude.
    #[must_use]
    pub const fn magnitude(&self) -> &BigDecimal {
        &self.magnitude
    }

    /// Returns the authored unit.
    #[must_use]
    pub const fn unit(&self) -> WeightUnit {
        self.unit
    }

    /// Returns the magnitude converted to pounds.
    #[must_use]
    pub fn normalized(&self) -> BigDecimal {
        let (numerator, denominator) = self.unit.pounds_ratio();
        let scaled = &self.magnitude * &BigDecimal::from(numerator);
        if denominator == 1 { scaled } else { scaled / BigDecimal::from(denominator) }
    }
}

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

impl FromStr for Weight {
    type Err = QualifierParseError;

    /// Parses `"<magnitude> <unit>"`; a missing unit means pounds.
    ///
    /// The unit is the trailing alphabetic run, so exponent magnitudes such
    /// as `1e3 lb` and `1E-7 lb` parse.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(QualifierParseError::Empty);
        }
        let split = trimmed.trim_end_matches(char::is_alphabetic).len();
        let (number, unit) = trimmed.split_at(split);
        let magnitude = parse_decimal(number)?;
        let unit = if unit.trim().is_empty() { WeightUnit::Pound } else { unit.parse()? };
        Ok(Self::new(magnitude, unit))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_decimal(&self.magnitude), self.unit)
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
