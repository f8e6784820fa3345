//! Traffic volume units and their conversion to terabytes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const STEP: f64 = 1024.0;

/// A binary volume unit as it appears in the traffic table's `unit` column.
///
/// Parsing trims surrounding whitespace but is case-sensitive: `"TB"` is a
/// unit, `"tb"` is not.
///
/// # Examples
///
/// ```
/// use trafficmap_data::TrafficUnit;
///
/// let unit: TrafficUnit = " PB ".parse().expect("known unit");
/// assert_eq!(unit.to_terabytes(2.0), 2048.0);
/// assert!("tb".parse::<TrafficUnit>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficUnit {
    /// `B`
    Byte,
    /// `KB`
    Kilobyte,
    /// `MB`
    Megabyte,
    /// `GB`
    Gigabyte,
    /// `TB`
    Terabyte,
    /// `PB`
    Petabyte,
}

impl TrafficUnit {
    /// Every unit, smallest first.
    pub const ALL: [Self; 6] = [
        Self::Byte,
        Self::Kilobyte,
        Self::Megabyte,
        Self::Gigabyte,
        Self::Terabyte,
        Self::Petabyte,
    ];

    /// Symbol used in the source table.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Byte => "B",
            Self::Kilobyte => "KB",
            Self::Megabyte => "MB",
            Self::Gigabyte => "GB",
            Self::Terabyte => "TB",
            Self::Petabyte => "PB",
        }
    }

    /// Power of 1024 separating this unit from a terabyte.
    const fn exponent(self) -> i32 {
        match self {
            Self::Byte => -4,
            Self::Kilobyte => -3,
            Self::Megabyte => -2,
            Self::Gigabyte => -1,
            Self::Terabyte => 0,
            Self::Petabyte => 1,
        }
    }

    /// Terabytes in one of this unit.
    #[must_use]
    pub fn terabytes_per_unit(self) -> f64 {
        STEP.powi(self.exponent())
    }

    /// Convert `value` of this unit to terabytes.
    #[must_use]
    pub fn to_terabytes(self, value: f64) -> f64 {
        value * self.terabytes_per_unit()
    }
}

impl fmt::Display for TrafficUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A `unit` cell that names no known unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown traffic unit {0:?}")]
pub struct UnknownUnitError(pub String);

impl FromStr for TrafficUnit {
    type Err = UnknownUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        Self::ALL
            .into_iter()
            .find(|unit| unit.symbol() == symbol)
            .ok_or_else(|| UnknownUnitError(symbol.to_owned()))
    }
}
