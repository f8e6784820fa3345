//! Density tiers and the split of a point budget across them.

use std::fmt;

use crate::config::TierRatios;

/// One of the three jitter bands around a city centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Tier {
    /// Tight, bright centre.
    Core,
    /// Medium spread.
    Mid,
    /// Sparse diffusion forming the gradient edge.
    Outer,
}

impl Tier {
    /// All tiers in sampling order.
    pub const ALL: [Self; 3] = [Self::Core, Self::Mid, Self::Outer];

    /// Lowercase label used in exports and log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Mid => "mid",
            Self::Outer => "outer",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer point counts per tier for a single city.
///
/// The outer tier absorbs every rounding remainder so the three counts
/// always add up to the budget they were derived from.
///
/// # Examples
///
/// ```
/// use trafficmap_core::{TierCounts, TierRatios};
///
/// let counts = TierCounts::partition(7, &TierRatios::default());
/// assert_eq!((counts.core, counts.mid, counts.outer), (2, 2, 3));
/// assert_eq!(counts.total(), 7);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TierCounts {
    /// Points in the core tier.
    pub core: u32,
    /// Points in the mid tier.
    pub mid: u32,
    /// Points in the outer tier.
    pub outer: u32,
}

impl TierCounts {
    /// Split `budget` using truncating fractions for core and mid.
    #[must_use]
    pub fn partition(budget: u32, ratios: &TierRatios) -> Self {
        let core = floor_share(budget, ratios.core).min(budget);
        let remaining = budget - core;
        let mid = floor_share(budget, ratios.mid).min(remaining);
        Self {
            core,
            mid,
            outer: remaining - mid,
        }
    }

    /// Count for a single tier.
    #[must_use]
    pub const fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Core => self.core,
            Tier::Mid => self.mid,
            Tier::Outer => self.outer,
        }
    }

    /// Sum of all three tiers.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.core + self.mid + self.outer
    }
}

// Float-to-int `as` saturates and maps NaN to zero.
fn floor_share(budget: u32, ratio: f64) -> u32 {
    (f64::from(budget) * ratio).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, (0, 0, 0))]
    #[case(1, (0, 0, 1))]
    #[case(2, (0, 0, 2))]
    #[case(3, (1, 1, 1))]
    #[case(10, (4, 3, 3))]
    #[case(200, (80, 70, 50))]
    #[case(1500, (600, 525, 375))]
    fn splits_default_ratios(#[case] budget: u32, #[case] expected: (u32, u32, u32)) {
        let counts = TierCounts::partition(budget, &TierRatios::default());
        assert_eq!((counts.core, counts.mid, counts.outer), expected);
        assert_eq!(counts.total(), budget);
    }

    #[rstest]
    fn outer_never_underflows_when_ratios_overshoot() {
        let ratios = TierRatios {
            core: 0.5,
            mid: 0.500_000_5,
            outer: 0.0,
        };
        let counts = TierCounts::partition(u32::MAX, &ratios);
        assert_eq!(counts.total(), u32::MAX);
    }

    #[rstest]
    fn tier_labels_are_lowercase() {
        let labels: Vec<String> = Tier::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["core", "mid", "outer"]);
    }
}
