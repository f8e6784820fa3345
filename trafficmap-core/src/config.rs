//! Tunable parameters for point-cloud generation.

use thiserror::Error;

use crate::tier::Tier;

/// Default overall density multiplier.
pub const DEFAULT_POINT_SCALE: f64 = 200.0;
/// Default upper bound on points allocated to one city.
pub const DEFAULT_MAX_POINTS_PER_CITY: u32 = 1_500;
/// Default upper bound on the size of the final cloud.
pub const DEFAULT_MAX_TOTAL_POINTS: usize = 4_000_000;
/// Default seed for the sampling stream.
pub const DEFAULT_RANDOM_SEED: u64 = 42;
/// Default share of the cloud re-sampled for the glow layer.
pub const DEFAULT_GLOW_SAMPLE_RATIO: f64 = 0.25;
/// Clouds at or below this size get no glow layer.
pub const DEFAULT_GLOW_MIN_POINTS: usize = 1_000;

const RATIO_SUM_TOLERANCE: f64 = 1e-6;

/// Fraction of each city's budget assigned to each tier.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TierRatios {
    /// Core tier fraction.
    pub core: f64,
    /// Mid tier fraction.
    pub mid: f64,
    /// Outer tier fraction.
    pub outer: f64,
}

impl Default for TierRatios {
    fn default() -> Self {
        Self {
            core: 0.40,
            mid: 0.35,
            outer: 0.25,
        }
    }
}

impl TierRatios {
    /// Fraction for a single tier.
    #[must_use]
    pub const fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Core => self.core,
            Tier::Mid => self.mid,
            Tier::Outer => self.outer,
        }
    }

    fn validate(&self) -> Result<(), InvalidConfigurationError> {
        for tier in Tier::ALL {
            let value = self.get(tier);
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidConfigurationError::TierRatio { tier, value });
            }
        }
        let sum = self.core + self.mid + self.outer;
        if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(InvalidConfigurationError::RatioSum { sum });
        }
        Ok(())
    }
}

/// Gaussian jitter standard deviation per tier, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TierSigmas {
    /// Core tier spread.
    pub core: f64,
    /// Mid tier spread.
    pub mid: f64,
    /// Outer tier spread.
    pub outer: f64,
}

impl Default for TierSigmas {
    fn default() -> Self {
        Self {
            core: 0.06,
            mid: 0.20,
            outer: 0.50,
        }
    }
}

impl TierSigmas {
    /// Spread for a single tier.
    #[must_use]
    pub const fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Core => self.core,
            Tier::Mid => self.mid,
            Tier::Outer => self.outer,
        }
    }

    fn validate(&self) -> Result<(), InvalidConfigurationError> {
        for tier in Tier::ALL {
            let value = self.get(tier);
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidConfigurationError::JitterSigma { tier, value });
            }
        }
        Ok(())
    }
}

/// Configuration for [`crate::PointCloudDensityEngine`].
///
/// Every field has a default, so partial configuration files only need to
/// name the options they change.
///
/// # Examples
///
/// ```
/// use trafficmap_core::PointCloudConfig;
///
/// let config = PointCloudConfig {
///     point_scale: 50.0,
///     random_seed: 7,
///     ..PointCloudConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.effective_glow_seed(), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PointCloudConfig {
    /// Overall density multiplier applied to normalized traffic.
    pub point_scale: f64,
    /// Per-city budget cap.
    pub max_points_per_city: u32,
    /// Cap on the final cloud; larger clouds are down-sampled.
    pub max_total_points: usize,
    /// Tier split of each city's budget.
    pub tier_ratios: TierRatios,
    /// Tier jitter spreads.
    pub tier_jitter_sigma: TierSigmas,
    /// Seed for the jitter and down-sampling stream.
    pub random_seed: u64,
    /// Share of the final cloud re-drawn for the glow layer.
    pub glow_sample_ratio: f64,
    /// Minimum cloud size before a glow layer is produced.
    pub glow_min_points: usize,
    /// Seed for the glow subset; defaults to `random_seed + 1`.
    pub glow_seed: Option<u64>,
}

impl Default for PointCloudConfig {
    fn default() -> Self {
        Self {
            point_scale: DEFAULT_POINT_SCALE,
            max_points_per_city: DEFAULT_MAX_POINTS_PER_CITY,
            max_total_points: DEFAULT_MAX_TOTAL_POINTS,
            tier_ratios: TierRatios::default(),
            tier_jitter_sigma: TierSigmas::default(),
            random_seed: DEFAULT_RANDOM_SEED,
            glow_sample_ratio: DEFAULT_GLOW_SAMPLE_RATIO,
            glow_min_points: DEFAULT_GLOW_MIN_POINTS,
            glow_seed: None,
        }
    }
}

impl PointCloudConfig {
    /// Check every option; the engine calls this once at construction.
    pub fn validate(&self) -> Result<(), InvalidConfigurationError> {
        if !self.point_scale.is_finite() || self.point_scale < 0.0 {
            return Err(InvalidConfigurationError::PointScale(self.point_scale));
        }
        if self.max_points_per_city == 0 {
            return Err(InvalidConfigurationError::ZeroCap {
                field: "max_points_per_city",
            });
        }
        if self.max_total_points == 0 {
            return Err(InvalidConfigurationError::ZeroCap {
                field: "max_total_points",
            });
        }
        self.tier_ratios.validate()?;
        self.tier_jitter_sigma.validate()?;
        if !(0.0..=1.0).contains(&self.glow_sample_ratio) {
            return Err(InvalidConfigurationError::GlowRatio(self.glow_sample_ratio));
        }
        Ok(())
    }

    /// Seed used for the glow subset.
    #[must_use]
    pub fn effective_glow_seed(&self) -> u64 {
        self.glow_seed
            .unwrap_or_else(|| self.random_seed.wrapping_add(1))
    }
}

/// Errors returned by [`PointCloudConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidConfigurationError {
    /// Point scale was negative or not finite.
    #[error("point scale {0} must be finite and non-negative")]
    PointScale(f64),
    /// A point cap was zero, which can never yield a cloud.
    #[error("{field} must be greater than zero")]
    ZeroCap {
        /// Name of the offending option.
        field: &'static str,
    },
    /// A tier ratio was negative or not finite.
    #[error("{tier} ratio {value} must be finite and non-negative")]
    TierRatio {
        /// Affected tier.
        tier: Tier,
        /// Rejected value.
        value: f64,
    },
    /// Tier ratios did not add up to one.
    #[error("tier ratios must sum to 1.0 (got {sum})")]
    RatioSum {
        /// Observed sum.
        sum: f64,
    },
    /// A jitter sigma was negative or not finite.
    #[error("{tier} jitter sigma {value} must be finite and non-negative")]
    JitterSigma {
        /// Affected tier.
        tier: Tier,
        /// Rejected value.
        value: f64,
    },
    /// Glow ratio fell outside `[0, 1]`.
    #[error("glow sample ratio {0} must lie within [0, 1]")]
    GlowRatio(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        assert!(PointCloudConfig::default().validate().is_ok());
    }

    #[rstest]
    fn glow_seed_follows_random_seed() {
        let config = PointCloudConfig::default();
        assert_eq!(config.effective_glow_seed(), 43);
        let pinned = PointCloudConfig {
            glow_seed: Some(9),
            ..config
        };
        assert_eq!(pinned.effective_glow_seed(), 9);
    }

    #[rstest]
    #[case::short(TierRatios { core: 0.4, mid: 0.35, outer: 0.2 })]
    #[case::long(TierRatios { core: 0.5, mid: 0.35, outer: 0.25 })]
    fn rejects_ratios_not_summing_to_one(#[case] ratios: TierRatios) {
        let config = PointCloudConfig {
            tier_ratios: ratios,
            ..PointCloudConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InvalidConfigurationError::RatioSum { .. })
        ));
    }

    #[rstest]
    fn rejects_negative_ratio_even_when_sum_matches() {
        let config = PointCloudConfig {
            tier_ratios: TierRatios {
                core: 1.2,
                mid: -0.2,
                outer: 0.0,
            },
            ..PointCloudConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(InvalidConfigurationError::TierRatio {
                tier: Tier::Mid,
                value: -0.2
            })
        );
    }

    #[rstest]
    #[case(-0.1)]
    #[case(f64::NAN)]
    fn rejects_bad_sigma(#[case] sigma: f64) {
        let config = PointCloudConfig {
            tier_jitter_sigma: TierSigmas {
                outer: sigma,
                ..TierSigmas::default()
            },
            ..PointCloudConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InvalidConfigurationError::JitterSigma {
                tier: Tier::Outer,
                ..
            })
        ));
    }

    #[rstest]
    fn zero_sigma_is_allowed() {
        let config = PointCloudConfig {
            tier_jitter_sigma: TierSigmas {
                core: 0.0,
                mid: 0.0,
                outer: 0.0,
            },
            ..PointCloudConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::per_city(PointCloudConfig { max_points_per_city: 0, ..PointCloudConfig::default() }, "max_points_per_city")]
    #[case::total(PointCloudConfig { max_total_points: 0, ..PointCloudConfig::default() }, "max_total_points")]
    fn rejects_zero_caps(#[case] config: PointCloudConfig, #[case] expected: &'static str) {
        assert_eq!(
            config.validate(),
            Err(InvalidConfigurationError::ZeroCap { field: expected })
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn rejects_bad_point_scale(#[case] scale: f64) {
        let config = PointCloudConfig {
            point_scale: scale,
            ..PointCloudConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InvalidConfigurationError::PointScale(_))
        ));
    }

    #[rstest]
    fn rejects_glow_ratio_above_one() {
        let config = PointCloudConfig {
            glow_sample_ratio: 1.5,
            ..PointCloudConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(InvalidConfigurationError::GlowRatio(1.5))
        );
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn partial_json_falls_back_to_defaults() {
        let config: PointCloudConfig =
            serde_json::from_str(r#"{ "point_scale": 80.0, "tier_ratios": { "core": 0.5, "mid": 0.25 } }"#)
                .expect("decode config");
        assert_eq!(config.point_scale, 80.0);
        assert_eq!(config.max_points_per_city, DEFAULT_MAX_POINTS_PER_CITY);
        assert_eq!(config.tier_ratios.outer, 0.25);
        assert_eq!(config.tier_ratios.core, 0.5);
        assert!(config.validate().is_ok());
    }
}
