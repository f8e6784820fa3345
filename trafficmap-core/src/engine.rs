//! The point-cloud density engine.

use log::info;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

use crate::allocation::{Allocation, allocate};
use crate::config::{InvalidConfigurationError, PointCloudConfig};
use crate::record::{CityTrafficRecord, InvalidRecordError};
use crate::sample::SamplePoint;
use crate::summary::PointCloudSummary;
use crate::tier::Tier;

/// Errors returned by [`PointCloudDensityEngine`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointCloudError {
    /// The batch produced no points at all.
    #[error("no points generated; check the input data or raise the point scale")]
    EmptyResult,
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfigurationError),
    /// A record violated the ingestion contract.
    #[error("record {index} is malformed: {source}")]
    InvalidRecord {
        /// Position of the record in the batch.
        index: usize,
        /// Violated invariant.
        #[source]
        source: InvalidRecordError,
    },
}

/// Turns city traffic records into a jittered point cloud.
///
/// The engine is a pure function of its configuration and input: a fixed
/// seed reproduces the same points in the same order. Records are sampled
/// sequentially from a single `ChaCha8` stream, so changing the record order
/// changes the draws.
///
/// # Examples
///
/// ```
/// use trafficmap_core::{CityTrafficRecord, PointCloudConfig, PointCloudDensityEngine};
///
/// # fn main() -> Result<(), trafficmap_core::PointCloudError> {
/// let engine = PointCloudDensityEngine::new(PointCloudConfig::default())?;
/// let records = vec![
///     CityTrafficRecord::new("ABC", 10.0, 20.0, 80.0, 100.0),
///     CityTrafficRecord::new("ABC", 12.0, 22.0, 20.0, 100.0),
/// ];
/// let cloud = engine.generate(&records)?;
/// assert!(cloud.points().len() > 200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PointCloudDensityEngine {
    config: PointCloudConfig,
}

impl PointCloudDensityEngine {
    /// Validate `config` and build an engine.
    pub fn new(config: PointCloudConfig) -> Result<Self, InvalidConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &PointCloudConfig {
        &self.config
    }

    /// Validate the batch and compute weights, densities and budgets.
    pub fn allocate(&self, records: &[CityTrafficRecord]) -> Result<Allocation, PointCloudError> {
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|source| PointCloudError::InvalidRecord { index, source })?;
        }
        let allocation = allocate(records, &self.config);
        info!(
            "allocated {} points across {} cities",
            allocation.total_budget(),
            allocation.cities.len()
        );
        Ok(allocation)
    }

    /// Generate the point cloud for `records`.
    ///
    /// Returns [`PointCloudError::EmptyResult`] when no record earns a
    /// point, and down-samples without replacement when the cloud exceeds
    /// `max_total_points`.
    pub fn generate(&self, records: &[CityTrafficRecord]) -> Result<PointCloud, PointCloudError> {
        let allocation = self.allocate(records)?;
        let jitter = [
            tier_jitter(&self.config, Tier::Core)?,
            tier_jitter(&self.config, Tier::Mid)?,
            tier_jitter(&self.config, Tier::Outer)?,
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_seed);

        let capacity = usize::try_from(allocation.total_budget()).unwrap_or(usize::MAX);
        let mut points = Vec::with_capacity(capacity.min(self.config.max_total_points));
        for city in &allocation.cities {
            let Some(record) = records.get(city.index) else {
                continue;
            };
            for (tier, jitter) in Tier::ALL.into_iter().zip(&jitter) {
                let count = city.tiers.get(tier);
                if count > 0 {
                    sample_tier(&mut points, &mut rng, record, tier, jitter, count);
                }
            }
        }

        if points.is_empty() {
            return Err(PointCloudError::EmptyResult);
        }

        let raw_point_count = points.len();
        let limit = self.config.max_total_points;
        let downsampled = raw_point_count > limit;
        if downsampled {
            points = index::sample(&mut rng, raw_point_count, limit)
                .into_iter()
                .filter_map(|i| points.get(i).copied())
                .collect();
            info!("down-sampled {raw_point_count} points to {}", points.len());
        } else {
            info!("generated {raw_point_count} points");
        }

        let mut countries: Vec<&str> = allocation
            .cities
            .iter()
            .filter_map(|city| records.get(city.index))
            .map(|record| record.country_code.as_str())
            .collect();
        countries.sort_unstable();
        countries.dedup();

        Ok(PointCloud {
            points,
            raw_point_count,
            downsampled,
            cities_covered: allocation.cities.len(),
            countries_covered: countries.len(),
            excluded_countries: allocation.excluded_countries,
        })
    }
}

fn tier_jitter(
    config: &PointCloudConfig,
    tier: Tier,
) -> Result<Normal<f64>, InvalidConfigurationError> {
    let value = config.tier_jitter_sigma.get(tier);
    Normal::new(0.0, value).map_err(|_| InvalidConfigurationError::JitterSigma { tier, value })
}

// All latitudes for a tier are drawn before its longitudes.
fn sample_tier(
    points: &mut Vec<SamplePoint>,
    rng: &mut ChaCha8Rng,
    record: &CityTrafficRecord,
    tier: Tier,
    jitter: &Normal<f64>,
    count: u32,
) {
    let latitudes: Vec<f64> = (0..count)
        .map(|_| record.latitude + jitter.sample(rng))
        .collect();
    let longitudes: Vec<f64> = (0..count)
        .map(|_| record.longitude + jitter.sample(rng))
        .collect();
    points.extend(
        latitudes
            .into_iter()
            .zip(longitudes)
            .map(|(latitude, longitude)| SamplePoint {
                latitude,
                longitude,
                tier,
            }),
    );
}

/// Output of [`PointCloudDensityEngine::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Vec<SamplePoint>,
    raw_point_count: usize,
    downsampled: bool,
    cities_covered: usize,
    countries_covered: usize,
    excluded_countries: Vec<String>,
}

impl PointCloud {
    /// The final points in draw order (or sampling order after capping).
    #[must_use]
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Consume the cloud and return its points.
    #[must_use]
    pub fn into_points(self) -> Vec<SamplePoint> {
        self.points
    }

    /// Number of points drawn before the global cap applied.
    #[must_use]
    pub const fn raw_point_count(&self) -> usize {
        self.raw_point_count
    }

    /// Whether the global cap forced down-sampling.
    #[must_use]
    pub const fn was_downsampled(&self) -> bool {
        self.downsampled
    }

    /// Countries dropped for having zero total population.
    #[must_use]
    pub fn excluded_countries(&self) -> &[String] {
        &self.excluded_countries
    }

    /// Select the glow layer: a seeded subset re-drawn from the cloud.
    ///
    /// Clouds of `glow_min_points` or fewer points get no glow layer.
    #[must_use]
    pub fn glow_subset(&self, config: &PointCloudConfig) -> Vec<SamplePoint> {
        let len = self.points.len();
        if len <= config.glow_min_points {
            return Vec::new();
        }
        let amount = glow_amount(len, config.glow_sample_ratio);
        let mut rng = ChaCha8Rng::seed_from_u64(config.effective_glow_seed());
        index::sample(&mut rng, len, amount)
            .into_iter()
            .filter_map(|i| self.points.get(i).copied())
            .collect()
    }

    /// Statistics describing the run.
    #[must_use]
    pub fn summary(&self, config: &PointCloudConfig) -> PointCloudSummary {
        PointCloudSummary::new(
            &self.points,
            self.raw_point_count,
            self.downsampled,
            self.cities_covered,
            self.countries_covered,
            config,
            self.excluded_countries.clone(),
        )
    }
}

fn glow_amount(len: usize, ratio: f64) -> usize {
    let wanted = (len as f64 * ratio).round_ties_even() as usize;
    wanted.min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn engine() -> PointCloudDensityEngine {
        PointCloudDensityEngine::default()
    }

    #[fixture]
    fn records() -> Vec<CityTrafficRecord> {
        vec![
            CityTrafficRecord::new("ABC", 10.0, 10.0, 80.0, 100.0),
            CityTrafficRecord::new("ABC", 11.0, 11.0, 20.0, 100.0),
        ]
    }

    #[rstest]
    fn default_engine_matches_validated_engine(engine: PointCloudDensityEngine) {
        let validated =
            PointCloudDensityEngine::new(PointCloudConfig::default()).expect("valid defaults");
        assert_eq!(validated.config(), engine.config());
    }

    #[rstest]
    fn emits_every_budgeted_point(
        engine: PointCloudDensityEngine,
        records: Vec<CityTrafficRecord>,
    ) {
        let allocation = engine.allocate(&records).expect("allocate");
        let cloud = engine.generate(&records).expect("generate");
        let expected = usize::try_from(allocation.total_budget()).expect("fits usize");
        assert_eq!(cloud.points().len(), expected);
        assert_eq!(cloud.raw_point_count(), expected);
        assert!(!cloud.was_downsampled());
    }

    #[rstest]
    fn tiers_appear_in_sampling_order(
        engine: PointCloudDensityEngine,
        records: Vec<CityTrafficRecord>,
    ) {
        let cloud = engine.generate(&records).expect("generate");
        let first_city: Vec<Tier> = cloud.points().iter().take(200).map(|p| p.tier).collect();
        assert!(first_city.iter().take(80).all(|t| *t == Tier::Core));
        assert!(first_city.iter().skip(80).take(70).all(|t| *t == Tier::Mid));
        assert!(first_city.iter().skip(150).all(|t| *t == Tier::Outer));
    }

    #[rstest]
    fn zero_sigma_places_points_on_centre() {
        let config = PointCloudConfig {
            tier_jitter_sigma: crate::TierSigmas {
                core: 0.0,
                mid: 0.0,
                outer: 0.0,
            },
            ..PointCloudConfig::default()
        };
        let engine = PointCloudDensityEngine::new(config).expect("valid config");
        let records = vec![CityTrafficRecord::new("ABC", 45.0, -70.0, 1.0, 3.0)];
        let cloud = engine.generate(&records).expect("generate");
        assert!(
            cloud
                .points()
                .iter()
                .all(|p| p.latitude == 45.0 && p.longitude == -70.0)
        );
    }

    #[rstest]
    fn all_zero_traffic_is_an_empty_result(engine: PointCloudDensityEngine) {
        let records = vec![CityTrafficRecord::new("ABC", 0.0, 0.0, 5.0, 0.0)];
        assert_eq!(engine.generate(&records), Err(PointCloudError::EmptyResult));
        assert_eq!(engine.generate(&[]), Err(PointCloudError::EmptyResult));
    }

    #[rstest]
    fn malformed_record_is_fatal(engine: PointCloudDensityEngine) {
        let records = vec![
            CityTrafficRecord::new("ABC", 0.0, 0.0, 5.0, 1.0),
            CityTrafficRecord::new("ABC", 0.0, 200.0, 5.0, 1.0),
        ];
        let err = engine.generate(&records).expect_err("invalid longitude");
        assert_eq!(
            err,
            PointCloudError::InvalidRecord {
                index: 1,
                source: InvalidRecordError::Longitude(200.0)
            }
        );
    }

    #[rstest]
    fn glow_subset_is_empty_for_small_clouds(
        engine: PointCloudDensityEngine,
        records: Vec<CityTrafficRecord>,
    ) {
        let cloud = engine.generate(&records).expect("generate");
        assert!(cloud.glow_subset(engine.config()).is_empty());
    }

    #[rstest]
    fn glow_subset_draws_a_quarter_of_large_clouds() {
        let config = PointCloudConfig {
            point_scale: 2_000.0,
            max_points_per_city: 2_000,
            ..PointCloudConfig::default()
        };
        let engine = PointCloudDensityEngine::new(config).expect("valid config");
        let records = vec![CityTrafficRecord::new("ABC", 0.0, 0.0, 1.0, 10.0)];
        let cloud = engine.generate(&records).expect("generate");
        assert_eq!(cloud.points().len(), 2_000);
        let glow = cloud.glow_subset(engine.config());
        assert_eq!(glow.len(), 500);
        assert!(glow.iter().all(|p| cloud.points().contains(p)));
        assert_eq!(glow, cloud.glow_subset(engine.config()));
    }

    #[rstest]
    #[case(1_001, 0.25, 250)]
    #[case(1_002, 0.25, 250)]
    #[case(1_006, 0.25, 252)]
    #[case(10, 1.0, 10)]
    #[case(10, 0.0, 0)]
    fn glow_amount_rounds(#[case] len: usize, #[case] ratio: f64, #[case] expected: usize) {
        assert_eq!(glow_amount(len, ratio), expected);
    }
}
