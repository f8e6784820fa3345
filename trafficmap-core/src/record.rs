//! City-level traffic records consumed by the density engine.

use geo::Coord;
use thiserror::Error;

/// A city with its population and the traffic volume of its country.
///
/// Records are produced by the ingestion layer after unit normalization and
/// per-country aggregation. The engine trusts the coordinate and population
/// invariants but still checks them once per batch via
/// [`CityTrafficRecord::validate`].
///
/// # Examples
///
/// ```
/// use trafficmap_core::CityTrafficRecord;
///
/// let record = CityTrafficRecord::new("DEU", 52.52, 13.40, 3_600_000.0, 820.0);
/// assert!(record.validate().is_ok());
/// assert_eq!(record.location().x, 13.40);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityTrafficRecord {
    /// ISO3 country code used as the join key.
    pub country_code: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// City population.
    pub population: f64,
    /// Aggregated traffic of the whole country, in terabytes.
    pub country_total_traffic_tb: f64,
}

/// Errors returned by [`CityTrafficRecord::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRecordError {
    /// The ISO3 country code was blank.
    #[error("country code must not be empty")]
    EmptyCountryCode,
    /// Latitude was NaN, infinite or outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude was NaN, infinite or outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    /// Population was negative or not finite.
    #[error("population {0} must be finite and non-negative")]
    Population(f64),
    /// Country traffic was negative or not finite.
    #[error("country traffic {0} TB must be finite and non-negative")]
    Traffic(f64),
}

impl CityTrafficRecord {
    /// Construct a record without validation.
    pub fn new(
        country_code: impl Into<String>,
        latitude: f64,
        longitude: f64,
        population: f64,
        country_total_traffic_tb: f64,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            latitude,
            longitude,
            population,
            country_total_traffic_tb,
        }
    }

    /// The record's position with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Check the invariants the ingestion layer is expected to uphold.
    ///
    /// Zero population is accepted; such a city simply receives no traffic.
    pub fn validate(&self) -> Result<(), InvalidRecordError> {
        if self.country_code.trim().is_empty() {
            return Err(InvalidRecordError::EmptyCountryCode);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(InvalidRecordError::Latitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(InvalidRecordError::Longitude(self.longitude));
        }
        if !self.population.is_finite() || self.population < 0.0 {
            return Err(InvalidRecordError::Population(self.population));
        }
        if !self.country_total_traffic_tb.is_finite() || self.country_total_traffic_tb < 0.0 {
            return Err(InvalidRecordError::Traffic(self.country_total_traffic_tb));
        }
        Ok(())
    }
}
