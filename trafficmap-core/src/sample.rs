//! Jittered points emitted by the engine.

use geo::Coord;

use crate::tier::Tier;

/// A single point of the cloud.
///
/// Coordinates are not clamped, so outer-tier jitter near the poles or the
/// antimeridian may fall outside the usual geographic ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplePoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Band the point was drawn from.
    pub tier: Tier,
}

impl SamplePoint {
    /// Position with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Whether the point lies within `[-90, 90]` x `[-180, 180]`.
    #[must_use]
    pub fn is_on_map(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}
