//! Run statistics for a generated point cloud.

use geo::{Coord, Rect};

use crate::config::{PointCloudConfig, TierRatios};
use crate::sample::SamplePoint;

/// Summary of one engine run, suitable for console or JSON reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointCloudSummary {
    /// Points in the final cloud.
    pub total_points: usize,
    /// Points drawn before the global cap.
    pub raw_points: usize,
    /// Whether the global cap applied.
    pub downsampled: bool,
    /// Cities that received an allocation.
    pub cities_covered: usize,
    /// Distinct countries among those cities.
    pub countries_covered: usize,
    /// Density multiplier used for the run.
    pub point_scale: f64,
    /// Tier split used for the run.
    pub tier_ratios: TierRatios,
    /// Points that fell outside the geographic ranges after jitter.
    pub off_map_points: usize,
    /// Bounding box of all points, `x = longitude` and `y = latitude`.
    pub bounds: Option<Rect<f64>>,
    /// Countries dropped for zero total population.
    pub excluded_countries: Vec<String>,
}

impl PointCloudSummary {
    pub(crate) fn new(
        points: &[SamplePoint],
        raw_points: usize,
        downsampled: bool,
        cities_covered: usize,
        countries_covered: usize,
        config: &PointCloudConfig,
        excluded_countries: Vec<String>,
    ) -> Self {
        Self {
            total_points: points.len(),
            raw_points,
            downsampled,
            cities_covered,
            countries_covered,
            point_scale: config.point_scale,
            tier_ratios: config.tier_ratios,
            off_map_points: points.iter().filter(|p| !p.is_on_map()).count(),
            bounds: bounds_of(points),
            excluded_countries,
        }
    }
}

fn bounds_of(points: &[SamplePoint]) -> Option<Rect<f64>> {
    let mut iter = points.iter().map(SamplePoint::location);
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(min, max), c| {
        (
            Coord {
                x: min.x.min(c.x),
                y: min.y.min(c.y),
            },
            Coord {
                x: max.x.max(c.x),
                y: max.y.max(c.y),
            },
        )
    });
    Some(Rect::new(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;
    use rstest::rstest;

    fn point(latitude: f64, longitude: f64) -> SamplePoint {
        SamplePoint {
            latitude,
            longitude,
            tier: Tier::Outer,
        }
    }

    #[rstest]
    fn bounds_cover_every_point() {
        let points = [point(1.0, -3.0), point(-2.0, 4.0), point(0.5, 0.5)];
        let rect = bounds_of(&points).expect("non-empty");
        assert_eq!(rect.min(), Coord { x: -3.0, y: -2.0 });
        assert_eq!(rect.max(), Coord { x: 4.0, y: 1.0 });
    }

    #[rstest]
    fn counts_points_bleeding_off_the_map() {
        let points = [point(90.3, 0.0), point(0.0, 180.2), point(10.0, 10.0)];
        let summary = PointCloudSummary::new(
            &points,
            3,
            false,
            1,
            1,
            &PointCloudConfig::default(),
            Vec::new(),
        );
        assert_eq!(summary.off_map_points, 2);
        assert_eq!(summary.total_points, 3);
    }

    #[rstest]
    fn empty_input_has_no_bounds() {
        assert!(bounds_of(&[]).is_none());
    }
}
