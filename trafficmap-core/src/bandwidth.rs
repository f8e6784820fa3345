//! Regional bandwidth series and peak detection for the stacked-area chart.

use thiserror::Error;

/// Stacking order used when a bandwidth table does not specify one.
pub const DEFAULT_REGION_ORDER: [&str; 9] = [
    "Central America",
    "Africa",
    "Middle East",
    "Oceania",
    "Russia",
    "Asia",
    "South America",
    "Europe",
    "North America",
];

/// Default number of x-axis ticks (48 hours at six-hour spacing).
pub const DEFAULT_AXIS_TICKS: usize = 8;

const LEFT_EDGE: f64 = 0.3;
const RIGHT_EDGE: f64 = 0.7;

/// Bandwidth samples for one region, in Gbps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegionSeries {
    /// Region label.
    pub name: String,
    /// One sample per timestamp.
    pub values: Vec<f64>,
}

/// Errors returned by [`BandwidthSeries::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BandwidthError {
    /// No timestamps were supplied.
    #[error("bandwidth series must contain at least one timestamp")]
    Empty,
    /// No regions were supplied.
    #[error("bandwidth series must contain at least one region")]
    NoRegions,
    /// A region's sample count did not match the timestamps.
    #[error("region {region} has {found} samples but {expected} timestamps were given")]
    Ragged {
        /// Offending region.
        region: String,
        /// Number of timestamps.
        expected: usize,
        /// Number of samples in the region.
        found: usize,
    },
    /// A sample was NaN or infinite.
    #[error("region {region} has a non-finite sample at index {index}")]
    NonFinite {
        /// Offending region.
        region: String,
        /// Sample position.
        index: usize,
    },
}

/// Where the peak annotation should sit relative to the peak marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum PeakPlacement {
    /// Peak in the first 30% of the span; annotate to its right.
    Left,
    /// Peak in the middle; annotate below.
    Centre,
    /// Peak in the last 30% of the span; annotate to its left.
    Right,
}

impl PeakPlacement {
    /// Classify `index` within a series of `len` samples.
    #[must_use]
    pub fn classify(index: usize, len: usize) -> Self {
        let position = index as f64;
        let span = len as f64;
        if position < span * LEFT_EDGE {
            Self::Left
        } else if position > span * RIGHT_EDGE {
            Self::Right
        } else {
            Self::Centre
        }
    }
}

/// The busiest moment of a bandwidth series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BandwidthPeak {
    /// Sample index of the peak.
    pub index: usize,
    /// Timestamp label at the peak.
    pub timestamp: String,
    /// Stacked total across all regions, in Gbps.
    pub total_gbps: f64,
    /// Suggested annotation placement.
    pub placement: PeakPlacement,
}

/// Time-indexed bandwidth per region, validated to be rectangular.
///
/// # Examples
///
/// ```
/// use trafficmap_core::{BandwidthSeries, PeakPlacement, RegionSeries};
///
/// # fn main() -> Result<(), trafficmap_core::BandwidthError> {
/// let series = BandwidthSeries::new(
///     vec!["00:00".into(), "06:00".into(), "12:00".into()],
///     vec![
///         RegionSeries { name: "Europe".into(), values: vec![10.0, 30.0, 20.0] },
///         RegionSeries { name: "Asia".into(), values: vec![5.0, 5.0, 12.0] },
///     ],
/// )?;
/// let peak = series.peak();
/// assert_eq!(peak.index, 1);
/// assert_eq!(peak.total_gbps, 35.0);
/// assert_eq!(peak.placement, PeakPlacement::Centre);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthSeries {
    timestamps: Vec<String>,
    regions: Vec<RegionSeries>,
}

impl BandwidthSeries {
    /// Validate and construct a series.
    pub fn new(
        timestamps: Vec<String>,
        regions: Vec<RegionSeries>,
    ) -> Result<Self, BandwidthError> {
        if timestamps.is_empty() {
            return Err(BandwidthError::Empty);
        }
        if regions.is_empty() {
            return Err(BandwidthError::NoRegions);
        }
        for region in &regions {
            if region.values.len() != timestamps.len() {
                return Err(BandwidthError::Ragged {
                    region: region.name.clone(),
                    expected: timestamps.len(),
                    found: region.values.len(),
                });
            }
            if let Some(index) = region.values.iter().position(|v| !v.is_finite()) {
                return Err(BandwidthError::NonFinite {
                    region: region.name.clone(),
                    index,
                });
            }
        }
        Ok(Self {
            timestamps,
            regions,
        })
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always `false`; construction rejects empty series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamp labels in order.
    #[must_use]
    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    /// Regions in stacking order.
    #[must_use]
    pub fn regions(&self) -> &[RegionSeries] {
        &self.regions
    }

    /// Stacked total per timestamp.
    #[must_use]
    pub fn totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0_f64; self.len()];
        for region in &self.regions {
            for (total, value) in totals.iter_mut().zip(&region.values) {
                *total += value;
            }
        }
        totals
    }

    /// The timestamp with the highest stacked total; ties go to the earliest.
    #[must_use]
    pub fn peak(&self) -> BandwidthPeak {
        let (index, total_gbps) = self
            .totals()
            .into_iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, total)| {
                if total > best.1 { (i, total) } else { best }
            });
        BandwidthPeak {
            index,
            timestamp: self.timestamps.get(index).cloned().unwrap_or_default(),
            total_gbps,
            placement: PeakPlacement::classify(index, self.len()),
        }
    }

    /// Evenly spaced tick indices, always ending on the last sample.
    #[must_use]
    pub fn axis_ticks(&self, ticks: usize) -> Vec<usize> {
        axis_ticks(self.len(), ticks)
    }
}

fn axis_ticks(len: usize, ticks: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let step = (len / ticks.max(1)).max(1);
    let mut indices: Vec<usize> = (0..len).step_by(step).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn region(name: &str, values: &[f64]) -> RegionSeries {
        RegionSeries {
            name: name.to_owned(),
            values: values.to_vec(),
        }
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{i}")).collect()
    }

    #[rstest]
    fn ties_resolve_to_first_peak() {
        let series = BandwidthSeries::new(
            labels(4),
            vec![region("Europe", &[1.0, 5.0, 5.0, 2.0])],
        )
        .expect("valid series");
        let peak = series.peak();
        assert_eq!(peak.index, 1);
        assert_eq!(peak.timestamp, "t1");
    }

    #[rstest]
    fn totals_stack_regions() {
        let series = BandwidthSeries::new(
            labels(2),
            vec![region("A", &[1.0, 2.0]), region("B", &[3.0, 4.0])],
        )
        .expect("valid series");
        assert_eq!(series.totals(), vec![4.0, 6.0]);
    }

    #[rstest]
    #[case(0, 10, PeakPlacement::Left)]
    #[case(2, 10, PeakPlacement::Left)]
    #[case(3, 10, PeakPlacement::Centre)]
    #[case(7, 10, PeakPlacement::Centre)]
    #[case(8, 10, PeakPlacement::Right)]
    fn placement_thresholds(
        #[case] index: usize,
        #[case] len: usize,
        #[case] expected: PeakPlacement,
    ) {
        assert_eq!(PeakPlacement::classify(index, len), expected);
    }

    #[rstest]
    #[case(48, 8, vec![0, 6, 12, 18, 24, 30, 36, 42, 47])]
    #[case(49, 8, vec![0, 6, 12, 18, 24, 30, 36, 42, 48])]
    #[case(3, 8, vec![0, 1, 2])]
    #[case(1, 8, vec![0])]
    #[case(5, 0, vec![0, 4])]
    fn ticks_end_on_last_sample(
        #[case] len: usize,
        #[case] ticks: usize,
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(axis_ticks(len, ticks), expected);
    }

    #[rstest]
    fn rejects_ragged_regions() {
        let err = BandwidthSeries::new(labels(3), vec![region("Asia", &[1.0, 2.0])])
            .expect_err("ragged");
        assert_eq!(
            err,
            BandwidthError::Ragged {
                region: "Asia".to_owned(),
                expected: 3,
                found: 2
            }
        );
    }

    #[rstest]
    fn rejects_nan_samples() {
        let err = BandwidthSeries::new(labels(2), vec![region("Asia", &[1.0, f64::NAN])])
            .expect_err("nan");
        assert!(matches!(err, BandwidthError::NonFinite { index: 1, .. }));
    }

    #[rstest]
    fn rejects_empty_inputs() {
        assert_eq!(
            BandwidthSeries::new(Vec::new(), vec![region("A", &[])]),
            Err(BandwidthError::Empty)
        );
        assert_eq!(
            BandwidthSeries::new(labels(1), Vec::new()),
            Err(BandwidthError::NoRegions)
        );
    }
}
