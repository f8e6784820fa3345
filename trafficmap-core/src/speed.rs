//! Colour-scale statistics for the download-speed choropleth.
//!
//! Percentiles use linear interpolation between the closest ranks, the same
//! convention as most numeric libraries' default.

/// Lower percentile of the colour range.
pub const SCALE_LOW_PERCENTILE: f64 = 2.0;
/// Upper percentile of the colour range.
pub const SCALE_HIGH_PERCENTILE: f64 = 98.0;
/// Percentile at or above which a country is highlighted as fast.
pub const FAST_PERCENTILE: f64 = 75.0;
/// Fallback colour range when no speeds are known, in Mbps.
pub const FALLBACK_RANGE: (f64, f64) = (0.0, 100.0);
/// Number of fastest countries listed in a [`SpeedSummary`].
pub const TOP_COUNT: usize = 5;

/// Average download speed of one country.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountrySpeed {
    /// ISO3 country code.
    pub iso3: String,
    /// Display name, when the source provides one.
    pub country: Option<String>,
    /// Speed in Mbps.
    pub speed_mbps: f64,
}

/// Colour range and highlight threshold for a set of speeds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpeedScale {
    /// Speed mapped to the darkest colour.
    pub vmin: f64,
    /// Speed mapped to the brightest colour.
    pub vmax: f64,
    /// Threshold for the fast-country border, if any speeds are known.
    pub fast_threshold: Option<f64>,
}

impl Default for SpeedScale {
    fn default() -> Self {
        Self {
            vmin: FALLBACK_RANGE.0,
            vmax: FALLBACK_RANGE.1,
            fast_threshold: None,
        }
    }
}

impl SpeedScale {
    /// Derive the scale from raw speeds, ignoring non-finite values.
    ///
    /// # Examples
    ///
    /// ```
    /// use trafficmap_core::SpeedScale;
    ///
    /// let scale = SpeedScale::from_speeds(&[10.0, 20.0, 30.0, 40.0, 50.0]);
    /// assert_eq!(scale.fast_threshold, Some(40.0));
    /// assert!(scale.is_fast(45.0));
    /// assert_eq!(SpeedScale::from_speeds(&[]).vmax, 100.0);
    /// ```
    #[must_use]
    pub fn from_speeds(speeds: &[f64]) -> Self {
        let sorted = sorted_finite(speeds);
        match (
            percentile(&sorted, SCALE_LOW_PERCENTILE),
            percentile(&sorted, SCALE_HIGH_PERCENTILE),
        ) {
            (Some(vmin), Some(vmax)) => Self {
                vmin,
                vmax,
                fast_threshold: percentile(&sorted, FAST_PERCENTILE),
            },
            _ => Self::default(),
        }
    }

    /// Whether `speed` meets the fast threshold.
    #[must_use]
    pub fn is_fast(&self, speed: f64) -> bool {
        self.fast_threshold
            .is_some_and(|threshold| speed >= threshold)
    }
}

/// The `q`th percentile (0 to 100) of ascending `sorted` values.
#[must_use]
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (q.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let low = *sorted.get(lower)?;
    let high = *sorted.get(upper)?;
    Some(low + (high - low) * (rank - lower as f64))
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Console statistics for a speed table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpeedSummary {
    /// Countries with a known speed.
    pub count: usize,
    /// Mean speed.
    pub mean: f64,
    /// Median speed.
    pub median: f64,
    /// Slowest speed.
    pub min: f64,
    /// Fastest speed.
    pub max: f64,
    /// Colour scale for the map.
    pub scale: SpeedScale,
    /// Countries at or above the fast threshold.
    pub fast_countries: usize,
    /// Fastest countries, quickest first.
    pub fastest: Vec<CountrySpeed>,
}

impl SpeedSummary {
    /// Summarise `countries`, or `None` when no speed is finite.
    #[must_use]
    pub fn from_countries(countries: &[CountrySpeed]) -> Option<Self> {
        let known: Vec<&CountrySpeed> = countries
            .iter()
            .filter(|c| c.speed_mbps.is_finite())
            .collect();
        let speeds: Vec<f64> = known.iter().map(|c| c.speed_mbps).collect();
        let sorted = sorted_finite(&speeds);
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let median = percentile(&sorted, 50.0)?;
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let scale = SpeedScale::from_speeds(&sorted);
        let fast_countries = sorted.iter().filter(|s| scale.is_fast(**s)).count();

        let mut ranked = known;
        ranked.sort_by(|a, b| b.speed_mbps.total_cmp(&a.speed_mbps));
        let fastest = ranked.into_iter().take(TOP_COUNT).cloned().collect();

        Some(Self {
            count: sorted.len(),
            mean,
            median,
            min,
            max,
            scale,
            fast_countries,
            fastest,
        })
    }
}
