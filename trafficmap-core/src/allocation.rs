//! Traffic allocation: population weighting, log compression and budgets.
//!
//! Each country's traffic is shared among its cities in proportion to
//! population. City traffic is then compressed with `ln(1 + x)` and scaled
//! against the batch maximum, so the busiest city always lands on a
//! normalized density of exactly `1.0`.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::config::PointCloudConfig;
use crate::record::CityTrafficRecord;
use crate::tier::TierCounts;

/// Derived quantities for one input record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CityAllocation {
    /// Position of the record in the input batch.
    pub index: usize,
    /// Share of the country's population living in this city.
    pub population_weight: f64,
    /// Country traffic attributed to this city, in TB.
    pub city_traffic_tb: f64,
    /// Log-compressed traffic relative to the batch maximum, in `[0, 1]`.
    pub normalized_density: f64,
    /// Number of points the city contributes.
    pub point_budget: u32,
    /// Split of the budget across tiers.
    pub tiers: TierCounts,
}

/// Result of allocating a whole batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    /// One entry per record whose country has a positive population.
    pub cities: Vec<CityAllocation>,
    /// Countries dropped because their total population was zero, sorted.
    pub excluded_countries: Vec<String>,
}

impl Allocation {
    /// Total points across all cities before any global cap.
    #[must_use]
    pub fn total_budget(&self) -> u64 {
        self.cities
            .iter()
            .map(|city| u64::from(city.point_budget))
            .sum()
    }
}

/// Compute population weights per record.
///
/// Returns `None` for records whose country sums to zero population. Those
/// countries are listed in the second element and logged.
#[must_use]
pub fn population_weights(records: &[CityTrafficRecord]) -> (Vec<Option<f64>>, Vec<String>) {
    let mut country_population: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *country_population
            .entry(record.country_code.as_str())
            .or_insert(0.0) += record.population;
    }

    let excluded: Vec<String> = country_population
        .iter()
        .filter(|(_, total)| **total <= 0.0)
        .map(|(code, _)| (*code).to_owned())
        .collect();
    for code in &excluded {
        warn!("excluding country {code}: total city population is zero");
    }

    let weights = records
        .iter()
        .map(|record| {
            country_population
                .get(record.country_code.as_str())
                .filter(|total| **total > 0.0)
                .map(|total| record.population / total)
        })
        .collect();
    (weights, excluded)
}

/// Scale `ln(1 + traffic)` against the batch maximum.
///
/// When every value is zero the output is all zeros.
#[must_use]
pub fn normalized_densities(city_traffic_tb: &[f64]) -> Vec<f64> {
    let compressed: Vec<f64> = city_traffic_tb.iter().map(|tb| tb.ln_1p()).collect();
    let max = compressed.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        compressed.iter().map(|value| value / max).collect()
    } else {
        compressed
    }
}

/// Points allocated to a city with the given normalized density.
///
/// Any city with traffic receives at least one point; the result never
/// exceeds `max_points_per_city`.
///
/// # Examples
///
/// ```
/// use trafficmap_core::point_budget;
///
/// assert_eq!(point_budget(1.0, 200.0, 1_500), 200);
/// assert_eq!(point_budget(0.001, 200.0, 1_500), 1);
/// assert_eq!(point_budget(0.0, 200.0, 1_500), 0);
/// assert_eq!(point_budget(1.0, 5_000.0, 1_500), 1_500);
/// ```
#[must_use]
pub fn point_budget(normalized_density: f64, point_scale: f64, max_points_per_city: u32) -> u32 {
    let scaled = (normalized_density * point_scale).max(0.0).floor();
    let budget = match scaled as u32 {
        0 if normalized_density > 0.0 => 1,
        points => points,
    };
    budget.min(max_points_per_city)
}

/// Run the full allocation for a validated batch.
#[must_use]
pub fn allocate(records: &[CityTrafficRecord], config: &PointCloudConfig) -> Allocation {
    let (weights, excluded_countries) = population_weights(records);

    let weighted: Vec<(usize, f64, f64)> = records
        .iter()
        .zip(weights)
        .enumerate()
        .filter_map(|(index, (record, weight))| {
            weight.map(|w| (index, w, record.country_total_traffic_tb * w))
        })
        .collect();

    let traffic: Vec<f64> = weighted.iter().map(|(_, _, tb)| *tb).collect();
    let densities = normalized_densities(&traffic);

    let cities = weighted
        .into_iter()
        .zip(densities)
        .map(|((index, population_weight, city_traffic_tb), normalized_density)| {
            let point_budget = point_budget(
                normalized_density,
                config.point_scale,
                config.max_points_per_city,
            );
            let tiers = TierCounts::partition(point_budget, &config.tier_ratios);
            debug!(
                "record {index}: {city_traffic_tb:.4} TB, density {normalized_density:.4}, {point_budget} points"
            );
            CityAllocation {
                index,
                population_weight,
                city_traffic_tb,
                normalized_density,
                point_budget,
                tiers,
            }
        })
        .collect();

    Allocation {
        cities,
        excluded_countries,
    }
}
