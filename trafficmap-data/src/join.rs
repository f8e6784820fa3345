//! Joins cities to their country's traffic total.

use log::{debug, info};
use serde::Serialize;
use trafficmap_core::CityTrafficRecord;

use crate::cities::CityTable;
use crate::traffic::TrafficTable;

/// Row accounting for one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    /// City rows read.
    pub city_rows: usize,
    /// City rows dropped as invalid.
    pub city_rows_dropped: usize,
    /// Traffic rows read.
    pub traffic_rows: usize,
    /// Traffic rows dropped as invalid or unattributed.
    pub traffic_rows_dropped: usize,
    /// Countries with a traffic total.
    pub countries: usize,
    /// Traffic across every country, in terabytes.
    pub total_traffic_tb: f64,
    /// Valid cities whose country had a traffic total.
    pub cities_joined: usize,
    /// Valid cities whose country had no traffic total.
    pub cities_unmatched: usize,
}

/// Inner-join `cities` to `traffic` on ISO3 code, preserving city order.
#[must_use]
pub fn join(cities: &CityTable, traffic: &TrafficTable) -> (Vec<CityTrafficRecord>, IngestReport) {
    let records: Vec<CityTrafficRecord> = cities
        .cities
        .iter()
        .filter_map(|city| {
            let Some(total) = traffic.country_total(&city.iso3) else {
                debug!("no traffic total for {}; city skipped", city.iso3);
                return None;
            };
            Some(CityTrafficRecord::new(
                city.iso3.clone(),
                city.latitude,
                city.longitude,
                city.population,
                total,
            ))
        })
        .collect();

    let report = IngestReport {
        city_rows: cities.rows_read,
        city_rows_dropped: cities.rows_dropped,
        traffic_rows: traffic.rows_read,
        traffic_rows_dropped: traffic.rows_dropped,
        countries: traffic.countries(),
        total_traffic_tb: traffic.total_tb(),
        cities_joined: records.len(),
        cities_unmatched: cities.cities.len() - records.len(),
    };
    info!(
        "joined {} cities to traffic ({} without a country total)",
        report.cities_joined, report.cities_unmatched
    );
    (records, report)
}
