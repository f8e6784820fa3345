//! Table ingestion and export for the traffic map tools.
//!
//! Responsibilities:
//! - Read the city, traffic, bandwidth and speed CSV tables.
//! - Normalise traffic volumes to terabytes and join them to cities.
//! - Write generated point clouds back out as CSV.
//!
//! Boundaries:
//! - Numeric modelling lives in `trafficmap-core`; this crate only shapes
//!   rows into its input types.
//! - Individual bad rows are skipped and logged. Only whole-table problems
//!   surface as [`IngestError`].

#![forbid(unsafe_code)]

mod bandwidth;
mod cities;
mod error;
mod export;
mod join;
mod speed;
mod table;
mod traffic;
mod units;

use camino::Utf8Path;
use trafficmap_core::CityTrafficRecord;

pub use bandwidth::{TIME_COLUMN, load_bandwidth};
pub use cities::{City, CityTable, load_cities};
pub use error::IngestError;
pub use export::{POINT_HEADER, write_points, write_points_to};
pub use join::{IngestReport, join};
pub use speed::load_speeds;
pub use traffic::{TrafficTable, UNATTRIBUTED_COUNTRY, load_traffic};
pub use units::{TrafficUnit, UnknownUnitError};

/// Engine-ready records together with the row accounting that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct CityTraffic {
    /// One record per city whose country has traffic, in city-file order.
    pub records: Vec<CityTrafficRecord>,
    /// Row counts and totals.
    pub report: IngestReport,
}

/// Load both tables and join them into [`CityTrafficRecord`]s.
///
/// # Errors
///
/// Returns [`IngestError`] when either table cannot be read.
pub fn load_city_traffic(
    cities: &Utf8Path,
    traffic: &Utf8Path,
) -> Result<CityTraffic, IngestError> {
    let city_table = load_cities(cities)?;
    let traffic_table = load_traffic(traffic)?;
    let (records, report) = join(&city_table, &traffic_table);
    Ok(CityTraffic { records, report })
}
