//! Loader for the per-country download speed table.

use camino::Utf8Path;
use log::{info, warn};
use trafficmap_core::CountrySpeed;

use crate::IngestError;
use crate::table::{Table, number, text};

/// Load speeds from a CSV with `iso3` and `speed_mbps` columns and an
/// optional `country` name column.
///
/// Rows without a code or with a non-numeric speed are skipped.
///
/// # Errors
///
/// Returns [`IngestError`] when the file cannot be read or lacks a required
/// column.
pub fn load_speeds(path: &Utf8Path) -> Result<Vec<CountrySpeed>, IngestError> {
    let mut table = Table::open(path)?;
    let iso3_col = table.column("iso3")?;
    let speed_col = table.column("speed_mbps")?;
    let country_col = table.optional_column("country");

    let mut speeds = Vec::new();
    let mut dropped = 0_usize;
    for entry in table.rows() {
        let (_, record) = entry?;
        let (Some(iso3), Some(speed_mbps)) = (text(&record, iso3_col), number(&record, speed_col))
        else {
            dropped += 1;
            continue;
        };
        speeds.push(CountrySpeed {
            iso3: iso3.to_owned(),
            country: country_col
                .and_then(|col| text(&record, col))
                .map(str::to_owned),
            speed_mbps,
        });
    }

    if dropped > 0 {
        warn!("dropped {dropped} speed rows from {path} without a code or numeric speed");
    }
    info!("loaded speeds for {} countries from {path}", speeds.len());
    Ok(speeds)
}
