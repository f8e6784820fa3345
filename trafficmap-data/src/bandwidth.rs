//! Loader for the regional bandwidth table.

use camino::Utf8Path;
use log::{debug, info, warn};
use trafficmap_core::bandwidth::DEFAULT_REGION_ORDER;
use trafficmap_core::{BandwidthSeries, RegionSeries};

use crate::IngestError;
use crate::table::{Table, number};

/// Column holding the timestamp labels.
pub const TIME_COLUMN: &str = "Time (EST)";

/// Load a bandwidth series from a CSV with a [`TIME_COLUMN`] and one
/// numeric column per region, in Gbps.
///
/// Only the regions named in [`DEFAULT_REGION_ORDER`] are stacked, in that
/// order. Other columns, such as a precomputed total or free-text notes,
/// are ignored.
///
/// # Errors
///
/// Returns [`IngestError`] when the file cannot be read, lacks the time
/// column, holds a non-numeric sample, or does not form a valid series.
pub fn load_bandwidth(path: &Utf8Path) -> Result<BandwidthSeries, IngestError> {
    let mut table = Table::open(path)?;
    let time_col = table.column(TIME_COLUMN)?;
    let columns = region_columns(table.headers(), time_col);
    for (col, name) in table.headers().iter().enumerate() {
        if col != time_col && !columns.iter().any(|(_, region)| *region == col) {
            debug!("{path}: ignoring column {name:?}");
        }
    }
    if !columns.is_empty() && columns.len() < DEFAULT_REGION_ORDER.len() {
        warn!(
            "{path} covers {} of {} standard regions",
            columns.len(),
            DEFAULT_REGION_ORDER.len()
        );
    }

    let mut timestamps = Vec::new();
    let mut regions: Vec<RegionSeries> = columns
        .iter()
        .map(|(name, _)| RegionSeries {
            name: name.clone(),
            values: Vec::new(),
        })
        .collect();

    for entry in table.rows() {
        let (row, record) = entry?;
        timestamps.push(record.get(time_col).unwrap_or_default().trim().to_owned());
        for ((name, col), region) in columns.iter().zip(regions.iter_mut()) {
            let value = number(&record, *col).ok_or_else(|| IngestError::InvalidNumber {
                path: path.to_path_buf(),
                row,
                column: name.clone(),
                value: record.get(*col).unwrap_or_default().to_owned(),
            })?;
            region.values.push(value);
        }
    }

    let series = BandwidthSeries::new(timestamps, regions).map_err(|source| {
        IngestError::Bandwidth {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        "loaded {} bandwidth samples across {} regions from {path}",
        series.len(),
        series.regions().len()
    );
    Ok(series)
}

/// Standard region columns in stacking order; the first match wins when a
/// header repeats.
fn region_columns(headers: &csv::StringRecord, time_col: usize) -> Vec<(String, usize)> {
    DEFAULT_REGION_ORDER
        .iter()
        .filter_map(|region| {
            headers
                .iter()
                .enumerate()
                .find(|(col, name)| *col != time_col && name == region)
                .map(|(col, _)| ((*region).to_owned(), col))
        })
        .collect()
}
