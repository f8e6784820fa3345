//! Loader for the per-country traffic table.

use std::collections::BTreeMap;

use camino::Utf8Path;
use log::{debug, info, warn};

use crate::IngestError;
use crate::table::{Table, number, text};
use crate::units::TrafficUnit;

/// Country label the source uses for traffic it could not attribute.
pub const UNATTRIBUTED_COUNTRY: &str = "Unknown";

/// Download traffic summed per country, in terabytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficTable {
    totals: BTreeMap<String, f64>,
    /// Data rows read.
    pub rows_read: usize,
    /// Rows that contributed to no total.
    pub rows_dropped: usize,
}

impl TrafficTable {
    /// Total for `iso3`, if any row named it.
    #[must_use]
    pub fn country_total(&self, iso3: &str) -> Option<f64> {
        self.totals.get(iso3).copied()
    }

    /// Totals keyed by ISO3 code.
    #[must_use]
    pub const fn totals(&self) -> &BTreeMap<String, f64> {
        &self.totals
    }

    /// Number of countries with a total.
    #[must_use]
    pub fn countries(&self) -> usize {
        self.totals.len()
    }

    /// Traffic across every country.
    #[must_use]
    pub fn total_tb(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Load traffic from a CSV with `iso3`, `country`, `value` and `unit`
/// columns and sum it per country.
///
/// Rows without a code, or whose country is [`UNATTRIBUTED_COUNTRY`], are
/// skipped. Rows with a non-numeric or negative value, or an unknown unit,
/// are skipped with a warning.
///
/// Negative values are dropped rather than netted against the country
/// total, so a correction row does not reduce the aggregate as a plain sum
/// of the raw table would.
///
/// # Errors
///
/// Returns [`IngestError`] when the file cannot be read or lacks a required
/// column.
pub fn load_traffic(path: &Utf8Path) -> Result<TrafficTable, IngestError> {
    let mut table = Table::open(path)?;
    let iso3_col = table.column("iso3")?;
    let country_col = table.column("country")?;
    let value_col = table.column("value")?;
    let unit_col = table.column("unit")?;

    let mut loaded = TrafficTable::default();
    for entry in table.rows() {
        let (row, record) = entry?;
        loaded.rows_read += 1;

        let Some(iso3) = text(&record, iso3_col) else {
            debug!("traffic row {row}: no iso3 code");
            loaded.rows_dropped += 1;
            continue;
        };
        if text(&record, country_col) == Some(UNATTRIBUTED_COUNTRY) {
            debug!("traffic row {row}: unattributed traffic");
            loaded.rows_dropped += 1;
            continue;
        }
        let Some(value) = number(&record, value_col).filter(|v| *v >= 0.0) else {
            warn!(
                "{path} row {row}: skipping {iso3} traffic with value {:?}",
                record.get(value_col).unwrap_or_default()
            );
            loaded.rows_dropped += 1;
            continue;
        };
        let unit = match record.get(unit_col).unwrap_or_default().parse::<TrafficUnit>() {
            Ok(unit) => unit,
            Err(err) => {
                warn!("{path} row {row}: skipping {iso3} traffic: {err}");
                loaded.rows_dropped += 1;
                continue;
            }
        };

        *loaded.totals.entry(iso3.to_owned()).or_insert(0.0) += unit.to_terabytes(value);
    }

    info!(
        "aggregated {} traffic rows from {path} into {} countries, {:.2} TB in total",
        loaded.rows_read - loaded.rows_dropped,
        loaded.countries(),
        loaded.total_tb(),
    );
    Ok(loaded)
}
