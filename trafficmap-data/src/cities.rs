//! Loader for the city population table.

use camino::Utf8Path;
use log::{debug, info, warn};

use crate::IngestError;
use crate::table::{Table, number, text};

/// A populated place with valid coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    /// ISO3 code of the containing country.
    pub iso3: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Resident population, always positive.
    pub population: f64,
}

/// Cities kept from a table, in file order, with row accounting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityTable {
    /// Rows that passed every check.
    pub cities: Vec<City>,
    /// Data rows read.
    pub rows_read: usize,
    /// Rows skipped for a missing code, bad population, or bad coordinates.
    pub rows_dropped: usize,
}

#[derive(Debug, Default)]
struct Drops {
    missing_code: usize,
    bad_population: usize,
    bad_location: usize,
}

impl Drops {
    const fn total(&self) -> usize {
        self.missing_code + self.bad_population + self.bad_location
    }
}

/// Load cities from a CSV with `iso3`, `lat`, `lng` and `population`
/// columns. Other columns are ignored.
///
/// Rows are dropped when the code is blank, the population is not a
/// positive number, or the coordinates fall outside `[-90, 90]` and
/// `[-180, 180]`.
///
/// # Errors
///
/// Returns [`IngestError`] when the file cannot be read or lacks a required
/// column.
pub fn load_cities(path: &Utf8Path) -> Result<CityTable, IngestError> {
    let mut table = Table::open(path)?;
    let iso3_col = table.column("iso3")?;
    let lat_col = table.column("lat")?;
    let lng_col = table.column("lng")?;
    let population_col = table.column("population")?;

    let mut loaded = CityTable::default();
    let mut drops = Drops::default();
    for entry in table.rows() {
        let (row, record) = entry?;
        loaded.rows_read += 1;

        let Some(iso3) = text(&record, iso3_col) else {
            debug!("city row {row}: no iso3 code");
            drops.missing_code += 1;
            continue;
        };
        let Some(population) = number(&record, population_col).filter(|p| *p > 0.0) else {
            debug!("city row {row}: population is missing or not positive");
            drops.bad_population += 1;
            continue;
        };
        let latitude = number(&record, lat_col).filter(|lat| (-90.0..=90.0).contains(lat));
        let longitude = number(&record, lng_col).filter(|lng| (-180.0..=180.0).contains(lng));
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            debug!("city row {row}: coordinates missing or out of range");
            drops.bad_location += 1;
            continue;
        };

        loaded.cities.push(City {
            iso3: iso3.to_owned(),
            latitude,
            longitude,
            population,
        });
    }

    loaded.rows_dropped = drops.total();
    if loaded.rows_dropped > 0 {
        warn!(
            "dropped {} of {} city rows from {path}: {} without iso3, {} without positive population, {} with invalid coordinates",
            loaded.rows_dropped,
            loaded.rows_read,
            drops.missing_code,
            drops.bad_population,
            drops.bad_location,
        );
    }
    info!("loaded {} cities from {path}", loaded.cities.len());
    Ok(loaded)
}
