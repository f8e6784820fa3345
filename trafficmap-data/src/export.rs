//! CSV export of generated points.

use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;
use trafficmap_core::{SamplePoint, Tier};
use trafficmap_fs::create_utf8_file;

use crate::IngestError;

/// Header row of a point export.
pub const POINT_HEADER: [&str; 3] = ["lat", "lon", "tier"];

#[derive(Serialize)]
struct PointRow {
    lat: f64,
    lon: f64,
    tier: Tier,
}

/// Write `points` to `path` as CSV, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`IngestError::Write`] when the file cannot be created or written.
pub fn write_points(path: &Utf8Path, points: &[SamplePoint]) -> Result<(), IngestError> {
    let write_error = |source| IngestError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = create_utf8_file(path).map_err(|err| write_error(csv::Error::from(err)))?;
    write_points_to(file, points).map_err(write_error)
}

/// Write `points` as CSV to any writer.
///
/// The header is written even when there are no points.
///
/// # Examples
///
/// ```
/// use trafficmap_core::{SamplePoint, Tier};
/// use trafficmap_data::write_points_to;
///
/// let mut out = Vec::new();
/// let point = SamplePoint { latitude: 1.5, longitude: -2.0, tier: Tier::Core };
/// write_points_to(&mut out, &[point]).expect("write to memory");
/// assert_eq!(String::from_utf8(out).expect("utf-8"), "lat,lon,tier\n1.5,-2.0,core\n");
/// ```
///
/// # Errors
///
/// Returns the underlying [`csv::Error`] on write failure.
pub fn write_points_to<W: Write>(writer: W, points: &[SamplePoint]) -> Result<(), csv::Error> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(POINT_HEADER)?;
    for point in points {
        csv.serialize(PointRow {
            lat: point.latitude,
            lon: point.longitude,
            tier: point.tier,
        })?;
    }
    csv.flush()?;
    Ok(())
}
