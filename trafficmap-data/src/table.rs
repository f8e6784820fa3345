//! Shared CSV plumbing for the table loaders.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::File;
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use trafficmap_fs::open_utf8_file;

use crate::IngestError;

/// An open CSV table with its header row already read.
pub(crate) struct Table {
    path: Utf8PathBuf,
    headers: StringRecord,
    reader: Reader<File>,
}

impl Table {
    pub(crate) fn open(path: &Utf8Path) -> Result<Self, IngestError> {
        let file = open_utf8_file(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(file);
        let headers = reader
            .headers()
            .map_err(|source| IngestError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .clone();
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            reader,
        })
    }

    pub(crate) fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub(crate) fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub(crate) fn column(&self, name: &str) -> Result<usize, IngestError> {
        self.optional_column(name)
            .ok_or_else(|| IngestError::MissingColumn {
                path: self.path.clone(),
                column: name.to_owned(),
            })
    }

    /// Data rows numbered from one.
    pub(crate) fn rows(
        &mut self,
    ) -> impl Iterator<Item = Result<(usize, StringRecord), IngestError>> + '_ {
        let path = &self.path;
        self.reader
            .records()
            .enumerate()
            .map(move |(index, record)| {
                record
                    .map(|row| (index + 1, row))
                    .map_err(|source| IngestError::Csv {
                        path: path.clone(),
                        source,
                    })
            })
    }
}

/// Trimmed cell contents, or `None` when the cell is blank or absent.
pub(crate) fn text(row: &StringRecord, column: usize) -> Option<&str> {
    row.get(column).map(str::trim).filter(|cell| !cell.is_empty())
}

/// Cell parsed as a finite number.
pub(crate) fn number(row: &StringRecord, column: usize) -> Option<f64> {
    text(row, column)?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
