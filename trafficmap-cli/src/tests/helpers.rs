//! Test helpers for writing input tables into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Cities in two countries plus one row without a code.
pub(super) const CITIES_CSV: &str = "\
iso3,lat,lng,population
USA,40.71,-74.01,8000000
USA,34.05,-118.24,4000000
FRA,48.86,2.35,2000000
,0,0,10
";

/// 3 PB for the USA, 500 TB for France, and unattributed traffic.
pub(super) const TRAFFIC_CSV: &str = "\
iso3,country,value,unit
USA,United States,3,PB
FRA,France,500,TB
XXX,Unknown,1,PB
";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}

/// A temporary directory addressed by UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}
