//! Local-file source: a mirror of the three CSVs on disk.

use std::path::{Path, PathBuf};

use super::SeriesSource;
use crate::error::DataError;
use crate::series::SeriesKind;

pub struct FileSource {
    paths: [PathBuf; 3],
}

impl FileSource {
    /// `paths` are ordered cases, deaths, recovered.
    pub fn new(paths: [PathBuf; 3]) -> Self {
        Self { paths }
    }

    /// A directory holding the files under their JHU names,
    /// e.g. `time_series_covid19_confirmed_global.csv`.
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(SeriesKind::ALL.map(|k| dir.join(format!("{}.csv", k.file_stem()))))
    }

    pub fn path(&self, kind: SeriesKind) -> &Path {
        match kind {
            SeriesKind::Cases => &self.paths[0],
            SeriesKind::Deaths => &self.paths[1],
            SeriesKind::Recovered => &self.paths[2],
        }
    }
}

impl SeriesSource for FileSource {
    fn name(&self) -> &str {
        "files"
    }

    fn fetch(&self, kind: SeriesKind) -> Result<String, DataError> {
        let path = self.path(kind);
        std::fs::read_to_string(path).map_err(|e| DataError::Fetch {
            kind,
            url: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
