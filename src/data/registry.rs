//! Startup-loaded data registry. Both bulletin tables are read and indexed
//! once, then shared via Arc with handlers and the CLI; nothing mutates them
//! afterwards, so no locking is needed on the read path.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::index::{DatasetIndex, DuplicateKeyError};
use crate::data::table::{RecordTable, TableSource};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const NATIONAL_TABLE_FILE: &str = "df_brasil.csv";
pub const REGIONAL_TABLE_FILE: &str = "df_states.csv";

#[derive(Debug)]
pub enum RegistryError {
    Read { path: PathBuf, source: csv::Error },
    Index { table: &'static str, source: DuplicateKeyError },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Index { table, source } => {
                write!(f, "failed to index {table} table: {source}")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Index { source, .. } => Some(source),
        }
    }
}

/// Read-only registry of the two dataset indices, loaded once at startup.
#[derive(Debug)]
pub struct DataRegistry {
    national: DatasetIndex,
    regional: DatasetIndex,
}

impl DataRegistry {
    /// Load both tables from the data dir (`BOLETIM_DATA_DIR` overrides the
    /// default). Returns an Arc so the registry can be shared across handlers.
    pub fn load() -> Result<Arc<Self>, RegistryError> {
        let data_dir =
            std::env::var("BOLETIM_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::load_from_dir(Path::new(&data_dir)).map(Arc::new)
    }

    pub fn load_from_dir(data_dir: &Path) -> Result<Self, RegistryError> {
        let national = load_table(data_dir.join(NATIONAL_TABLE_FILE), TableSource::National)?;
        let regional = load_table(data_dir.join(REGIONAL_TABLE_FILE), TableSource::Regional)?;
        Self::from_tables(national, regional)
    }

    /// Build a registry from already-loaded tables. Used by tests and by the
    /// loader above; duplicate keys in either table are fatal here.
    pub fn from_tables(
        national: RecordTable,
        regional: RecordTable,
    ) -> Result<Self, RegistryError> {
        let national = DatasetIndex::build(national).map_err(|source| RegistryError::Index {
            table: "national",
            source,
        })?;
        let regional = DatasetIndex::build(regional).map_err(|source| RegistryError::Index {
            table: "regional",
            source,
        })?;
        Ok(DataRegistry { national, regional })
    }

    pub fn national(&self) -> &DatasetIndex {
        &self.national
    }

    pub fn regional(&self) -> &DatasetIndex {
        &self.regional
    }
}

fn load_table(path: PathBuf, source: TableSource) -> Result<RecordTable, RegistryError> {
    RecordTable::from_path(source, &path).map_err(|err| RegistryError::Read { path, source: err })
}
