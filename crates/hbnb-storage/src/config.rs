//! Backend selection from the process environment.

use std::path::PathBuf;

use tracing::info;

use crate::error::StorageError;
use crate::file::FileStore;
use crate::sqlite::SqliteStore;
use crate::traits::ObjectStore;

pub const STORAGE_TYPE_VAR: &str = "HBNB_TYPE_STORAGE";
pub const FILE_PATH_VAR: &str = "HBNB_FILE_PATH";
pub const DB_PATH_VAR: &str = "HBNB_DB_PATH";

pub const DEFAULT_FILE_PATH: &str = "file.json";
pub const DEFAULT_DB_PATH: &str = "hbnb.db";

/// Which backend to open, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    File { path: PathBuf },
    Database { path: PathBuf },
}

impl StorageConfig {
    /// Reads the configuration through `lookup`, which stands in for the
    /// environment. `HBNB_TYPE_STORAGE` is `file` (the default) or `db`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |var: &str, default: &str| {
            PathBuf::from(lookup(var).unwrap_or_else(|| default.to_string()))
        };
        match lookup(STORAGE_TYPE_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("file") => Ok(StorageConfig::File {
                path: path(FILE_PATH_VAR, DEFAULT_FILE_PATH),
            }),
            Some("db") => Ok(StorageConfig::Database {
                path: path(DB_PATH_VAR, DEFAULT_DB_PATH),
            }),
            Some(other) => Err(StorageError::Config {
                reason: format!("{STORAGE_TYPE_VAR} must be 'file' or 'db', got '{other}'"),
            }),
        }
    }

    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Opens the selected backend and loads its durable state.
    pub fn open(&self) -> Result<Box<dyn ObjectStore + Send>, StorageError> {
        let store: Box<dyn ObjectStore + Send> = match self {
            StorageConfig::File { path } => Box::new(FileStore::open(path.clone())?),
            StorageConfig::Database { path } => {
                let mut store = SqliteStore::new(path)?;
                store.reload()?;
                Box::new(store)
            }
        };
        info!(backend = %self, "storage opened");
        Ok(store)
    }
}

impl std::fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageConfig::File { path } => write!(f, "file:{}", path.display()),
            StorageConfig::Database { path } => write!(f, "db:{}", path.display()),
        }
    }
}
