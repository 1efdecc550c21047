//! Object storage for HBnB entities.
//!
//! Provides the [`ObjectStore`] trait defining the storage contract, plus two
//! interchangeable backends: [`FileStore`], a single JSON document, and
//! [`SqliteStore`], a relational database with cascading foreign keys.
//! [`StorageConfig`] picks one from the environment.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: ObjectStore trait definition
//! - [`file`]: FileStore implementation
//! - [`schema`]: SQL schema and migration setup
//! - [`convert`]: Entity to row conversions
//! - [`sqlite`]: SqliteStore implementation
//! - [`config`]: backend selection

pub mod config;
pub mod convert;
pub mod error;
pub mod file;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use config::StorageConfig;
pub use error::StorageError;
pub use file::FileStore;
pub use sqlite::SqliteStore;
pub use traits::ObjectStore;
