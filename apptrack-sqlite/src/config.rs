//! Where the record database lives.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the record database.
///
/// In a configuration file this is the `[database]` table:
///
/// ```toml
/// [database]
/// database_path = "applications.db"
/// ```
///
/// Leaving `database_path` out keeps records in memory for the life of the
/// process, which is what the tests use.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// The database file; `None` for an in-memory database
    pub database_path: Option<PathBuf>,

    /// Refuse to start against a file that does not exist yet
    pub must_exist: bool,
}

impl SqliteConfig {
    /// A database stored in `path`, created on first use.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(path.into()),
            must_exist: false,
        }
    }
}
