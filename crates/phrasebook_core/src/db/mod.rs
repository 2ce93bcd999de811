//! On-disk home of the template store.
//!
//! # Responsibility
//! - Hand out connections whose schema matches this build.
//! - Keep the template schema history in `migrations`.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the last applied migration.
//! - A store written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_store, open_store_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the template store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build than this one.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite_error",
            Self::SchemaTooNew { .. } => "schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "template store query failed: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "template store uses schema {found}; this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn schema_too_new_names_both_versions() {
        let err = DbError::SchemaTooNew {
            found: 7,
            supported: 1,
        };
        assert_eq!(err.code(), "schema_too_new");
        assert_eq!(
            err.to_string(),
            "template store uses schema 7; this build reads up to 1"
        );
    }
}
