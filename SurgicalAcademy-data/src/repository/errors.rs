use rusqlite::ErrorCode;
use thiserror::Error;

use crate::database::DatabaseError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Unique key already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored JSON could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blocking task failed to complete
    #[error("Blocking task failed: {0}")]
    Task(String),
}

/// Turn a unique-constraint violation into [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(error: rusqlite::Error, what: &str) -> RepositoryError {
    match &error {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepositoryError::Conflict(format!("{} already exists", what))
        }
        _ => RepositoryError::Sqlite(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (slug TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();

        let error = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
        match map_unique_violation(error, "slug") {
            RepositoryError::Conflict(message) => assert_eq!(message, "slug already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }
}
