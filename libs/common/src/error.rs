//! Error types shared by the marketplace crates
//!
//! Everything that can go wrong while bringing the persistence layer up
//! (configuration, connecting, migrating) is reported as a [`DatabaseError`].

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Failure raised while configuring, connecting to, or migrating the database
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The pool could not be opened
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Applying the embedded schema migrations failed
    #[error("Database migration error: {0}")]
    Migration(#[source] MigrateError),

    /// Settings were missing or malformed
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Postgres SQLSTATE for `unique_violation`
pub const UNIQUE_VIOLATION: &str = "23505";

/// Postgres SQLSTATE for `foreign_key_violation`
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

fn violated_constraint(err: &SqlxError, sqlstate: &str) -> Option<String> {
    match err {
        SqlxError::Database(db) if db.code().as_deref() == Some(sqlstate) => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Returns the violated constraint name when `err` is a unique-key conflict.
pub fn unique_violation(err: &SqlxError) -> Option<String> {
    violated_constraint(err, UNIQUE_VIOLATION)
}

/// Returns the violated constraint name when `err` references a missing row.
pub fn foreign_key_violation(err: &SqlxError) -> Option<String> {
    violated_constraint(err, FOREIGN_KEY_VIOLATION)
}
