//! Error types for favorite store operations.

use std::fmt;

use thiserror::Error;

/// Structured classification for favorite store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// `SQLite` returned busy/locked under concurrent access.
    BusyOrLocked,
    /// Constraint failure (unique/check/not-null).
    ConstraintViolation,
    /// Connection pool timed out waiting for a free connection.
    PoolTimeout,
    /// Connection pool is closed.
    PoolClosed,
    /// Filesystem or transport IO failure.
    Io,
    /// SQL protocol/driver error.
    Protocol,
    /// Unclassified database failure.
    Other,
}

impl StorageErrorKind {
    #[must_use]
    pub fn from_sqlx(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => Self::PoolTimeout,
            sqlx::Error::PoolClosed => Self::PoolClosed,
            sqlx::Error::Io(_) => Self::Io,
            sqlx::Error::Protocol(_) => Self::Protocol,
            sqlx::Error::Database(database_error) => {
                classify_database_error(database_error.as_ref())
            }
            _ => Self::Other,
        }
    }
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BusyOrLocked => "busy_or_locked",
            Self::ConstraintViolation => "constraint_violation",
            Self::PoolTimeout => "pool_timeout",
            Self::PoolClosed => "pool_closed",
            Self::Io => "io",
            Self::Protocol => "protocol",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}

fn classify_database_error(
    database_error: &(dyn sqlx::error::DatabaseError + 'static),
) -> StorageErrorKind {
    let code = database_error.code();
    if matches!(
        code.as_deref(),
        Some("SQLITE_BUSY" | "SQLITE_LOCKED" | "5" | "6")
    ) {
        return StorageErrorKind::BusyOrLocked;
    }

    if database_error.is_unique_violation()
        || database_error.is_check_violation()
        || code
            .as_deref()
            .is_some_and(|value| value.starts_with("SQLITE_CONSTRAINT") || value == "275")
    {
        return StorageErrorKind::ConstraintViolation;
    }

    let message = database_error.message().to_ascii_lowercase();
    if message.contains("database is locked") || message.contains("database table is locked") {
        return StorageErrorKind::BusyOrLocked;
    }
    if message.contains("constraint failed") {
        return StorageErrorKind::ConstraintViolation;
    }

    StorageErrorKind::Other
}

/// A favorite store operation failed in the durable layer.
#[derive(Debug, Clone, Error)]
#[error("favorite storage error ({kind}): {message}\n  Suggestion: {}", .kind.suggestion())]
pub struct StorageError {
    /// Typed classification of the underlying failure.
    pub kind: StorageErrorKind,
    /// Human-readable driver error text.
    pub message: String,
}

impl StorageErrorKind {
    fn suggestion(self) -> &'static str {
        match self {
            Self::BusyOrLocked | Self::PoolTimeout => {
                "Another operation holds the database; try again"
            }
            Self::ConstraintViolation => "Favorites need a non-empty catalog id",
            Self::PoolClosed => "The favorites database was closed; reopen it",
            Self::Io => "Check that the database path is writable and the disk is not full",
            Self::Protocol | Self::Other => "Check the database file for corruption",
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self {
            kind: StorageErrorKind::from_sqlx(&err),
            message: err.to_string(),
        }
    }
}

impl StorageError {
    /// Returns true when this error is a database busy/locked condition.
    #[must_use]
    pub fn is_busy_or_locked(&self) -> bool {
        self.kind == StorageErrorKind::BusyOrLocked
    }
}
