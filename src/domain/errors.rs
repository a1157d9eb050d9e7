//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Required field absent or empty
    MissingField(&'static str),
    /// Field present but malformed
    InvalidValue {
        field: &'static str,
        message: String,
    },
    /// Unique column collision (email, isbn, username)
    DuplicateUnique(String),
    /// Referenced parent record does not exist
    ForeignKeyNotFound { field: &'static str, id: i32 },
    /// Constraint violation at write time
    Conflict(String),
    /// Database/persistence error
    Database(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::MissingField(field) => write!(f, "Field '{}' is required", field),
            DomainError::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
            DomainError::DuplicateUnique(msg) => write!(f, "{} already exists", msg),
            DomainError::ForeignKeyNotFound { field, id } => {
                write!(f, "Referenced {} {} does not exist", field, id)
            }
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors. Unique violations are classified here so the
// storage constraint stays the single source of truth for uniqueness.
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => {
                DomainError::DuplicateUnique(extract_column(&msg))
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(msg)) => {
                DomainError::Conflict(msg)
            }
            _ => DomainError::Database(e.to_string()),
        }
    }
}

/// Pull the offending column out of SQLite's
/// "UNIQUE constraint failed: books.isbn" message.
fn extract_column(msg: &str) -> String {
    msg.rsplit(':')
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| msg.to_string())
}
