//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The API layer maps each variant onto an HTTP status.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),
    /// No identity, or an identity we could not verify
    #[error("{0}")]
    Authentication(String),
    /// Authenticated, but the role or ownership check failed
    #[error("{0}")]
    PermissionDenied(String),
    /// Resource not found; the payload names the resource
    #[error("{0} not found")]
    NotFound(String),
    /// Unique constraint or optimistic check failed
    #[error("{0}")]
    Conflict(String),
    /// A row points at something that no longer exists
    #[error("{entity} {id} references a missing record")]
    OrphanedReference { entity: &'static str, id: i32 },
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(resource: &str) -> Self {
        DomainError::NotFound(resource.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        DomainError::PermissionDenied(msg.into())
    }
}

// Conversion from SeaORM errors (used in services and repositories)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::Conflict("Resource already exists".to_string())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                DomainError::Validation("Referenced record does not exist".to_string())
            }
            _ => match e {
                DbErr::RecordNotFound(what) => DomainError::NotFound(what),
                DbErr::RecordNotUpdated => DomainError::not_found("Record"),
                other => DomainError::Database(other.to_string()),
            },
        }
    }
}
