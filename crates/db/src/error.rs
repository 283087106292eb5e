//! Repository error type.

use chatwarden_core::error::CoreError;
use chatwarden_core::types::DbId;

/// Error type returned by every repository method.
///
/// `Database` carries transient store failures (connectivity, timeouts)
/// straight from sqlx; reads are idempotent and `publish`/`resolve` are safe
/// to retry wholesale, so callers may retry that variant. `Conflict` is the
/// one condition the layer itself retries before surfacing.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for repository return values.
pub type RepoResult<T> = Result<T, RepoError>;

/// True when `err` is a PostgreSQL unique-constraint violation (23505) on
/// the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(constraint);
    }
    false
}
