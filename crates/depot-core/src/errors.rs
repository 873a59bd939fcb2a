//! Cross-cutting error types for Depot.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, `InboxError`) are
//! defined in their respective crates. The binary converges them via `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Depot crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (required fields, formats).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation is not defined for the target (e.g. toggling state on
    /// an external message).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
