use thiserror::Error;

/// Errors surfaced by the domain services.
///
/// Lookups that find nothing return `Ok(None)` rather than an error;
/// `NotFound` is reserved for mutations that require an existing record.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Structurally invalid input, rejected before any storage call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation attempted without a signed-in principal.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The principal may not mutate the target record.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A mutation targeted a record that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying storage failure.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
