//! Error types for the request-lifecycle core.
//!
//! Application code running inside callbacks reports failures as
//! [`anyhow::Error`] values, which the drain loops propagate unmodified.
//! The errors defined here are the ones this crate itself originates.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Configuration errors originating from the request-lifecycle core.
///
/// # Example
///
/// ```
/// use atrium_core::CoreError;
///
/// let err = CoreError::SessionFactoryMissing;
/// assert!(err.to_string().contains("session factory"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No session factory has been registered.
    ///
    /// Raised on first access of the request session when the registry has no
    /// factory. Not retried; the next access fails the same way.
    #[error(
        "no session factory registered; register one on the service registry \
         before accessing the request session"
    )]
    SessionFactoryMissing,
}
