//! Error types for starting dining sessions.

use thiserror::Error;

/// Why a dining session could not be started.
///
/// The admission controller recovers from every variant by rolling back the
/// reservation it made for the party.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// Called outside a Tokio runtime.
    #[error("no tokio runtime to run the session on")]
    NoRuntime,

    /// The configured number of concurrent sessions is already dining.
    #[error("session limit reached ({limit} active)")]
    AtCapacity { limit: usize },
}
