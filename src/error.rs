//! # Simulation Errors
//!
//! Failures that end a run. Running out of tables, food or cutlery is not in
//! here: those are rejections, counted in the ledger.

use crate::config::ConfigError;
use tokio::task::JoinError;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("the restaurant must be started inside a tokio runtime")]
    NoRuntime,

    #[error("failed to listen for the stop signal: {0}")]
    Signal(#[source] std::io::Error),

    #[error("{role} task failed: {source}")]
    RoleFailed {
        role: &'static str,
        #[source]
        source: JoinError,
    },

    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}
