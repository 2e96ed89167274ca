//! Error types for configuration loading and validation.

use thiserror::Error;

/// Errors that make a configuration unusable.
///
/// Any of these aborts the run before the ledger is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Config`](super::Config).
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Group sizes must satisfy `1 <= min <= max <= 6`.
    #[error("invalid group size range {min}..={max} (must be within 1..=6)")]
    GroupSize { min: u32, max: u32 },

    /// Takeout chance is a percentage.
    #[error("takeout chance {0}% exceeds 100%")]
    TakeoutChance(u8),

    /// A `min`/`max` pair is inverted.
    #[error("invalid range for {field}: min {min} > max {max}")]
    InvertedRange { field: &'static str, min: u64, max: u64 },

    /// A duration or step count that drives a loop is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
