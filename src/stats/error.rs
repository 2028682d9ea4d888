//! Error type shared by the statistics engine

use crate::config::ConfigError;
use std::io;
use thiserror::Error;

/// Errors returned by engine operations.
///
/// None of these are fatal; callers decide whether to log and continue.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Missing or out-of-range argument (e.g. key position beyond the heatmap)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The feature backing this call is disabled in the configuration
    #[error("{0} tracking is not enabled")]
    NotSupported(&'static str),
    /// Fixed-size registry is full
    #[error("capacity exceeded: at most {capacity} subscribers")]
    CapacityExceeded { capacity: usize },
    /// Unregistering something that was never registered
    #[error("subscriber not found")]
    NotFound,
    /// Persisted data was written with a different schema version
    #[error("persisted data version {found} does not match expected {expected}")]
    VersionMismatch { found: u8, expected: u8 },
    /// Persisted blob length does not match the active layout
    #[error("persisted data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    /// The engine was constructed with settings it cannot honour
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Failure in the backing key/value store
    #[error("storage error: {0}")]
    Storage(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_message() {
        let err = StatsError::VersionMismatch {
            found: 2,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "persisted data version 2 does not match expected 1"
        );
    }

    #[test]
    fn io_error_converts_to_storage() {
        let err: StatsError = io::Error::new(io::ErrorKind::Other, "disk gone").into();
        assert!(matches!(err, StatsError::Storage(_)));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn not_supported_names_feature() {
        let err = StatsError::NotSupported("heatmap");
        assert_eq!(err.to_string(), "heatmap tracking is not enabled");
    }

    #[test]
    fn config_error_converts() {
        let invalid = ConfigError::Invalid("wpm_window_ms must be positive".to_string());
        let err: StatsError = invalid.into();
        assert!(matches!(err, StatsError::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
