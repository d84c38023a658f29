//! Error types for the host binary.
//!
//! [`HostError`] is the top-level error type that wraps all possible
//! failure modes during host startup and script replay.

/// Top-level error for the host binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: timeflow_core::config::ConfigError,
    },

    /// The session script could not be parsed.
    #[error("script error: {source}")]
    Script {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// Reading the script or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
