//! Error types for the `furrow` binary.
//!
//! [`CliError`] wraps every failure a command can hit so that `main` can
//! propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the `furrow` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: furrow_engine::ConfigError,
    },

    /// The engine rejected the request.
    #[error("{source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: furrow_engine::EngineError,
    },

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An input file is not valid YAML for the expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// The underlying YAML error.
        source: serde_yml::Error,
    },

    /// Output could not be serialized.
    #[error("failed to encode output: {source}")]
    Output {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Days-to-maturity arguments are unusable.
    #[error("invalid days to maturity: {reason}")]
    InvalidMaturity {
        /// What is wrong with them.
        reason: String,
    },

    /// A regional calendar file held no calendars.
    #[error("no regional calendar in {}", path.display())]
    NoCalendar {
        /// File that was searched.
        path: PathBuf,
    },
}
