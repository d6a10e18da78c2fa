//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup, the frame
//! loop, and saving, so `main` can propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: founder_core::ConfigError,
    },

    /// The content catalog could not be loaded.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: founder_core::catalog::CatalogError,
    },

    /// A frame failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: founder_core::TickError,
    },

    /// A startup or player command failed.
    #[error("command error: {source}")]
    Command {
        /// The underlying command error.
        #[from]
        source: founder_core::CommandError,
    },

    /// A save file could not be applied.
    #[error("restore error: {source}")]
    Restore {
        /// The underlying restore error.
        #[from]
        source: founder_core::RestoreError,
    },

    /// Reading or writing a save file failed.
    #[error("save file {path}: {message}")]
    Save {
        /// The save file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
}
