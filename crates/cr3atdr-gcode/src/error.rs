//! Error types for G-code generation.

use cr3atdr_slicer::SlicerError;
use thiserror::Error;

/// Errors that abort a generation run.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// Print settings are out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The mesh could not be sliced.
    #[error("slicing failed: {0}")]
    Slice(#[from] SlicerError),

    /// Settings file could not be parsed.
    #[error("invalid settings file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Settings could not be serialized.
    #[error("could not serialize settings: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Result type for G-code operations.
pub type Result<T> = std::result::Result<T, GcodeError>;
