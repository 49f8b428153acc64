//! Error types for configuration and storage operations.
//!
//! This module defines the error types that can occur while loading
//! configuration and while reading or writing saved screens and widget
//! state.

use std::path::PathBuf;

/// Errors that can occur during configuration and storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("failed to remove {path}: {source}")]
    RemoveFile {
        /// The path that could not be removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON5 configuration.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Failed to serialize or parse JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid grid dimensions.
    #[error("invalid grid size: {reason}")]
    InvalidGridSize {
        /// The reason the size is invalid.
        reason: String,
    },

    /// Invalid dice overlay duration.
    #[error("invalid overlay duration: {reason}")]
    InvalidOverlayDuration {
        /// The reason the duration is invalid.
        reason: String,
    },

    /// An environment variable override could not be parsed.
    #[error("invalid value {value:?} for {name}")]
    InvalidEnvVar {
        /// The variable name.
        name: &'static str,
        /// The raw value.
        value: String,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// Another saved screen already uses this name.
    #[error("a screen named {name:?} already exists")]
    DuplicateScreenName {
        /// The conflicting name.
        name: String,
    },

    /// No saved screen has this identifier.
    #[error("no saved screen with id {id}")]
    ScreenNotFound {
        /// The requested identifier.
        id: String,
    },

    /// An imported file is not a screen document.
    #[error("invalid screen file: {reason}")]
    InvalidScreenFile {
        /// What is wrong with the file.
        reason: String,
    },
}

impl From<gmscreen_protocol::ProtocolError> for ConfigError {
    fn from(err: gmscreen_protocol::ProtocolError) -> Self {
        use gmscreen_protocol::ProtocolError;

        match err {
            ProtocolError::SerializationFailed(e) | ProtocolError::DeserializationFailed(e) => {
                Self::Json(e)
            }
            ProtocolError::InvalidDocument(reason) => Self::InvalidScreenFile { reason },
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
