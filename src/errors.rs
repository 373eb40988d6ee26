/*!
 * Error types for the subreflow application.
 *
 * This module contains custom error types for the I/O boundary and the
 * subtitle format layer, using the thiserror crate for ergonomic error
 * definitions. The resegmentation core never fails: it reports degraded
 * results through `resegment::Notice` values instead.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while reading or parsing subtitle content
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The content could not be interpreted as SRT at all
    #[error("Failed to parse subtitle content: {0}")]
    ParseError(String),

    /// The content parsed but contained no subtitle entries
    #[error("No subtitle entries found: {0}")]
    NoEntries(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The input source cannot be read or decoded
    #[error("Input unreadable: {0}")]
    InputUnreadable(String),

    /// The destination cannot be written
    #[error("Output unwritable: {0}")]
    OutputUnwritable(String),

    /// The configuration is missing or inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
