/*!
 * Error types for the srv3conv application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading a subtitle document
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The ASS/SSA script has no `[Events]` section
    #[error("No [Events] section found in script")]
    MissingEventsSection,

    /// An event line could not be split into the fields named by the format line
    #[error("Malformed event at line {line}: {reason}")]
    MalformedEvent {
        /// 1-based line number in the source file
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A timestamp did not match the expected layout
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The input contained no usable subtitle entries
    #[error("No subtitle entries found: {0}")]
    Empty(String),
}

/// Errors that can occur while exporting a document
#[derive(Error, Debug)]
pub enum ExportError {
    /// No registered format writes files with this extension
    #[error("No subtitle format can write '{0}'")]
    UnsupportedFormat(String),

    /// Writing the destination failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from reading subtitles
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from exporting
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

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
