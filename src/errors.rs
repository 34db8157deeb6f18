/*!
 * Error types for the plotclip application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Propagation policy: failures local to one subtitle line, one window, or one
 * clip stay local (logged, skipped, or degraded); only structural failures
 * (unreadable subtitle input) are fatal for an episode, and never for the batch.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised when parsing SRT-style timecodes
#[derive(Error, Debug)]
pub enum TimecodeError {
    /// The timecode does not match `HH:MM:SS,mmm`
    #[error("Malformed timecode: {0}")]
    Malformed(String),
}

/// Errors that can occur when talking to a scoring provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request exceeded its deadline
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised when cutting a clip with the external encoder
#[derive(Error, Debug)]
pub enum CutError {
    /// ffmpeg could not be spawned
    #[error("Failed to launch ffmpeg: {0}")]
    Spawn(String),

    /// ffmpeg exited with a non-zero status
    #[error("ffmpeg failed: {0}")]
    Encoder(String),

    /// The cut ran past its deadline
    #[error("Cut timed out after {0}s")]
    Timeout(u64),

    /// ffmpeg reported success but the output file is missing or empty
    #[error("Output file missing or empty: {0}")]
    MissingOutput(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a scoring provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from timecode parsing
    #[error("Timecode error: {0}")]
    Timecode(#[from] TimecodeError),

    /// Error from clip cutting
    #[error("Cut error: {0}")]
    Cut(#[from] CutError),

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
