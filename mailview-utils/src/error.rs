//! Error types for mailview
//!
//! Provides a unified error type used across all mailview crates.

use std::path::PathBuf;

/// Main error type for mailview operations
#[derive(Debug, thiserror::Error)]
pub enum MailviewError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Connection Errors ===

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("No endpoint at {path}")]
    EndpointMissing { path: PathBuf },

    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    /// Expected terminal state during teardown, never a failure
    #[error("Operation cancelled")]
    Cancelled,

    // === Protocol Errors ===

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Frame encode failed: {0}")]
    Encode(String),

    // === Internal Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MailviewError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this is the clean cancellation outcome of a teardown
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias using MailviewError
pub type Result<T> = std::result::Result<T, MailviewError>;
