//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Top-level error taxonomy mapped to process exit codes.
///
/// Invalid usage gets the reserved status 2; everything else that reaches
/// main is an operational failure and exits 1.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    #[error(transparent)]
    Operational(#[from] anyhow::Error),
}

impl AppError {
    /// Exit status for this error class
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidUsage(_) => 2,
            AppError::Operational(_) => 1,
        }
    }
}

/// Errors that can occur while invoking the packet-dissection tool
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to run dissector: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("dissector exited with {status}: {stderr}")]
    ToolFailed { status: i32, stderr: String },

    #[error("dissector produced non-UTF8 output")]
    BadOutput,
}

/// Errors that can occur in the stream-fetch pipeline stage
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("stream endpoint returned HTTP {0}")]
    BadStatus(u16),

    #[error("failed to read stream body: {0}")]
    ReadFailed(std::io::Error),
}

/// Errors that can occur in the segment-writer pipeline stage
#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("failed to write segment file: {0}")]
    WriteFailed(#[from] std::io::Error),
}

/// Errors that can occur while controlling the wireless-survey daemon
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("failed to launch survey daemon: {0}")]
    LaunchFailed(std::io::Error),

    #[error("failed to query daemon version: {0}")]
    VersionFailed(std::io::Error),
}

/// Errors that can occur reading local configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("credentials file is missing the `{0}` field")]
    MissingField(&'static str),
}
