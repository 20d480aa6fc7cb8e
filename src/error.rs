//! Error types for athenaq.
//!
//! Every error is fatal: the binary prints it and exits non-zero.

use thiserror::Error;

/// Main error type for athenaq operations.
#[derive(Error, Debug)]
pub enum AthenaqError {
    /// Missing or invalid input (empty query, no output location, bad config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport or API failure from a submit, status, fetch or stop call.
    #[error("Service error: {0}")]
    Service(String),

    /// The query reached a terminal state other than SUCCEEDED.
    #[error("Query execution error: {0}")]
    QueryExecution(String),

    /// Polling gave up after the configured timeout.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Polling was interrupted by the caller.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Writing results failed.
    #[error("Output error: {0}")]
    Output(String),

    /// Failures of the tool itself rather than of the user's input or the service.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AthenaqError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a service error with the given message.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Creates a query execution error with the given diagnostic payload.
    pub fn query_execution(msg: impl Into<String>) -> Self {
        Self::QueryExecution(msg.into())
    }

    /// Creates a timeout error with the given message.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a cancellation error with the given message.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Creates an output error with the given message.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Service(_) => "Service Error",
            Self::QueryExecution(_) => "Query Execution Error",
            Self::Timeout(_) => "Timeout",
            Self::Cancelled(_) => "Cancelled",
            Self::Output(_) => "Output Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<std::io::Error> for AthenaqError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

/// Result type alias using AthenaqError.
pub type Result<T> = std::result::Result<T, AthenaqError>;
