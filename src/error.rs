//! Error handling for netstats-rs
//!
//! The derivation path (columns, materialization, sorting) never fails. Errors
//! only come from the edges: configuration, telemetry feeds, column lookups
//! and the channels between the worker and its clients.

use thiserror::Error;

/// Main error type for netstats-rs operations
#[derive(Error, Debug)]
pub enum NetStatsError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// A telemetry feed produced data that could not be read
    #[error("Feed error: {0}")]
    Feed(String),

    /// A column name that is not in the registry
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NetStatsError>,
    },
}

impl NetStatsError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        NetStatsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for NetStatsError {
    fn from(err: serde_json::Error) -> Self {
        NetStatsError::Serialization(err.to_string())
    }
}

/// Result type alias for netstats-rs operations
pub type Result<T> = std::result::Result<T, NetStatsError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| NetStatsError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| NetStatsError::Io(e).with_context(f()))
    }
}
