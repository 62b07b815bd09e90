//! Error type definitions.
//!
//! The parser and validators never raise: malformed values degrade to
//! null/empty fields and validation findings are data. The error types here
//! cover the two places that do fail: resource initialization, and the
//! query-construction boundary where an obviously malformed domain is
//! rejected before spending a network round trip.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Error raised when a query cannot be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The name fails domain validation and will not be sent to a resolver.
    #[error("invalid domain for query: {0}")]
    InvalidDomain(String),
}
