//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a
//! scan run:
//! - Logger (plain or JSON format)
//! - DNS resolver
//! - Query rate limiter
//! - Concurrency semaphore
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod rate_limiter;
mod resolver;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use logger::init_logger_with;
pub use rate_limiter::{init_rate_limiter, RateLimiter};
pub use resolver::init_resolver;

/// Initializes a semaphore for controlling concurrency.
///
/// The semaphore bounds how many domains are being checked at once; each
/// in-flight domain holds one permit.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
