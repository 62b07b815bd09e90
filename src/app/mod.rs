//! Run-loop helpers: domain list input handling and progress logging.

pub mod domains;
pub mod logging;

// Re-export public API
pub use domains::{normalize_domain_line, read_domains};
pub use logging::log_progress;
