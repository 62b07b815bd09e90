//! Configuration constants.

use std::time::Duration;

/// Default DNS servers queried when none are configured
/// (Google, Cloudflare, OpenDNS).
pub const DEFAULT_DNS_SERVERS: [&str; 3] = ["8.8.8.8", "1.1.1.1", "208.67.222.222"];

/// Per-query DNS timeout in seconds.
/// Most queries complete well under a second; 5s gives slow resolvers a
/// chance while still failing fast enough for large batches.
pub const DNS_TIMEOUT_SECS: u64 = 5;

/// Default maximum DNS queries per second across the whole run.
pub const DEFAULT_RATE_LIMIT_QPS: u32 = 10;

/// Default number of domains checked concurrently. Each in-flight domain
/// issues four queries (root/www x HTTPS/SVCB).
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Seconds between progress log lines.
pub const LOGGING_INTERVAL_SECS: u64 = 5;

/// Default directory for generated reports.
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Default domains input file.
pub const DEFAULT_DOMAINS_FILE: &str = "domains.txt";

/// Default directory for the cached IANA TLD list.
pub const DEFAULT_TLD_CACHE_DIR: &str = ".tld_cache";

/// TLD list staleness horizon: the cached list is refetched after 7 days.
pub const TLD_CACHE_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);
