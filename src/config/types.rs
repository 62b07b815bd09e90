//! Configuration types and CLI options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_DNS_SERVERS, DEFAULT_DOMAINS_FILE, DEFAULT_MAX_CONCURRENCY, DEFAULT_OUTPUT_DIR,
    DEFAULT_RATE_LIMIT_QPS, DEFAULT_TLD_CACHE_DIR, DNS_TIMEOUT_SECS,
};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Scan configuration.
///
/// Doubles as the CLI surface (via `clap`) and as a plain configuration
/// struct for programmatic use:
///
/// ```no_run
/// use svcb_status::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("domains.txt"),
///     rate_limit: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Parser, Debug, Clone)]
#[command(
    name = "svcb_status",
    version,
    about = "Checks domains for RFC 9460 SVCB/HTTPS DNS records and reports adoption statistics"
)]
pub struct Config {
    /// File containing domains to check (one per line, `#` starts a comment)
    #[arg(default_value = DEFAULT_DOMAINS_FILE)]
    pub file: PathBuf,

    /// Specific domains to check (overrides the input file)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub domains: Vec<String>,

    /// DNS servers to query
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_DNS_SERVERS.map(String::from))]
    pub dns_servers: Vec<String>,

    /// Query timeout in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum DNS queries per second (0 disables rate limiting)
    #[arg(long, default_value_t = DEFAULT_RATE_LIMIT_QPS)]
    pub rate_limit: u32,

    /// Maximum domains checked concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Directory for generated reports
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Explicit CSV output path (defaults to a timestamped file in the
    /// output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the console summary
    #[arg(long)]
    pub no_summary: bool,

    /// Skip the JSON and Markdown report files (the CSV is always written)
    #[arg(long)]
    pub no_reports: bool,

    /// Skip cross-checking TLDs against the IANA registry
    #[arg(long)]
    pub skip_tld_check: bool,

    /// Directory for the cached IANA TLD list
    #[arg(long, default_value = DEFAULT_TLD_CACHE_DIR)]
    pub tld_cache_dir: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_DOMAINS_FILE),
            domains: Vec::new(),
            dns_servers: DEFAULT_DNS_SERVERS.map(String::from).to_vec(),
            timeout: DNS_TIMEOUT_SECS,
            rate_limit: DEFAULT_RATE_LIMIT_QPS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output: None,
            no_summary: false,
            no_reports: false,
            skip_tld_check: false,
            tld_cache_dir: PathBuf::from(DEFAULT_TLD_CACHE_DIR),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.file, PathBuf::from("domains.txt"));
        assert_eq!(config.dns_servers.len(), 3);
        assert_eq!(config.rate_limit, 10);
        assert!(!config.skip_tld_check);
    }

    #[test]
    fn test_cli_parsing_defaults() {
        let config = Config::parse_from(["svcb_status"]);
        assert_eq!(config.file, PathBuf::from("domains.txt"));
        assert_eq!(config.timeout, 5);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_cli_parsing_overrides() {
        let config = Config::parse_from([
            "svcb_status",
            "my_domains.txt",
            "--domains",
            "example.com,other.org",
            "--dns-servers",
            "9.9.9.9",
            "--rate-limit",
            "25",
            "--no-summary",
        ]);
        assert_eq!(config.file, PathBuf::from("my_domains.txt"));
        assert_eq!(config.domains, vec!["example.com", "other.org"]);
        assert_eq!(config.dns_servers, vec!["9.9.9.9"]);
        assert_eq!(config.rate_limit, 25);
        assert!(config.no_summary);
    }
}
