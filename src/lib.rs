//! svcb_status library: RFC 9460 SVCB/HTTPS record scanning.
//!
//! This library checks domains for SVCB/HTTPS DNS records (RFC 9460),
//! parses the service-parameter payload (ALPN, port, IP hints, ECH),
//! validates the resulting dataset, and produces CSV/JSON/Markdown reports
//! with adoption and compliance statistics.
//!
//! # Example
//!
//! ```no_run
//! use svcb_status::{run_scan, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("domains.txt"),
//!     rate_limit: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!(
//!     "Checked {} domains, {} queries found HTTPS records",
//!     report.total_domains, report.with_https_record
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod app;
pub mod config;
mod domain;
mod error_handling;
pub mod initialization;
pub mod metrics;
mod models;
pub mod parser;
mod query;
pub mod report;
mod tld;
pub mod validate;

// Re-export public API
pub use app::normalize_domain_line;
pub use config::{Config, LogFormat, LogLevel};
pub use domain::{validate_label, DomainValidator};
pub use error_handling::{InitializationError, QueryError};
pub use models::{NormalizedRecord, RecordKind, SUBDOMAIN_ROOT, SUBDOMAIN_WWW};
pub use query::QueryClient;
pub use run::{run_scan, ScanReport};
pub use tld::{TldLoader, TldRegistry};

// Internal run module (contains the main scanning logic)
mod run {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{bail, Context, Result};
    use chrono::Utc;
    use futures::stream::FuturesUnordered;
    use futures::StreamExt;
    use log::{info, warn};
    use tokio_util::sync::CancellationToken;

    use crate::app::{log_progress, normalize_domain_line, read_domains};
    use crate::config::{Config, LOGGING_INTERVAL_SECS, TLD_CACHE_MAX_AGE};
    use crate::domain::DomainValidator;
    use crate::initialization::{init_rate_limiter, init_resolver, init_semaphore};
    use crate::models::NormalizedRecord;
    use crate::query::QueryClient;
    use crate::report::{self, RunMetadata};
    use crate::tld::{TldLoader, TldRegistry};
    use crate::validate::RecordValidator;

    /// Results of a completed scan.
    #[derive(Debug, Clone)]
    pub struct ScanReport {
        /// Number of domains checked.
        pub total_domains: usize,
        /// Number of individual queries represented in the output
        /// (root/www x HTTPS/SVCB per domain).
        pub total_queries: usize,
        /// Queries that found an HTTPS record.
        pub with_https_record: usize,
        /// Queries that recorded an error (NXDOMAIN, no record, timeout, ...).
        pub query_errors: usize,
        /// Elapsed time in seconds.
        pub elapsed_seconds: f64,
        /// Path of the CSV report.
        pub csv_path: PathBuf,
        /// Path of the JSON analysis report, unless reports were disabled.
        pub json_path: Option<PathBuf>,
        /// Path of the Markdown report, unless reports were disabled.
        pub markdown_path: Option<PathBuf>,
    }

    /// Runs a scan with the provided configuration.
    ///
    /// Reads the domain list, queries HTTPS and SVCB records for the root
    /// and `www` labels of every domain (concurrently, rate limited),
    /// validates the dataset, and writes the reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain list cannot be read or is empty, if
    /// the resolver cannot be initialized, or if a report cannot be written.
    /// Individual query failures never fail the scan; they are recorded on
    /// the result rows.
    pub async fn run_scan(config: Config) -> Result<ScanReport> {
        let domains: Vec<String> = if config.domains.is_empty() {
            read_domains(&config.file).await?
        } else {
            config
                .domains
                .iter()
                .filter_map(|d| normalize_domain_line(d))
                .collect()
        };

        if domains.is_empty() {
            bail!("no domains to check");
        }
        info!("Checking {} domains", domains.len());

        let resolver = init_resolver(&config.dns_servers, Duration::from_secs(config.timeout))
            .context("Failed to initialize DNS resolver")?;

        // Burst headroom covers the four queries each in-flight domain fires.
        let rate_burst = std::cmp::min(
            config.max_concurrency.saturating_mul(4),
            config.rate_limit.saturating_mul(2) as usize,
        )
        .max(1);
        let (rate_limiter, rate_limiter_shutdown) =
            match init_rate_limiter(config.rate_limit, rate_burst) {
                Some((limiter, shutdown)) => (Some(limiter), Some(shutdown)),
                None => (None, None),
            };

        let tlds: Option<Arc<TldRegistry>> = if config.skip_tld_check {
            None
        } else {
            let loader = TldLoader::new(config.tld_cache_dir.clone(), TLD_CACHE_MAX_AGE);
            let registry = loader.load().await;
            if registry.is_empty() {
                warn!("No TLD list available, accepting any TLD");
            }
            Some(Arc::new(registry))
        };

        let client = Arc::new(QueryClient::new(
            resolver,
            rate_limiter,
            DomainValidator::new(tlds.clone()),
        ));

        let semaphore = init_semaphore(config.max_concurrency.max(1));
        let start_time = std::time::Instant::now();
        let scan_started = Utc::now();

        let completed_domains = Arc::new(AtomicUsize::new(0));
        let query_errors = Arc::new(AtomicUsize::new(0));
        let total_domains = Arc::new(AtomicUsize::new(domains.len()));

        let cancel = CancellationToken::new();
        let cancel_logging = cancel.child_token();
        let completed_for_logging = Arc::clone(&completed_domains);
        let errors_for_logging = Arc::clone(&query_errors);
        let total_for_logging = Arc::clone(&total_domains);
        let logging_task = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL_SECS));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        log_progress(
                            start_time,
                            &completed_for_logging,
                            &errors_for_logging,
                            Some(&total_for_logging),
                        );
                    }
                    _ = cancel_logging.cancelled() => {
                        break;
                    }
                }
            }
        });

        let mut tasks = FuturesUnordered::new();
        for domain in &domains {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Semaphore closed, skipping domain: {domain}");
                    continue;
                }
            };

            let client = Arc::clone(&client);
            let domain = domain.clone();
            let completed = Arc::clone(&completed_domains);
            let errors = Arc::clone(&query_errors);
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let results = client.check_domain(&domain).await;
                completed.fetch_add(1, Ordering::SeqCst);
                let failed = results.iter().filter(|r| r.query_error.is_some()).count();
                if failed > 0 {
                    errors.fetch_add(failed, Ordering::SeqCst);
                }
                results
            }));
        }

        let mut results: Vec<NormalizedRecord> = Vec::with_capacity(domains.len() * 4);
        while let Some(task_result) = tasks.next().await {
            match task_result {
                Ok(rows) => results.extend(rows),
                Err(join_error) => {
                    warn!("Domain task panicked: {join_error:?}");
                }
            }
        }

        cancel.cancel();
        let _ = logging_task.await;
        if let Some(shutdown) = rate_limiter_shutdown {
            shutdown.cancel();
        }

        log_progress(
            start_time,
            &completed_domains,
            &query_errors,
            Some(&total_domains),
        );

        // Dataset quality check over the serialized rows.
        let rows: Vec<serde_json::Value> = results
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()
            .context("Failed to serialize results for validation")?;
        let validator = RecordValidator::new(DomainValidator::new(tlds));
        let quality = validator.validate_dataset(&rows);
        info!(
            "Dataset quality: {}/{} records valid ({:.2}%)",
            quality.valid_records, quality.total_records, quality.validity_rate
        );

        let metadata = RunMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            scan_started,
            dns_servers: config.dns_servers.join(","),
        };
        let timestamp = report::report_timestamp(scan_started);

        let csv_path = config
            .output
            .clone()
            .unwrap_or_else(|| {
                config
                    .output_dir
                    .join(format!("rfc9460_compliance_{timestamp}.csv"))
            });
        let written = report::write_csv_report(&results, &metadata, &csv_path)
            .context("Failed to write CSV report")?;
        info!("CSV report saved to {} ({written} records)", csv_path.display());

        let (json_path, markdown_path) = if config.no_reports {
            (None, None)
        } else {
            let json_path = config
                .output_dir
                .join(format!("rfc9460_analysis_{timestamp}.json"));
            let analysis = report::build_analysis_report(&results, &metadata, &quality);
            report::write_json_report(&analysis, &json_path)
                .context("Failed to write JSON report")?;
            info!("JSON report saved to {}", json_path.display());

            let markdown_path = config
                .output_dir
                .join(format!("rfc9460_report_{timestamp}.md"));
            let markdown = report::build_markdown_report(&results, &metadata, &quality);
            report::write_markdown_report(&markdown, &markdown_path)
                .context("Failed to write Markdown report")?;
            info!("Markdown report saved to {}", markdown_path.display());

            (Some(json_path), Some(markdown_path))
        };

        if !config.no_summary {
            report::print_summary(&results);
        }

        let with_https_record = results.iter().filter(|r| r.has_https_record).count();
        let query_error_count = results.iter().filter(|r| r.query_error.is_some()).count();

        Ok(ScanReport {
            total_domains: domains.len(),
            total_queries: results.len(),
            with_https_record,
            query_errors: query_error_count,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            csv_path,
            json_path,
            markdown_path,
        })
    }
}
