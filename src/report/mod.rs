//! Report generation.
//!
//! This module turns the in-memory result set into the run's outputs: a CSV
//! of every query result, a JSON analysis report with metrics and the
//! dataset quality section, a Markdown summary for documentation, and a
//! console summary table.

mod csv;
mod json;
mod markdown;
mod summary;

pub use self::csv::{write_csv_report, CSV_HEADER};
pub use self::json::{build_analysis_report, write_json_report};
pub use self::markdown::{build_markdown_report, write_markdown_report};
pub use self::summary::print_summary;

use chrono::{DateTime, Utc};

/// Run-level metadata stamped onto every report.
#[derive(Debug, Clone)]
pub struct RunMetadata {
    /// Tool version (from the crate version at build time).
    pub version: String,
    /// When the scan started.
    pub scan_started: DateTime<Utc>,
    /// Comma-joined DNS server list used for the scan.
    pub dns_servers: String,
}

/// Timestamp fragment used in report file names
/// (e.g. `rfc9460_compliance_2026-08-07_14-30-00.csv`).
pub fn report_timestamp(when: DateTime<Utc>) -> String {
    when.format("%Y-%m-%d_%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_timestamp_format() {
        let when = Utc.with_ymd_and_hms(2026, 8, 7, 14, 30, 0).unwrap();
        assert_eq!(report_timestamp(when), "2026-08-07_14-30-00");
    }
}
