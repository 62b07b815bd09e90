//! Markdown summary report.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use super::RunMetadata;
use crate::metrics::{calculate_compliance_metrics, identify_top_performers};
use crate::models::NormalizedRecord;
use crate::validate::DatasetQualityReport;

const TOP_PERFORMER_COUNT: usize = 10;

/// Renders the Markdown compliance report.
pub fn build_markdown_report(
    records: &[NormalizedRecord],
    metadata: &RunMetadata,
    quality: &DatasetQualityReport,
) -> String {
    let metrics = calculate_compliance_metrics(records);
    let top_performers = identify_top_performers(records, TOP_PERFORMER_COUNT);

    let mut out = String::new();

    let _ = writeln!(out, "# RFC 9460 Compliance Report\n");
    let _ = writeln!(
        out,
        "Generated: {}\n",
        metadata.scan_started.format("%Y-%m-%d %H:%M:%S")
    );

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "- **Total Queries Checked**: {}", metrics.total_domains_checked);
    let _ = writeln!(out, "- **Unique Domains**: {}", metrics.unique_domains);
    let _ = writeln!(
        out,
        "- **Overall Adoption Rate**: {}%",
        metrics.adoption.overall_adoption
    );
    let _ = writeln!(
        out,
        "- **Average Compliance Score**: {}/100",
        metrics.average_compliance_score
    );
    let _ = writeln!(
        out,
        "- **Dataset Validity**: {}% ({}/{} records valid)\n",
        quality.validity_rate, quality.valid_records, quality.total_records
    );

    let _ = writeln!(out, "## Adoption Metrics\n");
    let _ = writeln!(out, "| Metric | Percentage |");
    let _ = writeln!(out, "|--------|------------|");
    let _ = writeln!(out, "| Overall HTTPS Records | {}% |", metrics.adoption.overall_adoption);
    let _ = writeln!(out, "| Root Domain Adoption | {}% |", metrics.adoption.root_adoption);
    let _ = writeln!(out, "| WWW Subdomain Adoption | {}% |\n", metrics.adoption.www_adoption);

    let _ = writeln!(out, "## Feature Distribution\n");
    let _ = writeln!(out, "| Feature | Count | Percentage |");
    let _ = writeln!(out, "|---------|-------|------------|");
    let features = [
        ("HTTP/3 Support", &metrics.features.http3_support),
        ("ECH Configuration", &metrics.features.ech_deployment),
        ("Custom Port", &metrics.features.custom_port),
        ("IPv4 Hints", &metrics.features.ipv4_hints),
        ("IPv6 Hints", &metrics.features.ipv6_hints),
    ];
    for (name, stat) in features {
        let _ = writeln!(out, "| {} | {} | {}% |", name, stat.count, stat.percentage);
    }
    out.push('\n');

    let _ = writeln!(out, "## Top Performers\n");
    let _ = writeln!(out, "| Rank | Domain | Compliance Score |");
    let _ = writeln!(out, "|------|--------|------------------|");
    for (rank, (domain, score)) in top_performers.iter().enumerate() {
        let _ = writeln!(out, "| {} | {} | {:.1}/100 |", rank + 1, domain, score);
    }

    let _ = writeln!(out, "\n---\n*Report generated by svcb_status v{}*", metadata.version);

    out
}

/// Writes the Markdown report to disk.
pub fn write_markdown_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordKind, SUBDOMAIN_ROOT};
    use chrono::Utc;

    #[test]
    fn test_markdown_contains_sections() {
        let mut record =
            NormalizedRecord::empty("example.com", SUBDOMAIN_ROOT, "example.com", RecordKind::Https);
        record.has_https_record = true;
        record.https_priority = Some(1);
        record.https_target = Some("example.com.".to_string());

        let metadata = RunMetadata {
            version: "0.1.0".to_string(),
            scan_started: Utc::now(),
            dns_servers: "8.8.8.8".to_string(),
        };
        let quality = crate::validate::RecordValidator::new(
            crate::domain::DomainValidator::permissive(),
        )
        .validate_dataset(&[serde_json::to_value(&record).unwrap()]);

        let content = build_markdown_report(&[record], &metadata, &quality);

        assert!(content.starts_with("# RFC 9460 Compliance Report"));
        assert!(content.contains("## Adoption Metrics"));
        assert!(content.contains("## Feature Distribution"));
        assert!(content.contains("| 1 | example.com | 40.0/100 |"));
    }
}
