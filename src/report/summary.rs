//! Console summary table.

use colored::Colorize;

use crate::metrics::identify_top_performers;
use crate::models::{NormalizedRecord, RecordKind, SUBDOMAIN_ROOT, SUBDOMAIN_WWW};

const HTTP3_LIST_LIMIT: usize = 5;

/// Prints the run summary table to stdout: per-label totals, record and
/// feature counts, top performers, and the HTTP/3 domain list.
pub fn print_summary(records: &[NormalizedRecord]) {
    let root: Vec<&NormalizedRecord> = label_rows(records, SUBDOMAIN_ROOT);
    let www: Vec<&NormalizedRecord> = label_rows(records, SUBDOMAIN_WWW);

    if root.is_empty() && www.is_empty() {
        println!("{}", "No results to display".yellow());
        return;
    }

    println!();
    println!("{}", "RFC 9460 Compliance Summary".cyan().bold());
    print_row("Metric", "Root", "WWW");
    print_row("------", "----", "---");
    print_row(
        "Total Checked",
        &root.len().to_string(),
        &www.len().to_string(),
    );
    print_row(
        "Has HTTPS Record",
        &count_with_pct(&root, |r| r.has_https_record),
        &count_with_pct(&www, |r| r.has_https_record),
    );
    print_row(
        "Supports HTTP/3",
        &count_with_pct(&root, |r| r.has_http3),
        &count_with_pct(&www, |r| r.has_http3),
    );
    print_row(
        "Has ECH Config",
        &count_with_pct(&root, |r| r.ech_config),
        &count_with_pct(&www, |r| r.ech_config),
    );
    print_row(
        "Custom Port",
        &count_of(&root, |r| r.port.is_some()),
        &count_of(&www, |r| r.port.is_some()),
    );
    print_row(
        "IPv4 Hints",
        &count_of(&root, |r| r.ipv4hint.is_some()),
        &count_of(&www, |r| r.ipv4hint.is_some()),
    );
    print_row(
        "IPv6 Hints",
        &count_of(&root, |r| r.ipv6hint.is_some()),
        &count_of(&www, |r| r.ipv6hint.is_some()),
    );

    let top_performers = identify_top_performers(records, 5);
    if !top_performers.is_empty() {
        println!();
        println!("{}", "Top 5 RFC 9460 Compliant Domains:".cyan().bold());
        for (rank, (domain, score)) in top_performers.iter().enumerate() {
            println!("  {}. {}: {:.1}/100", rank + 1, domain, score);
        }
    }

    let http3_domains: Vec<&str> = root
        .iter()
        .filter(|r| r.has_http3)
        .map(|r| r.domain.as_str())
        .collect();
    if !http3_domains.is_empty() {
        println!();
        println!("{}", "Domains with HTTP/3 support:".green().bold());
        for domain in http3_domains.iter().take(HTTP3_LIST_LIMIT) {
            println!("  • {domain}");
        }
        if http3_domains.len() > HTTP3_LIST_LIMIT {
            println!("  ... and {} more", http3_domains.len() - HTTP3_LIST_LIMIT);
        }
    }
}

fn label_rows<'a>(records: &'a [NormalizedRecord], label: &str) -> Vec<&'a NormalizedRecord> {
    records
        .iter()
        .filter(|r| r.record_kind == RecordKind::Https && r.subdomain == label)
        .collect()
}

fn print_row(metric: &str, root: &str, www: &str) {
    println!("{metric:<22} {root:>16} {www:>16}");
}

fn count_with_pct(rows: &[&NormalizedRecord], pred: impl Fn(&NormalizedRecord) -> bool) -> String {
    let count = rows.iter().filter(|r| pred(r)).count();
    if rows.is_empty() {
        "N/A".to_string()
    } else {
        format!("{} ({:.1}%)", count, count as f64 / rows.len() as f64 * 100.0)
    }
}

fn count_of(rows: &[&NormalizedRecord], pred: impl Fn(&NormalizedRecord) -> bool) -> String {
    rows.iter().filter(|r| pred(r)).count().to_string()
}
