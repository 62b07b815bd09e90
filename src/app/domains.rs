//! Domain list input handling.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Normalizes one input line into a queryable domain.
///
/// Blank lines and `#` comments yield `None`. A scheme prefix and anything
/// after the host are tolerated and stripped, one trailing dot is removed,
/// and the result is lowercased. No validity check happens here; the query
/// layer rejects names that fail domain validation.
pub fn normalize_domain_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let host = host.split('/').next().unwrap_or(host);
    let host = host.strip_suffix('.').unwrap_or(host);

    if host.is_empty() {
        return None;
    }

    Some(host.to_ascii_lowercase())
}

/// Reads the domain list from a file: one domain per line, comments and
/// blank lines skipped, duplicates dropped while preserving input order.
pub async fn read_domains(path: &Path) -> Result<Vec<String>> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open domains file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let mut domains = Vec::new();
    let mut seen = HashSet::new();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                break;
            }
        };

        let Some(domain) = normalize_domain_line(&line) else {
            continue;
        };
        if seen.insert(domain.clone()) {
            domains.push(domain);
        } else {
            debug!("Skipping duplicate domain: {domain}");
        }
    }

    Ok(domains)
}
