//! Fetching the authoritative TLD list from IANA.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::debug;

/// IANA's authoritative TLD list.
const IANA_TLD_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads and parses the IANA TLD list.
pub(crate) async fn fetch_tld_list() -> Result<HashSet<String>> {
    debug!("Fetching TLD list from {IANA_TLD_URL}");

    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let response = client.get(IANA_TLD_URL).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("IANA TLD list request returned HTTP {}", response.status()));
    }

    let body = response.text().await?;
    let tlds = parse_tld_list(&body);
    if tlds.is_empty() {
        return Err(anyhow!("IANA TLD list response contained no entries"));
    }

    Ok(tlds)
}

/// Parses the IANA list format: one TLD per line, `#` comment lines skipped,
/// entries lowercased.
pub(crate) fn parse_tld_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_ascii_lowercase)
        .collect()
}
