//! On-disk cache for the IANA TLD list.

use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use log::debug;

const CACHE_FILE_NAME: &str = "tlds.txt";

/// Loads the cached TLD set if the cache file exists, is fresher than
/// `max_age`, and is non-empty.
pub(crate) fn load_from_cache(cache_dir: &Path, max_age: Duration) -> Option<HashSet<String>> {
    let cache_file = cache_dir.join(CACHE_FILE_NAME);

    let modified = std::fs::metadata(&cache_file).ok()?.modified().ok()?;
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or_default();
    if age > max_age {
        debug!("TLD cache is stale ({}s old), will refresh", age.as_secs());
        return None;
    }

    let content = std::fs::read_to_string(&cache_file).ok()?;
    let tlds: HashSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    if tlds.is_empty() {
        None
    } else {
        Some(tlds)
    }
}

/// Writes the TLD set to the cache file, one lowercase entry per line.
pub(crate) fn save_to_cache(cache_dir: &Path, tlds: &HashSet<String>) -> Result<()> {
    std::fs::create_dir_all(cache_dir).context("Failed to create TLD cache directory")?;

    let mut sorted: Vec<&String> = tlds.iter().collect();
    sorted.sort();

    let mut content = String::with_capacity(tlds.len() * 8);
    for tld in sorted {
        content.push_str(tld);
        content.push('\n');
    }

    let cache_file = cache_dir.join(CACHE_FILE_NAME);
    std::fs::write(&cache_file, content).context("Failed to write TLD cache file")?;
    debug!("Saved TLD cache to {}", cache_file.display());

    Ok(())
}
