//! IANA TLD registry with on-disk caching.
//!
//! The registry backs the optional TLD cross-check in the domain validator.
//! It is loaded from a local cache when fresh, refetched from IANA when the
//! cache is stale or missing, and degrades to an empty (permissive) registry
//! when neither source is available: measurement must keep going without a
//! TLD list, so the check fails open.

mod cache;
mod fetch;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};

/// An in-memory set of valid top-level domains.
#[derive(Debug, Clone, Default)]
pub struct TldRegistry {
    tlds: HashSet<String>,
}

impl TldRegistry {
    /// Builds a registry from an iterator of TLD strings. Entries are
    /// lowercased on the way in.
    pub fn from_tlds<I: IntoIterator<Item = String>>(tlds: I) -> Self {
        TldRegistry {
            tlds: tlds.into_iter().map(|t| t.to_ascii_lowercase()).collect(),
        }
    }

    /// An empty registry: degraded mode, every TLD is accepted.
    pub fn empty() -> Self {
        TldRegistry::default()
    }

    /// Number of known TLDs.
    pub fn len(&self) -> usize {
        self.tlds.len()
    }

    /// Whether the registry has no entries (degraded mode).
    pub fn is_empty(&self) -> bool {
        self.tlds.is_empty()
    }

    /// Checks a TLD (without leading dot) against the registry,
    /// case-insensitively. An empty registry accepts anything.
    pub fn is_valid_tld(&self, tld: &str) -> bool {
        if self.tlds.is_empty() {
            return true;
        }
        self.tlds.contains(&tld.to_ascii_lowercase())
    }
}

/// Loader for the IANA TLD registry with an explicit cache lifecycle:
/// construct with a cache location and staleness horizon, then `load` (cache
/// first) or `refresh` (network first).
pub struct TldLoader {
    cache_dir: PathBuf,
    max_age: Duration,
}

impl TldLoader {
    /// Creates a loader caching under `cache_dir`; cache entries older than
    /// `max_age` are considered stale and refetched.
    pub fn new(cache_dir: PathBuf, max_age: Duration) -> Self {
        TldLoader { cache_dir, max_age }
    }

    /// Loads the registry, preferring a fresh disk cache over the network.
    ///
    /// Falls back to an empty (permissive) registry when both the cache and
    /// the fetch fail.
    pub async fn load(&self) -> TldRegistry {
        if let Some(tlds) = cache::load_from_cache(&self.cache_dir, self.max_age) {
            info!("Loaded {} TLDs from cache", tlds.len());
            return TldRegistry { tlds };
        }
        self.refresh().await
    }

    /// Fetches the registry from IANA, updating the disk cache on success.
    ///
    /// Falls back to an empty (permissive) registry on failure.
    pub async fn refresh(&self) -> TldRegistry {
        match fetch::fetch_tld_list().await {
            Ok(tlds) => {
                info!("Fetched {} TLDs from IANA", tlds.len());
                if let Err(e) = cache::save_to_cache(&self.cache_dir, &tlds) {
                    warn!("Failed to save TLD cache: {e:#}");
                }
                TldRegistry { tlds }
            }
            Err(e) => {
                warn!("Failed to fetch TLD list, accepting any TLD: {e:#}");
                TldRegistry::empty()
            }
        }
    }
}
