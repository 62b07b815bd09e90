//! DNS resolver initialization.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::warn;

use crate::error_handling::InitializationError;

/// Initializes the DNS resolver used for SVCB/HTTPS lookups.
///
/// Uses the given nameserver addresses (plain UDP/TCP on port 53), or the
/// default configuration when none are supplied. Timeouts are kept short and
/// retry attempts low so unresponsive servers fail fast instead of stalling
/// the whole batch.
///
/// # Arguments
///
/// * `dns_servers` - Nameserver IP addresses; unparsable entries are skipped
///   with a warning
/// * `timeout` - Per-query timeout
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` when nameservers were
/// supplied but none of them parsed as an IP address.
pub fn init_resolver(
    dns_servers: &[String],
    timeout: Duration,
) -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 2; // fail fast on dead servers
                       // ndots = 0 prevents search-domain appending for bare names
    opts.ndots = 0;

    let config = if dns_servers.is_empty() {
        ResolverConfig::default()
    } else {
        let ips: Vec<IpAddr> = dns_servers
            .iter()
            .filter_map(|server| match server.parse() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    warn!("Ignoring unparsable DNS server address: {server}");
                    None
                }
            })
            .collect();

        if ips.is_empty() {
            return Err(InitializationError::DnsResolverError(
                "no usable DNS server addresses".to_string(),
            ));
        }

        ResolverConfig::from_parts(
            None,
            Vec::new(),
            NameServerConfigGroup::from_ips_clear(&ips, 53, true),
        )
    };

    Ok(Arc::new(TokioAsyncResolver::tokio(config, opts)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_resolver_default_config() {
        let resolver = init_resolver(&[], Duration::from_secs(5));
        assert!(resolver.is_ok());
    }

    #[tokio::test]
    async fn test_init_resolver_custom_servers() {
        let servers = vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()];
        let resolver = init_resolver(&servers, Duration::from_secs(5));
        assert!(resolver.is_ok());
    }

    #[tokio::test]
    async fn test_init_resolver_skips_bad_addresses() {
        let servers = vec!["not-an-ip".to_string(), "8.8.8.8".to_string()];
        assert!(init_resolver(&servers, Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_init_resolver_rejects_all_bad_addresses() {
        let servers = vec!["not-an-ip".to_string(), "also bad".to_string()];
        assert!(init_resolver(&servers, Duration::from_secs(5)).is_err());
    }
}
