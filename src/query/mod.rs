//! DNS query client for SVCB/HTTPS record lookups.
//!
//! The client owns the run-scoped pieces of a scan: the resolver handle, the
//! query rate limiter, the domain validator guarding the query boundary, and
//! a per-run result cache. Lookup failures never escape as errors; they are
//! recorded on the result row (`query_error`). The only error this module
//! raises is the query-construction rejection of an invalid domain, which
//! saves the network round trip.

mod convert;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use log::{debug, info, warn};

use crate::domain::DomainValidator;
use crate::error_handling::QueryError;
use crate::initialization::RateLimiter;
use crate::models::{NormalizedRecord, RecordKind, SUBDOMAIN_ROOT, SUBDOMAIN_WWW};
use crate::parser::{parse_https_answers, parse_svcb_answers};

use convert::QueryFailure;

/// Client issuing SVCB/HTTPS queries and normalizing the answers.
///
/// Results are cached for the lifetime of the client, keyed by
/// `full_domain:RECORD_TYPE`; invalidation is manual via
/// [`QueryClient::clear_cache`].
pub struct QueryClient {
    resolver: Arc<TokioAsyncResolver>,
    limiter: Option<Arc<RateLimiter>>,
    validator: DomainValidator,
    cache: RwLock<HashMap<String, NormalizedRecord>>,
}

impl QueryClient {
    /// Creates a client over the given resolver. `limiter`, when present,
    /// bounds the query rate; `validator` guards the query boundary.
    pub fn new(
        resolver: Arc<TokioAsyncResolver>,
        limiter: Option<Arc<RateLimiter>>,
        validator: DomainValidator,
    ) -> Self {
        QueryClient {
            resolver,
            limiter,
            validator,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Queries the HTTPS record for a domain, optionally under a subdomain
    /// label.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidDomain`] when the full name fails
    /// validation; no query is sent in that case. Lookup failures are data
    /// on the returned row, not errors.
    pub async fn query_https_record(
        &self,
        domain: &str,
        subdomain: Option<&str>,
    ) -> Result<NormalizedRecord, QueryError> {
        let full_domain = full_name(domain, subdomain);
        if !self.validator.validate(&full_domain, true) {
            return Err(QueryError::InvalidDomain(full_domain));
        }

        let cache_key = format!("{full_domain}:{}", RecordKind::Https);
        if let Some(hit) = self.cache_get(&cache_key) {
            debug!("Cache hit for {cache_key}");
            return Ok(hit);
        }

        let mut record = NormalizedRecord::empty(
            domain,
            subdomain_label(subdomain),
            &full_domain,
            RecordKind::Https,
        );

        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        debug!("Querying HTTPS record for {full_domain}");
        match self.resolver.lookup(full_domain.as_str(), RecordType::HTTPS).await {
            Ok(lookup) => {
                let answers = convert::https_answers(&lookup);
                if answers.is_empty() {
                    // Answer section had no HTTPS data (e.g. only the CNAME chain).
                    info!("No HTTPS record for {full_domain}");
                    record.query_error =
                        Some(QueryFailure::NoRecords.into_error_string(RecordKind::Https));
                } else {
                    let fragment = parse_https_answers(&answers);
                    record.has_https_record = true;
                    record.https_priority = fragment.priority;
                    record.https_target = fragment.target;
                    record.alpn_protocols = fragment.alpn_protocols;
                    record.has_http3 = fragment.has_http3;
                    record.port = fragment.port;
                    record.ipv4hint = fragment.ipv4hint;
                    record.ipv6hint = fragment.ipv6hint;
                    record.ech_config = fragment.ech_config;
                }
            }
            Err(e) => {
                let failure = convert::classify_resolve_error(&e);
                log_query_failure(&failure, &full_domain, RecordKind::Https);
                record.query_error = Some(failure.into_error_string(RecordKind::Https));
            }
        }

        self.cache_put(cache_key, record.clone());
        Ok(record)
    }

    /// Queries the SVCB record for a domain, optionally under a subdomain
    /// label. Same contract as [`QueryClient::query_https_record`].
    pub async fn query_svcb_record(
        &self,
        domain: &str,
        subdomain: Option<&str>,
    ) -> Result<NormalizedRecord, QueryError> {
        let full_domain = full_name(domain, subdomain);
        if !self.validator.validate(&full_domain, true) {
            return Err(QueryError::InvalidDomain(full_domain));
        }

        let cache_key = format!("{full_domain}:{}", RecordKind::Svcb);
        if let Some(hit) = self.cache_get(&cache_key) {
            debug!("Cache hit for {cache_key}");
            return Ok(hit);
        }

        let mut record = NormalizedRecord::empty(
            domain,
            subdomain_label(subdomain),
            &full_domain,
            RecordKind::Svcb,
        );

        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        debug!("Querying SVCB record for {full_domain}");
        match self.resolver.lookup(full_domain.as_str(), RecordType::SVCB).await {
            Ok(lookup) => {
                let answers = convert::svcb_answers(&lookup);
                let fragment = parse_svcb_answers(&answers);
                if let Some(priority) = fragment.priority {
                    record.has_svcb_record = true;
                    record.svcb_priority = Some(priority);
                    record.svcb_target = fragment.target;
                    info!("Found SVCB record for {full_domain}");
                } else {
                    info!("No SVCB record for {full_domain}");
                    record.query_error =
                        Some(QueryFailure::NoRecords.into_error_string(RecordKind::Svcb));
                }
            }
            Err(e) => {
                let failure = convert::classify_resolve_error(&e);
                log_query_failure(&failure, &full_domain, RecordKind::Svcb);
                record.query_error = Some(failure.into_error_string(RecordKind::Svcb));
            }
        }

        self.cache_put(cache_key, record.clone());
        Ok(record)
    }

    /// Checks a domain completely: root and `www` labels, HTTPS and SVCB
    /// record types, all four queries issued concurrently.
    ///
    /// Never fails: a rejected or failed query becomes an error row so that
    /// every attempted query is represented in the output.
    pub async fn check_domain(&self, domain: &str) -> Vec<NormalizedRecord> {
        let (root_https, www_https, root_svcb, www_svcb) = tokio::join!(
            self.query_https_record(domain, None),
            self.query_https_record(domain, Some(SUBDOMAIN_WWW)),
            self.query_svcb_record(domain, None),
            self.query_svcb_record(domain, Some(SUBDOMAIN_WWW)),
        );

        let outcomes = [
            (root_https, SUBDOMAIN_ROOT, RecordKind::Https),
            (www_https, SUBDOMAIN_WWW, RecordKind::Https),
            (root_svcb, SUBDOMAIN_ROOT, RecordKind::Svcb),
            (www_svcb, SUBDOMAIN_WWW, RecordKind::Svcb),
        ];

        outcomes
            .into_iter()
            .map(|(outcome, label, kind)| match outcome {
                Ok(record) => record,
                Err(e) => {
                    warn!("Query for {domain} rejected: {e}");
                    let full_domain = if label == SUBDOMAIN_WWW {
                        format!("www.{domain}")
                    } else {
                        domain.to_string()
                    };
                    NormalizedRecord::error_row(domain, label, &full_domain, kind, e.to_string())
                }
            })
            .collect()
    }

    /// Clears the per-run query cache.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.clear();
        info!("DNS query cache cleared");
    }

    /// Number of cached query results.
    pub fn cached_queries(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cache_get(&self, key: &str) -> Option<NormalizedRecord> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn cache_put(&self, key: String, record: NormalizedRecord) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, record);
    }
}

fn full_name(domain: &str, subdomain: Option<&str>) -> String {
    match subdomain {
        Some(sub) if !sub.is_empty() => format!("{sub}.{domain}"),
        _ => domain.to_string(),
    }
}

fn subdomain_label(subdomain: Option<&str>) -> &str {
    match subdomain {
        Some(sub) if !sub.is_empty() => sub,
        _ => SUBDOMAIN_ROOT,
    }
}

fn log_query_failure(failure: &QueryFailure, full_domain: &str, kind: RecordKind) {
    match failure {
        QueryFailure::NxDomain => info!("NXDOMAIN for {full_domain}"),
        QueryFailure::NoRecords => info!("No {} record for {full_domain}", kind.as_str()),
        QueryFailure::Timeout => warn!("Timeout querying {full_domain}"),
        QueryFailure::Other(message) => {
            log::error!("Error querying {} for {full_domain}: {message}", kind.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialization::init_resolver;
    use std::time::Duration;

    fn client() -> QueryClient {
        let resolver = init_resolver(&[], Duration::from_secs(1)).unwrap();
        QueryClient::new(resolver, None, DomainValidator::permissive())
    }

    #[test]
    fn test_full_name_joins_subdomain() {
        assert_eq!(full_name("example.com", None), "example.com");
        assert_eq!(full_name("example.com", Some("www")), "www.example.com");
        assert_eq!(full_name("example.com", Some("")), "example.com");
    }

    #[test]
    fn test_subdomain_label_defaults_to_root() {
        assert_eq!(subdomain_label(None), "root");
        assert_eq!(subdomain_label(Some("")), "root");
        assert_eq!(subdomain_label(Some("www")), "www");
    }

    #[tokio::test]
    async fn test_invalid_domain_rejected_before_query() {
        let client = client();
        let result = client.query_https_record("not a domain", None).await;
        assert_eq!(
            result,
            Err(QueryError::InvalidDomain("not a domain".to_string()))
        );
        // Nothing was cached for the rejected query.
        assert_eq!(client.cached_queries(), 0);
    }

    #[tokio::test]
    async fn test_cache_round_trip_and_clear() {
        let client = client();
        let record = NormalizedRecord::empty("example.com", "root", "example.com", RecordKind::Https);
        client.cache_put("example.com:HTTPS".to_string(), record.clone());

        assert_eq!(client.cached_queries(), 1);
        assert_eq!(client.cache_get("example.com:HTTPS"), Some(record));
        assert_eq!(client.cache_get("example.com:SVCB"), None);

        client.clear_cache();
        assert_eq!(client.cached_queries(), 0);
    }
}
