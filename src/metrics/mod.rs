//! Compliance metric aggregation over scan results.
//!
//! Pure functions over the in-memory result set; nothing here performs I/O.
//! Adoption and feature metrics are computed over HTTPS-type rows only, so
//! SVCB sibling rows never dilute the denominators. Query-error statistics
//! cover every row, since errors are interesting for both record types.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::models::{NormalizedRecord, RecordKind, SUBDOMAIN_ROOT, SUBDOMAIN_WWW};

/// HTTPS-record adoption percentages, overall and per subdomain label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdoptionMetrics {
    /// Share of all queried names carrying an HTTPS record.
    pub overall_adoption: f64,
    /// Adoption among root-label queries.
    pub root_adoption: f64,
    /// Adoption among `www`-label queries.
    pub www_adoption: f64,
}

/// Count and percentage of a single feature among record-bearing rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStat {
    /// Number of rows with the feature.
    pub count: usize,
    /// Share of record-bearing rows, rounded to two decimals.
    pub percentage: f64,
}

/// Distribution of RFC 9460 features over rows that have an HTTPS record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDistribution {
    /// Exact-match `h3` ALPN support.
    pub http3_support: FeatureStat,
    /// ECH configuration deployment.
    pub ech_deployment: FeatureStat,
    /// Alternative port advertisement.
    pub custom_port: FeatureStat,
    /// IPv4 address hints.
    pub ipv4_hints: FeatureStat,
    /// IPv6 address hints.
    pub ipv6_hints: FeatureStat,
}

/// Full compliance metric set for one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceMetrics {
    /// Adoption percentages.
    pub adoption: AdoptionMetrics,
    /// Feature distribution among record-bearing rows.
    pub features: FeatureDistribution,
    /// Mean per-row compliance score, 0-100.
    pub average_compliance_score: f64,
    /// Number of HTTPS-type rows examined.
    pub total_domains_checked: usize,
    /// Number of distinct base domains among them.
    pub unique_domains: usize,
}

/// Rounds to two decimal places; shared by every percentage in reports.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn https_rows(records: &[NormalizedRecord]) -> Vec<&NormalizedRecord> {
    records
        .iter()
        .filter(|r| r.record_kind == RecordKind::Https)
        .collect()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(count as f64 / total as f64 * 100.0)
    }
}

/// Computes HTTPS adoption rates overall and per subdomain label.
pub fn calculate_adoption_rate(records: &[NormalizedRecord]) -> AdoptionMetrics {
    let rows = https_rows(records);

    let adoption_for = |label: Option<&str>| {
        let subset: Vec<&&NormalizedRecord> = rows
            .iter()
            .filter(|r| label.map_or(true, |l| r.subdomain == l))
            .collect();
        let with_record = subset.iter().filter(|r| r.has_https_record).count();
        percentage(with_record, subset.len())
    };

    AdoptionMetrics {
        overall_adoption: adoption_for(None),
        root_adoption: adoption_for(Some(SUBDOMAIN_ROOT)),
        www_adoption: adoption_for(Some(SUBDOMAIN_WWW)),
    }
}

/// Computes the feature distribution among rows with an HTTPS record.
pub fn calculate_feature_distribution(records: &[NormalizedRecord]) -> FeatureDistribution {
    let rows: Vec<&NormalizedRecord> = https_rows(records)
        .into_iter()
        .filter(|r| r.has_https_record)
        .collect();
    let total = rows.len();

    let stat = |count: usize| FeatureStat {
        count,
        percentage: percentage(count, total),
    };

    FeatureDistribution {
        http3_support: stat(rows.iter().filter(|r| r.has_http3).count()),
        ech_deployment: stat(rows.iter().filter(|r| r.ech_config).count()),
        custom_port: stat(rows.iter().filter(|r| r.port.is_some()).count()),
        ipv4_hints: stat(rows.iter().filter(|r| r.ipv4hint.is_some()).count()),
        ipv6_hints: stat(rows.iter().filter(|r| r.ipv6hint.is_some()).count()),
    }
}

/// Scores one row: 40 for carrying an HTTPS record, plus 20 for HTTP/3,
/// 15 for ECH, 15 for any IP hint, 10 for an ALPN list.
pub fn compliance_score(record: &NormalizedRecord) -> u32 {
    if !record.has_https_record {
        return 0;
    }
    let mut score = 40;
    if record.has_http3 {
        score += 20;
    }
    if record.ech_config {
        score += 15;
    }
    if record.ipv4hint.is_some() || record.ipv6hint.is_some() {
        score += 15;
    }
    if record.alpn_protocols.is_some() {
        score += 10;
    }
    score
}

/// Computes the full compliance metric set.
pub fn calculate_compliance_metrics(records: &[NormalizedRecord]) -> ComplianceMetrics {
    let rows = https_rows(records);

    let average = if rows.is_empty() {
        0.0
    } else {
        let total: u32 = rows.iter().map(|r| compliance_score(r)).sum();
        round2(f64::from(total) / rows.len() as f64)
    };

    let unique_domains: BTreeSet<&str> = rows.iter().map(|r| r.domain.as_str()).collect();

    ComplianceMetrics {
        adoption: calculate_adoption_rate(records),
        features: calculate_feature_distribution(records),
        average_compliance_score: average,
        total_domains_checked: rows.len(),
        unique_domains: unique_domains.len(),
    }
}

/// Counts ALPN tokens across all rows, most common first. Ties break on
/// token name so the ordering is deterministic.
pub fn analyze_alpn_protocols(records: &[NormalizedRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let Some(protocols) = &record.alpn_protocols else {
            continue;
        };
        for token in protocols.split(',') {
            let token = token.trim();
            if !token.is_empty() {
                *counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Counts selected-record priorities among record-bearing HTTPS rows.
pub fn calculate_priority_distribution(records: &[NormalizedRecord]) -> BTreeMap<u16, usize> {
    let mut counts = BTreeMap::new();
    for record in https_rows(records) {
        if !record.has_https_record {
            continue;
        }
        if let Some(priority) = record.https_priority {
            *counts.entry(priority).or_insert(0) += 1;
        }
    }
    counts
}

/// Ranks base domains by their mean compliance score across all of their
/// HTTPS rows, best first. Ties break on domain name.
pub fn identify_top_performers(
    records: &[NormalizedRecord],
    top_n: usize,
) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, (u32, usize)> = BTreeMap::new();
    for record in https_rows(records) {
        let entry = totals.entry(record.domain.as_str()).or_insert((0, 0));
        entry.0 += compliance_score(record);
        entry.1 += 1;
    }

    let mut scores: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(domain, (score, count))| (domain.to_string(), f64::from(score) / count as f64))
        .collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    scores.truncate(top_n);
    scores
}

/// Counts query errors by error string, across every row.
pub fn calculate_error_statistics(records: &[NormalizedRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(error) = &record.query_error {
            *counts.entry(error.clone()).or_insert(0) += 1;
        }
    }
    counts
}
