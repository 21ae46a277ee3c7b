pub mod recommendations;

use std::collections::BTreeMap;

use crate::models::api_key::{ApiKey, KeyStatus};
use crate::models::ip_address::{IpAddress, RiskLevel};
use crate::models::report::{
    ActivityEntry, ActivityKind, ApiKeyTotals, IpAddressTotals, SecurityReport,
};

/// How many records from each collection feed the activity list, and the
/// length cap of the combined list.
const ACTIVITY_PER_SOURCE: usize = 3;
const ACTIVITY_LIMIT: usize = 5;

/// Penalty weights for the security score. A linear heuristic, not a risk
/// model: every high or critical address costs 5 points, every expired key
/// costs 3, floored at 0.
const THREAT_PENALTY: i64 = 5;
const EXPIRED_KEY_PENALTY: i64 = 3;

/// Build the dashboard report from the two fetched collections. Pure and
/// total: empty inputs yield a zeroed report with a single all-clear
/// recommendation, and records with unrecognized enum labels count under
/// their literal label instead of being dropped.
pub fn compute_report(api_keys: &[ApiKey], ip_addresses: &[IpAddress]) -> SecurityReport {
    let mut keys_by_environment: BTreeMap<String, usize> = BTreeMap::new();
    for key in api_keys {
        *keys_by_environment
            .entry(key.environment.as_str().to_string())
            .or_default() += 1;
    }

    let mut ips_by_risk_level: BTreeMap<String, usize> = BTreeMap::new();
    let mut ips_by_category: BTreeMap<String, usize> = BTreeMap::new();
    for ip in ip_addresses {
        *ips_by_risk_level
            .entry(ip.risk_level.as_str().to_string())
            .or_default() += 1;
        *ips_by_category
            .entry(ip.category.as_str().to_string())
            .or_default() += 1;
    }

    let api_key_totals = ApiKeyTotals {
        total: api_keys.len(),
        active: count_status(api_keys, &KeyStatus::Active),
        expired: count_status(api_keys, &KeyStatus::Expired),
    };

    let ip_totals = IpAddressTotals {
        total: ip_addresses.len(),
        high_risk: count_risk(ip_addresses, &RiskLevel::High),
        critical_risk: count_risk(ip_addresses, &RiskLevel::Critical),
    };

    SecurityReport {
        security_score: security_score(&api_key_totals, &ip_totals),
        recommendations: recommendations::evaluate(&api_key_totals, &ip_totals),
        recent_activity: recent_activity(api_keys, ip_addresses),
        api_key_totals,
        ip_totals,
        keys_by_environment,
        ips_by_risk_level,
        ips_by_category,
    }
}

fn count_status(api_keys: &[ApiKey], status: &KeyStatus) -> usize {
    api_keys.iter().filter(|key| key.status == *status).count()
}

fn count_risk(ip_addresses: &[IpAddress], risk: &RiskLevel) -> usize {
    ip_addresses.iter().filter(|ip| ip.risk_level == *risk).count()
}

fn security_score(keys: &ApiKeyTotals, ips: &IpAddressTotals) -> u8 {
    let threats = (ips.high_risk + ips.critical_risk) as i64;
    let score = 100 - THREAT_PENALTY * threats - EXPIRED_KEY_PENALTY * keys.expired as i64;
    score.max(0) as u8
}

/// First three records of each collection, in the order received, merged and
/// stable-sorted newest first. Equal timestamps keep their relative input
/// order (keys before addresses).
fn recent_activity(api_keys: &[ApiKey], ip_addresses: &[IpAddress]) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> = api_keys
        .iter()
        .take(ACTIVITY_PER_SOURCE)
        .map(|key| ActivityEntry {
            kind: ActivityKind::ApiKey,
            description: format!("API Key \"{}\" for {}", key.name, key.service),
            timestamp: key.created_at,
        })
        .chain(ip_addresses.iter().take(ACTIVITY_PER_SOURCE).map(|ip| {
            ActivityEntry {
                kind: ActivityKind::IpAddress,
                description: format!(
                    "IP Address {} ({} risk)",
                    ip.ip_address,
                    ip.risk_level.as_str()
                ),
                timestamp: ip.created_at,
            }
        }))
        .collect();

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(ACTIVITY_LIMIT);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api_key::Environment;
    use crate::models::ip_address::IpCategory;
    use crate::models::report::AdvisorySeverity;
    use chrono::{Duration, TimeZone, Utc};

    fn key(name: &str, environment: &str, status: &str, age_hours: i64) -> ApiKey {
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        ApiKey {
            id: format!("key-{name}"),
            name: name.to_string(),
            key_value: "sk_test_0123456789abcdef".to_string(),
            service: "Stripe".to_string(),
            environment: Environment::from(environment.to_string()),
            status: crate::models::api_key::KeyStatus::from(status.to_string()),
            last_rotated: base,
            created_at: base - Duration::hours(age_hours),
            created_by: "user-1".to_string(),
        }
    }

    fn ip(address: &str, risk: &str, category: &str, age_hours: i64) -> IpAddress {
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        IpAddress {
            id: format!("ip-{address}"),
            ip_address: address.to_string(),
            hostname: None,
            location: "US-East".to_string(),
            risk_level: RiskLevel::from(risk.to_string()),
            category: IpCategory::from(category.to_string()),
            notes: String::new(),
            last_seen: base,
            created_at: base - Duration::hours(age_hours),
            created_by: "user-1".to_string(),
        }
    }

    #[test]
    fn empty_inputs_produce_zeroed_report_with_all_clear() {
        let report = compute_report(&[], &[]);

        assert_eq!(report.security_score, 100);
        assert_eq!(report.api_key_totals.total, 0);
        assert_eq!(report.ip_totals.total, 0);
        assert!(report.keys_by_environment.is_empty());
        assert!(report.ips_by_risk_level.is_empty());
        assert!(report.ips_by_category.is_empty());
        assert!(report.recent_activity.is_empty());
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].title, "All Systems Secure");
    }

    // Scenario: 2 production/active + 1 staging/inactive + 1 development/active
    // keys, and 3 low/internal + 1 medium/partner + 1 high/external +
    // 1 critical/threat addresses.
    #[test]
    fn mixed_inventory_matches_expected_totals_and_score() {
        let keys = vec![
            key("prod-a", "production", "active", 1),
            key("prod-b", "production", "active", 2),
            key("stage", "staging", "inactive", 3),
            key("dev", "development", "active", 4),
        ];
        let ips = vec![
            ip("10.0.0.1", "low", "internal", 1),
            ip("10.0.0.2", "low", "internal", 2),
            ip("10.0.0.3", "low", "internal", 3),
            ip("192.0.2.1", "medium", "partner", 4),
            ip("203.0.113.9", "high", "external", 5),
            ip("198.51.100.7", "critical", "threat", 6),
        ];

        let report = compute_report(&keys, &ips);

        assert_eq!(report.api_key_totals.total, 4);
        assert_eq!(report.api_key_totals.active, 3);
        assert_eq!(report.api_key_totals.expired, 0);
        assert_eq!(report.ip_totals.total, 6);
        assert_eq!(report.ip_totals.high_risk, 1);
        assert_eq!(report.ip_totals.critical_risk, 1);
        assert_eq!(report.security_score, 90);

        let titles: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["Critical Risk IP Addresses", "High Risk IP Addresses"]
        );
    }

    #[test]
    fn single_expired_key_scores_97_with_only_expired_advisory() {
        let keys = vec![key("old", "production", "expired", 1)];
        let report = compute_report(&keys, &[]);

        assert_eq!(report.security_score, 97);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].title, "Expired API Keys Detected");
        assert_eq!(report.recommendations[0].severity, AdvisorySeverity::Critical);
    }

    #[test]
    fn low_and_medium_risk_only_yields_all_clear() {
        let keys = vec![key("fine", "production", "active", 1)];
        let ips = vec![
            ip("10.0.0.1", "low", "internal", 1),
            ip("10.0.0.2", "medium", "partner", 2),
        ];

        let report = compute_report(&keys, &ips);

        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].title, "All Systems Secure");
        assert_eq!(report.recommendations[0].severity, AdvisorySeverity::Info);
    }

    #[test]
    fn score_never_drops_below_zero() {
        let ips: Vec<IpAddress> = (0..40)
            .map(|i| ip(&format!("198.51.100.{i}"), "critical", "threat", i))
            .collect();

        let report = compute_report(&[], &ips);
        assert_eq!(report.security_score, 0);
    }

    #[test]
    fn score_is_monotone_in_threats_and_expirations() {
        let mut last = 101i64;
        for threats in 0..4 {
            let ips: Vec<IpAddress> = (0..threats)
                .map(|i| ip(&format!("203.0.113.{i}"), "high", "external", i))
                .collect();
            let score = compute_report(&[], &ips).security_score as i64;
            assert!(score < last);
            last = score;
        }

        let mut last = 101i64;
        for expired in 0..4 {
            let keys: Vec<ApiKey> = (0..expired)
                .map(|i| key(&format!("k{i}"), "production", "expired", i))
                .collect();
            let score = compute_report(&keys, &[]).security_score as i64;
            assert!(score < last);
            last = score;
        }
    }

    #[test]
    fn grouping_counts_ignore_input_order() {
        let mut keys = vec![
            key("a", "production", "active", 1),
            key("b", "staging", "active", 2),
            key("c", "production", "expired", 3),
        ];
        let mut ips = vec![
            ip("10.0.0.1", "low", "internal", 1),
            ip("10.0.0.2", "high", "threat", 2),
            ip("10.0.0.3", "low", "partner", 3),
        ];

        let forward = compute_report(&keys, &ips);
        keys.reverse();
        ips.reverse();
        let backward = compute_report(&keys, &ips);

        assert_eq!(forward.keys_by_environment, backward.keys_by_environment);
        assert_eq!(forward.ips_by_risk_level, backward.ips_by_risk_level);
        assert_eq!(forward.ips_by_category, backward.ips_by_category);
    }

    #[test]
    fn unknown_labels_get_their_own_buckets() {
        let keys = vec![key("odd", "sandbox", "rotating", 1)];
        let ips = vec![ip("10.9.9.9", "unknown", "quarantine", 1)];

        let report = compute_report(&keys, &ips);

        assert_eq!(report.keys_by_environment.get("sandbox"), Some(&1));
        assert_eq!(report.ips_by_risk_level.get("unknown"), Some(&1));
        assert_eq!(report.ips_by_category.get("quarantine"), Some(&1));
        assert_eq!(report.api_key_totals.active, 0);
        assert_eq!(report.api_key_totals.expired, 0);
    }

    #[test]
    fn activity_is_capped_at_five_and_sorted_newest_first() {
        let keys = vec![
            key("k1", "production", "active", 1),
            key("k2", "production", "active", 3),
            key("k3", "production", "active", 5),
            key("k4", "production", "active", 0), // beyond the per-source cut
        ];
        let ips = vec![
            ip("10.0.0.1", "low", "internal", 2),
            ip("10.0.0.2", "low", "internal", 4),
            ip("10.0.0.3", "low", "internal", 6),
        ];

        let report = compute_report(&keys, &ips);

        assert_eq!(report.recent_activity.len(), 5);
        for pair in report.recent_activity.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        assert!(!report
            .recent_activity
            .iter()
            .any(|entry| entry.description.contains("k4")));
    }

    #[test]
    fn equal_timestamps_keep_relative_input_order() {
        let keys = vec![key("tied", "production", "active", 2)];
        let ips = vec![ip("10.0.0.1", "low", "internal", 2)];

        let report = compute_report(&keys, &ips);

        assert_eq!(report.recent_activity.len(), 2);
        assert_eq!(report.recent_activity[0].kind, ActivityKind::ApiKey);
        assert_eq!(report.recent_activity[1].kind, ActivityKind::IpAddress);
    }

    #[test]
    fn activity_descriptions_follow_display_format() {
        let keys = vec![key("Billing", "production", "active", 1)];
        let ips = vec![ip("198.51.100.7", "critical", "threat", 2)];

        let report = compute_report(&keys, &ips);

        assert_eq!(
            report.recent_activity[0].description,
            "API Key \"Billing\" for Stripe"
        );
        assert_eq!(
            report.recent_activity[1].description,
            "IP Address 198.51.100.7 (critical risk)"
        );
    }
}
