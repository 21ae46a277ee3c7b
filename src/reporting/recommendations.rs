use crate::models::report::{AdvisorySeverity, ApiKeyTotals, IpAddressTotals, Recommendation};

/// Rule-based advisories, evaluated in fixed priority order. The first three
/// rules are independent; the all-clear advisory fires only when none of
/// them produced anything.
pub fn evaluate(keys: &ApiKeyTotals, ips: &IpAddressTotals) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if keys.expired > 0 {
        out.push(Recommendation {
            severity: AdvisorySeverity::Critical,
            title: "Expired API Keys Detected".to_string(),
            detail: format!(
                "You have {} expired API key(s). Rotate or remove them immediately.",
                keys.expired
            ),
        });
    }

    if ips.critical_risk > 0 {
        out.push(Recommendation {
            severity: AdvisorySeverity::Critical,
            title: "Critical Risk IP Addresses".to_string(),
            detail: format!(
                "{} IP address(es) marked as critical risk. Review and block if necessary.",
                ips.critical_risk
            ),
        });
    }

    if ips.high_risk > 0 {
        out.push(Recommendation {
            severity: AdvisorySeverity::Warning,
            title: "High Risk IP Addresses".to_string(),
            detail: format!(
                "{} IP address(es) marked as high risk. Monitor closely.",
                ips.high_risk
            ),
        });
    }

    if out.is_empty() {
        out.push(Recommendation {
            severity: AdvisorySeverity::Info,
            title: "All Systems Secure".to_string(),
            detail: "No critical security issues detected. Continue monitoring your systems regularly."
                .to_string(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(expired: usize) -> ApiKeyTotals {
        ApiKeyTotals {
            total: expired,
            active: 0,
            expired,
        }
    }

    fn ips(high: usize, critical: usize) -> IpAddressTotals {
        IpAddressTotals {
            total: high + critical,
            high_risk: high,
            critical_risk: critical,
        }
    }

    #[test]
    fn all_three_rules_can_fire_together() {
        let advisories = evaluate(&keys(2), &ips(1, 3));
        let titles: Vec<&str> = advisories.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Expired API Keys Detected",
                "Critical Risk IP Addresses",
                "High Risk IP Addresses"
            ]
        );
    }

    #[test]
    fn counts_appear_in_advisory_text() {
        let advisories = evaluate(&keys(0), &ips(0, 3));
        assert!(advisories[0].detail.starts_with("3 IP address(es)"));
    }

    #[test]
    fn all_clear_fires_only_when_nothing_else_did() {
        let advisories = evaluate(&keys(0), &ips(0, 0));
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].severity, AdvisorySeverity::Info);

        let advisories = evaluate(&keys(1), &ips(0, 0));
        assert!(advisories.iter().all(|a| a.title != "All Systems Secure"));
    }
}
