use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operator-assigned risk level for a monitored address. Unrecognized labels
/// are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
            RiskLevel::Other(label) => label,
        }
    }
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            "critical" => RiskLevel::Critical,
            _ => RiskLevel::Other(value),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(value: RiskLevel) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IpCategory {
    Internal,
    External,
    Partner,
    Threat,
    Other(String),
}

impl IpCategory {
    pub fn as_str(&self) -> &str {
        match self {
            IpCategory::Internal => "internal",
            IpCategory::External => "external",
            IpCategory::Partner => "partner",
            IpCategory::Threat => "threat",
            IpCategory::Other(label) => label,
        }
    }
}

impl From<String> for IpCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "internal" => IpCategory::Internal,
            "external" => IpCategory::External,
            "partner" => IpCategory::Partner,
            "threat" => IpCategory::Threat,
            _ => IpCategory::Other(value),
        }
    }
}

impl From<IpCategory> for String {
    fn from(value: IpCategory) -> Self {
        value.as_str().to_string()
    }
}

/// A monitored network address. The address itself is an opaque operator
/// entry; no IPv4/IPv6 validation happens on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: String,
    pub ip_address: String,
    pub hostname: Option<String>,
    pub location: String,
    pub risk_level: RiskLevel,
    pub category: IpCategory,
    #[serde(default)]
    pub notes: String,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIpAddress {
    pub ip_address: String,
    pub hostname: Option<String>,
    pub location: String,
    pub risk_level: RiskLevel,
    pub category: IpCategory,
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_risk_label_is_preserved() {
        let risk = RiskLevel::from("severe".to_string());
        assert_eq!(risk, RiskLevel::Other("severe".to_string()));
        assert_eq!(risk.as_str(), "severe");
    }

    #[test]
    fn record_deserializes_with_null_hostname() {
        let row = serde_json::json!({
            "id": "ip-1",
            "ip_address": "203.0.113.189",
            "hostname": null,
            "location": "Unknown",
            "risk_level": "high",
            "category": "external",
            "notes": "Suspicious scanning activity",
            "last_seen": "2026-08-01T12:00:00Z",
            "created_at": "2026-08-01T12:00:00Z",
            "created_by": "user-1"
        });

        let ip: IpAddress = serde_json::from_value(row).expect("deserialize row");
        assert!(ip.hostname.is_none());
        assert_eq!(ip.risk_level, RiskLevel::High);
        assert_eq!(ip.category, IpCategory::External);
    }
}
