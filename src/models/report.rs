use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived metrics over the credential and address inventory. Recomputed on
/// every fetch, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityReport {
    pub security_score: u8,
    pub api_key_totals: ApiKeyTotals,
    pub ip_totals: IpAddressTotals,
    pub keys_by_environment: BTreeMap<String, usize>,
    pub ips_by_risk_level: BTreeMap<String, usize>,
    pub ips_by_category: BTreeMap<String, usize>,
    pub recent_activity: Vec<ActivityEntry>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyTotals {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpAddressTotals {
    pub total: usize,
    pub high_risk: usize,
    pub critical_risk: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ApiKey,
    IpAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorySeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: AdvisorySeverity,
    pub title: String,
    pub detail: String,
}
