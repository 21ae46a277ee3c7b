use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deployment environment an API key belongs to. Rows coming back from
/// storage may carry labels this build does not know about; those are kept
/// verbatim in `Other` so grouping and display never drop a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    Production,
    Staging,
    Development,
    Other(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
            Environment::Other(label) => label,
        }
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            "development" => Environment::Development,
            _ => Environment::Other(value),
        }
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.as_str().to_string()
    }
}

/// Lifecycle status of an API key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeyStatus {
    Active,
    Inactive,
    Expired,
    Other(String),
}

impl KeyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Inactive => "inactive",
            KeyStatus::Expired => "expired",
            KeyStatus::Other(label) => label,
        }
    }
}

impl From<String> for KeyStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => KeyStatus::Active,
            "inactive" => KeyStatus::Inactive,
            "expired" => KeyStatus::Expired,
            _ => KeyStatus::Other(value),
        }
    }
}

impl From<KeyStatus> for String {
    fn from(value: KeyStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub key_value: String,
    pub service: String,
    pub environment: Environment,
    pub status: KeyStatus,
    pub last_rotated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl ApiKey {
    /// Copy of this key with the secret replaced by its masked form.
    pub fn masked(&self) -> ApiKey {
        ApiKey {
            key_value: mask_secret(&self.key_value),
            ..self.clone()
        }
    }
}

/// Insert payload for a new API key. `created_by` is stamped by the storage
/// backend from the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApiKey {
    pub name: String,
    pub key_value: String,
    pub service: String,
    pub environment: Environment,
    pub status: KeyStatus,
}

/// Mask a secret for display: short values are fully hidden, longer ones
/// keep the first and last four characters.
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() <= 8 {
        return "••••••••".to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}••••••••{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_environment_label_is_preserved() {
        let env = Environment::from("sandbox".to_string());
        assert_eq!(env, Environment::Other("sandbox".to_string()));
        assert_eq!(env.as_str(), "sandbox");
        assert_eq!(String::from(env), "sandbox");
    }

    #[test]
    fn known_labels_round_trip() {
        for label in ["production", "staging", "development"] {
            let env = Environment::from(label.to_string());
            assert_eq!(env.as_str(), label);
        }
        for label in ["active", "inactive", "expired"] {
            let status = KeyStatus::from(label.to_string());
            assert_eq!(status.as_str(), label);
        }
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        assert_eq!(mask_secret("abc"), "••••••••");
        assert_eq!(mask_secret("12345678"), "••••••••");
    }

    #[test]
    fn long_secrets_keep_head_and_tail() {
        assert_eq!(mask_secret("sk_live_abcdef1234"), "sk_l••••••••1234");
    }
}
