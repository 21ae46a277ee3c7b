use chrono::{Duration, Utc};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::api_key::{ApiKey, NewApiKey};
use crate::models::ip_address::{IpAddress, NewIpAddress};
use crate::models::session::{Session, SessionUser};
use crate::models::ssh_credential::{NewSshCredential, SshCredential};
use crate::storage::{RecordStore, StorageError};

const API_KEYS_TABLE: &str = "api_keys";
const IP_ADDRESSES_TABLE: &str = "ip_addresses";
const SSH_CREDENTIALS_TABLE: &str = "ssh_credentials";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for a Supabase project: GoTrue auth plus the PostgREST surface
/// over the three inventory tables. Row-level security keys every read and
/// write to the bearer token, so the client only has to attach the current
/// session.
pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: SessionUser,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            user: token.user,
        }
    }
}

/// Insert payload wrapper stamping the row owner, the way the entry forms
/// attach `created_by` before writing.
#[derive(Serialize)]
struct OwnedRow<'a, T: Serialize> {
    #[serde(flatten)]
    record: &'a T,
    created_by: &'a str,
}

/// Owner wrapper for `ssh_credentials`, whose schema names the owner column
/// `user_id` instead of `created_by`.
#[derive(Serialize)]
struct UserOwnedRow<'a, T: Serialize> {
    #[serde(flatten)]
    record: &'a T,
    user_id: &'a str,
}

impl SupabaseStore {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(SupabaseStore {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session: RwLock::new(None),
        })
    }

    // ── Session operations ──────────────────────────────────────────────

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StorageError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let token: TokenResponse = Self::decode(response).await?;
        let session = Session::from(token);
        *self.session.write() = Some(session.clone());
        Ok(session)
    }

    /// Registers a new operator. Projects with email confirmation enabled
    /// answer without a session; that case is surfaced as
    /// `ConfirmationRequired` rather than a decode failure.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, StorageError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let payload: serde_json::Value = Self::decode(response).await?;
        if payload.get("access_token").is_none() {
            return Err(StorageError::ConfirmationRequired);
        }

        let token: TokenResponse = serde_json::from_value(payload)?;
        let session = Session::from(token);
        *self.session.write() = Some(session.clone());
        Ok(session)
    }

    /// Revokes the session server-side and drops it locally. The local drop
    /// happens even when the revocation call fails.
    pub async fn sign_out(&self) -> Result<(), StorageError> {
        let session = self.session.write().take();
        let Some(session) = session else {
            return Ok(());
        };

        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            log::warn!("sign-out revocation failed: HTTP {}", response.status());
        }
        Ok(())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    fn require_session(&self) -> Result<Session, StorageError> {
        self.current_session().ok_or(StorageError::NotSignedIn)
    }

    // ── REST helpers ────────────────────────────────────────────────────

    fn bearer_token(&self) -> String {
        self.session
            .read()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn list_rows<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StorageError> {
        let response = self
            .http
            .get(self.rest_url(table))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer_token())
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn insert_row<T, B>(&self, table: &'static str, body: &B) -> Result<T, StorageError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let response = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer_token())
            .json(&[body])
            .send()
            .await?;

        let mut rows: Vec<T> = Self::decode(response).await?;
        rows.pop().ok_or(StorageError::MissingRow(table))
    }

    async fn update_row<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<T, StorageError> {
        let response = self
            .http
            .patch(self.rest_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer_token())
            .json(patch)
            .send()
            .await?;

        let mut rows: Vec<T> = Self::decode(response).await?;
        rows.pop().ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn delete_row(&self, table: &str, id: &str) -> Result<(), StorageError> {
        let response = self
            .http
            .delete(self.rest_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer_token())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

impl RecordStore for SupabaseStore {
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StorageError> {
        self.list_rows(API_KEYS_TABLE).await
    }

    async fn insert_api_key(&self, new: NewApiKey) -> Result<ApiKey, StorageError> {
        let session = self.require_session()?;
        self.insert_row(
            API_KEYS_TABLE,
            &OwnedRow {
                record: &new,
                created_by: &session.user.id,
            },
        )
        .await
    }

    async fn delete_api_key(&self, id: &str) -> Result<(), StorageError> {
        self.delete_row(API_KEYS_TABLE, id).await
    }

    async fn rotate_api_key(&self, id: &str, new_value: &str) -> Result<ApiKey, StorageError> {
        self.update_row(
            API_KEYS_TABLE,
            id,
            &serde_json::json!({
                "key_value": new_value,
                "last_rotated": Utc::now(),
            }),
        )
        .await
    }

    async fn list_ip_addresses(&self) -> Result<Vec<IpAddress>, StorageError> {
        self.list_rows(IP_ADDRESSES_TABLE).await
    }

    async fn insert_ip_address(&self, new: NewIpAddress) -> Result<IpAddress, StorageError> {
        let session = self.require_session()?;
        self.insert_row(
            IP_ADDRESSES_TABLE,
            &OwnedRow {
                record: &new,
                created_by: &session.user.id,
            },
        )
        .await
    }

    async fn delete_ip_address(&self, id: &str) -> Result<(), StorageError> {
        self.delete_row(IP_ADDRESSES_TABLE, id).await
    }

    async fn list_ssh_credentials(&self) -> Result<Vec<SshCredential>, StorageError> {
        self.list_rows(SSH_CREDENTIALS_TABLE).await
    }

    async fn insert_ssh_credential(
        &self,
        new: NewSshCredential,
    ) -> Result<SshCredential, StorageError> {
        let session = self.require_session()?;
        self.insert_row(
            SSH_CREDENTIALS_TABLE,
            &UserOwnedRow {
                record: &new,
                user_id: &session.user.id,
            },
        )
        .await
    }

    async fn delete_ssh_credential(&self, id: &str) -> Result<(), StorageError> {
        self.delete_row(SSH_CREDENTIALS_TABLE, id).await
    }

    async fn set_ssh_credential_active(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<SshCredential, StorageError> {
        self.update_row(
            SSH_CREDENTIALS_TABLE,
            id,
            &serde_json::json!({ "is_active": is_active }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api_key::{Environment, KeyStatus};
    use crate::models::ssh_credential::AuthType;

    #[test]
    fn api_key_insert_is_stamped_with_created_by() {
        let new = NewApiKey {
            name: "Billing".to_string(),
            key_value: "sk_test_0123456789abcdef".to_string(),
            service: "Stripe".to_string(),
            environment: Environment::Production,
            status: KeyStatus::Active,
        };

        let payload = serde_json::to_value(OwnedRow {
            record: &new,
            created_by: "user-1",
        })
        .expect("serialize insert payload");

        assert_eq!(payload["created_by"], "user-1");
        assert_eq!(payload["name"], "Billing");
        assert!(payload.get("user_id").is_none());
    }

    // ssh_credentials names its owner column user_id, unlike the other two
    // tables.
    #[test]
    fn ssh_credential_insert_is_stamped_with_user_id() {
        let new = NewSshCredential {
            name: "bastion".to_string(),
            host: "bastion.internal".to_string(),
            port: 22,
            username: "ops".to_string(),
            auth_type: AuthType::Password,
            private_key: None,
            passphrase: None,
            password: Some("swordfish-swordfish".to_string()),
            description: None,
            is_active: true,
        };

        let payload = serde_json::to_value(UserOwnedRow {
            record: &new,
            user_id: "user-1",
        })
        .expect("serialize insert payload");

        assert_eq!(payload["user_id"], "user-1");
        assert_eq!(payload["host"], "bastion.internal");
        assert!(payload.get("created_by").is_none());
    }
}
