use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::api_key::{ApiKey, NewApiKey};
use crate::models::ip_address::{IpAddress, NewIpAddress};
use crate::models::session::{Session, SessionUser};
use crate::models::ssh_credential::{NewSshCredential, SshCredential};
use crate::storage::demo;
use crate::storage::{RecordStore, StorageError};

pub const DEMO_USER_ID: &str = "demo-user";
const DEMO_SESSION_HOURS: i64 = 24;

/// In-process backend for demo mode and tests. Holds the three record sets
/// plus a fabricated session; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    api_keys: Vec<ApiKey>,
    ip_addresses: Vec<IpAddress>,
    ssh_credentials: Vec<SshCredential>,
    session: Option<Session>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Store pre-loaded with the demo inventory. Rows get staggered
    /// creation times so the activity feed has an order to show.
    pub fn with_demo_data() -> Self {
        let store = MemoryStore::new();
        let now = Utc::now();
        {
            let mut inner = store.inner.write();
            for (index, new) in demo::demo_api_keys().into_iter().enumerate() {
                let created_at = now - Duration::minutes(index as i64);
                inner.api_keys.push(api_key_row(new, created_at));
            }
            for (index, new) in demo::demo_ip_addresses().into_iter().enumerate() {
                let created_at = now - Duration::minutes(10 + index as i64);
                inner.ip_addresses.push(ip_row(new, created_at));
            }
        }
        store
    }

    // Demo-mode session: any credentials are accepted, the identity is local.

    pub fn sign_in(&self, email: &str) -> Session {
        let session = Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Uuid::new_v4().to_string(),
            expires_at: Utc::now() + Duration::hours(DEMO_SESSION_HOURS),
            user: SessionUser {
                id: DEMO_USER_ID.to_string(),
                email: email.to_string(),
            },
        };
        self.inner.write().session = Some(session.clone());
        session
    }

    pub fn sign_out(&self) {
        self.inner.write().session = None;
    }

    pub fn current_session(&self) -> Option<Session> {
        self.inner.read().session.clone()
    }
}

fn api_key_row(new: NewApiKey, created_at: DateTime<Utc>) -> ApiKey {
    ApiKey {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        key_value: new.key_value,
        service: new.service,
        environment: new.environment,
        status: new.status,
        last_rotated: created_at,
        created_at,
        created_by: DEMO_USER_ID.to_string(),
    }
}

fn ip_row(new: NewIpAddress, created_at: DateTime<Utc>) -> IpAddress {
    IpAddress {
        id: Uuid::new_v4().to_string(),
        ip_address: new.ip_address,
        hostname: new.hostname,
        location: new.location,
        risk_level: new.risk_level,
        category: new.category,
        notes: new.notes,
        last_seen: created_at,
        created_at,
        created_by: DEMO_USER_ID.to_string(),
    }
}

fn ssh_row(new: NewSshCredential, created_at: DateTime<Utc>) -> SshCredential {
    SshCredential {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        host: new.host,
        port: new.port,
        username: new.username,
        auth_type: new.auth_type,
        private_key: new.private_key,
        passphrase: new.passphrase,
        password: new.password,
        description: new.description,
        last_used: None,
        is_active: new.is_active,
        created_at,
    }
}

impl RecordStore for MemoryStore {
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StorageError> {
        let mut rows = self.inner.read().api_keys.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_api_key(&self, new: NewApiKey) -> Result<ApiKey, StorageError> {
        let row = api_key_row(new, Utc::now());
        self.inner.write().api_keys.push(row.clone());
        Ok(row)
    }

    async fn delete_api_key(&self, id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        let before = inner.api_keys.len();
        inner.api_keys.retain(|key| key.id != id);
        if inner.api_keys.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn rotate_api_key(&self, id: &str, new_value: &str) -> Result<ApiKey, StorageError> {
        let mut inner = self.inner.write();
        let key = inner
            .api_keys
            .iter_mut()
            .find(|key| key.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        key.key_value = new_value.to_string();
        key.last_rotated = Utc::now();
        Ok(key.clone())
    }

    async fn list_ip_addresses(&self) -> Result<Vec<IpAddress>, StorageError> {
        let mut rows = self.inner.read().ip_addresses.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_ip_address(&self, new: NewIpAddress) -> Result<IpAddress, StorageError> {
        let row = ip_row(new, Utc::now());
        self.inner.write().ip_addresses.push(row.clone());
        Ok(row)
    }

    async fn delete_ip_address(&self, id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        let before = inner.ip_addresses.len();
        inner.ip_addresses.retain(|ip| ip.id != id);
        if inner.ip_addresses.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_ssh_credentials(&self) -> Result<Vec<SshCredential>, StorageError> {
        let mut rows = self.inner.read().ssh_credentials.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_ssh_credential(
        &self,
        new: NewSshCredential,
    ) -> Result<SshCredential, StorageError> {
        let row = ssh_row(new, Utc::now());
        self.inner.write().ssh_credentials.push(row.clone());
        Ok(row)
    }

    async fn delete_ssh_credential(&self, id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        let before = inner.ssh_credentials.len();
        inner.ssh_credentials.retain(|cred| cred.id != id);
        if inner.ssh_credentials.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn set_ssh_credential_active(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<SshCredential, StorageError> {
        let mut inner = self.inner.write();
        let cred = inner
            .ssh_credentials
            .iter_mut()
            .find(|cred| cred.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        cred.is_active = is_active;
        Ok(cred.clone())
    }
}
