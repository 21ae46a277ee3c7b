pub mod demo;
pub mod error;
pub mod memory;
pub mod supabase;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use crate::models::api_key::{ApiKey, NewApiKey};
use crate::models::ip_address::{IpAddress, NewIpAddress};
use crate::models::ssh_credential::{NewSshCredential, SshCredential};

/// Query interface over the externally persisted inventory. Every operation
/// is scoped server-side to the rows visible to the current session; this
/// side never filters by owner itself.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StorageError>;
    async fn insert_api_key(&self, new: NewApiKey) -> Result<ApiKey, StorageError>;
    async fn delete_api_key(&self, id: &str) -> Result<(), StorageError>;
    /// Replace the secret and stamp `last_rotated`.
    async fn rotate_api_key(&self, id: &str, new_value: &str) -> Result<ApiKey, StorageError>;

    async fn list_ip_addresses(&self) -> Result<Vec<IpAddress>, StorageError>;
    async fn insert_ip_address(&self, new: NewIpAddress) -> Result<IpAddress, StorageError>;
    async fn delete_ip_address(&self, id: &str) -> Result<(), StorageError>;

    async fn list_ssh_credentials(&self) -> Result<Vec<SshCredential>, StorageError>;
    async fn insert_ssh_credential(
        &self,
        new: NewSshCredential,
    ) -> Result<SshCredential, StorageError>;
    async fn delete_ssh_credential(&self, id: &str) -> Result<(), StorageError>;
    async fn set_ssh_credential_active(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<SshCredential, StorageError>;
}

/// Backend selected at startup: the Supabase project when configured, the
/// seeded in-memory inventory in demo mode.
pub enum Store {
    Supabase(SupabaseStore),
    Memory(MemoryStore),
}

impl RecordStore for Store {
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StorageError> {
        match self {
            Store::Supabase(client) => client.list_api_keys().await,
            Store::Memory(store) => store.list_api_keys().await,
        }
    }

    async fn insert_api_key(&self, new: NewApiKey) -> Result<ApiKey, StorageError> {
        match self {
            Store::Supabase(client) => client.insert_api_key(new).await,
            Store::Memory(store) => store.insert_api_key(new).await,
        }
    }

    async fn delete_api_key(&self, id: &str) -> Result<(), StorageError> {
        match self {
            Store::Supabase(client) => client.delete_api_key(id).await,
            Store::Memory(store) => store.delete_api_key(id).await,
        }
    }

    async fn rotate_api_key(&self, id: &str, new_value: &str) -> Result<ApiKey, StorageError> {
        match self {
            Store::Supabase(client) => client.rotate_api_key(id, new_value).await,
            Store::Memory(store) => store.rotate_api_key(id, new_value).await,
        }
    }

    async fn list_ip_addresses(&self) -> Result<Vec<IpAddress>, StorageError> {
        match self {
            Store::Supabase(client) => client.list_ip_addresses().await,
            Store::Memory(store) => store.list_ip_addresses().await,
        }
    }

    async fn insert_ip_address(&self, new: NewIpAddress) -> Result<IpAddress, StorageError> {
        match self {
            Store::Supabase(client) => client.insert_ip_address(new).await,
            Store::Memory(store) => store.insert_ip_address(new).await,
        }
    }

    async fn delete_ip_address(&self, id: &str) -> Result<(), StorageError> {
        match self {
            Store::Supabase(client) => client.delete_ip_address(id).await,
            Store::Memory(store) => store.delete_ip_address(id).await,
        }
    }

    async fn list_ssh_credentials(&self) -> Result<Vec<SshCredential>, StorageError> {
        match self {
            Store::Supabase(client) => client.list_ssh_credentials().await,
            Store::Memory(store) => store.list_ssh_credentials().await,
        }
    }

    async fn insert_ssh_credential(
        &self,
        new: NewSshCredential,
    ) -> Result<SshCredential, StorageError> {
        match self {
            Store::Supabase(client) => client.insert_ssh_credential(new).await,
            Store::Memory(store) => store.insert_ssh_credential(new).await,
        }
    }

    async fn delete_ssh_credential(&self, id: &str) -> Result<(), StorageError> {
        match self {
            Store::Supabase(client) => client.delete_ssh_credential(id).await,
            Store::Memory(store) => store.delete_ssh_credential(id).await,
        }
    }

    async fn set_ssh_credential_active(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<SshCredential, StorageError> {
        match self {
            Store::Supabase(client) => client.set_ssh_credential_active(id, is_active).await,
            Store::Memory(store) => store.set_ssh_credential_active(id, is_active).await,
        }
    }
}
