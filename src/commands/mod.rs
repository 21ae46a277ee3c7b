pub mod api_keys;
pub mod auth;
pub mod ip_addresses;
pub mod reports;
pub mod seed;
pub mod settings;
pub mod ssh_credentials;

use crate::storage::StorageError;

/// Error mapping at the IPC boundary.
pub(crate) fn storage_err(err: StorageError) -> String {
    format!("Storage error: {err}")
}
