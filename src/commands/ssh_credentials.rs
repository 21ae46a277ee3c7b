use crate::commands::storage_err;
use crate::models::ssh_credential::{NewSshCredential, SshCredential};
use crate::state::AppState;
use crate::storage::RecordStore;

#[tauri::command]
pub async fn list_ssh_credentials(
    state: tauri::State<'_, AppState>,
    include_secrets: Option<bool>,
) -> Result<Vec<SshCredential>, String> {
    list_ssh_credentials_internal(&state.store, include_secrets.unwrap_or(false)).await
}

#[tauri::command]
pub async fn create_ssh_credential(
    state: tauri::State<'_, AppState>,
    credential: NewSshCredential,
) -> Result<SshCredential, String> {
    create_ssh_credential_internal(&state.store, credential).await
}

#[tauri::command]
pub async fn delete_ssh_credential(
    state: tauri::State<'_, AppState>,
    id: String,
) -> Result<(), String> {
    delete_ssh_credential_internal(&state.store, &id).await
}

#[tauri::command]
pub async fn set_ssh_credential_active(
    state: tauri::State<'_, AppState>,
    id: String,
    is_active: bool,
) -> Result<SshCredential, String> {
    set_ssh_credential_active_internal(&state.store, &id, is_active).await
}

pub async fn list_ssh_credentials_internal<S: RecordStore>(
    store: &S,
    include_secrets: bool,
) -> Result<Vec<SshCredential>, String> {
    let credentials = store.list_ssh_credentials().await.map_err(storage_err)?;
    if include_secrets {
        return Ok(credentials);
    }
    Ok(credentials.iter().map(SshCredential::masked).collect())
}

/// Inserts after dropping secret fields that do not apply to the chosen
/// auth type, mirroring the entry form.
pub async fn create_ssh_credential_internal<S: RecordStore>(
    store: &S,
    credential: NewSshCredential,
) -> Result<SshCredential, String> {
    let created = store
        .insert_ssh_credential(credential.normalized())
        .await
        .map_err(storage_err)?;
    log::info!("stored SSH credential for {}@{}", created.username, created.host);
    Ok(created.masked())
}

pub async fn delete_ssh_credential_internal<S: RecordStore>(
    store: &S,
    id: &str,
) -> Result<(), String> {
    store.delete_ssh_credential(id).await.map_err(storage_err)
}

pub async fn set_ssh_credential_active_internal<S: RecordStore>(
    store: &S,
    id: &str,
    is_active: bool,
) -> Result<SshCredential, String> {
    let updated = store
        .set_ssh_credential_active(id, is_active)
        .await
        .map_err(storage_err)?;
    Ok(updated.masked())
}
