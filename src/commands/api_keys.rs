use crate::commands::storage_err;
use crate::models::api_key::{ApiKey, NewApiKey};
use crate::state::AppState;
use crate::storage::RecordStore;

#[tauri::command]
pub async fn list_api_keys(
    state: tauri::State<'_, AppState>,
    include_secrets: Option<bool>,
) -> Result<Vec<ApiKey>, String> {
    list_api_keys_internal(&state.store, include_secrets.unwrap_or(false)).await
}

#[tauri::command]
pub async fn create_api_key(
    state: tauri::State<'_, AppState>,
    key: NewApiKey,
) -> Result<ApiKey, String> {
    create_api_key_internal(&state.store, key).await
}

#[tauri::command]
pub async fn delete_api_key(
    state: tauri::State<'_, AppState>,
    id: String,
) -> Result<(), String> {
    delete_api_key_internal(&state.store, &id).await
}

#[tauri::command]
pub async fn rotate_api_key(
    state: tauri::State<'_, AppState>,
    id: String,
    new_value: String,
) -> Result<ApiKey, String> {
    rotate_api_key_internal(&state.store, &id, &new_value).await
}

/// Secrets stay masked unless the caller explicitly asks for them, so a
/// listing never leaks key material into the webview by default.
pub async fn list_api_keys_internal<S: RecordStore>(
    store: &S,
    include_secrets: bool,
) -> Result<Vec<ApiKey>, String> {
    let keys = store.list_api_keys().await.map_err(storage_err)?;
    if include_secrets {
        return Ok(keys);
    }
    Ok(keys.iter().map(ApiKey::masked).collect())
}

pub async fn create_api_key_internal<S: RecordStore>(
    store: &S,
    key: NewApiKey,
) -> Result<ApiKey, String> {
    let created = store.insert_api_key(key).await.map_err(storage_err)?;
    log::info!("created API key {} for {}", created.name, created.service);
    Ok(created.masked())
}

pub async fn delete_api_key_internal<S: RecordStore>(store: &S, id: &str) -> Result<(), String> {
    store.delete_api_key(id).await.map_err(storage_err)
}

pub async fn rotate_api_key_internal<S: RecordStore>(
    store: &S,
    id: &str,
    new_value: &str,
) -> Result<ApiKey, String> {
    let rotated = store
        .rotate_api_key(id, new_value)
        .await
        .map_err(storage_err)?;
    log::info!("rotated API key {}", rotated.name);
    Ok(rotated.masked())
}
