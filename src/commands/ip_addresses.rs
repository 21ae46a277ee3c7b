use crate::commands::storage_err;
use crate::models::ip_address::{IpAddress, NewIpAddress};
use crate::state::AppState;
use crate::storage::RecordStore;

#[tauri::command]
pub async fn list_ip_addresses(
    state: tauri::State<'_, AppState>,
) -> Result<Vec<IpAddress>, String> {
    list_ip_addresses_internal(&state.store).await
}

#[tauri::command]
pub async fn create_ip_address(
    state: tauri::State<'_, AppState>,
    ip: NewIpAddress,
) -> Result<IpAddress, String> {
    create_ip_address_internal(&state.store, ip).await
}

#[tauri::command]
pub async fn delete_ip_address(
    state: tauri::State<'_, AppState>,
    id: String,
) -> Result<(), String> {
    delete_ip_address_internal(&state.store, &id).await
}

pub async fn list_ip_addresses_internal<S: RecordStore>(
    store: &S,
) -> Result<Vec<IpAddress>, String> {
    store.list_ip_addresses().await.map_err(storage_err)
}

pub async fn create_ip_address_internal<S: RecordStore>(
    store: &S,
    ip: NewIpAddress,
) -> Result<IpAddress, String> {
    let created = store.insert_ip_address(ip).await.map_err(storage_err)?;
    log::info!(
        "monitoring {} ({} risk)",
        created.ip_address,
        created.risk_level.as_str()
    );
    Ok(created)
}

pub async fn delete_ip_address_internal<S: RecordStore>(store: &S, id: &str) -> Result<(), String> {
    store.delete_ip_address(id).await.map_err(storage_err)
}
