use serde::{Deserialize, Serialize};

use crate::commands::storage_err;
use crate::state::AppState;
use crate::storage::{demo, RecordStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOutcome {
    pub seeded: bool,
    pub message: String,
}

#[tauri::command]
pub async fn seed_demo_data(state: tauri::State<'_, AppState>) -> Result<SeedOutcome, String> {
    seed_demo_data_internal(&state.store).await
}

/// Populate a fresh account with the demo inventory. A no-op when the
/// account already owns API keys, so repeated sign-ins never duplicate
/// rows.
pub async fn seed_demo_data_internal<S: RecordStore>(store: &S) -> Result<SeedOutcome, String> {
    let existing = store.list_api_keys().await.map_err(storage_err)?;
    if !existing.is_empty() {
        return Ok(SeedOutcome {
            seeded: false,
            message: "Demo data already exists".to_string(),
        });
    }

    for key in demo::demo_api_keys() {
        store.insert_api_key(key).await.map_err(storage_err)?;
    }
    for ip in demo::demo_ip_addresses() {
        store.insert_ip_address(ip).await.map_err(storage_err)?;
    }

    log::info!("seeded demo inventory");
    Ok(SeedOutcome {
        seeded: true,
        message: "Demo data seeded successfully".to_string(),
    })
}
