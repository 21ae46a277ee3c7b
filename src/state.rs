use parking_lot::Mutex;
use std::path::PathBuf;

use crate::commands::settings::BackendConfig;
use crate::models::report::SecurityReport;
use crate::storage::{MemoryStore, Store, SupabaseStore};

/// Managed application state: the injected storage backend, the last report
/// served (fallback for failed fetches), and where settings live on disk.
pub struct AppState {
    pub store: Store,
    pub last_report: Mutex<Option<SecurityReport>>,
    pub config_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Store, config_dir: PathBuf) -> Self {
        AppState {
            store,
            last_report: Mutex::new(None),
            config_dir,
        }
    }
}

/// Pick the backend for this run. Anything short of a usable Supabase
/// configuration degrades to the seeded in-memory store instead of failing
/// startup.
pub fn build_store(config: &BackendConfig) -> Store {
    if config.demo_mode {
        log::info!("demo mode enabled; using in-memory inventory");
        return Store::Memory(MemoryStore::with_demo_data());
    }

    if config.supabase_url.is_empty() || config.supabase_anon_key.is_empty() {
        log::warn!("Supabase project not configured; falling back to demo mode");
        return Store::Memory(MemoryStore::with_demo_data());
    }

    match SupabaseStore::new(&config.supabase_url, &config.supabase_anon_key) {
        Ok(client) => {
            log::info!("using Supabase backend at {}", config.supabase_url);
            Store::Supabase(client)
        }
        Err(err) => {
            log::error!("failed to initialize Supabase client: {err}; falling back to demo mode");
            Store::Memory(MemoryStore::with_demo_data())
        }
    }
}
