pub mod commands;
pub mod models;
pub mod reporting;
pub mod state;
pub mod storage;

use commands::{
    api_keys::{create_api_key, delete_api_key, list_api_keys, rotate_api_key},
    auth::{current_session, sign_in, sign_out, sign_up},
    ip_addresses::{create_ip_address, delete_ip_address, list_ip_addresses},
    reports::get_security_report,
    seed::seed_demo_data,
    settings::{get_settings, save_settings},
    ssh_credentials::{
        create_ssh_credential, delete_ssh_credential, list_ssh_credentials,
        set_ssh_credential_active,
    },
};
use state::AppState;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _ = env_logger::try_init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let config_dir = app.path().app_config_dir()?;
            let settings = commands::settings::load_settings_from_disk(&config_dir)
                .unwrap_or_else(|err| {
                    log::warn!("falling back to default settings: {err}");
                    commands::settings::default_settings()
                });
            let store = state::build_store(&commands::settings::backend_config(&settings));
            app.manage(AppState::new(store, config_dir));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            sign_in,
            sign_up,
            sign_out,
            current_session,
            list_api_keys,
            create_api_key,
            delete_api_key,
            rotate_api_key,
            list_ip_addresses,
            create_ip_address,
            delete_ip_address,
            list_ssh_credentials,
            create_ssh_credential,
            delete_ssh_credential,
            set_ssh_credential_active,
            get_security_report,
            seed_demo_data,
            get_settings,
            save_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
