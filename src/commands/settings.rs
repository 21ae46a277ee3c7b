use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::AppState;

const SETTINGS_SCHEMA_VERSION: i64 = 1;

/// Connection settings resolved from the settings file with environment
/// fallback. Consumed once at startup when picking the storage backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub demo_mode: bool,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

#[tauri::command]
pub async fn get_settings(state: tauri::State<'_, AppState>) -> Result<Value, String> {
    load_settings_from_disk(&state.config_dir)
}

#[tauri::command]
pub async fn save_settings(
    state: tauri::State<'_, AppState>,
    settings: Value,
) -> Result<Value, String> {
    let saved = save_settings_to_disk(&state.config_dir, settings)?;
    log::info!("settings saved; backend changes apply on next launch");
    Ok(saved)
}

/// Resolve the backend connection from settings, falling back to the
/// `SUPABASE_URL` / `SUPABASE_ANON_KEY` environment variables when the
/// settings file leaves them empty.
pub fn backend_config(settings: &Value) -> BackendConfig {
    let demo_mode = settings
        .get("demoMode")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let supabase_url = non_empty_string(settings, "supabaseUrl")
        .or_else(|| std::env::var("SUPABASE_URL").ok())
        .unwrap_or_default();
    let supabase_anon_key = non_empty_string(settings, "supabaseAnonKey")
        .or_else(|| std::env::var("SUPABASE_ANON_KEY").ok())
        .unwrap_or_default();

    BackendConfig {
        demo_mode,
        supabase_url,
        supabase_anon_key,
    }
}

fn non_empty_string(settings: &Value, key: &str) -> Option<String> {
    settings
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn load_settings_from_disk(config_dir: &Path) -> Result<Value, String> {
    let path = settings_path(config_dir);
    ensure_config_dir(config_dir)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| json!({}))
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(config_dir: &Path, settings: Value) -> Result<Value, String> {
    let path = settings_path(config_dir);
    ensure_config_dir(config_dir)?;

    let mut merged = load_settings_from_disk(config_dir).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    Ok(migrated)
}

pub fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "supabaseUrl": "",
        "supabaseAnonKey": "",
        "demoMode": false,
        "maskSecrets": true,
        "theme": "system"
    })
}

fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.json")
}

fn ensure_config_dir(config_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(config_dir).map_err(|e| format!("Failed to create config directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);

    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object())
    else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    ensure_string(obj, "supabaseUrl");
    ensure_string(obj, "supabaseAnonKey");
    ensure_bool(obj, "demoMode", false);
    ensure_bool(obj, "maskSecrets", true);
    sanitize_enum(obj, "theme", &["light", "dark", "system"], "system");
}

fn ensure_string(map: &mut Map<String, Value>, key: &str) {
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    map.insert(key.to_string(), json!(value));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_are_filled_with_defaults() {
        let migrated = migrate_settings(json!({ "supabaseUrl": "https://proj.supabase.co" }));

        assert_eq!(migrated["supabaseUrl"], json!("https://proj.supabase.co"));
        assert_eq!(migrated["demoMode"], json!(false));
        assert_eq!(migrated["maskSecrets"], json!(true));
        assert_eq!(migrated["schema_version"], json!(SETTINGS_SCHEMA_VERSION));
    }

    #[test]
    fn invalid_values_are_sanitized() {
        let migrated = migrate_settings(json!({
            "supabaseUrl": 42,
            "demoMode": "yes",
            "theme": "neon"
        }));

        assert_eq!(migrated["supabaseUrl"], json!(""));
        assert_eq!(migrated["demoMode"], json!(false));
        assert_eq!(migrated["theme"], json!("system"));
    }

    #[test]
    fn merges_partial_settings_without_losing_existing_values() {
        let mut existing = default_settings();
        merge_settings(&mut existing, &json!({ "demoMode": true }));
        let migrated = migrate_settings(existing);

        assert_eq!(migrated["demoMode"], json!(true));
        assert_eq!(migrated["maskSecrets"], json!(true));
    }

    #[test]
    fn backend_config_reads_settings_values() {
        let settings = json!({
            "demoMode": false,
            "supabaseUrl": "https://proj.supabase.co",
            "supabaseAnonKey": "anon-key"
        });

        let config = backend_config(&settings);
        assert!(!config.demo_mode);
        assert_eq!(config.supabase_url, "https://proj.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon-key");
    }
}
