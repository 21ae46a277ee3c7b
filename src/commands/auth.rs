use serde::Serialize;
use tauri::Emitter;

use crate::models::session::{AuthEvent, SessionInfo};
use crate::state::AppState;
use crate::storage::Store;

pub const AUTH_EVENT: &str = "auth-state-changed";

/// Payload of the auth event stream delivered to the webview.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatePayload {
    pub event: AuthEvent,
    pub email: Option<String>,
}

#[tauri::command]
pub async fn sign_in(
    state: tauri::State<'_, AppState>,
    app: tauri::AppHandle,
    email: String,
    password: String,
) -> Result<SessionInfo, String> {
    let info = sign_in_internal(&state.store, &email, &password).await?;
    emit_auth_event(&app, AuthEvent::SignedIn, Some(info.email.clone()));
    Ok(info)
}

#[tauri::command]
pub async fn sign_up(
    state: tauri::State<'_, AppState>,
    app: tauri::AppHandle,
    email: String,
    password: String,
) -> Result<SessionInfo, String> {
    let info = sign_up_internal(&state.store, &email, &password).await?;
    emit_auth_event(&app, AuthEvent::SignedIn, Some(info.email.clone()));
    Ok(info)
}

#[tauri::command]
pub async fn sign_out(
    state: tauri::State<'_, AppState>,
    app: tauri::AppHandle,
) -> Result<(), String> {
    sign_out_internal(&state.store).await?;
    emit_auth_event(&app, AuthEvent::SignedOut, None);
    Ok(())
}

#[tauri::command]
pub async fn current_session(
    state: tauri::State<'_, AppState>,
) -> Result<Option<SessionInfo>, String> {
    Ok(current_session_internal(&state.store))
}

/// Demo mode accepts any credentials and fabricates a local identity, the
/// way the original portal behaves without a configured project.
pub async fn sign_in_internal(
    store: &Store,
    email: &str,
    password: &str,
) -> Result<SessionInfo, String> {
    match store {
        Store::Supabase(client) => {
            let session = client
                .sign_in(email, password)
                .await
                .map_err(|e| format!("Sign-in failed: {e}"))?;
            Ok(SessionInfo::from(&session))
        }
        Store::Memory(memory) => {
            let _ = password;
            Ok(SessionInfo::from(&memory.sign_in(email)))
        }
    }
}

pub async fn sign_up_internal(
    store: &Store,
    email: &str,
    password: &str,
) -> Result<SessionInfo, String> {
    match store {
        Store::Supabase(client) => {
            let session = client
                .sign_up(email, password)
                .await
                .map_err(|e| format!("Sign-up failed: {e}"))?;
            Ok(SessionInfo::from(&session))
        }
        Store::Memory(memory) => {
            let _ = password;
            Ok(SessionInfo::from(&memory.sign_in(email)))
        }
    }
}

pub async fn sign_out_internal(store: &Store) -> Result<(), String> {
    match store {
        Store::Supabase(client) => client
            .sign_out()
            .await
            .map_err(|e| format!("Sign-out failed: {e}")),
        Store::Memory(memory) => {
            memory.sign_out();
            Ok(())
        }
    }
}

pub fn current_session_internal(store: &Store) -> Option<SessionInfo> {
    match store {
        Store::Supabase(client) => client.current_session().map(|s| SessionInfo::from(&s)),
        Store::Memory(memory) => memory.current_session().map(|s| SessionInfo::from(&s)),
    }
}

fn emit_auth_event(app: &tauri::AppHandle, event: AuthEvent, email: Option<String>) {
    if let Err(err) = app.emit(AUTH_EVENT, AuthStatePayload { event, email }) {
        log::warn!("failed to emit auth event: {err}");
    }
}
