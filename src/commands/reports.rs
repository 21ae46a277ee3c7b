use parking_lot::Mutex;

use crate::models::report::SecurityReport;
use crate::reporting;
use crate::state::AppState;
use crate::storage::RecordStore;

#[tauri::command]
pub async fn get_security_report(
    state: tauri::State<'_, AppState>,
) -> Result<SecurityReport, String> {
    Ok(get_security_report_internal(&state.store, &state.last_report).await)
}

/// Fetch both collections and aggregate. A fetch failure is never fatal:
/// it is logged and the last served report (or an all-zero one) goes out
/// instead. Retrying is left to the next refresh.
pub async fn get_security_report_internal<S: RecordStore>(
    store: &S,
    last_report: &Mutex<Option<SecurityReport>>,
) -> SecurityReport {
    let fetched = match (store.list_api_keys().await, store.list_ip_addresses().await) {
        (Ok(api_keys), Ok(ip_addresses)) => Some((api_keys, ip_addresses)),
        (Err(err), _) | (_, Err(err)) => {
            log::warn!("report fetch failed, serving fallback: {err}");
            None
        }
    };

    match fetched {
        Some((api_keys, ip_addresses)) => {
            let report = reporting::compute_report(&api_keys, &ip_addresses);
            *last_report.lock() = Some(report.clone());
            report
        }
        None => last_report
            .lock()
            .clone()
            .unwrap_or_else(|| reporting::compute_report(&[], &[])),
    }
}
