//! Browser capabilities the table needs: the `localStorage` slot, the
//! blocking confirm prompt and the page-supplied config.

use incident_core::{StorageError, StorageResult, StorageSlot, TableConfig};
use js_sys::{Reflect, JSON};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Global a host page may set to a config object or JSON string.
const CONFIG_GLOBAL: &str = "__INCIDENT_TABLE_CONFIG__";

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "window not available".to_string())
}

fn local_storage() -> Result<Storage, String> {
    window()?
        .local_storage()
        .map_err(|e| format!("localStorage access denied: {e:?}"))?
        .ok_or_else(|| "localStorage not available".to_string())
}

/// `window.localStorage` as a storage slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl StorageSlot for BrowserStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let storage = local_storage().map_err(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Read(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let storage = local_storage().map_err(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }
}

/// Blocks on `window.confirm`. Anything but an explicit yes is a no.
pub fn confirm(message: &str) -> bool {
    match window() {
        Ok(w) => w.confirm_with_message(message).unwrap_or(false),
        Err(e) => {
            tracing::warn!(error = %e, "confirm prompt unavailable");
            false
        }
    }
}

fn config_source() -> Result<Option<String>, String> {
    let window = window()?;
    let value = Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|_| format!("failed to access {CONFIG_GLOBAL}"))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(raw) = value.as_string() {
        return Ok(Some(raw));
    }
    let raw = JSON::stringify(&value).map_err(|e| format!("config not serializable: {e:?}"))?;
    Ok(raw.as_string())
}

/// Table config from the host page, falling back to defaults.
pub fn page_config() -> TableConfig {
    let raw = match config_source() {
        Ok(Some(raw)) => raw,
        Ok(None) => return TableConfig::default(),
        Err(e) => {
            tracing::warn!(error = %e, "using default table config");
            return TableConfig::default();
        }
    };
    TableConfig::from_json(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default table config");
        TableConfig::default()
    })
}
