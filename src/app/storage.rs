use serde::{de::DeserializeOwned, Serialize};
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn get_string(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

pub fn set_string(key: &str, value: &str) {
    let Some(storage) = local_storage() else {
        log::warn!("Local storage is not available, `{key}` is not persisted");
        return;
    };
    if let Err(err) = storage.set_item(key, value) {
        log::error!("Failed to store `{key}`: {err:?}");
    }
}

pub fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Reads and decodes a JSON value. Undecodable values are logged and
/// treated as missing.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = get_string(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring unreadable `{key}` in local storage: {err}");
            None
        }
    }
}

pub fn save_json<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => set_string(key, &json),
        Err(err) => log::error!("Failed to encode `{key}`: {err}"),
    }
}
