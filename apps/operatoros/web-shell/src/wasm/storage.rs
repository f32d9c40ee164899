use super::*;

/// `window.localStorage`, resolved on every call so a page that disables
/// storage mid-session degrades to logged failures.
#[derive(Debug, Default)]
pub(super) struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, String> {
        let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
        window
            .local_storage()
            .map_err(|_| "localStorage access was denied".to_string())?
            .ok_or_else(|| "localStorage is unavailable".to_string())
    }
}

impl HistoryStorage for LocalStorage {
    type Error = String;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| format!("failed to read localStorage key {key}"))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| format!("failed to write localStorage key {key}"))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| format!("failed to remove localStorage key {key}"))
    }
}
