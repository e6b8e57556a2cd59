use std::collections::HashMap;

use crate::errors::CoreError;

/// Minimal string key-value store the tracker persists into.
///
/// Mirrors the browser's `localStorage` contract: one string per key,
/// whole-value overwrites, no transactions. Each platform gets its own
/// implementation; the rest of the crate only sees this trait.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing was saved yet.
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Overwrite the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set_item(key, value)
    }
}

/// In-process store. Nothing survives the process; used by tests and hosts
/// that persist the raw JSON themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store (native only): each key lives in `<dir>/<key>.json`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Use `dir` as the storage root, creating it if it does not exist.
    pub fn open(dir: impl Into<std::path::PathBuf>) -> Result<Self, CoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<std::path::PathBuf, CoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(CoreError::Storage(format!(
                "Invalid storage key '{key}': use ASCII letters, digits, '_', '-' or '.'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        // Write next to the target and rename, so a crash never leaves half a file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// The browser's `window.localStorage` (wasm32 only).
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Grab `localStorage` from the global window.
    pub fn from_window() -> Result<Self, CoreError> {
        let window =
            web_sys::window().ok_or_else(|| CoreError::Storage("No global window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| CoreError::Storage(format!("localStorage unavailable: {e:?}")))?
            .ok_or_else(|| CoreError::Storage("localStorage is disabled".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| CoreError::Storage(format!("localStorage read failed: {e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| CoreError::Storage(format!("localStorage write failed: {e:?}")))
    }
}
