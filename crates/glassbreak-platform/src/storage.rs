//! Key-Value Storage
//!
//! Small persistent string store, the native counterpart of browser local
//! storage. Holds the session quality tier and one-shot UI hints.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glassbreak_core::QualityTier;
use parking_lot::Mutex;

use crate::PlatformResult;

/// Key the quality tier is persisted under
pub const QUALITY_KEY: &str = "glassQuality";

/// Key recording that the double-tap hint was shown
pub const TAP_HINT_KEY: &str = "tapHintShown";

/// Viewport width at or below which the double-tap hint applies
pub const TAP_HINT_MAX_WIDTH: u32 = 600;

/// String key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> PlatformResult<Option<String>>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> PlatformResult<()>;

    /// Delete a value
    fn remove(&self, key: &str) -> PlatformResult<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PlatformResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PlatformResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PlatformResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON-file backed store; the whole map is rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store, starting empty if the file is missing or unreadable
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::load(&path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn load(path: &Path) -> PlatformResult<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> PlatformResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PlatformResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PlatformResult<()> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> PlatformResult<()> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Read the persisted tier; anything missing or unrecognised is `Low`
pub fn load_quality_tier(store: &dyn KeyValueStore) -> QualityTier {
    match store.get(QUALITY_KEY) {
        Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
            log::warn!("{}, falling back to {}", e, QualityTier::Low);
            QualityTier::Low
        }),
        Ok(None) => QualityTier::Low,
        Err(e) => {
            log::warn!("Could not read quality tier: {}", e);
            QualityTier::Low
        }
    }
}

/// Persist the tier for the next session
pub fn save_quality_tier(store: &dyn KeyValueStore, tier: QualityTier) -> PlatformResult<()> {
    store.set(QUALITY_KEY, tier.as_str())
}

/// True exactly once per store on narrow viewports: the first time the
/// double-tap hint should be displayed.
pub fn take_tap_hint(store: &dyn KeyValueStore, viewport_width: u32) -> bool {
    if viewport_width > TAP_HINT_MAX_WIDTH {
        return false;
    }
    match store.get(TAP_HINT_KEY) {
        Ok(Some(_)) => false,
        Ok(None) => {
            if let Err(e) = store.set(TAP_HINT_KEY, "true") {
                log::debug!("Could not record tap hint: {}", e);
            }
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glassbreak-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_quality_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(load_quality_tier(&store), QualityTier::Low);

        save_quality_tier(&store, QualityTier::High).unwrap();
        assert_eq!(store.get(QUALITY_KEY).unwrap().as_deref(), Some("high"));
        assert_eq!(load_quality_tier(&store), QualityTier::High);
    }

    #[test]
    fn test_quality_garbage_falls_back_to_low() {
        let store = MemoryStore::new();
        store.set(QUALITY_KEY, "ultra-mega").unwrap();
        assert_eq!(load_quality_tier(&store), QualityTier::Low);
    }

    #[test]
    fn test_file_store_persists() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        {
            let store = FileStore::open(&path);
            save_quality_tier(&store, QualityTier::Medium).unwrap();
        }

        let reopened = FileStore::open(&path);
        assert_eq!(load_quality_tier(&reopened), QualityTier::Medium);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(QUALITY_KEY).unwrap(), None);
        assert_eq!(load_quality_tier(&store), QualityTier::Low);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_tap_hint_once() {
        let store = MemoryStore::new();
        assert!(!take_tap_hint(&store, 1280));
        assert!(take_tap_hint(&store, 390));
        assert!(!take_tap_hint(&store, 390));
    }
}
