//! Preference persistence
//!
//! Backing stores implement [`PrefStore`] and report failures as
//! [`PrefError`]. Controllers only ever talk to [`Prefs`], which turns every
//! failure into the caller's fallback: losing all preferences (private
//! browsing, disabled storage, quota) must leave each feature usable.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum PrefError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage write failed: {0}")]
    Write(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raw string key-value persistence scoped to the page's origin.
pub trait PrefStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    fn read_raw(&self, key: &str) -> Result<Option<String>, PrefError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable or rejects the write.
    fn write_raw(&self, key: &str, value: &str) -> Result<(), PrefError>;

    /// Remove `key` from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    fn remove_raw(&self, key: &str) -> Result<(), PrefError>;
}

impl<S: PrefStore + ?Sized> PrefStore for Rc<S> {
    fn read_raw(&self, key: &str) -> Result<Option<String>, PrefError> {
        (**self).read_raw(key)
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), PrefError> {
        (**self).write_raw(key, value)
    }

    fn remove_raw(&self, key: &str) -> Result<(), PrefError> {
        (**self).remove_raw(key)
    }
}

/// Every preference the page persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefKey {
    FontScale,
    HighContrast,
    LineHeight,
    HideImages,
    BigCursor,
    LatestItems,
    Theme,
}

impl PrefKey {
    pub const ALL: [Self; 7] = [
        Self::FontScale,
        Self::HighContrast,
        Self::LineHeight,
        Self::HideImages,
        Self::BigCursor,
        Self::LatestItems,
        Self::Theme,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FontScale => "fontScale",
            Self::HighContrast => "highContrast",
            Self::LineHeight => "lineHeight",
            Self::HideImages => "hideImages",
            Self::BigCursor => "bigCursor",
            Self::LatestItems => "latestItems",
            Self::Theme => "theme",
        }
    }
}

/// JSON get/set over a shared [`PrefStore`] with silent failure.
pub struct Prefs<S> {
    store: Rc<S>,
}

impl<S> Clone for Prefs<S> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
        }
    }
}

impl<S: PrefStore> Prefs<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    pub const fn from_shared(store: Rc<S>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and deserialize `key`, falling back when it is absent, the store
    /// is unavailable, or the stored JSON does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, key: PrefKey, fallback: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(err) => {
                log::debug!("preference {} unreadable: {err}", key.as_str());
                fallback
            }
        }
    }

    /// Serialize and store `value`; failures are logged and dropped.
    pub fn set<T: Serialize + ?Sized>(&self, key: PrefKey, value: &T) {
        if let Err(err) = self.try_set(key, value) {
            log::debug!("preference {} not saved: {err}", key.as_str());
        }
    }

    /// Remove `key`; failures are logged and dropped.
    pub fn clear(&self, key: PrefKey) {
        if let Err(err) = self.store.remove_raw(key.as_str()) {
            log::debug!("preference {} not cleared: {err}", key.as_str());
        }
    }

    fn try_get<T: DeserializeOwned>(&self, key: PrefKey) -> Result<Option<T>, PrefError> {
        match self.store.read_raw(key.as_str())? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    fn try_set<T: Serialize + ?Sized>(&self, key: PrefKey, value: &T) -> Result<(), PrefError> {
        let raw = serde_json::to_string(value)?;
        self.store.write_raw(key.as_str(), &raw)
    }
}

/// How a [`MemoryPrefStore`] responds to access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreMode {
    #[default]
    Normal,
    /// Reads succeed, writes fail as if the quota were exhausted.
    QuotaExceeded,
    /// Every access fails as if storage were disabled.
    Unavailable,
}

/// In-memory [`PrefStore`] for tests and the headless tester.
#[derive(Debug, Default)]
pub struct MemoryPrefStore {
    entries: RefCell<BTreeMap<String, String>>,
    mode: Cell<StoreMode>,
}

impl MemoryPrefStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the mode check.
    #[must_use]
    pub fn with_raw(self, key: &str, raw: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        self
    }

    /// Raw stored value, bypassing the mode check.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn set_mode(&self, mode: StoreMode) {
        self.mode.set(mode);
    }

    #[must_use]
    pub fn mode(&self) -> StoreMode {
        self.mode.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PrefStore for MemoryPrefStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, PrefError> {
        if self.mode.get() == StoreMode::Unavailable {
            return Err(PrefError::Unavailable("storage disabled".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), PrefError> {
        match self.mode.get() {
            StoreMode::Unavailable => Err(PrefError::Unavailable("storage disabled".to_string())),
            StoreMode::QuotaExceeded => Err(PrefError::Write(format!("quota exceeded for {key}"))),
            StoreMode::Normal => {
                self.entries
                    .borrow_mut()
                    .insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    fn remove_raw(&self, key: &str) -> Result<(), PrefError> {
        if self.mode.get() == StoreMode::Unavailable {
            return Err(PrefError::Unavailable("storage disabled".to_string()));
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_fallback_when_absent() {
        let prefs = Prefs::new(MemoryPrefStore::new());
        assert!(!prefs.get(PrefKey::HighContrast, false));
        assert!((prefs.get(PrefKey::FontScale, 1.0_f64) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn set_then_get_round_trips_json() {
        let prefs = Prefs::new(MemoryPrefStore::new());
        prefs.set(PrefKey::BigCursor, &true);
        assert_eq!(prefs.store().raw("bigCursor").as_deref(), Some("true"));
        assert!(prefs.get(PrefKey::BigCursor, false));
    }

    #[test]
    fn malformed_json_falls_back() {
        let store = MemoryPrefStore::new().with_raw("lineHeight", "{not json");
        let prefs = Prefs::new(store);
        assert!(prefs.get(PrefKey::LineHeight, true));
    }

    #[test]
    fn wrong_shape_falls_back() {
        let store = MemoryPrefStore::new().with_raw("highContrast", "\"yes\"");
        let prefs = Prefs::new(store);
        assert!(!prefs.get(PrefKey::HighContrast, false));
    }

    #[test]
    fn empty_raw_value_counts_as_absent() {
        let store = MemoryPrefStore::new().with_raw("theme", "");
        let prefs = Prefs::new(store);
        assert_eq!(prefs.get(PrefKey::Theme, "light".to_string()), "light");
    }

    #[test]
    fn unavailable_store_is_silent() {
        let store = MemoryPrefStore::new().with_raw("highContrast", "true");
        store.set_mode(StoreMode::Unavailable);
        let prefs = Prefs::new(store);
        prefs.set(PrefKey::HighContrast, &false);
        assert!(!prefs.get(PrefKey::HighContrast, false));
        prefs.clear(PrefKey::HighContrast);
        assert_eq!(prefs.store().raw("highContrast").as_deref(), Some("true"));
    }

    #[test]
    fn quota_exceeded_keeps_previous_value() {
        let store = MemoryPrefStore::new().with_raw("fontScale", "1.2");
        store.set_mode(StoreMode::QuotaExceeded);
        let prefs = Prefs::new(store);
        prefs.set(PrefKey::FontScale, &1.3);
        assert!((prefs.get(PrefKey::FontScale, 1.0_f64) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn clones_share_the_same_store() {
        let prefs = Prefs::new(MemoryPrefStore::new());
        let other = prefs.clone();
        other.set(PrefKey::Theme, "dark");
        assert_eq!(prefs.get(PrefKey::Theme, String::new()), "dark");
    }

    #[test]
    fn keys_match_storage_names() {
        let names: Vec<_> = PrefKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            [
                "fontScale",
                "highContrast",
                "lineHeight",
                "hideImages",
                "bigCursor",
                "latestItems",
                "theme"
            ]
        );
    }
}
