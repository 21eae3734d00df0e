use portico_core::{PrefError, PrefStore, Prefs};

use crate::dom;

/// [`PrefStore`] over the origin's `localStorage`.
///
/// The handle is looked up on every access, so storage that becomes
/// unavailable mid-session degrades the same way as storage that never was.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStoragePrefs;

impl LocalStoragePrefs {
    /// Preferences backed by `localStorage`.
    #[must_use]
    pub fn open() -> Prefs<Self> {
        Prefs::new(Self)
    }
}

fn storage() -> Result<web_sys::Storage, PrefError> {
    dom::local_storage().map_err(|err| PrefError::Unavailable(dom::js_error_message(&err)))
}

impl PrefStore for LocalStoragePrefs {
    fn read_raw(&self, key: &str) -> Result<Option<String>, PrefError> {
        storage()?
            .get_item(key)
            .map_err(|err| PrefError::Unavailable(dom::js_error_message(&err)))
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), PrefError> {
        storage()?
            .set_item(key, value)
            .map_err(|err| PrefError::Write(dom::js_error_message(&err)))
    }

    fn remove_raw(&self, key: &str) -> Result<(), PrefError> {
        storage()?
            .remove_item(key)
            .map_err(|err| PrefError::Unavailable(dom::js_error_message(&err)))
    }
}
