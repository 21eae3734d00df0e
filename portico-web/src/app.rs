//! Page startup.
//!
//! Each component mounts on its own: a missing element or library disables
//! that component and nothing else.

use portico_core::{FeedOutcome, PageConfig, PrefStore, Prefs};
use web_sys::Document;

use crate::reveal::RevealMode;
use crate::storage::LocalStoragePrefs;
use crate::{a11y, dom, feed, form, nav, reveal, theme};

/// Which components came up on this page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MountReport {
    pub accessibility: bool,
    pub navigation: bool,
    pub reveal: Option<RevealMode>,
    pub contact_form: bool,
    pub feed: Option<FeedOutcome>,
    pub theme: bool,
}

/// Mount every component with `localStorage` preferences.
pub fn mount(doc: &Document, cfg: &PageConfig) -> MountReport {
    mount_with(doc, cfg, &LocalStoragePrefs::open())
}

pub fn mount_with<S: PrefStore + 'static>(
    doc: &Document,
    cfg: &PageConfig,
    prefs: &Prefs<S>,
) -> MountReport {
    let report = MountReport {
        accessibility: a11y::mount(doc, cfg, prefs).is_some(),
        navigation: nav::mount(doc, cfg).is_some(),
        reveal: Some(reveal::mount(doc, &cfg.reveal)),
        contact_form: form::mount(doc, cfg).is_some(),
        feed: feed::mount(doc, cfg, prefs),
        theme: theme::mount(doc, cfg, prefs).is_some(),
    };
    log::info!("page mounted: {report:?}");
    report
}

/// Mount once the document has finished parsing.
pub fn run(doc: &Document, cfg: PageConfig) {
    if doc.ready_state() != "loading" {
        mount(doc, &cfg);
        return;
    }
    let ready = doc.clone();
    let mut pending = Some(cfg);
    dom::listen(doc, "DOMContentLoaded", move |_| {
        if let Some(cfg) = pending.take() {
            mount(&ready, &cfg);
        }
    });
}
