//! Portico page behavior
//!
//! Platform-agnostic controllers for the portal's client-side enhancements:
//! accessibility toggles, the mobile navigation panel, reveal-on-scroll,
//! contact form validation, the latest-items feed and the theme switch.
//! Elements, storage, timers and the collapse widget are reached through
//! small traits so the same logic runs in the browser and against the
//! in-memory doubles in [`sim`].

pub mod a11y;
pub mod config;
pub mod feed;
pub mod form;
pub mod nav;
pub mod node;
pub mod prefs;
pub mod reveal;
pub mod sim;
pub mod theme;

// Re-export commonly used types
pub use a11y::{AccessibilityController, ToolbarButton, VisualMode, activates_on_enter};
pub use config::{
    ConfigError, ElementIds, FeedCfg, FontCfg, FormCfg, NavCfg, PageConfig, RevealCfg, ThemeCfg,
};
pub use feed::{FeedItem, FeedList, FeedOutcome, seed_or_render};
pub use form::{ContactForm, FieldRule, FormField, FormHandle, FormSlot, Notifier, SubmitOutcome};
pub use nav::{BackdropHost, CollapseDriver, CollapseEvent, NavPanel, PanelState, Scheduler, TaskId};
pub use node::Node;
pub use prefs::{MemoryPrefStore, PrefError, PrefKey, PrefStore, Prefs, StoreMode};
pub use reveal::{IntersectionSample, RevealTracker};
pub use theme::{Theme, ThemeController};
