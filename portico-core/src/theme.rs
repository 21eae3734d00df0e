use crate::config::ThemeCfg;
use crate::node::Node;
use crate::prefs::{PrefKey, PrefStore, Prefs};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Theme that follows the body attribute value: anything but `light`
    /// (or a missing attribute) switches back to light.
    #[must_use]
    pub fn next_after(current: Option<&str>) -> Self {
        match current.unwrap_or("light") {
            "light" => Self::Dark,
            _ => Self::Light,
        }
    }
}

/// Light/dark switch toggled by double-clicking the logo.
pub struct ThemeController<N, S> {
    body: N,
    root: N,
    prefs: Prefs<S>,
    cfg: ThemeCfg,
}

impl<N: Node, S: PrefStore> ThemeController<N, S> {
    pub const fn new(body: N, root: N, prefs: Prefs<S>, cfg: ThemeCfg) -> Self {
        Self {
            body,
            root,
            prefs,
            cfg,
        }
    }

    #[must_use]
    pub fn background(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.cfg.light_background,
            Theme::Dark => &self.cfg.dark_background,
        }
    }

    /// Theme currently on the body, defaulting to light.
    #[must_use]
    pub fn current(&self) -> Theme {
        match self.body.attribute(&self.cfg.attribute).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn restore(&self) -> Theme {
        let saved = self.prefs.get(PrefKey::Theme, Theme::Light);
        self.apply(saved);
        saved
    }

    pub fn toggle(&self) -> Theme {
        let next = Theme::next_after(self.body.attribute(&self.cfg.attribute).as_deref());
        self.apply(next);
        self.prefs.set(PrefKey::Theme, &next);
        log::debug!("theme -> {}", next.as_str());
        next
    }

    fn apply(&self, theme: Theme) {
        self.body.set_attribute(&self.cfg.attribute, theme.as_str());
        self.root
            .set_style_property(&self.cfg.background_property, self.background(theme));
    }
}
