//! Accessibility toolbar behavior
//!
//! Font scaling is stored as a number and applied as the `--font-scale`
//! custom property on the root element. The four visual modes are body
//! classes mirrored one-to-one in preferences.

use crate::config::{ElementIds, FontCfg};
use crate::node::{Node, aria_bool};
use crate::prefs::{PrefKey, PrefStore, Prefs};
use serde_json::Value;

pub const FONT_SCALE_PROPERTY: &str = "--font-scale";
pub const HIDE_IMAGES_LABEL: &str = "Hide Images";
pub const SHOW_IMAGES_LABEL: &str = "Show Images";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualMode {
    HighContrast,
    LineHeight,
    HideImages,
    BigCursor,
}

impl VisualMode {
    pub const ALL: [Self; 4] = [
        Self::HighContrast,
        Self::LineHeight,
        Self::HideImages,
        Self::BigCursor,
    ];

    #[must_use]
    pub const fn body_class(self) -> &'static str {
        match self {
            Self::HighContrast => "high-contrast",
            Self::LineHeight => "increased-line-height",
            Self::HideImages => "hide-images",
            Self::BigCursor => "big-cursor",
        }
    }

    #[must_use]
    pub const fn pref_key(self) -> PrefKey {
        match self {
            Self::HighContrast => PrefKey::HighContrast,
            Self::LineHeight => PrefKey::LineHeight,
            Self::HideImages => PrefKey::HideImages,
            Self::BigCursor => PrefKey::BigCursor,
        }
    }
}

/// Buttons in the accessibility toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Contrast,
    TextIncrease,
    TextDecrease,
    TextReset,
    LineHeight,
    Images,
    BigCursor,
}

impl ToolbarButton {
    pub const ALL: [Self; 7] = [
        Self::Contrast,
        Self::TextIncrease,
        Self::TextDecrease,
        Self::TextReset,
        Self::LineHeight,
        Self::Images,
        Self::BigCursor,
    ];

    #[must_use]
    pub fn element_id(self, ids: &ElementIds) -> &str {
        match self {
            Self::Contrast => &ids.contrast_button,
            Self::TextIncrease => &ids.text_increase,
            Self::TextDecrease => &ids.text_decrease,
            Self::TextReset => &ids.text_reset,
            Self::LineHeight => &ids.line_height_button,
            Self::Images => &ids.images_button,
            Self::BigCursor => &ids.big_cursor_button,
        }
    }
}

/// Round to the two decimals the stylesheet receives.
#[must_use]
pub fn round_scale(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Leading-number parse of a CSS value such as `"1.1rem"` or `" 0.9"`.
#[must_use]
pub fn parse_scale(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a keydown inside the toolbar should be turned into a click.
#[must_use]
pub fn activates_on_enter(key: &str, target_tag: &str) -> bool {
    key == "Enter" && target_tag.eq_ignore_ascii_case("button")
}

pub struct AccessibilityController<N, S> {
    root: N,
    body: N,
    prefs: Prefs<S>,
    font: FontCfg,
    contrast_button: Option<N>,
    images_button: Option<N>,
}

impl<N: Node, S: PrefStore> AccessibilityController<N, S> {
    pub const fn new(root: N, body: N, prefs: Prefs<S>, font: FontCfg) -> Self {
        Self {
            root,
            body,
            prefs,
            font,
            contrast_button: None,
            images_button: None,
        }
    }

    /// Button that mirrors contrast state in `aria-pressed`.
    #[must_use]
    pub fn with_contrast_button(mut self, button: N) -> Self {
        self.contrast_button = Some(button);
        self
    }

    /// Button whose label flips between hide and show.
    #[must_use]
    pub fn with_images_button(mut self, button: N) -> Self {
        self.images_button = Some(button);
        self
    }

    /// Apply every persisted setting before any interaction.
    pub fn restore(&self) {
        self.apply_font_scale(self.stored_font_scale());
        for mode in VisualMode::ALL {
            let enabled = self.prefs.get(mode.pref_key(), false);
            self.body.set_class(mode.body_class(), enabled);
            self.reflect(mode, enabled);
        }
    }

    /// Scale currently in effect, read back from the root's computed style.
    #[must_use]
    pub fn font_scale(&self) -> f64 {
        self.root
            .style_property(FONT_SCALE_PROPERTY)
            .and_then(|raw| parse_scale(&raw))
            .filter(|v| *v != 0.0)
            .unwrap_or(self.font.default_scale)
    }

    pub fn increase_font(&self) -> f64 {
        let next = round_scale(self.font_scale() + self.font.step);
        self.apply_font_scale(next)
    }

    pub fn decrease_font(&self) -> f64 {
        let next = round_scale(self.font_scale() - self.font.step).max(self.font.floor);
        self.apply_font_scale(next)
    }

    pub fn reset_font(&self) -> f64 {
        self.apply_font_scale(self.font.default_scale)
    }

    /// Set the root property and persist the exact value applied.
    pub fn apply_font_scale(&self, scale: f64) -> f64 {
        self.root
            .set_style_property(FONT_SCALE_PROPERTY, &format!("{scale}rem"));
        self.prefs.set(PrefKey::FontScale, &scale);
        scale
    }

    /// Flip a visual mode, persist it and update any mirrored control.
    pub fn toggle(&self, mode: VisualMode) -> bool {
        let enabled = self.body.toggle_class(mode.body_class());
        self.prefs.set(mode.pref_key(), &enabled);
        self.reflect(mode, enabled);
        log::debug!("{} -> {enabled}", mode.body_class());
        enabled
    }

    /// Perform the action behind a toolbar button.
    pub fn activate(&self, button: ToolbarButton) {
        match button {
            ToolbarButton::Contrast => {
                self.toggle(VisualMode::HighContrast);
            }
            ToolbarButton::TextIncrease => {
                self.increase_font();
            }
            ToolbarButton::TextDecrease => {
                self.decrease_font();
            }
            ToolbarButton::TextReset => {
                self.reset_font();
            }
            ToolbarButton::LineHeight => {
                self.toggle(VisualMode::LineHeight);
            }
            ToolbarButton::Images => {
                self.toggle(VisualMode::HideImages);
            }
            ToolbarButton::BigCursor => {
                self.toggle(VisualMode::BigCursor);
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self, mode: VisualMode) -> bool {
        self.body.has_class(mode.body_class())
    }

    fn stored_font_scale(&self) -> f64 {
        // Older pages stored the scale as a formatted string ("1.10").
        let stored = match self.prefs.get(PrefKey::FontScale, Value::Null) {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_scale(&s),
            _ => None,
        };
        stored
            .filter(|v| v.is_finite() && *v > 0.0)
            .map_or(self.font.default_scale, |v| round_scale(v).max(self.font.floor))
    }

    fn reflect(&self, mode: VisualMode, enabled: bool) {
        match mode {
            VisualMode::HighContrast => {
                if let Some(button) = &self.contrast_button {
                    button.set_attribute("aria-pressed", aria_bool(enabled));
                }
            }
            VisualMode::HideImages => {
                if let Some(button) = &self.images_button {
                    button.set_text(if enabled {
                        SHOW_IMAGES_LABEL
                    } else {
                        HIDE_IMAGES_LABEL
                    });
                }
            }
            VisualMode::LineHeight | VisualMode::BigCursor => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefStore;
    use crate::sim::FakeNode;

    struct Fixture {
        root: FakeNode,
        body: FakeNode,
        contrast: FakeNode,
        images: FakeNode,
        prefs: Prefs<MemoryPrefStore>,
    }

    fn fixture(store: MemoryPrefStore) -> Fixture {
        Fixture {
            root: FakeNode::new("html"),
            body: FakeNode::new("body"),
            contrast: FakeNode::new("button"),
            images: FakeNode::new("button").with_text(HIDE_IMAGES_LABEL),
            prefs: Prefs::new(store),
        }
    }

    fn controller(f: &Fixture) -> AccessibilityController<FakeNode, MemoryPrefStore> {
        AccessibilityController::new(
            f.root.clone(),
            f.body.clone(),
            f.prefs.clone(),
            FontCfg::default(),
        )
        .with_contrast_button(f.contrast.clone())
        .with_images_button(f.images.clone())
    }

    fn stored_scale(f: &Fixture) -> f64 {
        f.prefs.get(PrefKey::FontScale, f64::NAN)
    }

    #[test]
    fn restore_defaults_to_unit_scale() {
        let f = fixture(MemoryPrefStore::new());
        controller(&f).restore();
        assert_eq!(f.root.style("--font-scale").as_deref(), Some("1rem"));
        assert!((stored_scale(&f) - 1.0).abs() < f64::EPSILON);
        assert_eq!(f.contrast.attribute("aria-pressed").as_deref(), Some("false"));
    }

    #[test]
    fn increase_steps_by_tenth() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.restore();
        assert!((a11y.increase_font() - 1.1).abs() < f64::EPSILON);
        assert!((a11y.increase_font() - 1.2).abs() < f64::EPSILON);
        assert_eq!(f.root.style("--font-scale").as_deref(), Some("1.2rem"));
        assert!((stored_scale(&f) - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn decrease_clamps_at_floor() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.restore();
        for _ in 0..6 {
            a11y.decrease_font();
        }
        assert!((a11y.font_scale() - 0.8).abs() < f64::EPSILON);
        assert!((stored_scale(&f) - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_restores_exactly_one() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.restore();
        a11y.increase_font();
        a11y.increase_font();
        assert!((a11y.reset_font() - 1.0).abs() < f64::EPSILON);
        assert_eq!(f.prefs.store().raw("fontScale").as_deref(), Some("1.0"));
    }

    #[test]
    fn external_property_edit_is_respected() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.restore();
        f.root.set_style_property(FONT_SCALE_PROPERTY, "1.5rem");
        assert!((a11y.increase_font() - 1.6).abs() < f64::EPSILON);
    }

    #[test]
    fn unreadable_property_falls_back_to_default() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        f.root.set_style_property(FONT_SCALE_PROPERTY, "large");
        assert!((a11y.font_scale() - 1.0).abs() < f64::EPSILON);
        f.root.set_style_property(FONT_SCALE_PROPERTY, "0rem");
        assert!((a11y.font_scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn legacy_string_scale_is_accepted() {
        let f = fixture(MemoryPrefStore::new().with_raw("fontScale", "\"1.30\""));
        controller(&f).restore();
        assert_eq!(f.root.style("--font-scale").as_deref(), Some("1.3rem"));
        assert!((stored_scale(&f) - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn stored_scale_below_floor_is_clamped() {
        let f = fixture(MemoryPrefStore::new().with_raw("fontScale", "0.5"));
        controller(&f).restore();
        assert_eq!(f.root.style("--font-scale").as_deref(), Some("0.8rem"));
    }

    #[test]
    fn toggles_persist_body_class_state() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.restore();
        for mode in VisualMode::ALL {
            let on = a11y.toggle(mode);
            assert!(on);
            assert_eq!(f.body.has_class(mode.body_class()), f.prefs.get(mode.pref_key(), false));
            let off = a11y.toggle(mode);
            assert!(!off);
            assert_eq!(f.body.has_class(mode.body_class()), f.prefs.get(mode.pref_key(), true));
        }
    }

    #[test]
    fn contrast_mirrors_aria_pressed() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.toggle(VisualMode::HighContrast);
        assert_eq!(f.contrast.attribute("aria-pressed").as_deref(), Some("true"));
    }

    #[test]
    fn hide_images_swaps_label() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.toggle(VisualMode::HideImages);
        assert_eq!(f.images.text(), SHOW_IMAGES_LABEL);
        a11y.toggle(VisualMode::HideImages);
        assert_eq!(f.images.text(), HIDE_IMAGES_LABEL);
    }

    #[test]
    fn restore_reapplies_saved_modes() {
        let store = MemoryPrefStore::new()
            .with_raw("hideImages", "true")
            .with_raw("bigCursor", "true");
        let f = fixture(store);
        controller(&f).restore();
        assert!(f.body.has_class("hide-images"));
        assert!(f.body.has_class("big-cursor"));
        assert!(!f.body.has_class("high-contrast"));
        assert_eq!(f.images.text(), SHOW_IMAGES_LABEL);
    }

    #[test]
    fn activate_routes_buttons() {
        let f = fixture(MemoryPrefStore::new());
        let a11y = controller(&f);
        a11y.restore();
        a11y.activate(ToolbarButton::BigCursor);
        a11y.activate(ToolbarButton::TextIncrease);
        assert!(a11y.is_enabled(VisualMode::BigCursor));
        assert!((a11y.font_scale() - 1.1).abs() < f64::EPSILON);
        a11y.activate(ToolbarButton::TextReset);
        assert!((a11y.font_scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn toolbar_ids_follow_config() {
        let ids = ElementIds::default();
        assert_eq!(ToolbarButton::Images.element_id(&ids), "toggle-images");
        assert_eq!(ToolbarButton::TextReset.element_id(&ids), "text-reset");
    }

    #[test]
    fn parse_scale_reads_leading_number() {
        assert_eq!(parse_scale("1.1rem"), Some(1.1));
        assert_eq!(parse_scale("  0.9 "), Some(0.9));
        assert_eq!(parse_scale("rem"), None);
        assert_eq!(parse_scale(""), None);
    }

    #[test]
    fn enter_on_button_activates() {
        assert!(activates_on_enter("Enter", "BUTTON"));
        assert!(activates_on_enter("Enter", "button"));
        assert!(!activates_on_enter("Enter", "A"));
        assert!(!activates_on_enter(" ", "BUTTON"));
    }
}
