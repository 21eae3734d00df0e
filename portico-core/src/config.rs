//! Page configuration
//!
//! Every field has a default matching the stock portal markup, so an empty
//! JSON object (or no configuration at all) yields a working page.

use crate::feed::{FeedItem, sample_items};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub log_level: String,
    pub ids: ElementIds,
    pub font: FontCfg,
    pub reveal: RevealCfg,
    pub nav: NavCfg,
    pub theme: ThemeCfg,
    pub feed: FeedCfg,
    pub form: FormCfg,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ids: ElementIds::default(),
            font: FontCfg::default(),
            reveal: RevealCfg::default(),
            nav: NavCfg::default(),
            theme: ThemeCfg::default(),
            feed: FeedCfg::default(),
            form: FormCfg::default(),
        }
    }
}

impl PageConfig {
    /// Parse a configuration override; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse an optional override, logging and keeping defaults on failure.
    #[must_use]
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(text) = json.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::default();
        };
        Self::from_json(text).unwrap_or_else(|err| {
            log::warn!("ignoring page configuration: {err}");
            Self::default()
        })
    }
}

/// Element ids the page markup is expected to carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub contrast_button: String,
    pub text_increase: String,
    pub text_decrease: String,
    pub text_reset: String,
    pub line_height_button: String,
    pub images_button: String,
    pub big_cursor_button: String,
    pub toolbar: String,
    pub nav_toggle: String,
    pub nav_panel: String,
    pub logo: String,
    pub feed_list: String,
    pub contact_form: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            contrast_button: "toggle-contrast".to_string(),
            text_increase: "text-increase".to_string(),
            text_decrease: "text-decrease".to_string(),
            text_reset: "text-reset".to_string(),
            line_height_button: "line-height".to_string(),
            images_button: "toggle-images".to_string(),
            big_cursor_button: "big-cursor".to_string(),
            toolbar: "access-toolbar".to_string(),
            nav_toggle: "mobile-nav-toggle".to_string(),
            nav_panel: "mobile-panel".to_string(),
            logo: "logo".to_string(),
            feed_list: "latest-list".to_string(),
            contact_form: "contact-form".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontCfg {
    pub default_scale: f64,
    pub step: f64,
    pub floor: f64,
}

impl Default for FontCfg {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            step: 0.1,
            floor: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealCfg {
    pub selector: String,
    pub visible_class: String,
    pub threshold: f64,
}

impl Default for RevealCfg {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_string(),
            visible_class: "visible".to_string(),
            threshold: 0.12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavCfg {
    /// Class the collapse widget puts on an expanded panel.
    pub open_class: String,
    pub hide_delay_ms: u32,
    pub backdrop: bool,
    pub backdrop_id: String,
    pub backdrop_class: String,
}

impl Default for NavCfg {
    fn default() -> Self {
        Self {
            open_class: "show".to_string(),
            hide_delay_ms: 120,
            backdrop: false,
            backdrop_id: "mobile-backdrop".to_string(),
            backdrop_class: "mobile-backdrop".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeCfg {
    pub attribute: String,
    pub background_property: String,
    pub light_background: String,
    pub dark_background: String,
}

impl Default for ThemeCfg {
    fn default() -> Self {
        Self {
            attribute: "data-theme".to_string(),
            background_property: "--bg-blue".to_string(),
            light_background: "#d9eefc".to_string(),
            dark_background: "#06263a".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedCfg {
    pub render_limit: usize,
    pub sample: Vec<FeedItem>,
    pub entry_class: String,
    pub badge_class: String,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            render_limit: 3,
            sample: sample_items(),
            entry_class: "list-group-item list-group-item-action".to_string(),
            badge_class: "badge bg-secondary float-end".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormCfg {
    pub fields: Vec<String>,
    pub invalid_class: String,
    pub confirmation: String,
}

impl Default for FormCfg {
    fn default() -> Self {
        Self {
            fields: vec![
                "name".to_string(),
                "email".to_string(),
                "message".to_string(),
            ],
            invalid_class: "is-invalid".to_string(),
            confirmation: "Message sent (simulated). Thank you.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = PageConfig::from_json("{}").unwrap();
        assert_eq!(cfg, PageConfig::default());
        assert_eq!(cfg.nav.hide_delay_ms, 120);
        assert!(!cfg.nav.backdrop);
        assert_eq!(cfg.form.fields, ["name", "email", "message"]);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = PageConfig::from_json(r#"{"nav":{"backdrop":true},"ids":{"logo":"brand"}}"#)
            .unwrap();
        assert!(cfg.nav.backdrop);
        assert_eq!(cfg.nav.open_class, "show");
        assert_eq!(cfg.ids.logo, "brand");
        assert_eq!(cfg.ids.toolbar, "access-toolbar");
    }

    #[test]
    fn invalid_json_reports_error() {
        let err = PageConfig::from_json("{").unwrap_err();
        assert!(err.to_string().contains("JSON parsing error"));
    }

    #[test]
    fn lenient_parse_falls_back() {
        assert_eq!(
            PageConfig::from_json_or_default(Some(r#"{"font":{"step":"big"}}"#)),
            PageConfig::default()
        );
        assert_eq!(PageConfig::from_json_or_default(Some("  ")), PageConfig::default());
        assert_eq!(PageConfig::from_json_or_default(None), PageConfig::default());
    }
}
