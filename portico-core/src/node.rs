/// Element surface the controllers read and mutate.
///
/// Implementations are cheap handles (a `web_sys::HtmlElement` in the
/// browser, [`crate::sim::FakeNode`] in tests), so every method takes `&self`.
/// Writes are best effort: a failing DOM call is dropped, never reported.
pub trait Node {
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    /// Flip `class` and report whether it is present afterwards.
    fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    fn set_class(&self, class: &str, enabled: bool) {
        if enabled {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn set_text(&self, text: &str);

    /// Computed value of a CSS custom property, `None` when unset.
    fn style_property(&self, name: &str) -> Option<String>;
    fn set_style_property(&self, name: &str, value: &str);
}

/// Render a boolean the way ARIA attributes expect it.
#[must_use]
pub const fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FakeNode;

    #[test]
    fn toggle_class_reports_new_state() {
        let node = FakeNode::new("body");
        assert!(node.toggle_class("high-contrast"));
        assert!(node.has_class("high-contrast"));
        assert!(!node.toggle_class("high-contrast"));
        assert!(!node.has_class("high-contrast"));
    }

    #[test]
    fn set_class_is_idempotent() {
        let node = FakeNode::new("div");
        node.set_class("visible", true);
        node.set_class("visible", true);
        assert!(node.has_class("visible"));
        node.set_class("visible", false);
        node.set_class("visible", false);
        assert!(!node.has_class("visible"));
    }

    #[test]
    fn aria_bool_strings() {
        assert_eq!(aria_bool(true), "true");
        assert_eq!(aria_bool(false), "false");
    }
}
