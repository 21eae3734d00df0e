use portico_core::{FieldRule, FormField, Node};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

use crate::dom;

/// A live DOM element behind the [`Node`] seam.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebNode(HtmlElement);

impl WebNode {
    #[must_use]
    pub const fn new(element: HtmlElement) -> Self {
        Self(element)
    }

    #[must_use]
    pub fn from_element(element: Element) -> Option<Self> {
        element.dyn_into::<HtmlElement>().ok().map(Self)
    }

    #[must_use]
    pub fn by_id(doc: &Document, id: &str) -> Option<Self> {
        dom::element_by_id::<HtmlElement>(doc, id).map(Self)
    }

    #[must_use]
    pub const fn element(&self) -> &HtmlElement {
        &self.0
    }
}

impl Node for WebNode {
    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn toggle_class(&self, class: &str) -> bool {
        self.0
            .class_list()
            .toggle(class)
            .unwrap_or_else(|_| self.has_class(class))
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    /// Computed value, so stylesheet defaults count as well as inline values.
    fn style_property(&self, name: &str) -> Option<String> {
        dom::window()?
            .get_computed_style(&self.0)
            .ok()
            .flatten()?
            .get_property_value(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn set_style_property(&self, name: &str, value: &str) {
        let _ = self.0.style().set_property(name, value);
    }
}

impl FormField for WebNode {
    fn check_validity(&self) -> bool {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            return input.check_validity();
        }
        if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            return area.check_validity();
        }
        if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            return select.check_validity();
        }
        // contenteditable and friends: apply the declared rules to the text
        FieldRule::from_attributes(
            self.0.has_attribute("required"),
            self.0.get_attribute("type").as_deref(),
        )
        .accepts(&self.0.text_content().unwrap_or_default())
    }
}
