use portico_core::PageConfig;
use web_sys::Document;

/// Id of the `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "portico-config";

/// Page configuration from the embedded JSON block, or defaults.
#[must_use]
pub fn load(doc: &Document) -> PageConfig {
    let text = doc
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    PageConfig::from_json_or_default(text.as_deref())
}
