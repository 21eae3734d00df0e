//! Latest-items list.

use portico_core::{FeedCfg, FeedItem, FeedList, FeedOutcome, PageConfig, PrefStore, Prefs, seed_or_render};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::dom;

/// List container that gains one link per item.
pub struct WebFeedList {
    doc: Document,
    container: Element,
    entry_class: String,
    badge_class: String,
}

impl WebFeedList {
    #[must_use]
    pub fn new(doc: &Document, container: Element, cfg: &FeedCfg) -> Self {
        Self {
            doc: doc.clone(),
            container,
            entry_class: cfg.entry_class.clone(),
            badge_class: cfg.badge_class.clone(),
        }
    }

    fn entry(&self, item: &FeedItem) -> Result<Element, JsValue> {
        let link = self.doc.create_element("a")?;
        link.set_class_name(&self.entry_class);
        link.set_attribute("href", "#")?;
        // text nodes, never markup
        link.append_child(&self.doc.create_text_node(&format!("{} ", item.text)))?;
        let badge = self.doc.create_element("span")?;
        badge.set_class_name(&self.badge_class);
        badge.set_text_content(Some(&item.date));
        link.append_child(&badge)?;
        Ok(link)
    }
}

impl FeedList for WebFeedList {
    fn prepend(&self, item: &FeedItem) {
        let inserted = self
            .entry(item)
            .and_then(|link| self.container.prepend_with_node_1(&link));
        if let Err(err) = inserted {
            log::warn!("feed entry not inserted: {}", dom::js_error_message(&err));
        }
    }
}

/// Seed or render the feed when the page has a list container.
pub fn mount<S: PrefStore>(doc: &Document, cfg: &PageConfig, prefs: &Prefs<S>) -> Option<FeedOutcome> {
    let container = doc.get_element_by_id(&cfg.ids.feed_list)?;
    let list = WebFeedList::new(doc, container, &cfg.feed);
    Some(seed_or_render(prefs, &list, &cfg.feed))
}
