//! Accessibility toolbar wiring.

use std::rc::Rc;

use portico_core::{AccessibilityController, PageConfig, PrefStore, Prefs, ToolbarButton, activates_on_enter};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, KeyboardEvent};

use crate::dom;
use crate::node::WebNode;

pub type WebAccessibility<S> = AccessibilityController<WebNode, S>;

/// Restore saved settings and bind the toolbar buttons.
///
/// Returns `None` only when the page has no `<html>` or `<body>`; missing
/// buttons are skipped.
pub fn mount<S: PrefStore + 'static>(
    doc: &Document,
    cfg: &PageConfig,
    prefs: &Prefs<S>,
) -> Option<Rc<WebAccessibility<S>>> {
    let root = dom::root_element(doc).map(WebNode::new)?;
    let body = doc.body().map(WebNode::new)?;
    let button = |which: ToolbarButton| WebNode::by_id(doc, which.element_id(&cfg.ids));

    let mut controller = AccessibilityController::new(root, body, prefs.clone(), cfg.font);
    if let Some(node) = button(ToolbarButton::Contrast) {
        controller = controller.with_contrast_button(node);
    }
    if let Some(node) = button(ToolbarButton::Images) {
        controller = controller.with_images_button(node);
    }
    controller.restore();
    let controller = Rc::new(controller);

    for which in ToolbarButton::ALL {
        let Some(node) = button(which) else {
            log::info!("toolbar button #{} not found", which.element_id(&cfg.ids));
            continue;
        };
        let controller = Rc::clone(&controller);
        dom::listen(node.element(), "click", move |_| controller.activate(which));
    }

    if let Some(toolbar) = dom::element_by_id::<HtmlElement>(doc, &cfg.ids.toolbar) {
        dom::listen(&toolbar, "keydown", |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            if activates_on_enter(&key, &target.tag_name()) {
                // stop the native activation so the button fires once
                event.prevent_default();
                target.click();
            }
        });
    }

    Some(controller)
}
