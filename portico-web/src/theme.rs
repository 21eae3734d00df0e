//! Light/dark theme switch on logo double-click.

use std::rc::Rc;

use portico_core::{PageConfig, PrefStore, Prefs, ThemeController};
use web_sys::Document;

use crate::dom;
use crate::node::WebNode;

pub type WebTheme<S> = ThemeController<WebNode, S>;

/// Apply the saved theme and bind the logo, when there is one.
pub fn mount<S: PrefStore + 'static>(
    doc: &Document,
    cfg: &PageConfig,
    prefs: &Prefs<S>,
) -> Option<Rc<WebTheme<S>>> {
    let root = dom::root_element(doc).map(WebNode::new)?;
    let body = doc.body().map(WebNode::new)?;
    let controller = Rc::new(ThemeController::new(
        body,
        root,
        prefs.clone(),
        cfg.theme.clone(),
    ));
    controller.restore();

    match WebNode::by_id(doc, &cfg.ids.logo) {
        Some(logo) => {
            let on_dblclick = Rc::clone(&controller);
            dom::listen(logo.element(), "dblclick", move |_| {
                on_dblclick.toggle();
            });
        }
        None => log::info!("logo #{} not found; theme switch disabled", cfg.ids.logo),
    }
    Some(controller)
}
