use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlElement, NodeList, Storage, Window};

/// The global `window`, absent outside a browser context.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// The page document, absent outside a browser context.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console, bypassing the `log` facade.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage`
/// is disabled (private browsing, storage blocked by policy).
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("window unavailable"))?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Look up an element by id and cast it, `None` when missing or of another type.
#[must_use]
pub fn element_by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// The `<html>` element.
#[must_use]
pub fn root_element(doc: &Document) -> Option<HtmlElement> {
    doc.document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Every node of `list` that casts to `T`, in document order.
#[must_use]
pub fn nodes_of<T: JsCast>(list: &NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Attach `handler` for the rest of the page's lifetime.
///
/// Returns `false` (after logging) when the browser refuses the listener.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> bool {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        Ok(()) => {
            closure.forget();
            true
        }
        Err(err) => {
            log::warn!("could not listen for {event}: {}", js_error_message(&err));
            false
        }
    }
}

/// An event listener detached again when dropped.
pub struct Listener {
    target: EventTarget,
    event: String,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// # Errors
    /// Returns the browser's error if the listener cannot be attached.
    pub fn new(
        target: &EventTarget,
        event: &str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event: event.to_string(),
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(&self.event, self.closure.as_ref().unchecked_ref());
    }
}
