//! Mobile navigation panel over Bootstrap's collapse widget.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use portico_core::{
    BackdropHost, CollapseDriver, CollapseEvent, NavCfg, NavPanel, PageConfig, Scheduler, TaskId,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::dom::{self, Listener};
use crate::node::WebNode;

pub type WebNav = NavPanel<WebNode, BootstrapCollapse>;

/// A `bootstrap.Collapse` instance bound to the panel.
pub struct BootstrapCollapse {
    instance: JsValue,
}

impl BootstrapCollapse {
    /// `bootstrap.Collapse.getOrCreateInstance(panel, { toggle: false })`, or
    /// `None` when the library is not on the page.
    #[must_use]
    pub fn attach(panel: &HtmlElement) -> Option<Self> {
        let window = dom::window()?;
        let bootstrap = Reflect::get(&window, &JsValue::from_str("bootstrap"))
            .ok()
            .filter(JsValue::is_object)?;
        let collapse = Reflect::get(&bootstrap, &JsValue::from_str("Collapse"))
            .ok()
            .filter(JsValue::is_function)?;
        let factory = Reflect::get(&collapse, &JsValue::from_str("getOrCreateInstance"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("toggle"), &JsValue::FALSE).ok()?;
        match factory.call2(&collapse, panel, &options) {
            Ok(instance) => Some(Self { instance }),
            Err(err) => {
                log::warn!("collapse instance not created: {}", dom::js_error_message(&err));
                None
            }
        }
    }

    fn invoke(&self, method: &str) {
        let result = Reflect::get(&self.instance, &JsValue::from_str(method))
            .and_then(|f| f.dyn_into::<Function>())
            .and_then(|f| f.call0(&self.instance));
        if let Err(err) = result {
            log::warn!("collapse {method} failed: {}", dom::js_error_message(&err));
        }
    }
}

impl CollapseDriver for BootstrapCollapse {
    fn show(&self) {
        self.invoke("show");
    }

    fn hide(&self) {
        self.invoke("hide");
    }
}

/// [`Scheduler`] over `setTimeout`/`clearTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let Some(window) = dom::window() else {
            log::warn!("no window; dropping scheduled task");
            return TaskId(-1);
        };
        // frees itself after running; a cancelled callback stays allocated
        let callback = Closure::once_into_js(move || task());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(handle) => TaskId(i64::from(handle)),
            Err(err) => {
                log::warn!("setTimeout failed: {}", dom::js_error_message(&err));
                TaskId(-1)
            }
        }
    }

    fn cancel(&self, id: TaskId) {
        if let (Some(window), Ok(handle)) = (dom::window(), i32::try_from(id.0)) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

/// Overlay element appended to `<body>` while the panel is open.
pub struct DomBackdrop {
    id: String,
    class: String,
    mounted: RefCell<Option<(HtmlElement, Listener)>>,
}

impl DomBackdrop {
    #[must_use]
    pub fn new(cfg: &NavCfg) -> Self {
        Self {
            id: cfg.backdrop_id.clone(),
            class: cfg.backdrop_class.clone(),
            mounted: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.borrow().is_some()
    }

    fn create(&self, on_click: Rc<dyn Fn()>) -> Result<(HtmlElement, Listener), JsValue> {
        let doc = dom::document().ok_or_else(|| JsValue::from_str("document unavailable"))?;
        let body = doc
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let overlay = doc.create_element("div")?.dyn_into::<HtmlElement>()?;
        overlay.set_id(&self.id);
        overlay.set_class_name(&self.class);
        body.append_child(&overlay)?;
        let listener = Listener::new(&overlay, "click", move |_| on_click())?;
        Ok((overlay, listener))
    }
}

impl BackdropHost for DomBackdrop {
    fn mount(&self, on_click: Rc<dyn Fn()>) {
        if self.is_mounted() {
            return;
        }
        match self.create(on_click) {
            Ok(mounted) => *self.mounted.borrow_mut() = Some(mounted),
            Err(err) => log::warn!("backdrop not mounted: {}", dom::js_error_message(&err)),
        }
    }

    fn unmount(&self) {
        let taken = self.mounted.borrow_mut().take();
        if let Some((overlay, listener)) = taken {
            drop(listener);
            overlay.remove();
        }
    }
}

/// Bind the toggle, panel links and collapse lifecycle events.
///
/// Returns `None`, leaving the panel to the page's own markup, when either
/// element or the collapse library is missing.
pub fn mount(doc: &Document, cfg: &PageConfig) -> Option<Rc<WebNav>> {
    let toggle = WebNode::by_id(doc, &cfg.ids.nav_toggle)?;
    let panel = WebNode::by_id(doc, &cfg.ids.nav_panel)?;
    let Some(driver) = BootstrapCollapse::attach(panel.element()) else {
        log::info!("collapse library not loaded; mobile navigation left as-is");
        return None;
    };

    let scheduler: Rc<dyn Scheduler> = Rc::new(TimeoutScheduler);
    let backdrop: Rc<dyn BackdropHost> = Rc::new(DomBackdrop::new(&cfg.nav));
    let nav = Rc::new(
        NavPanel::new(toggle.clone(), panel.clone(), driver, scheduler, &cfg.nav)
            .with_backdrop(backdrop, cfg.nav.backdrop),
    );

    let on_toggle = Rc::clone(&nav);
    dom::listen(toggle.element(), "click", move |event| {
        event.prevent_default();
        event.stop_propagation();
        on_toggle.on_toggle_click();
    });
    dom::listen(panel.element(), "click", |event| event.stop_propagation());

    if let Ok(links) = panel.element().query_selector_all("a") {
        for link in dom::nodes_of::<HtmlElement>(&links) {
            let nav = Rc::clone(&nav);
            dom::listen(&link, "click", move |_| nav.on_link_click());
        }
    }

    for event in CollapseEvent::ALL {
        let nav = Rc::clone(&nav);
        dom::listen(panel.element(), event.dom_event(), move |_| nav.on_event(event));
    }

    Some(nav)
}
