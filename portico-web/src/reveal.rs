//! Reveal-on-scroll over `IntersectionObserver`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Reflect};
use portico_core::{IntersectionSample, RevealCfg, RevealTracker};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::dom;
use crate::node::WebNode;

/// How the reveal targets were handled at load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealMode {
    /// This many targets are waiting to scroll into view.
    Observed(usize),
    /// No observer available; this many targets were shown at once.
    Immediate(usize),
}

fn observer_supported() -> bool {
    dom::window().is_some_and(|win| {
        Reflect::has(&win, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    })
}

fn fills_viewport(entry: &IntersectionObserverEntry) -> bool {
    let visible = entry.intersection_rect().height();
    entry
        .root_bounds()
        .is_some_and(|root| root.height() > 0.0 && visible >= root.height())
}

pub fn mount(doc: &Document, cfg: &RevealCfg) -> RevealMode {
    let elements: Vec<HtmlElement> = doc
        .query_selector_all(&cfg.selector)
        .map(|list| dom::nodes_of(&list))
        .unwrap_or_default();
    let count = elements.len();
    let tracker = Rc::new(RefCell::new(RevealTracker::new(
        elements.iter().cloned().map(WebNode::new).collect(),
        cfg,
    )));

    if !observer_supported() {
        tracker.borrow_mut().reveal_all();
        return RevealMode::Immediate(count);
    }

    let targets: Vec<Element> = elements.into_iter().map(Element::from).collect();
    let watched = targets.clone();
    let on_intersect = Rc::clone(&tracker);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let samples: Vec<IntersectionSample> = entries
                .iter()
                .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let target = entry.target();
                    let index = watched.iter().position(|el| *el == target)?;
                    Some(IntersectionSample {
                        index,
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                        fills_viewport: fills_viewport(&entry),
                    })
                })
                .collect();
            let revealed = on_intersect.borrow_mut().handle(&samples);
            for index in revealed {
                if let Some(el) = watched.get(index) {
                    observer.unobserve(el);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(cfg.threshold));
    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            for el in &targets {
                observer.observe(el);
            }
            callback.forget();
            RevealMode::Observed(count)
        }
        Err(err) => {
            log::warn!("IntersectionObserver rejected: {}", dom::js_error_message(&err));
            tracker.borrow_mut().reveal_all();
            RevealMode::Immediate(count)
        }
    }
}
