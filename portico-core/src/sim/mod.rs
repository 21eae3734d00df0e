//! In-memory stand-ins for the browser seams.
//!
//! Used by unit tests and by the headless tester to drive a full page load
//! without a DOM. Every type is a cheap clonable handle over shared state,
//! the same way DOM handles behave.

use crate::feed::{FeedItem, FeedList};
use crate::form::{FieldRule, FormField, FormHandle, Notifier};
use crate::nav::{BackdropHost, CollapseDriver, CollapseEvent, NavPanel, Scheduler, TaskId};
use crate::node::Node;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

mod page;

pub use page::{Capabilities, SimForm, SimNav, SimPage};

#[derive(Debug, Default)]
struct NodeState {
    tag: String,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    value: String,
}

#[derive(Clone, Debug, Default)]
pub struct FakeNode(Rc<RefCell<NodeState>>);

impl PartialEq for FakeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl FakeNode {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeState {
            tag: tag.to_ascii_uppercase(),
            ..NodeState::default()
        })))
    }

    /// Required `<input type="text">` with the given id.
    #[must_use]
    pub fn text_input(id: &str) -> Self {
        Self::new("input")
            .with_attribute("id", id)
            .with_attribute("type", "text")
            .with_attribute("required", "")
    }

    /// Required `<input type="email">` with the given id.
    #[must_use]
    pub fn email_input(id: &str) -> Self {
        Self::new("input")
            .with_attribute("id", id)
            .with_attribute("type", "email")
            .with_attribute("required", "")
    }

    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    #[must_use]
    pub fn style(&self, name: &str) -> Option<String> {
        self.0.borrow().style.get(name).cloned()
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.iter().cloned().collect()
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    #[must_use]
    pub fn rule(&self) -> FieldRule {
        let state = self.0.borrow();
        FieldRule::from_attributes(
            state.attributes.contains_key("required"),
            state.attributes.get("type").map(String::as_str),
        )
    }
}

impl Node for FakeNode {
    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.contains(class)
    }

    fn add_class(&self, class: &str) {
        self.0.borrow_mut().classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.remove(class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.style(name)
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .style
            .insert(name.to_string(), value.to_string());
    }
}

impl FormField for FakeNode {
    fn check_validity(&self) -> bool {
        self.rule().accepts(&self.value())
    }
}

/// Form whose reset clears its controls' values.
#[derive(Clone, Debug, Default)]
pub struct FakeForm {
    controls: Rc<Vec<FakeNode>>,
    resets: Rc<Cell<usize>>,
}

impl FakeForm {
    #[must_use]
    pub fn new(controls: Vec<FakeNode>) -> Self {
        Self {
            controls: Rc::new(controls),
            resets: Rc::default(),
        }
    }

    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.resets.get()
    }
}

impl FormHandle for FakeForm {
    fn reset(&self) {
        for control in self.controls.iter() {
            control.set_value("");
        }
        self.resets.set(self.resets.get() + 1);
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Feed container keeping entries in visual order.
#[derive(Clone, Debug, Default)]
pub struct FakeFeedList {
    entries: Rc<RefCell<Vec<FeedItem>>>,
}

impl FakeFeedList {
    #[must_use]
    pub fn entries(&self) -> Vec<FeedItem> {
        self.entries.borrow().clone()
    }
}

impl FeedList for FakeFeedList {
    fn prepend(&self, item: &FeedItem) {
        self.entries.borrow_mut().insert(0, item.clone());
    }
}

struct PendingTask {
    due: u64,
    task: Box<dyn FnOnce()>,
}

/// Scheduler driven by an explicit clock.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<i64>,
    tasks: RefCell<BTreeMap<i64, PendingTask>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Move the clock forward, running due tasks in deadline order.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get().saturating_add(ms);
        while let Some(task) = self.take_next_due(target) {
            self.now.set(task.due);
            (task.task)();
        }
        self.now.set(target);
    }

    fn take_next_due(&self, target: u64) -> Option<PendingTask> {
        let mut tasks = self.tasks.borrow_mut();
        let id = tasks
            .iter()
            .filter(|(_, t)| t.due <= target)
            .min_by_key(|(id, t)| (t.due, **id))
            .map(|(id, _)| *id)?;
        tasks.remove(&id)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let due = self.now.get().saturating_add(u64::from(delay_ms));
        self.tasks.borrow_mut().insert(id, PendingTask { due, task });
        TaskId(id)
    }

    fn cancel(&self, id: TaskId) {
        self.tasks.borrow_mut().remove(&id.0);
    }
}

type CollapseListener = Box<dyn Fn(CollapseEvent)>;

/// Collapse widget that toggles the open class synchronously and emits the
/// full lifecycle to its listener.
pub struct SimCollapse {
    panel: FakeNode,
    open_class: String,
    listener: RefCell<Option<CollapseListener>>,
    hide_requests: Cell<usize>,
    show_requests: Cell<usize>,
}

impl SimCollapse {
    #[must_use]
    pub fn new(panel: FakeNode, open_class: &str) -> Self {
        Self {
            panel,
            open_class: open_class.to_string(),
            listener: RefCell::new(None),
            hide_requests: Cell::new(0),
            show_requests: Cell::new(0),
        }
    }

    pub fn set_listener(&self, listener: impl Fn(CollapseEvent) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Route lifecycle events to `nav`.
    pub fn connect<N, D>(&self, nav: &Rc<NavPanel<N, D>>)
    where
        N: Node + 'static,
        D: CollapseDriver + 'static,
    {
        let weak = Rc::downgrade(nav);
        self.set_listener(move |event| {
            if let Some(nav) = weak.upgrade() {
                nav.on_event(event);
            }
        });
    }

    #[must_use]
    pub fn hide_requests(&self) -> usize {
        self.hide_requests.get()
    }

    #[must_use]
    pub fn show_requests(&self) -> usize {
        self.show_requests.get()
    }

    fn emit(&self, event: CollapseEvent) {
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(event);
        }
    }
}

impl CollapseDriver for SimCollapse {
    fn show(&self) {
        self.show_requests.set(self.show_requests.get() + 1);
        if self.panel.has_class(&self.open_class) {
            return;
        }
        self.emit(CollapseEvent::Show);
        self.panel.add_class(&self.open_class);
        self.emit(CollapseEvent::Shown);
    }

    fn hide(&self) {
        self.hide_requests.set(self.hide_requests.get() + 1);
        if !self.panel.has_class(&self.open_class) {
            return;
        }
        self.emit(CollapseEvent::Hide);
        self.panel.remove_class(&self.open_class);
        self.emit(CollapseEvent::Hidden);
    }
}

/// Backdrop that records mounts and can be clicked.
#[derive(Default)]
pub struct SimBackdrop {
    on_click: RefCell<Option<Rc<dyn Fn()>>>,
    unmounts: Cell<usize>,
}

impl SimBackdrop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.on_click.borrow().is_some()
    }

    #[must_use]
    pub fn unmount_count(&self) -> usize {
        self.unmounts.get()
    }

    /// Click the overlay; returns false when nothing is mounted.
    pub fn click(&self) -> bool {
        let handler = self.on_click.borrow().clone();
        handler.is_some_and(|h| {
            h();
            true
        })
    }
}

impl BackdropHost for SimBackdrop {
    fn mount(&self, on_click: Rc<dyn Fn()>) {
        *self.on_click.borrow_mut() = Some(on_click);
    }

    fn unmount(&self) {
        if self.on_click.borrow_mut().take().is_some() {
            self.unmounts.set(self.unmounts.get() + 1);
        }
    }
}
