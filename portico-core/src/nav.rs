//! Mobile navigation panel
//!
//! The collapse widget owns the panel's visibility; [`NavPanel`] requests
//! show/hide through a [`CollapseDriver`] and follows the widget's lifecycle
//! events to keep `aria-expanded` and the optional backdrop in step.

use crate::config::NavCfg;
use crate::node::{Node, aria_bool};
use std::cell::Cell;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl PanelState {
    /// State after `event`. Every event is accepted from every state, since
    /// the widget may interrupt a transition.
    #[must_use]
    pub const fn on_event(self, event: CollapseEvent) -> Self {
        match event {
            CollapseEvent::Show => Self::Opening,
            CollapseEvent::Shown => Self::Open,
            CollapseEvent::Hide => Self::Closing,
            CollapseEvent::Hidden => Self::Closed,
        }
    }

    /// Whether `event` is the expected next step from this state.
    #[must_use]
    pub const fn expects(self, event: CollapseEvent) -> bool {
        matches!(
            (self, event),
            (Self::Closed, CollapseEvent::Show)
                | (Self::Opening, CollapseEvent::Shown | CollapseEvent::Hide)
                | (Self::Open, CollapseEvent::Hide)
                | (Self::Closing, CollapseEvent::Hidden | CollapseEvent::Show)
        )
    }

    #[must_use]
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

/// Lifecycle notifications emitted by the collapse widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollapseEvent {
    Show,
    Shown,
    Hide,
    Hidden,
}

impl CollapseEvent {
    pub const ALL: [Self; 4] = [Self::Show, Self::Shown, Self::Hide, Self::Hidden];

    /// DOM event name Bootstrap dispatches on the panel.
    #[must_use]
    pub const fn dom_event(self) -> &'static str {
        match self {
            Self::Show => "show.bs.collapse",
            Self::Shown => "shown.bs.collapse",
            Self::Hide => "hide.bs.collapse",
            Self::Hidden => "hidden.bs.collapse",
        }
    }

    #[must_use]
    pub fn from_dom_event(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ev| ev.dom_event() == name)
    }
}

/// Show/hide requests to the widget that owns the panel.
pub trait CollapseDriver {
    fn show(&self);
    fn hide(&self);
}

impl<D: CollapseDriver + ?Sized> CollapseDriver for Rc<D> {
    fn show(&self) {
        (**self).show();
    }

    fn hide(&self) {
        (**self).hide();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub i64);

/// One-shot delayed callbacks.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId;
    /// Cancel a pending task; unknown or already-run ids are ignored.
    fn cancel(&self, id: TaskId);
}

/// Full-screen overlay that closes the panel when clicked.
pub trait BackdropHost {
    fn mount(&self, on_click: Rc<dyn Fn()>);
    /// Remove the overlay and its click handler if mounted.
    fn unmount(&self);
}

pub struct NavPanel<N, D> {
    toggle: N,
    panel: N,
    driver: D,
    scheduler: Rc<dyn Scheduler>,
    backdrop: Option<Rc<dyn BackdropHost>>,
    open_class: String,
    hide_delay_ms: u32,
    state: Cell<PanelState>,
    pending_hide: Cell<Option<TaskId>>,
    backdrop_mounted: Cell<bool>,
}

impl<N: Node + 'static, D: CollapseDriver + 'static> NavPanel<N, D> {
    pub fn new(toggle: N, panel: N, driver: D, scheduler: Rc<dyn Scheduler>, cfg: &NavCfg) -> Self {
        Self {
            toggle,
            panel,
            driver,
            scheduler,
            backdrop: None,
            open_class: cfg.open_class.clone(),
            hide_delay_ms: cfg.hide_delay_ms,
            state: Cell::new(PanelState::Closed),
            pending_hide: Cell::new(None),
            backdrop_mounted: Cell::new(false),
        }
    }

    /// Attach a backdrop host; it is only used when `enabled`.
    #[must_use]
    pub fn with_backdrop(mut self, host: Rc<dyn BackdropHost>, enabled: bool) -> Self {
        self.backdrop = enabled.then_some(host);
        self
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state.get()
    }

    #[must_use]
    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide.get().is_some()
    }

    #[must_use]
    pub fn backdrop_mounted(&self) -> bool {
        self.backdrop_mounted.get()
    }

    /// Toggle control clicked: hide when the panel shows as open, else show.
    pub fn on_toggle_click(&self) {
        if self.panel.has_class(&self.open_class) {
            self.driver.hide();
        } else {
            self.driver.show();
        }
    }

    /// Link inside the panel clicked: hide after a short delay so the click
    /// registers visually. A newer click replaces the pending hide.
    pub fn on_link_click(self: &Rc<Self>) {
        if let Some(id) = self.pending_hide.take() {
            self.scheduler.cancel(id);
        }
        let this = Rc::downgrade(self);
        let id = self.scheduler.schedule(
            self.hide_delay_ms,
            Box::new(move || {
                if let Some(nav) = this.upgrade() {
                    nav.pending_hide.set(None);
                    nav.driver.hide();
                }
            }),
        );
        self.pending_hide.set(Some(id));
    }

    pub fn on_event(self: &Rc<Self>, event: CollapseEvent) {
        let current = self.state.get();
        if !current.expects(event) {
            log::debug!("panel {current:?} received out-of-order {event:?}");
        }
        self.state.set(current.on_event(event));
        match event {
            CollapseEvent::Show => {
                self.toggle.set_attribute("aria-expanded", aria_bool(true));
                self.mount_backdrop();
            }
            CollapseEvent::Hidden => {
                self.toggle.set_attribute("aria-expanded", aria_bool(false));
                self.unmount_backdrop();
            }
            CollapseEvent::Shown | CollapseEvent::Hide => {}
        }
    }

    pub fn on_backdrop_click(&self) {
        self.driver.hide();
        self.toggle.set_attribute("aria-expanded", aria_bool(false));
    }

    fn mount_backdrop(self: &Rc<Self>) {
        let Some(host) = &self.backdrop else {
            return;
        };
        if self.backdrop_mounted.replace(true) {
            return;
        }
        let this: Weak<Self> = Rc::downgrade(self);
        host.mount(Rc::new(move || {
            if let Some(nav) = this.upgrade() {
                nav.on_backdrop_click();
            }
        }));
    }

    fn unmount_backdrop(&self) {
        if !self.backdrop_mounted.replace(false) {
            return;
        }
        if let Some(host) = &self.backdrop {
            host.unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FakeNode, ManualScheduler, SimBackdrop, SimCollapse};

    type Panel = NavPanel<FakeNode, Rc<SimCollapse>>;

    struct Fixture {
        toggle: FakeNode,
        panel: FakeNode,
        collapse: Rc<SimCollapse>,
        scheduler: Rc<ManualScheduler>,
        backdrop: Rc<SimBackdrop>,
        nav: Rc<Panel>,
    }

    fn fixture(backdrop_enabled: bool) -> Fixture {
        let cfg = NavCfg::default();
        let toggle = FakeNode::new("button").with_attribute("aria-expanded", "false");
        let panel = FakeNode::new("div");
        let collapse = Rc::new(SimCollapse::new(panel.clone(), &cfg.open_class));
        let scheduler = Rc::new(ManualScheduler::new());
        let backdrop = Rc::new(SimBackdrop::new());
        let nav = Rc::new(
            NavPanel::new(
                toggle.clone(),
                panel.clone(),
                Rc::clone(&collapse),
                scheduler.clone(),
                &cfg,
            )
            .with_backdrop(backdrop.clone(), backdrop_enabled),
        );
        collapse.connect(&nav);
        Fixture {
            toggle,
            panel,
            collapse,
            scheduler,
            backdrop,
            nav,
        }
    }

    #[test]
    fn toggle_click_opens_closed_panel() {
        let f = fixture(false);
        f.nav.on_toggle_click();
        assert_eq!(f.toggle.attribute("aria-expanded").as_deref(), Some("true"));
        assert!(f.panel.has_class("show"));
        assert_eq!(f.nav.state(), PanelState::Open);
    }

    #[test]
    fn toggle_click_closes_open_panel() {
        let f = fixture(false);
        f.nav.on_toggle_click();
        f.nav.on_toggle_click();
        assert_eq!(f.toggle.attribute("aria-expanded").as_deref(), Some("false"));
        assert!(!f.panel.has_class("show"));
        assert_eq!(f.nav.state(), PanelState::Closed);
        assert_eq!(f.collapse.hide_requests(), 1);
    }

    #[test]
    fn link_click_hides_after_delay() {
        let f = fixture(false);
        f.nav.on_toggle_click();
        f.nav.on_link_click();
        f.scheduler.advance(119);
        assert_eq!(f.toggle.attribute("aria-expanded").as_deref(), Some("true"));
        assert!(f.nav.has_pending_hide());
        f.scheduler.advance(1);
        assert_eq!(f.toggle.attribute("aria-expanded").as_deref(), Some("false"));
        assert!(!f.nav.has_pending_hide());
    }

    #[test]
    fn rapid_link_clicks_keep_one_pending_hide() {
        let f = fixture(false);
        f.nav.on_toggle_click();
        f.nav.on_link_click();
        f.scheduler.advance(60);
        f.nav.on_link_click();
        f.nav.on_link_click();
        assert_eq!(f.scheduler.pending(), 1);
        f.scheduler.advance(60);
        assert!(f.panel.has_class("show"));
        f.scheduler.advance(60);
        assert!(!f.panel.has_class("show"));
        assert_eq!(f.collapse.hide_requests(), 1);
    }

    #[test]
    fn backdrop_stays_inert_by_default() {
        let f = fixture(false);
        f.nav.on_toggle_click();
        assert!(!f.backdrop.is_mounted());
        assert!(!f.nav.backdrop_mounted());
    }

    #[test]
    fn enabled_backdrop_closes_panel_on_click() {
        let f = fixture(true);
        f.nav.on_toggle_click();
        assert!(f.backdrop.is_mounted());
        assert!(f.backdrop.click());
        assert_eq!(f.toggle.attribute("aria-expanded").as_deref(), Some("false"));
        assert!(!f.panel.has_class("show"));
        assert!(!f.backdrop.is_mounted());
        assert_eq!(f.backdrop.unmount_count(), 1);
    }

    #[test]
    fn hidden_without_backdrop_is_harmless() {
        let f = fixture(true);
        f.nav.on_event(CollapseEvent::Hidden);
        assert_eq!(f.backdrop.unmount_count(), 0);
        assert_eq!(f.toggle.attribute("aria-expanded").as_deref(), Some("false"));
    }

    #[test]
    fn state_machine_follows_lifecycle() {
        let mut state = PanelState::Closed;
        for (event, expected) in [
            (CollapseEvent::Show, PanelState::Opening),
            (CollapseEvent::Shown, PanelState::Open),
            (CollapseEvent::Hide, PanelState::Closing),
            (CollapseEvent::Hidden, PanelState::Closed),
        ] {
            assert!(state.expects(event));
            state = state.on_event(event);
            assert_eq!(state, expected);
        }
        assert!(!PanelState::Open.expects(CollapseEvent::Show));
        assert!(PanelState::Opening.is_expanded());
        assert!(!PanelState::Closing.is_expanded());
    }

    #[test]
    fn dom_event_names_round_trip() {
        for event in CollapseEvent::ALL {
            assert_eq!(CollapseEvent::from_dom_event(event.dom_event()), Some(event));
        }
        assert_eq!(CollapseEvent::from_dom_event("click"), None);
    }
}
