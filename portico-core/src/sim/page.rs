//! A whole portal page assembled from the simulation doubles.
//!
//! Each [`SimPage::load`] is one page load: fresh elements, every component
//! initialized independently, preferences shared through the store handle so
//! a second load sees what the first one persisted.

use super::{
    FakeFeedList, FakeForm, FakeNode, ManualScheduler, RecordingNotifier, SimBackdrop, SimCollapse,
};
use crate::a11y::{AccessibilityController, HIDE_IMAGES_LABEL, ToolbarButton, activates_on_enter};
use crate::config::PageConfig;
use crate::feed::{FeedOutcome, seed_or_render};
use crate::form::{ContactForm, SubmitOutcome};
use crate::nav::NavPanel;
use crate::node::Node;
use crate::prefs::{MemoryPrefStore, Prefs};
use crate::reveal::{IntersectionSample, RevealTracker};
use crate::theme::ThemeController;
use std::rc::Rc;

/// Runtime capabilities the simulated browser offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub intersection_observer: bool,
    pub collapse_library: bool,
    pub reveal_targets: usize,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            collapse_library: true,
            reveal_targets: 4,
        }
    }
}

pub struct SimNav {
    pub toggle: FakeNode,
    pub panel_node: FakeNode,
    pub collapse: Rc<SimCollapse>,
    pub backdrop: Rc<SimBackdrop>,
    pub controller: Rc<NavPanel<FakeNode, Rc<SimCollapse>>>,
}

impl SimNav {
    #[must_use]
    pub fn expanded(&self) -> Option<String> {
        self.toggle.attribute("aria-expanded")
    }
}

pub struct SimForm {
    pub name: FakeNode,
    pub email: FakeNode,
    pub message: FakeNode,
    pub handle: FakeForm,
    pub notifier: RecordingNotifier,
    pub contact: ContactForm<FakeNode, FakeForm, RecordingNotifier>,
}

impl SimForm {
    pub fn fill(&self, name: &str, email: &str, message: &str) {
        self.name.set_value(name);
        self.email.set_value(email);
        self.message.set_value(message);
    }

    pub fn submit(&self) -> SubmitOutcome {
        self.contact.submit()
    }
}

pub struct SimPage {
    pub store: Rc<MemoryPrefStore>,
    pub root: FakeNode,
    pub body: FakeNode,
    pub toolbar: Vec<(ToolbarButton, FakeNode)>,
    pub a11y: AccessibilityController<FakeNode, MemoryPrefStore>,
    pub scheduler: Rc<ManualScheduler>,
    pub nav: Option<SimNav>,
    pub reveal_targets: Vec<FakeNode>,
    pub reveal: RevealTracker<FakeNode>,
    pub form: SimForm,
    pub feed_list: FakeFeedList,
    pub feed: FeedOutcome,
    pub theme: ThemeController<FakeNode, MemoryPrefStore>,
}

impl SimPage {
    pub fn load(store: Rc<MemoryPrefStore>, cfg: &PageConfig) -> Self {
        Self::load_with(store, cfg, Capabilities::default())
    }

    pub fn load_with(store: Rc<MemoryPrefStore>, cfg: &PageConfig, caps: Capabilities) -> Self {
        let prefs = Prefs::from_shared(Rc::clone(&store));
        let root = FakeNode::new("html");
        let body = FakeNode::new("body");

        let toolbar: Vec<_> = ToolbarButton::ALL
            .into_iter()
            .map(|button| {
                let node = FakeNode::new("button")
                    .with_attribute("id", button.element_id(&cfg.ids));
                if button == ToolbarButton::Images {
                    node.set_text(HIDE_IMAGES_LABEL);
                }
                (button, node)
            })
            .collect();
        let control = |wanted: ToolbarButton| {
            toolbar
                .iter()
                .find(|(b, _)| *b == wanted)
                .map(|(_, node)| node.clone())
        };
        let mut a11y =
            AccessibilityController::new(root.clone(), body.clone(), prefs.clone(), cfg.font);
        if let Some(button) = control(ToolbarButton::Contrast) {
            a11y = a11y.with_contrast_button(button);
        }
        if let Some(button) = control(ToolbarButton::Images) {
            a11y = a11y.with_images_button(button);
        }
        a11y.restore();

        let scheduler = Rc::new(ManualScheduler::new());
        let nav = caps
            .collapse_library
            .then(|| load_nav(cfg, Rc::clone(&scheduler)));

        let reveal_targets: Vec<_> = (0..caps.reveal_targets)
            .map(|_| FakeNode::new("section").with_class("reveal"))
            .collect();
        let mut reveal = RevealTracker::new(reveal_targets.clone(), &cfg.reveal);
        if !caps.intersection_observer {
            reveal.reveal_all();
        }

        let form = load_form(cfg);

        let feed_list = FakeFeedList::default();
        let feed = seed_or_render(&prefs, &feed_list, &cfg.feed);

        let theme = ThemeController::new(body.clone(), root.clone(), prefs, cfg.theme.clone());
        theme.restore();

        Self {
            store,
            root,
            body,
            toolbar,
            a11y,
            scheduler,
            nav,
            reveal_targets,
            reveal,
            form,
            feed_list,
            feed,
            theme,
        }
    }

    /// Load the page again over the same preference store.
    #[must_use]
    pub fn reload(&self, cfg: &PageConfig) -> Self {
        Self::load(Rc::clone(&self.store), cfg)
    }

    #[must_use]
    pub fn button(&self, wanted: ToolbarButton) -> Option<&FakeNode> {
        self.toolbar
            .iter()
            .find(|(b, _)| *b == wanted)
            .map(|(_, node)| node)
    }

    pub fn click(&self, button: ToolbarButton) {
        self.a11y.activate(button);
    }

    /// Keydown on a toolbar button; returns whether it turned into a click.
    pub fn key_down(&self, key: &str, button: ToolbarButton) -> bool {
        let Some(node) = self.button(button) else {
            return false;
        };
        let activate = activates_on_enter(key, &node.tag());
        if activate {
            self.click(button);
        }
        activate
    }

    /// Report an intersection ratio for one reveal target.
    pub fn scroll_into_view(&mut self, index: usize, ratio: f64) -> Vec<usize> {
        self.reveal.handle(&[IntersectionSample {
            index,
            is_intersecting: ratio > 0.0,
            ratio,
            fills_viewport: false,
        }])
    }

    pub fn double_click_logo(&self) {
        self.theme.toggle();
    }
}

fn load_nav(cfg: &PageConfig, scheduler: Rc<ManualScheduler>) -> SimNav {
    let toggle = FakeNode::new("button")
        .with_attribute("id", &cfg.ids.nav_toggle)
        .with_attribute("aria-expanded", "false");
    let panel_node = FakeNode::new("div").with_attribute("id", &cfg.ids.nav_panel);
    let collapse = Rc::new(SimCollapse::new(panel_node.clone(), &cfg.nav.open_class));
    let backdrop = Rc::new(SimBackdrop::new());
    let controller = Rc::new(
        NavPanel::new(
            toggle.clone(),
            panel_node.clone(),
            Rc::clone(&collapse),
            scheduler,
            &cfg.nav,
        )
        .with_backdrop(backdrop.clone(), cfg.nav.backdrop),
    );
    collapse.connect(&controller);
    SimNav {
        toggle,
        panel_node,
        collapse,
        backdrop,
        controller,
    }
}

fn load_form(cfg: &PageConfig) -> SimForm {
    let name = FakeNode::text_input("name");
    let email = FakeNode::email_input("email");
    let message = FakeNode::text_input("message");
    let handle = FakeForm::new(vec![name.clone(), email.clone(), message.clone()]);
    let notifier = RecordingNotifier::default();
    let by_id = |id: &str| match id {
        "name" => Some(name.clone()),
        "email" => Some(email.clone()),
        "message" => Some(message.clone()),
        _ => None,
    };
    let fields = cfg
        .form
        .fields
        .iter()
        .map(|id| (id.clone(), by_id(id)))
        .collect();
    let contact = ContactForm::new(fields, handle.clone(), notifier.clone(), &cfg.form);
    SimForm {
        name,
        email,
        message,
        handle,
        notifier,
        contact,
    }
}
