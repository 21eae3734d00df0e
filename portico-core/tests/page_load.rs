use std::rc::Rc;

use portico_core::sim::{Capabilities, SimPage};
use portico_core::{
    FeedOutcome, MemoryPrefStore, Node, PageConfig, PanelState, StoreMode, SubmitOutcome, Theme,
    ToolbarButton, VisualMode,
};

fn fresh_page() -> (PageConfig, SimPage) {
    let cfg = PageConfig::default();
    let page = SimPage::load(Rc::new(MemoryPrefStore::new()), &cfg);
    (cfg, page)
}

#[test]
fn toggles_survive_reload() {
    let (cfg, page) = fresh_page();
    page.click(ToolbarButton::Contrast);
    page.click(ToolbarButton::BigCursor);
    page.click(ToolbarButton::Images);
    page.click(ToolbarButton::Images);

    let reloaded = page.reload(&cfg);
    for mode in VisualMode::ALL {
        assert_eq!(
            page.a11y.is_enabled(mode),
            reloaded.a11y.is_enabled(mode),
            "{mode:?} did not survive reload"
        );
    }
    assert!(reloaded.body.has_class("high-contrast"));
    assert!(!reloaded.body.has_class("hide-images"));
}

#[test]
fn font_scale_survives_reload_and_clamps() {
    let (cfg, page) = fresh_page();
    for _ in 0..5 {
        page.click(ToolbarButton::TextDecrease);
    }
    assert!((page.a11y.font_scale() - 0.8).abs() < f64::EPSILON);
    let reloaded = page.reload(&cfg);
    assert_eq!(reloaded.root.style("--font-scale").as_deref(), Some("0.8rem"));
    reloaded.click(ToolbarButton::TextReset);
    assert!((reloaded.a11y.font_scale() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn enter_key_activates_toolbar_buttons() {
    let (_, page) = fresh_page();
    assert!(page.key_down("Enter", ToolbarButton::LineHeight));
    assert!(page.a11y.is_enabled(VisualMode::LineHeight));
    assert!(!page.key_down("Escape", ToolbarButton::LineHeight));
    assert!(page.a11y.is_enabled(VisualMode::LineHeight));
}

#[test]
fn feed_seeds_then_renders() {
    let (cfg, page) = fresh_page();
    assert_eq!(page.feed, FeedOutcome::Seeded(2));
    assert!(page.feed_list.entries().is_empty());
    let second = page.reload(&cfg);
    assert_eq!(second.feed, FeedOutcome::Rendered(2));
    assert_eq!(second.feed_list.entries().len(), 2);
}

#[test]
fn theme_round_trip_across_reload() {
    let (cfg, page) = fresh_page();
    page.double_click_logo();
    let reloaded = page.reload(&cfg);
    assert_eq!(reloaded.theme.current(), Theme::Dark);
    reloaded.double_click_logo();
    assert_eq!(reloaded.theme.current(), Theme::Light);
    assert_eq!(reloaded.root.style("--bg-blue").as_deref(), Some("#d9eefc"));
}

#[test]
fn nav_opens_and_closes_after_link_click() {
    let (cfg, page) = fresh_page();
    let nav = page.nav.as_ref().expect("collapse library present");
    nav.controller.on_toggle_click();
    assert_eq!(nav.expanded().as_deref(), Some("true"));
    assert_eq!(nav.controller.state(), PanelState::Open);
    nav.controller.on_link_click();
    page.scheduler.advance(u64::from(cfg.nav.hide_delay_ms));
    assert_eq!(nav.expanded().as_deref(), Some("false"));
    assert_eq!(nav.controller.state(), PanelState::Closed);
}

#[test]
fn missing_collapse_library_disables_nav_only() {
    let cfg = PageConfig::default();
    let caps = Capabilities {
        collapse_library: false,
        ..Capabilities::default()
    };
    let page = SimPage::load_with(Rc::new(MemoryPrefStore::new()), &cfg, caps);
    assert!(page.nav.is_none());
    page.click(ToolbarButton::Contrast);
    assert!(page.a11y.is_enabled(VisualMode::HighContrast));
}

#[test]
fn reveal_fallback_without_observer() {
    let cfg = PageConfig::default();
    let caps = Capabilities {
        intersection_observer: false,
        ..Capabilities::default()
    };
    let page = SimPage::load_with(Rc::new(MemoryPrefStore::new()), &cfg, caps);
    assert!(page.reveal_targets.iter().all(|n| n.has_class("visible")));
}

#[test]
fn reveal_is_one_directional() {
    let (_, mut page) = fresh_page();
    assert_eq!(page.scroll_into_view(1, 0.5), vec![1]);
    page.scroll_into_view(1, 0.0);
    assert!(page.reveal_targets[1].has_class("visible"));
    assert!(!page.reveal_targets[0].has_class("visible"));
}

#[test]
fn contact_form_flow() {
    let (_, page) = fresh_page();
    let outcome = page.form.submit();
    assert!(matches!(outcome, SubmitOutcome::Rejected { ref invalid } if invalid.len() == 3));
    assert!(page.form.notifier.messages().is_empty());

    page.form.fill("Ada", "ada@example.org", "Opening hours?");
    assert_eq!(page.form.submit(), SubmitOutcome::Sent);
    assert_eq!(page.form.notifier.messages().len(), 1);
    assert_eq!(page.form.handle.reset_count(), 1);
}

#[test]
fn form_field_absent_from_page_is_never_sent() {
    let mut cfg = PageConfig::default();
    cfg.form.fields.push("phone".to_string());
    let page = SimPage::load(Rc::new(MemoryPrefStore::new()), &cfg);
    page.form.fill("Ada", "ada@example.org", "Opening hours?");
    assert_eq!(
        page.form.submit(),
        SubmitOutcome::Rejected {
            invalid: vec!["phone".to_string()]
        }
    );
    assert!(page.form.notifier.messages().is_empty());
    assert_eq!(page.form.handle.reset_count(), 0);
}

#[test]
fn disabled_storage_keeps_every_feature_working() {
    let cfg = PageConfig::default();
    let store = Rc::new(MemoryPrefStore::new());
    store.set_mode(StoreMode::Unavailable);
    let page = SimPage::load(Rc::clone(&store), &cfg);
    assert_eq!(page.feed, FeedOutcome::Seeded(2));
    page.click(ToolbarButton::Contrast);
    page.click(ToolbarButton::TextIncrease);
    assert!((page.a11y.font_scale() - 1.1).abs() < f64::EPSILON);
    page.double_click_logo();
    assert_eq!(page.theme.current(), Theme::Dark);
    assert!(store.is_empty());

    let reloaded = page.reload(&cfg);
    assert_eq!(reloaded.theme.current(), Theme::Light);
    assert!((reloaded.a11y.font_scale() - 1.0).abs() < f64::EPSILON);
}
