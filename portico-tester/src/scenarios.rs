use anyhow::{Context, Result, bail, ensure};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::{Duration, Instant};

use portico_core::sim::{Capabilities, SimPage};
use portico_core::{
    FeedItem, FeedOutcome, MemoryPrefStore, Node, PageConfig, PanelState, PrefKey, Prefs,
    StoreMode, SubmitOutcome, Theme, ToolbarButton, VisualMode,
};

type ScenarioFn = fn(&PageConfig) -> Result<()>;

pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    run: ScenarioFn,
}

impl Scenario {
    /// # Errors
    ///
    /// Returns the first expectation the simulated page did not meet.
    pub fn run(&self, cfg: &PageConfig) -> Result<()> {
        (self.run)(cfg)
    }
}

const CATALOG: &[Scenario] = &[
    Scenario {
        key: "a11y",
        name: "Accessibility toggles persist",
        run: a11y_toggles_persist,
    },
    Scenario {
        key: "font-scale",
        name: "Font scale steps, clamps and resets",
        run: font_scale_bounds,
    },
    Scenario {
        key: "nav",
        name: "Mobile navigation panel",
        run: nav_panel_flow,
    },
    Scenario {
        key: "reveal",
        name: "Reveal on scroll",
        run: reveal_once,
    },
    Scenario {
        key: "form",
        name: "Contact form validation",
        run: contact_form_flow,
    },
    Scenario {
        key: "feed",
        name: "Latest items feed",
        run: feed_seed_then_render,
    },
    Scenario {
        key: "theme",
        name: "Theme switch",
        run: theme_switch,
    },
    Scenario {
        key: "degraded",
        name: "Failing storage and missing capabilities",
        run: degraded_environment,
    },
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.name)).collect()
}

pub fn get_scenario(key: &str) -> Option<&'static Scenario> {
    let key = key.to_lowercase();
    CATALOG.iter().find(|s| s.key == key)
}

/// Requested keys with `all` expanded to the whole catalog, duplicates removed.
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in requested {
        let expanded: Vec<String> = if key.eq_ignore_ascii_case("all") {
            CATALOG.iter().map(|s| s.key.to_string()).collect()
        } else {
            vec![key.to_lowercase()]
        };
        for key in expanded {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct ScenarioRunner {
    cfg: PageConfig,
    verbose: bool,
}

impl ScenarioRunner {
    pub const fn new(cfg: PageConfig, verbose: bool) -> Self {
        Self { cfg, verbose }
    }

    pub fn run(&self, scenario: &Scenario, iterations: usize) -> ScenarioResult {
        if self.verbose {
            println!("🧪 Testing scenario: {}", scenario.name.bright_white());
        }

        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::with_capacity(iterations);
        if iterations == 0 {
            failures.push("no iterations run".to_string());
        }

        for i in 0..iterations {
            let start = Instant::now();
            let outcome = scenario.run(&self.cfg);
            durations.push(start.elapsed());
            match outcome {
                Ok(()) => successes += 1,
                Err(err) => {
                    if self.verbose {
                        println!("  ❌ Iteration {}/{} failed: {}", i + 1, iterations, format!("{err:#}").red());
                    }
                    failures.push(format!("Iteration {}: {err:#}", i + 1));
                }
            }
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
        }
    }
}

fn fresh_page(cfg: &PageConfig) -> SimPage {
    SimPage::load(Rc::new(MemoryPrefStore::new()), cfg)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn a11y_toggles_persist(cfg: &PageConfig) -> Result<()> {
    let page = fresh_page(cfg);
    for mode in VisualMode::ALL {
        ensure!(!page.a11y.is_enabled(mode), "{mode:?} enabled on a fresh page");
    }
    page.click(ToolbarButton::Contrast);
    page.click(ToolbarButton::LineHeight);
    page.click(ToolbarButton::LineHeight);
    ensure!(
        page.key_down("Enter", ToolbarButton::BigCursor),
        "Enter on a toolbar button did not activate it"
    );

    let contrast = page
        .button(ToolbarButton::Contrast)
        .context("contrast button missing")?;
    ensure!(
        contrast.attribute("aria-pressed").as_deref() == Some("true"),
        "aria-pressed not updated"
    );

    let reloaded = page.reload(cfg);
    for mode in VisualMode::ALL {
        ensure!(
            reloaded.a11y.is_enabled(mode) == page.a11y.is_enabled(mode),
            "{mode:?} changed across reload"
        );
    }
    ensure!(
        reloaded.a11y.is_enabled(VisualMode::BigCursor),
        "big cursor not restored"
    );
    Ok(())
}

fn font_scale_bounds(cfg: &PageConfig) -> Result<()> {
    let page = fresh_page(cfg);
    page.click(ToolbarButton::TextIncrease);
    page.click(ToolbarButton::TextIncrease);
    let expected = cfg.font.default_scale + 2.0 * cfg.font.step;
    ensure!(
        close(page.a11y.font_scale(), (expected * 100.0).round() / 100.0),
        "scale after two increases is {}",
        page.a11y.font_scale()
    );

    for _ in 0..20 {
        page.click(ToolbarButton::TextDecrease);
    }
    ensure!(
        close(page.a11y.font_scale(), cfg.font.floor),
        "scale fell below the floor: {}",
        page.a11y.font_scale()
    );

    let reloaded = page.reload(cfg);
    ensure!(
        close(reloaded.a11y.font_scale(), cfg.font.floor),
        "floor scale not restored"
    );
    reloaded.click(ToolbarButton::TextReset);
    ensure!(
        close(reloaded.a11y.font_scale(), cfg.font.default_scale),
        "reset did not return to the default"
    );
    Ok(())
}

fn nav_panel_flow(cfg: &PageConfig) -> Result<()> {
    let page = fresh_page(cfg);
    let nav = page.nav.as_ref().context("navigation not mounted")?;

    nav.controller.on_toggle_click();
    ensure!(nav.controller.state() == PanelState::Open, "panel did not open");
    ensure!(
        nav.expanded().as_deref() == Some("true"),
        "aria-expanded not set on show"
    );

    nav.controller.on_link_click();
    page.scheduler.advance(u64::from(cfg.nav.hide_delay_ms / 2));
    nav.controller.on_link_click();
    page.scheduler.advance(u64::from(cfg.nav.hide_delay_ms / 2));
    ensure!(
        nav.controller.state() == PanelState::Open,
        "second link click did not restart the hide delay"
    );
    page.scheduler.advance(u64::from(cfg.nav.hide_delay_ms));
    ensure!(nav.controller.state() == PanelState::Closed, "panel did not close");
    ensure!(nav.collapse.hide_requests() == 1, "hide requested {} times", nav.collapse.hide_requests());
    ensure!(
        nav.expanded().as_deref() == Some("false"),
        "aria-expanded not cleared on hidden"
    );
    ensure!(!nav.backdrop.is_mounted(), "backdrop left mounted");
    Ok(())
}

fn reveal_once(cfg: &PageConfig) -> Result<()> {
    let mut page = fresh_page(cfg);
    let below = page.scroll_into_view(0, cfg.reveal.threshold / 2.0);
    ensure!(below.is_empty(), "revealed below the threshold");
    let revealed = page.scroll_into_view(0, cfg.reveal.threshold);
    ensure!(revealed == vec![0], "target not revealed at the threshold");
    page.scroll_into_view(0, 0.0);
    let target = page.reveal_targets.first().context("no reveal targets")?;
    ensure!(
        target.has_class(&cfg.reveal.visible_class),
        "target hidden again after leaving the viewport"
    );
    ensure!(page.scroll_into_view(0, 1.0).is_empty(), "target revealed twice");
    Ok(())
}

fn contact_form_flow(cfg: &PageConfig) -> Result<()> {
    let page = fresh_page(cfg);
    match page.form.submit() {
        SubmitOutcome::Rejected { invalid } => {
            ensure!(invalid.len() == cfg.form.fields.len(), "only {invalid:?} flagged");
        }
        SubmitOutcome::Sent => bail!("empty form was accepted"),
    }

    page.form.fill("Ada", "not-an-email", "Hello");
    match page.form.submit() {
        SubmitOutcome::Rejected { invalid } => {
            ensure!(invalid == ["email"], "expected only email flagged, got {invalid:?}");
        }
        SubmitOutcome::Sent => bail!("malformed email was accepted"),
    }
    ensure!(
        !page.form.name.has_class(&cfg.form.invalid_class),
        "corrected field still flagged"
    );

    page.form.fill("Ada", "ada@example.org", "Hello");
    ensure!(page.form.submit() == SubmitOutcome::Sent, "valid form rejected");
    ensure!(
        page.form.notifier.messages() == [cfg.form.confirmation.clone()],
        "confirmation not shown exactly once"
    );
    ensure!(page.form.handle.reset_count() == 1, "form not reset");
    Ok(())
}

fn feed_seed_then_render(cfg: &PageConfig) -> Result<()> {
    let page = fresh_page(cfg);
    ensure!(
        page.feed == FeedOutcome::Seeded(cfg.feed.sample.len()),
        "first load did not seed: {:?}",
        page.feed
    );
    ensure!(page.feed_list.entries().is_empty(), "seeding rendered entries");

    let prefs = Prefs::from_shared(Rc::clone(&page.store));
    let mut stored: Vec<FeedItem> = prefs.get(PrefKey::LatestItems, Vec::new());
    stored.extend((0..3).map(|i| FeedItem::new(format!("Extra {i}"), "2025-12-01")));
    prefs.set(PrefKey::LatestItems, &stored);

    let reloaded = page.reload(cfg);
    let shown = stored.len().min(cfg.feed.render_limit);
    ensure!(
        reloaded.feed == FeedOutcome::Rendered(shown),
        "expected {shown} rendered, got {:?}",
        reloaded.feed
    );
    let entries = reloaded.feed_list.entries();
    let last_shown = shown.checked_sub(1).and_then(|i| stored.get(i));
    ensure!(
        entries.first() == last_shown,
        "last rendered item is not on top"
    );
    Ok(())
}

fn theme_switch(cfg: &PageConfig) -> Result<()> {
    let page = fresh_page(cfg);
    ensure!(page.theme.current() == Theme::Light, "fresh page not light");
    ensure!(
        page.root.style(&cfg.theme.background_property).as_deref()
            == Some(cfg.theme.light_background.as_str()),
        "light background not applied on load"
    );
    page.double_click_logo();
    ensure!(page.theme.current() == Theme::Dark, "double-click did not switch");

    let reloaded = page.reload(cfg);
    ensure!(reloaded.theme.current() == Theme::Dark, "dark theme not restored");
    ensure!(
        reloaded.root.style(&cfg.theme.background_property).as_deref()
            == Some(cfg.theme.dark_background.as_str()),
        "dark background not restored"
    );
    Ok(())
}

fn degraded_environment(cfg: &PageConfig) -> Result<()> {
    let store = Rc::new(MemoryPrefStore::new());
    store.set_mode(StoreMode::Unavailable);
    let caps = Capabilities {
        intersection_observer: false,
        collapse_library: false,
        reveal_targets: 3,
    };
    let page = SimPage::load_with(Rc::clone(&store), cfg, caps);

    ensure!(page.nav.is_none(), "navigation mounted without a collapse library");
    ensure!(
        page.reveal_targets
            .iter()
            .all(|t| t.has_class(&cfg.reveal.visible_class)),
        "reveal targets hidden without an observer"
    );

    page.click(ToolbarButton::Contrast);
    page.click(ToolbarButton::TextIncrease);
    page.double_click_logo();
    ensure!(
        page.a11y.is_enabled(VisualMode::HighContrast),
        "contrast broken by disabled storage"
    );
    ensure!(page.theme.current() == Theme::Dark, "theme broken by disabled storage");
    ensure!(store.is_empty(), "disabled storage was written");

    store.set_mode(StoreMode::QuotaExceeded);
    let full = page.reload(cfg);
    full.click(ToolbarButton::Images);
    ensure!(
        full.a11y.is_enabled(VisualMode::HideImages),
        "toggle broken by a full store"
    );
    Ok(())
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_scenario_passes_with_defaults() {
        let runner = ScenarioRunner::new(PageConfig::default(), false);
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            let result = runner.run(scenario, 2);
            assert!(result.passed, "{key}: {:?}", result.failures);
            assert_eq!(result.successful_iterations, 2);
        }
    }

    #[test]
    fn all_expands_to_catalog_without_duplicates() {
        let keys = expand_scenarios(&["nav".to_string(), "ALL".to_string()]);
        assert_eq!(keys.len(), CATALOG.len());
        assert_eq!(keys[0], "nav");
    }

    #[test]
    fn unknown_keys_are_kept_for_reporting() {
        let keys = expand_scenarios(&["Theme".to_string(), "bogus".to_string()]);
        assert_eq!(keys, ["theme", "bogus"]);
        assert!(get_scenario("bogus").is_none());
        assert!(get_scenario("THEME").is_some());
    }

    #[test]
    fn failing_scenario_records_each_iteration() {
        fn always_fails(_: &PageConfig) -> Result<()> {
            bail!("boom")
        }
        let scenario = Scenario {
            key: "fail",
            name: "Always fails",
            run: always_fails,
        };
        let result = ScenarioRunner::new(PageConfig::default(), false).run(&scenario, 3);
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures.len(), 3);
        assert!(result.failures[0].contains("boom"));
    }

    #[test]
    fn zero_iterations_is_not_a_pass() {
        let scenario = get_scenario("theme").unwrap();
        let result = ScenarioRunner::new(PageConfig::default(), false).run(scenario, 0);
        assert!(!result.passed);
        assert_eq!(result.iterations_run, 0);
        assert_eq!(result.failures, ["no iterations run"]);
    }

    #[test]
    fn result_serializes_duration_as_micros() {
        let result = ScenarioResult {
            scenario_name: "x".to_string(),
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_micros(1500),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 1500);
    }
}
