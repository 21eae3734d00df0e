//! Latest-information feed
//!
//! The first visit seeds a sample list into preferences; later visits render
//! the stored items at the top of the list container.

use crate::config::FeedCfg;
use crate::prefs::{PrefKey, PrefStore, Prefs};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub text: String,
    /// ISO date, rendered as-is.
    pub date: String,
}

impl FeedItem {
    pub fn new(text: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            date: date.into(),
        }
    }
}

#[must_use]
pub fn sample_items() -> Vec<FeedItem> {
    vec![
        FeedItem::new("New circular: Library hours updated", "2025-11-16"),
        FeedItem::new("Judgment summary uploaded", "2025-11-12"),
    ]
}

/// Container the feed entries are inserted into.
pub trait FeedList {
    /// Insert `item` as the first entry.
    fn prepend(&self, item: &FeedItem);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Storage was empty; this many sample items were stored, none rendered.
    Seeded(usize),
    /// This many stored items were rendered.
    Rendered(usize),
}

/// Seed the sample list on first load, otherwise render stored items.
///
/// Rendering does not remember what it inserted, so every load prepends the
/// stored items again.
pub fn seed_or_render<S, L>(prefs: &Prefs<S>, list: &L, cfg: &FeedCfg) -> FeedOutcome
where
    S: PrefStore,
    L: FeedList,
{
    let items: Vec<FeedItem> = prefs.get(PrefKey::LatestItems, Vec::new());
    if items.is_empty() {
        prefs.set(PrefKey::LatestItems, &cfg.sample);
        return FeedOutcome::Seeded(cfg.sample.len());
    }
    let shown = items.iter().take(cfg.render_limit);
    let mut count = 0;
    for item in shown {
        list.prepend(item);
        count += 1;
    }
    FeedOutcome::Rendered(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefStore;
    use crate::sim::FakeFeedList;

    #[test]
    fn first_load_seeds_without_rendering() {
        let prefs = Prefs::new(MemoryPrefStore::new());
        let list = FakeFeedList::default();
        let outcome = seed_or_render(&prefs, &list, &FeedCfg::default());
        assert_eq!(outcome, FeedOutcome::Seeded(2));
        assert!(list.entries().is_empty());
        assert_eq!(prefs.get(PrefKey::LatestItems, Vec::<FeedItem>::new()), sample_items());
    }

    #[test]
    fn second_load_renders_stored_items() {
        let prefs = Prefs::new(MemoryPrefStore::new());
        let cfg = FeedCfg::default();
        seed_or_render(&prefs, &FakeFeedList::default(), &cfg);
        let list = FakeFeedList::default();
        assert_eq!(seed_or_render(&prefs, &list, &cfg), FeedOutcome::Rendered(2));
        let entries = list.entries();
        assert_eq!(entries[0].text, "Judgment summary uploaded");
        assert_eq!(entries[1].text, "New circular: Library hours updated");
    }

    #[test]
    fn renders_at_most_limit() {
        let items: Vec<_> = (1..=5)
            .map(|i| FeedItem::new(format!("item {i}"), format!("2025-01-0{i}")))
            .collect();
        let prefs = Prefs::new(MemoryPrefStore::new());
        prefs.set(PrefKey::LatestItems, &items);
        let list = FakeFeedList::default();
        assert_eq!(
            seed_or_render(&prefs, &list, &FeedCfg::default()),
            FeedOutcome::Rendered(3)
        );
        assert_eq!(list.entries().len(), 3);
        assert_eq!(list.entries()[0].text, "item 3");
    }

    #[test]
    fn repeated_loads_prepend_again() {
        let prefs = Prefs::new(MemoryPrefStore::new());
        prefs.set(PrefKey::LatestItems, &sample_items());
        let list = FakeFeedList::default();
        let cfg = FeedCfg::default();
        seed_or_render(&prefs, &list, &cfg);
        seed_or_render(&prefs, &list, &cfg);
        assert_eq!(list.entries().len(), 4);
    }

    #[test]
    fn malformed_storage_is_reseeded() {
        let prefs = Prefs::new(MemoryPrefStore::new().with_raw("latestItems", "[{\"title\":1}]"));
        let outcome = seed_or_render(&prefs, &FakeFeedList::default(), &FeedCfg::default());
        assert_eq!(outcome, FeedOutcome::Seeded(2));
    }
}
