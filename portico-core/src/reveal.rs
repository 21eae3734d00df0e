//! Reveal-on-scroll
//!
//! Elements become visible the first time enough of them enters the
//! viewport and are never hidden again. An element too tall to ever reach
//! the threshold ratio counts once its visible part spans the viewport.

use crate::config::RevealCfg;
use crate::node::Node;

/// One intersection observation for the target at `index`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionSample {
    pub index: usize,
    pub is_intersecting: bool,
    pub ratio: f64,
    /// The visible part is at least as tall as the viewport.
    pub fills_viewport: bool,
}

pub struct RevealTracker<N> {
    targets: Vec<N>,
    observing: Vec<bool>,
    visible_class: String,
    threshold: f64,
}

impl<N: Node> RevealTracker<N> {
    pub fn new(targets: Vec<N>, cfg: &RevealCfg) -> Self {
        let observing = vec![true; targets.len()];
        Self {
            targets,
            observing,
            visible_class: cfg.visible_class.clone(),
            threshold: cfg.threshold,
        }
    }

    #[must_use]
    pub fn targets(&self) -> &[N] {
        &self.targets
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn is_observing(&self, index: usize) -> bool {
        self.observing.get(index).copied().unwrap_or(false)
    }

    /// Number of targets still waiting to be revealed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.observing.iter().filter(|o| **o).count()
    }

    /// Apply a batch of observations; returns the indices revealed by this
    /// batch, which the caller should stop observing.
    pub fn handle(&mut self, samples: &[IntersectionSample]) -> Vec<usize> {
        let mut revealed = Vec::new();
        for sample in samples {
            let enough = sample.ratio >= self.threshold || sample.fills_viewport;
            if !sample.is_intersecting || !enough {
                continue;
            }
            if self.reveal(sample.index) {
                revealed.push(sample.index);
            }
        }
        revealed
    }

    /// Runtimes without intersection observation show everything at once.
    pub fn reveal_all(&mut self) {
        for index in 0..self.targets.len() {
            self.reveal(index);
        }
    }

    fn reveal(&mut self, index: usize) -> bool {
        match (self.targets.get(index), self.observing.get_mut(index)) {
            (Some(target), Some(observing)) if *observing => {
                target.add_class(&self.visible_class);
                *observing = false;
                true
            }
            _ => false,
        }
    }
}
