//! Browser-free wiring of document, watcher and animator.
//!
//! [`CountupHarness`] assembles the same pieces the browser bootstrap does,
//! on top of [`MockDocument`] and [`MockFrameScheduler`], so the whole flow
//! (sweep, insertion, frame loop, completion) runs deterministically.
//!
//! ```rust
//! use kpi_countup::prelude::*;
//!
//! let mut harness = CountupHarness::new().unwrap();
//! harness.start();
//!
//! let kpi = MockElement::new("span")
//!     .with_class("kpi-value-animate")
//!     .with_attr("data-value", "87.5%");
//! let body = harness.document().body().clone();
//! harness.insert(&body, kpi.clone());
//! harness.flush_mutations();
//! harness.run_to_completion();
//!
//! assert_eq!(kpi.text(), "87.5%");
//! ```

use crate::animator::{AnimateOutcome, Animator};
use crate::config::CountupConfig;
use crate::dom::{MockDocument, MockElement};
use crate::result::CountupResult;
use crate::scheduler::MockFrameScheduler;
use crate::watcher::{Watcher, WatcherState};
use std::cell::RefCell;
use std::rc::Rc;

/// Frame interval used by [`CountupHarness::run_to_completion`], ~60 Hz
pub const DEFAULT_FRAME_MS: f64 = 16.0;

/// Test harness for the full count-up flow
#[derive(Debug)]
pub struct CountupHarness {
    document: MockDocument,
    animator: Animator<MockFrameScheduler>,
    watcher: Watcher<MockElement>,
    outcomes: Rc<RefCell<Vec<AnimateOutcome>>>,
}

impl CountupHarness {
    /// Harness with the default config and an empty document
    ///
    /// # Errors
    ///
    /// Never fails for the default config; kept fallible for symmetry
    pub fn new() -> CountupResult<Self> {
        Self::with_document(CountupConfig::default(), MockDocument::new())
    }

    /// Harness with a custom config and document
    ///
    /// # Errors
    ///
    /// Returns error if `config` fails validation
    pub fn with_document(config: CountupConfig, document: MockDocument) -> CountupResult<Self> {
        let animator = Animator::new(config, MockFrameScheduler::new())?;
        let outcomes = Rc::new(RefCell::new(Vec::new()));

        let dispatch = animator.clone();
        let log = Rc::clone(&outcomes);
        let watcher = Watcher::new(&animator.config().marker_class, move |node: MockElement| {
            let outcome = dispatch.animate(node);
            log.borrow_mut().push(outcome);
        });

        Ok(Self {
            document,
            animator,
            watcher,
            outcomes,
        })
    }

    /// The mock document
    #[must_use]
    pub fn document(&self) -> &MockDocument {
        &self.document
    }

    /// The animator (and through it, the frame scheduler)
    #[must_use]
    pub fn animator(&self) -> &Animator<MockFrameScheduler> {
        &self.animator
    }

    /// The frame scheduler
    #[must_use]
    pub fn scheduler(&self) -> &MockFrameScheduler {
        self.animator.scheduler()
    }

    /// Watcher state
    #[must_use]
    pub fn watcher_state(&self) -> WatcherState {
        self.watcher.state()
    }

    /// Outcome of every dispatch so far, in order
    #[must_use]
    pub fn outcomes(&self) -> Vec<AnimateOutcome> {
        self.outcomes.borrow().clone()
    }

    /// Start watching; sweeps the body. Returns the sweep's dispatch count.
    pub fn start(&mut self) -> usize {
        let body = self.document.body().clone();
        self.watcher.start(&body)
    }

    /// Stop watching
    pub fn stop(&mut self) {
        self.watcher.stop();
    }

    /// Manual sweep of the body
    pub fn rescan(&mut self) -> usize {
        let body = self.document.body().clone();
        self.watcher.rescan(&body)
    }

    /// Insert `child` under `parent`; delivered on the next flush
    pub fn insert(&mut self, parent: &MockElement, child: MockElement) {
        self.document.append_child(parent, child);
    }

    /// Deliver queued mutation records to the watcher.
    ///
    /// Returns the number of dispatches.
    pub fn flush_mutations(&mut self) -> usize {
        let records = self.document.take_mutations();
        records
            .into_iter()
            .map(|record| self.watcher.handle_added(record.added_nodes))
            .sum()
    }

    /// Run one frame `frame_ms` after the previous one
    pub fn advance_frame(&self, frame_ms: f64) -> usize {
        self.scheduler().advance_frame(frame_ms)
    }

    /// Run frames at [`DEFAULT_FRAME_MS`] until every run has completed.
    ///
    /// Returns the number of frames run.
    pub fn run_to_completion(&self) -> usize {
        let config = self.animator.config();
        // a run needs duration / interval frames plus its first frame; leave
        // headroom for runs started mid-way
        let max_frames = (config.duration_ms / DEFAULT_FRAME_MS).ceil() as usize * 4 + 8;
        self.scheduler().run_until_idle(DEFAULT_FRAME_MS, max_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(source: &str) -> MockElement {
        MockElement::new("span")
            .with_class("kpi-value-animate")
            .with_attr("data-value", source)
            .with_text(source)
    }

    #[test]
    fn test_new_is_idle() {
        let harness = CountupHarness::new().unwrap();
        assert_eq!(harness.watcher_state(), WatcherState::Idle);
        assert!(harness.outcomes().is_empty());
    }

    #[test]
    fn test_start_animates_present_elements() {
        let existing = kpi("₹20,00,000");
        let document = MockDocument::with_body(vec![existing.clone()]);
        let mut harness =
            CountupHarness::with_document(CountupConfig::default(), document).unwrap();

        assert_eq!(harness.start(), 1);
        assert_eq!(harness.outcomes(), vec![AnimateOutcome::Started]);
        harness.run_to_completion();
        assert_eq!(existing.text(), "₹20,00,000");
        assert!(existing.has_class("animation-complete"));
    }

    #[test]
    fn test_insert_waits_for_flush() {
        let mut harness = CountupHarness::new().unwrap();
        harness.start();
        let body = harness.document().body().clone();
        let el = kpi("42");
        harness.insert(&body, el.clone());
        assert!(harness.scheduler().is_idle());

        assert_eq!(harness.flush_mutations(), 1);
        assert_eq!(harness.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = CountupConfig::default().with_marker_class("");
        assert!(CountupHarness::with_document(config, MockDocument::new()).is_err());
    }

    #[test]
    fn test_run_to_completion_bounded() {
        let mut harness = CountupHarness::new().unwrap();
        harness.start();
        let body = harness.document().body().clone();
        harness.insert(&body, kpi("100"));
        harness.flush_mutations();
        let frames = harness.run_to_completion();
        // 2000 / 16 = 125 intervals plus the start frame
        assert_eq!(frames, 126);
        assert!(harness.scheduler().is_idle());
    }
}
