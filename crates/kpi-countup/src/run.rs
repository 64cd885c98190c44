//! A single count-up run as an explicit state machine.
//!
//! ```text
//! NotStarted ──first frame──► Running { start_ms } ──progress = 1──► Complete
//! ```
//!
//! The run never reads a clock on its own; every transition is driven by the
//! frame timestamp passed to [`CounterRun::step`].

use crate::config::CountupConfig;
use crate::format::format_frame;
use crate::value::DisplayValue;
use std::rc::Rc;

/// Lifecycle of a run
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunState {
    /// No frame seen yet
    NotStarted,
    /// Counting; started at `start_ms`
    Running {
        /// Timestamp of the first frame
        start_ms: f64,
    },
    /// Settled on the final text
    Complete,
}

/// Text produced by one step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutput {
    /// Intermediate value; another frame is needed
    Frame(String),
    /// Final text; the run is over
    Complete(String),
}

impl FrameOutput {
    /// Text to display
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Frame(text) | Self::Complete(text) => text,
        }
    }

    /// Whether this is the last output of the run
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Interpolation from zero to a [`DisplayValue`]
#[derive(Clone, Debug)]
pub struct CounterRun {
    value: DisplayValue,
    config: Rc<CountupConfig>,
    state: RunState,
}

impl CounterRun {
    /// Create a run that has not seen a frame yet
    #[must_use]
    pub fn new(value: DisplayValue, config: Rc<CountupConfig>) -> Self {
        Self {
            value,
            config,
            state: RunState::NotStarted,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Target value
    #[must_use]
    pub fn value(&self) -> &DisplayValue {
        &self.value
    }

    /// Elapsed fraction in `[0, 1]` at `now_ms`
    #[must_use]
    pub fn progress_at(&self, now_ms: f64) -> f64 {
        match self.state {
            RunState::NotStarted => 0.0,
            RunState::Running { start_ms } => {
                ((now_ms - start_ms) / self.config.duration_ms).clamp(0.0, 1.0)
            }
            RunState::Complete => 1.0,
        }
    }

    /// Eased magnitude for an elapsed fraction
    #[must_use]
    pub fn magnitude_at(&self, progress: f64) -> f64 {
        self.config.easing.evaluate(progress) * self.value.magnitude
    }

    /// Advance to the frame at `now_ms`.
    ///
    /// The first call captures the start time. Returns `None` once the run is
    /// complete.
    pub fn step(&mut self, now_ms: f64) -> Option<FrameOutput> {
        if self.state == RunState::NotStarted {
            self.state = RunState::Running { start_ms: now_ms };
        }
        let RunState::Running { .. } = self.state else {
            return None;
        };

        let progress = self.progress_at(now_ms);
        if progress < 1.0 {
            let current = self.magnitude_at(progress);
            Some(FrameOutput::Frame(format_frame(
                self.value.kind,
                current,
                &self.config,
            )))
        } else {
            self.state = RunState::Complete;
            Some(FrameOutput::Complete(self.value.final_text(&self.config)))
        }
    }
}
