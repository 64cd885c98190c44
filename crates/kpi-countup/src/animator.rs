//! Per-element count-up driver.
//!
//! [`Animator::animate`] is safe to call any number of times on the same
//! element: the processing flag is checked first and set before the run is
//! scheduled, so only the first call with a usable source does any work.

use crate::config::CountupConfig;
use crate::result::{CountupError, CountupResult};
use crate::run::{CounterRun, FrameOutput};
use crate::scheduler::FrameScheduler;
use crate::target::CounterTarget;
use crate::value::DisplayValue;
use std::rc::Rc;
use tracing::{debug, trace};

/// What a call to [`Animator::animate`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimateOutcome {
    /// A run was scheduled
    Started,
    /// The element was already processed; nothing changed
    AlreadyProcessing,
    /// Source attribute absent or empty; the element stays eligible
    MissingSource,
    /// Source is not numeric; it was displayed verbatim without a run
    Fallback,
}

/// Starts runs on elements, one independent frame chain per element
#[derive(Debug, Clone)]
pub struct Animator<S> {
    config: Rc<CountupConfig>,
    scheduler: S,
}

impl<S: FrameScheduler + Clone + 'static> Animator<S> {
    /// Create an animator
    ///
    /// # Errors
    ///
    /// Returns error if `config` fails validation
    pub fn new(config: CountupConfig, scheduler: S) -> CountupResult<Self> {
        Self::with_shared_config(Rc::new(config), scheduler)
    }

    /// Create an animator sharing an existing config
    ///
    /// # Errors
    ///
    /// Returns error if `config` fails validation
    pub fn with_shared_config(config: Rc<CountupConfig>, scheduler: S) -> CountupResult<Self> {
        config.validate()?;
        Ok(Self { config, scheduler })
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &CountupConfig {
        &self.config
    }

    /// Scheduler frames are requested from
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Count `target` up to the value declared in its source attribute.
    pub fn animate<T: CounterTarget + 'static>(&self, target: T) -> AnimateOutcome {
        let config = &self.config;
        if target.is_processing(&config.processing_attribute) {
            trace!("counter already processing, skipping");
            return AnimateOutcome::AlreadyProcessing;
        }

        let source = target
            .source_value(&config.source_attribute)
            .unwrap_or_default();
        match DisplayValue::parse(&source, config) {
            Ok(value) => {
                target.mark_processing(&config.processing_attribute);
                self.start(target, value);
                AnimateOutcome::Started
            }
            Err(CountupError::MissingSource { attribute }) => {
                debug!(%attribute, "counter has no source value yet");
                AnimateOutcome::MissingSource
            }
            Err(err) => {
                debug!(error = %err, "showing source verbatim");
                target.mark_processing(&config.processing_attribute);
                target.set_display_text(&source);
                AnimateOutcome::Fallback
            }
        }
    }

    /// Count `target` up to a typed value, ignoring its source attribute.
    pub fn animate_value<T: CounterTarget + 'static>(
        &self,
        target: T,
        value: DisplayValue,
    ) -> AnimateOutcome {
        if target.is_processing(&self.config.processing_attribute) {
            return AnimateOutcome::AlreadyProcessing;
        }
        target.mark_processing(&self.config.processing_attribute);
        if !value.magnitude.is_finite() {
            target.set_display_text(&value.final_text(&self.config));
            return AnimateOutcome::Fallback;
        }
        self.start(target, value);
        AnimateOutcome::Started
    }

    fn start<T: CounterTarget + 'static>(&self, target: T, value: DisplayValue) {
        debug!(
            kind = %value.kind,
            magnitude = value.magnitude,
            duration_ms = self.config.duration_ms,
            "counter started"
        );
        let run = CounterRun::new(value, Rc::clone(&self.config));
        schedule_step(target, run, self.scheduler.clone(), Rc::clone(&self.config));
    }
}

/// Request the next frame of `run`; each frame re-requests until completion.
fn schedule_step<T, S>(target: T, mut run: CounterRun, scheduler: S, config: Rc<CountupConfig>)
where
    T: CounterTarget + 'static,
    S: FrameScheduler + Clone + 'static,
{
    let next = scheduler.clone();
    scheduler.request_frame(Box::new(move |timestamp| match run.step(timestamp) {
        Some(FrameOutput::Frame(text)) => {
            target.set_display_text(&text);
            schedule_step(target, run, next, config);
        }
        Some(FrameOutput::Complete(text)) => {
            target.set_display_text(&text);
            target.mark_complete(&config.complete_class);
            debug!(final_text = %text, "counter complete");
        }
        None => {}
    }));
}
