//! KPI count-up: animate dashboard figures from zero to their final value.
//!
//! Elements carrying the `kpi-value-animate` class declare their final
//! display string in `data-value` (`₹20,00,000`, `87.5%`, `1,234`). Each one
//! is counted up once over two seconds with an ease-out curve and then set
//! to the literal source string.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐  nodes  ┌───────────┐ element ┌───────────┐  frames  ┌─────────────┐
//! │ Document  │────────►│  Watcher  │────────►│ Animator  │─────────►│ CounterRun  │
//! │ (web-sys  │         │ sweep +   │         │ flag +    │◄─────────│ state       │
//! │  or mock) │         │ mutations │         │ parse     │ schedule │ machine     │
//! └───────────┘         └───────────┘         └───────────┘          └─────────────┘
//! ```
//!
//! The core is browser-free: DOM access goes through [`CounterTarget`] and
//! [`NodeTree`], frame timing through [`FrameScheduler`]. The `browser`
//! feature implements them over `web_sys`; [`CountupHarness`] implements
//! them in memory for deterministic tests.

#![warn(missing_docs)]

pub mod animator;
pub mod clock;
pub mod config;
pub mod dom;
pub mod easing;
pub mod format;
pub mod harness;
pub mod logging;
mod result;
pub mod run;
pub mod scheduler;
pub mod target;
pub mod value;
pub mod watcher;

/// Browser bindings (`web_sys` trait impls and the JS controller)
#[cfg(feature = "browser")]
pub mod browser;

pub use animator::{AnimateOutcome, Animator};
pub use clock::{Clock, FakeClock};
pub use config::{CountupConfig, DEFAULT_DURATION_MS};
pub use dom::{MockDocument, MockElement, MutationRecord};
pub use easing::Easing;
pub use format::{format_fixed, format_frame, format_integer, Grouping};
pub use harness::{CountupHarness, DEFAULT_FRAME_MS};
pub use logging::{init_logging, LogConfig};
pub use result::{CountupError, CountupResult};
pub use run::{CounterRun, FrameOutput, RunState};
pub use scheduler::{FrameCallback, FrameScheduler, MockFrameScheduler};
pub use target::CounterTarget;
pub use value::{DisplayValue, FormatKind};
pub use watcher::{NodeTree, Watcher, WatcherState};

#[cfg(feature = "browser")]
pub use browser::{AnimationFrameScheduler, CountupController};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::animator::*;
    pub use super::clock::*;
    pub use super::config::*;
    pub use super::dom::*;
    pub use super::easing::Easing;
    pub use super::format::Grouping;
    pub use super::harness::*;
    pub use super::result::*;
    pub use super::run::*;
    pub use super::scheduler::*;
    pub use super::target::*;
    pub use super::value::{DisplayValue, FormatKind};
    pub use super::watcher::*;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_covers_end_to_end() {
        let mut harness = CountupHarness::new().unwrap();
        harness.start();
        let body = harness.document().body().clone();
        let kpi = MockElement::new("span")
            .with_class("kpi-value-animate")
            .with_attr("data-value", "1,234");
        harness.insert(&body, kpi.clone());
        harness.flush_mutations();
        harness.run_to_completion();
        assert_eq!(kpi.text(), "1,234");
    }

    #[test]
    fn test_defaults_exported() {
        assert_eq!(DEFAULT_DURATION_MS, 2000.0);
        assert_eq!(super::DEFAULT_FRAME_MS, 16.0);
    }
}
