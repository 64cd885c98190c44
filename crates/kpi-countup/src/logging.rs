//! Log output.
//!
//! Library code only emits `tracing` events. [`init_logging`] installs a
//! global `tracing_subscriber` fmt subscriber: on native hosts it writes to
//! stderr, in the browser each formatted line goes to the devtools console.

use crate::result::{CountupError, CountupResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `kpi_countup=debug`
    pub default_directive: String,
    /// ANSI colors (native only; the browser console never gets escapes)
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "kpi_countup=info".to_string(),
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Set the fallback filter directive
    #[must_use]
    pub fn with_directive(mut self, directive: &str) -> Self {
        self.default_directive = directive.to_string();
        self
    }

    /// Build the filter: `RUST_LOG` if set and valid, else the default directive
    ///
    /// # Errors
    ///
    /// Returns error if the default directive does not parse
    pub fn filter(&self) -> CountupResult<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.default_directive))
            .map_err(|e| CountupError::Logging {
                message: format!("bad filter {:?}: {e}", self.default_directive),
            })
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns error if the filter is invalid or a global subscriber is
/// already installed
pub fn init_logging(config: &LogConfig) -> CountupResult<()> {
    let filter = config.filter()?;

    #[cfg(all(feature = "browser", target_arch = "wasm32"))]
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(console::ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .try_init();

    #[cfg(not(all(feature = "browser", target_arch = "wasm32")))]
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .try_init();

    result.map_err(|e| CountupError::Logging {
        message: e.to_string(),
    })
}

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
mod console {
    use std::io;
    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;

    /// Routes formatted lines to `console.*` by level
    pub(super) struct ConsoleMakeWriter;

    pub(super) struct ConsoleWriter {
        level: Level,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let line = String::from_utf8_lossy(buf);
            let line = wasm_bindgen::JsValue::from_str(line.trim_end());
            match self.level {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
                Level::INFO => web_sys::console::log_1(&line),
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter { level: Level::INFO }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter {
                level: *meta.level(),
            }
        }
    }
}
