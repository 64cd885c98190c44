//! Frame clocks.
//!
//! Runs read time in milliseconds from a monotonic origin, the same unit as
//! the timestamp the browser hands to `requestAnimationFrame` callbacks.
//! [`FakeClock`] gives tests full control of that timeline.

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since the clock's origin
    fn now_ms(&self) -> f64;
}

/// Fake clock for deterministic tests
///
/// Clones share the same timeline, so a scheduler and a test can hold the
/// same clock and observe each other's changes.
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    current_ms: Rc<Cell<f64>>,
}

impl FakeClock {
    /// Create a clock at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock at a fixed time
    #[must_use]
    pub fn at(time_ms: f64) -> Self {
        let clock = Self::new();
        clock.set_ms(time_ms);
        clock
    }

    /// Jump to an absolute time
    pub fn set_ms(&self, time_ms: f64) {
        self.current_ms.set(time_ms);
    }

    /// Fast-forward by `ms` milliseconds
    pub fn advance_ms(&self, ms: f64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> f64 {
        self.current_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_clock_starts_at_zero() {
        assert!(FakeClock::new().now_ms().abs() < f64::EPSILON);
    }

    #[test]
    fn test_fake_clock_at() {
        let clock = FakeClock::at(1500.0);
        assert!((clock.now_ms() - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fake_clock_advance() {
        let clock = FakeClock::new();
        clock.advance_ms(16.0);
        clock.advance_ms(16.5);
        assert!((clock.now_ms() - 32.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fake_clock_clones_share_time() {
        let clock = FakeClock::new();
        let shared = clock.clone();
        clock.set_ms(250.0);
        assert!((shared.now_ms() - 250.0).abs() < f64::EPSILON);
    }
}
