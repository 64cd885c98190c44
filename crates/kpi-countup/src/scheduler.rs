//! Display refresh scheduling.
//!
//! [`FrameScheduler`] is the seam over `requestAnimationFrame`: a callback is
//! queued and later invoked once with the frame timestamp. Each running
//! counter keeps its own chain of requests; nothing is shared between them.
//!
//! [`MockFrameScheduler`] replaces the browser with a deterministic queue
//! driven by a [`FakeClock`].

use crate::clock::{Clock, FakeClock};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// One-shot frame callback, called with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Something that can run a callback on the next rendered frame
pub trait FrameScheduler {
    /// Queue `callback` for the next frame
    fn request_frame(&self, callback: FrameCallback);
}

/// Deterministic frame queue for tests
///
/// Callbacks requested while a frame is running land in the following frame,
/// matching browser behavior.
#[derive(Clone)]
pub struct MockFrameScheduler {
    pending: Rc<RefCell<VecDeque<FrameCallback>>>,
    clock: FakeClock,
    frames_run: Rc<Cell<usize>>,
}

impl Default for MockFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockFrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFrameScheduler")
            .field("pending_count", &self.pending.borrow().len())
            .field("now_ms", &self.clock.now_ms())
            .field("frames_run", &self.frames_run.get())
            .finish()
    }
}

impl MockFrameScheduler {
    /// Create a scheduler with its own clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(FakeClock::new())
    }

    /// Create a scheduler reading frame time from `clock`
    #[must_use]
    pub fn with_clock(clock: FakeClock) -> Self {
        Self {
            pending: Rc::new(RefCell::new(VecDeque::new())),
            clock,
            frames_run: Rc::new(Cell::new(0)),
        }
    }

    /// The clock frames are stamped from
    #[must_use]
    pub fn clock(&self) -> &FakeClock {
        &self.clock
    }

    /// Callbacks waiting for the next frame
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Whether any callback is waiting
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Frames run so far
    #[must_use]
    pub fn frames_run(&self) -> usize {
        self.frames_run.get()
    }

    /// Run one frame at the current clock time.
    ///
    /// Returns the number of callbacks invoked.
    pub fn run_frame(&self) -> usize {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        if batch.is_empty() {
            return 0;
        }
        let now = self.clock.now_ms();
        let count = batch.len();
        for callback in batch {
            callback(now);
        }
        self.frames_run.set(self.frames_run.get() + 1);
        count
    }

    /// Advance the clock by `frame_ms`, then run one frame
    pub fn advance_frame(&self, frame_ms: f64) -> usize {
        self.clock.advance_ms(frame_ms);
        self.run_frame()
    }

    /// Run the current frame, then keep advancing by `frame_ms` until no
    /// callback is pending or `max_frames` frames have run.
    ///
    /// Returns the number of frames run.
    pub fn run_until_idle(&self, frame_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        if max_frames > 0 && self.run_frame() > 0 {
            frames += 1;
        }
        while frames < max_frames && !self.is_idle() {
            self.advance_frame(frame_ms);
            frames += 1;
        }
        frames
    }
}

impl FrameScheduler for MockFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_queues_until_frame() {
        let scheduler = MockFrameScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        scheduler.request_frame(Box::new(move |_| h.set(h.get() + 1)));
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(hits.get(), 0);

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_callbacks_receive_clock_time() {
        let scheduler = MockFrameScheduler::with_clock(FakeClock::at(100.0));
        let seen = Rc::new(Cell::new(0.0));
        let s = Rc::clone(&seen);
        scheduler.request_frame(Box::new(move |ts| s.set(ts)));
        scheduler.advance_frame(16.0);
        assert!((seen.get() - 116.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rerequest_lands_in_next_frame() {
        let scheduler = MockFrameScheduler::new();
        let inner = scheduler.clone();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        scheduler.request_frame(Box::new(move |_| {
            h.set(h.get() + 1);
            let h2 = Rc::clone(&h);
            inner.request_frame(Box::new(move |_| h2.set(h2.get() + 1)));
        }));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending_count(), 1);
        scheduler.run_frame();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_empty_frame_is_not_counted() {
        let scheduler = MockFrameScheduler::new();
        assert_eq!(scheduler.run_frame(), 0);
        assert_eq!(scheduler.frames_run(), 0);
    }

    #[test]
    fn test_run_until_idle_respects_max() {
        fn forever(scheduler: MockFrameScheduler) {
            let next = scheduler.clone();
            scheduler.request_frame(Box::new(move |_| forever(next)));
        }
        let scheduler = MockFrameScheduler::new();
        forever(scheduler.clone());
        assert_eq!(scheduler.run_until_idle(16.0, 5), 5);
        assert!(!scheduler.is_idle());
    }

    #[test]
    fn test_debug_output() {
        let debug = format!("{:?}", MockFrameScheduler::new());
        assert!(debug.contains("MockFrameScheduler"));
    }
}
