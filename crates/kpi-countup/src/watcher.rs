//! Discovery of eligible elements.
//!
//! [`Watcher`] owns the discovery rules and nothing else: an initial sweep on
//! [`Watcher::start`], then one dispatch per qualifying node for every batch
//! of added nodes. What happens to a discovered node is the injected
//! callback's business. De-duplication is not done here; the animator's
//! processing flag already makes repeated discovery harmless.

use tracing::{debug, trace};

/// Minimal node surface discovery needs
pub trait NodeTree: Sized {
    /// Element node (as opposed to text, comment, ...)
    fn is_element(&self) -> bool;

    /// Whether the node carries `class`
    fn has_class(&self, class: &str) -> bool;

    /// All descendants carrying `class`, in document order, excluding `self`
    fn descendants_with_class(&self, class: &str) -> Vec<Self>;
}

/// Watcher lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatcherState {
    /// Created, not started
    Idle,
    /// Dispatching added nodes
    Watching,
    /// Stopped; added nodes are ignored until restarted
    Stopped,
}

/// Dispatches marker-class nodes to a discovery callback
pub struct Watcher<N> {
    marker_class: String,
    on_discovered: Box<dyn FnMut(N)>,
    state: WatcherState,
    discovered: usize,
}

impl<N> std::fmt::Debug for Watcher<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("marker_class", &self.marker_class)
            .field("state", &self.state)
            .field("discovered", &self.discovered)
            .finish_non_exhaustive()
    }
}

impl<N: NodeTree> Watcher<N> {
    /// Create an idle watcher
    pub fn new<F>(marker_class: &str, on_discovered: F) -> Self
    where
        F: FnMut(N) + 'static,
    {
        Self {
            marker_class: marker_class.to_string(),
            on_discovered: Box::new(on_discovered),
            state: WatcherState::Idle,
            discovered: 0,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Whether added nodes are being dispatched
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.state == WatcherState::Watching
    }

    /// Total dispatches since creation
    #[must_use]
    pub fn discovered_count(&self) -> usize {
        self.discovered
    }

    /// Marker class being matched
    #[must_use]
    pub fn marker_class(&self) -> &str {
        &self.marker_class
    }

    /// Begin watching and sweep `root` for elements already present.
    ///
    /// Returns the number of elements the sweep dispatched. Calling this
    /// while already watching only re-sweeps.
    pub fn start(&mut self, root: &N) -> usize {
        if self.state != WatcherState::Watching {
            debug!(marker_class = %self.marker_class, "watcher started");
        }
        self.state = WatcherState::Watching;
        self.rescan(root)
    }

    /// Stop dispatching added nodes
    pub fn stop(&mut self) {
        if self.state == WatcherState::Watching {
            debug!(discovered = self.discovered, "watcher stopped");
        }
        self.state = WatcherState::Stopped;
    }

    /// Dispatch every marker-class descendant of `root`, in any state.
    pub fn rescan(&mut self, root: &N) -> usize {
        let found = root.descendants_with_class(&self.marker_class);
        let count = found.len();
        for node in found {
            self.dispatch(node);
        }
        trace!(count, "sweep dispatched");
        count
    }

    /// Handle one batch of added nodes.
    ///
    /// An added node that carries the marker is dispatched itself; otherwise
    /// its subtree is searched. Non-element nodes are skipped. Returns the
    /// number of dispatches; always zero unless watching.
    pub fn handle_added<I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = N>,
    {
        if !self.is_watching() {
            return 0;
        }
        let mut count = 0;
        for node in nodes {
            if !node.is_element() {
                continue;
            }
            if node.has_class(&self.marker_class) {
                self.dispatch(node);
                count += 1;
            } else {
                for found in node.descendants_with_class(&self.marker_class) {
                    self.dispatch(found);
                    count += 1;
                }
            }
        }
        if count > 0 {
            trace!(count, "added nodes dispatched");
        }
        count
    }

    fn dispatch(&mut self, node: N) {
        self.discovered += 1;
        (self.on_discovered)(node);
    }
}
