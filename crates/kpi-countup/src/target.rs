//! The element contract a count-up writes to.

/// A display element that can be counted up.
///
/// Implementations are handles: cloning one must refer to the same element,
/// and every method takes `&self` because the animation callbacks only hold
/// shared handles (like a browser element reference).
pub trait CounterTarget {
    /// Value of `attribute`, if present
    fn source_value(&self, attribute: &str) -> Option<String>;

    /// Whether the processing flag `attribute` is set
    fn is_processing(&self, attribute: &str) -> bool;

    /// Set the processing flag `attribute`; it is never cleared
    fn mark_processing(&self, attribute: &str);

    /// Replace the visible text
    fn set_display_text(&self, text: &str);

    /// Add the completion marker `class`
    fn mark_complete(&self, class: &str);
}
