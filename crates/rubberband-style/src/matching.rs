//! Host selector-matching capability.
//!
//! Hosts differ in what they can answer. Some can test a single element
//! against a selector directly; others can only list every element matching
//! a selector. [`element_matches`] uses the direct test when the host offers
//! one and otherwise scans the host's full match list for the element.

use crate::element::ElementId;
use crate::selector::SelectorList;

/// Selector queries a host can answer.
pub trait SelectorMatching {
    /// Test `element` against `selectors` directly.
    ///
    /// Returns `None` when the host has no direct matching primitive.
    fn native_matches(&self, element: ElementId, selectors: &SelectorList) -> Option<bool> {
        let _ = (element, selectors);
        None
    }

    /// Every element matching any of `selectors`, in document order.
    fn query_selector_all(&self, selectors: &SelectorList) -> Vec<ElementId>;
}

/// Whether `element` matches any selector in `selectors`.
///
/// An empty list matches nothing.
pub fn element_matches<M>(host: &M, element: ElementId, selectors: &SelectorList) -> bool
where
    M: SelectorMatching + ?Sized,
{
    if selectors.is_empty() {
        return false;
    }
    match host.native_matches(element, selectors) {
        Some(matched) => matched,
        None => {
            let candidates = host.query_selector_all(selectors);
            tracing::trace!(
                target: "rubberband_style",
                candidates = candidates.len(),
                "no native matcher, scanning query results"
            );
            candidates.contains(&element)
        }
    }
}
