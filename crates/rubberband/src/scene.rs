//! An in-memory host document.
//!
//! [`Scene`] pairs an [`ElementTree`] with a layout: each element may have a
//! rectangle in document coordinates and an optional unscaled layout size.
//! Like a browser, it reports rectangles relative to the viewport, so
//! scrolling the scene moves every reported rectangle.

use rubberband_style::{ElementData, ElementId, ElementTree, SelectorList, SelectorMatching};
use slotmap::SecondaryMap;

use crate::geometry::{Rect, Size};
use crate::host::Host;
use crate::normalize::ScrollPosition;

/// An element tree with layout and scroll state.
#[derive(Debug, Default)]
pub struct Scene {
    tree: ElementTree,
    layout: SecondaryMap<ElementId, Rect>,
    client_sizes: SecondaryMap<ElementId, Size>,
    scroll: ScrollPosition,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a laid-out element. `rect` is in document coordinates.
    pub fn insert(&mut self, data: ElementData, parent: Option<ElementId>, rect: Rect) -> ElementId {
        let id = self.tree.insert(data, parent);
        self.layout.insert(id, rect);
        id
    }

    /// Insert an element that has no layout yet.
    pub fn insert_unplaced(&mut self, data: ElementData, parent: Option<ElementId>) -> ElementId {
        self.tree.insert(data, parent)
    }

    /// Remove an element and its subtree.
    pub fn remove(&mut self, element: ElementId) -> bool {
        if !self.tree.contains(element) {
            return false;
        }
        let mut doomed = vec![element];
        let mut index = 0;
        while index < doomed.len() {
            let current = doomed[index];
            doomed.extend_from_slice(self.tree.children(current));
            index += 1;
        }
        for id in doomed {
            self.layout.remove(id);
            self.client_sizes.remove(id);
        }
        self.tree.remove(element)
    }

    /// Move or resize an element. `rect` is in document coordinates.
    ///
    /// Returns `false` if the element is not in the scene.
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) -> bool {
        if !self.tree.contains(element) {
            return false;
        }
        self.layout.insert(element, rect);
        true
    }

    /// Take an element out of layout while keeping it in the tree.
    pub fn clear_rect(&mut self, element: ElementId) {
        self.layout.remove(element);
    }

    /// Set the element's unscaled layout size.
    pub fn set_client_size(&mut self, element: ElementId, size: Size) -> bool {
        if !self.tree.contains(element) {
            return false;
        }
        self.client_sizes.insert(element, size);
        true
    }

    /// The element's rectangle in document coordinates.
    pub fn document_rect(&self, element: ElementId) -> Option<Rect> {
        self.layout.get(element).copied()
    }

    /// Set the document scroll position.
    pub fn set_scroll(&mut self, scroll: ScrollPosition) {
        self.scroll = scroll;
    }

    /// Scroll the document by a delta.
    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        self.scroll.x += dx;
        self.scroll.y += dy;
    }

    /// Enable or disable native selector matching.
    pub fn set_native_matching(&mut self, enabled: bool) {
        self.tree.set_native_matching(enabled);
    }

    /// The underlying element tree.
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Mutable access to the element tree, e.g. to change classes.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }
}

impl SelectorMatching for Scene {
    fn native_matches(&self, element: ElementId, selectors: &SelectorList) -> Option<bool> {
        self.tree.native_matches(element, selectors)
    }

    fn query_selector_all(&self, selectors: &SelectorList) -> Vec<ElementId> {
        self.tree.query_selector_all(selectors)
    }
}

impl Host for Scene {
    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        if !self.tree.contains(element) {
            return None;
        }
        self.layout
            .get(element)
            .map(|rect| rect.offset(-self.scroll.x, -self.scroll.y))
    }

    fn client_size(&self, element: ElementId) -> Option<Size> {
        self.client_sizes.get(element).copied()
    }

    fn scroll(&self) -> ScrollPosition {
        self.scroll
    }
}
