//! Element identity and an in-memory element tree.
//!
//! [`ElementId`] is the handle every other part of Rubberband uses to refer
//! to a DOM-like element: the selection target, the candidate elements and
//! the element an input event originated on. [`ElementTree`] is a simple
//! arena-backed document that stores tag, ID, classes, attributes and
//! disabled state, and answers structural queries for selector matching.

use slotmap::{SlotMap, new_key_type};

use crate::matching::SelectorMatching;
use crate::selector::{ElementMatchContext, ElementNavigator, SelectorList, SiblingInfo, matches_any};

new_key_type! {
    /// A stable handle to an element.
    ///
    /// Handles are never reused for a different element: once an element is
    /// removed, lookups with its old handle fail.
    pub struct ElementId;
}

/// Description of an element to insert into an [`ElementTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name.
    pub tag: String,
    /// Optional `id` attribute.
    pub id: Option<String>,
    /// Class list.
    pub classes: Vec<String>,
    /// Remaining attributes as name/value pairs.
    pub attributes: Vec<(String, String)>,
    /// Whether the element is disabled.
    pub disabled: bool,
}

impl ElementData {
    /// Create element data with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set the element ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Mark the element as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[derive(Debug)]
struct ElementNode {
    data: ElementData,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// An arena of elements arranged as a forest.
///
/// Top-level elements are kept in insertion order; children are kept in
/// insertion order under their parent. Document order is a pre-order walk.
#[derive(Debug)]
pub struct ElementTree {
    nodes: SlotMap<ElementId, ElementNode>,
    roots: Vec<ElementId>,
    native_matching: bool,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            native_matching: true,
        }
    }

    /// Insert an element as the last child of `parent`, or as a new root.
    ///
    /// A `parent` that is no longer in the tree is treated as `None`.
    pub fn insert(&mut self, data: ElementData, parent: Option<ElementId>) -> ElementId {
        let parent = parent.filter(|p| self.nodes.contains_key(*p));
        let id = self.nodes.insert(ElementNode {
            data,
            parent,
            children: Vec::new(),
        });
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Remove an element and its whole subtree.
    ///
    /// Returns `false` if the element was not in the tree.
    pub fn remove(&mut self, element: ElementId) -> bool {
        let Some(parent) = self.nodes.get(element).map(|n| n.parent) else {
            return false;
        };
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|c| *c != element);
                }
            }
            None => self.roots.retain(|r| *r != element),
        }

        let mut pending = vec![element];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(id) {
                pending.extend(node.children);
            }
        }
        true
    }

    /// Returns true if the element is in the tree.
    pub fn contains(&self, element: ElementId) -> bool {
        self.nodes.contains_key(element)
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The stored description of an element.
    pub fn data(&self, element: ElementId) -> Option<&ElementData> {
        self.nodes.get(element).map(|n| &n.data)
    }

    /// Mutable access to an element's description.
    pub fn data_mut(&mut self, element: ElementId) -> Option<&mut ElementData> {
        self.nodes.get_mut(element).map(|n| &mut n.data)
    }

    /// The children of an element, in order.
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.nodes
            .get(element)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `ancestor` is `element` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// All elements in document (pre-order) order.
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ElementId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Enable or disable native selector matching.
    ///
    /// With native matching disabled, [`SelectorMatching::native_matches`]
    /// reports no capability and callers fall back to scanning
    /// [`SelectorMatching::query_selector_all`].
    pub fn set_native_matching(&mut self, enabled: bool) {
        self.native_matching = enabled;
    }

    fn siblings_of(&self, element: ElementId) -> &[ElementId] {
        match self.nodes.get(element).and_then(|n| n.parent) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }
}

impl ElementNavigator for ElementTree {
    fn match_context(&self, element: ElementId) -> Option<ElementMatchContext<'_>> {
        let node = self.nodes.get(element)?;
        let sibling_info = if node.parent.is_some() {
            let siblings = self.siblings_of(element);
            siblings
                .iter()
                .position(|s| *s == element)
                .map(|index| SiblingInfo {
                    index,
                    count: siblings.len(),
                })
        } else {
            None
        };
        Some(ElementMatchContext {
            tag: &node.data.tag,
            id: node.data.id.as_deref(),
            classes: &node.data.classes,
            attributes: &node.data.attributes,
            disabled: node.data.disabled,
            sibling_info,
            child_count: node.children.len(),
        })
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element).and_then(|n| n.parent)
    }

    fn previous_sibling(&self, element: ElementId) -> Option<ElementId> {
        // Top-level elements are not siblings of each other.
        self.nodes.get(element)?.parent?;
        let siblings = self.siblings_of(element);
        let index = siblings.iter().position(|s| *s == element)?;
        index.checked_sub(1).map(|i| siblings[i])
    }
}

impl SelectorMatching for ElementTree {
    fn native_matches(&self, element: ElementId, selectors: &SelectorList) -> Option<bool> {
        self.native_matching
            .then(|| matches_any(selectors, element, self))
    }

    fn query_selector_all(&self, selectors: &SelectorList) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|id| matches_any(selectors, *id, self))
            .collect()
    }
}
