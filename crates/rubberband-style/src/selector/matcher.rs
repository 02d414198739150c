//! Selector matching algorithm.

use super::{Combinator, PseudoClass, Selector, SelectorList, SelectorPart, TypeSelector};
use crate::element::ElementId;

/// Element state for selector matching.
#[derive(Debug, Clone, Default)]
pub struct ElementMatchContext<'a> {
    /// Tag name (e.g., "div", "button").
    pub tag: &'a str,
    /// Element ID (for #id selectors).
    pub id: Option<&'a str>,
    /// The element's classes.
    pub classes: &'a [String],
    /// The element's attributes as name/value pairs.
    pub attributes: &'a [(String, String)],
    /// Whether the element is disabled.
    pub disabled: bool,
    /// Sibling information for structural pseudo-classes.
    pub sibling_info: Option<SiblingInfo>,
    /// Number of children (for :empty).
    pub child_count: usize,
}

/// Sibling position information.
#[derive(Debug, Clone, Copy)]
pub struct SiblingInfo {
    /// Zero-based index among siblings.
    pub index: usize,
    /// Total number of siblings (including self).
    pub count: usize,
}

impl SiblingInfo {
    /// Returns true if this is the first sibling.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true if this is the last sibling.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    /// Returns true if this is the only child.
    pub fn is_only(&self) -> bool {
        self.count == 1
    }
}

/// Selector matching engine.
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Check if a selector's subject (rightmost part) matches the element.
    ///
    /// This only checks the final selector part. For full matching with
    /// combinators, use [`matches_full`].
    pub fn matches_subject(selector: &Selector, context: &ElementMatchContext<'_>) -> bool {
        selector
            .subject()
            .is_some_and(|subject| Self::part_matches(subject, context))
    }

    /// Check if a selector part matches the element.
    pub fn part_matches(part: &SelectorPart, context: &ElementMatchContext<'_>) -> bool {
        if let Some(TypeSelector::Tag(name)) = &part.type_selector
            && !name.eq_ignore_ascii_case(context.tag)
        {
            return false;
        }

        if let Some(id) = &part.id {
            match context.id {
                Some(element_id) if element_id == id => {}
                _ => return false,
            }
        }

        // All classes must be present
        for class in &part.classes {
            if !context.classes.iter().any(|c| c == class) {
                return false;
            }
        }

        for attribute in &part.attributes {
            let found = context
                .attributes
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&attribute.name));
            match (found, &attribute.value) {
                (None, _) => return false,
                (Some((_, actual)), Some(expected)) if actual != expected => return false,
                _ => {}
            }
        }

        for pseudo in &part.pseudo_classes {
            if !Self::pseudo_matches(pseudo, context) {
                return false;
            }
        }

        true
    }

    fn pseudo_matches(pseudo: &PseudoClass, context: &ElementMatchContext<'_>) -> bool {
        match pseudo {
            PseudoClass::Disabled => context.disabled,
            PseudoClass::Enabled => !context.disabled,

            PseudoClass::FirstChild => context.sibling_info.is_some_and(|s| s.is_first()),
            PseudoClass::LastChild => context.sibling_info.is_some_and(|s| s.is_last()),
            PseudoClass::OnlyChild => context.sibling_info.is_some_and(|s| s.is_only()),
            PseudoClass::NthChild(expr) => {
                context.sibling_info.is_some_and(|s| expr.matches(s.index))
            }
            PseudoClass::Empty => context.child_count == 0,

            PseudoClass::Not(inner) => !Self::part_matches(inner, context),
        }
    }
}

/// Structural access to a document for selector matching.
///
/// Implemented by anything that can describe an element and walk to its
/// parent and preceding sibling.
pub trait ElementNavigator {
    /// Describe `element`, or `None` if it does not exist.
    fn match_context(&self, element: ElementId) -> Option<ElementMatchContext<'_>>;

    /// The parent of `element`.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// The sibling immediately before `element`.
    fn previous_sibling(&self, element: ElementId) -> Option<ElementId>;
}

/// Check if a full selector matches `element`, considering combinators.
///
/// Walks the selector from right to left. Descendant and general-sibling
/// combinators backtrack, so `.a > .b .c` matches whenever *some* ancestor
/// chain satisfies it, not only the nearest one.
pub fn matches_full<N: ElementNavigator + ?Sized>(
    selector: &Selector,
    element: ElementId,
    navigator: &N,
) -> bool {
    if selector.parts.is_empty() || selector.combinators.len() + 1 != selector.parts.len() {
        return false;
    }
    matches_from(selector, selector.parts.len() - 1, element, navigator)
}

/// Check if any selector in `list` matches `element`.
pub fn matches_any<N: ElementNavigator + ?Sized>(
    list: &SelectorList,
    element: ElementId,
    navigator: &N,
) -> bool {
    list.iter()
        .any(|selector| matches_full(selector, element, navigator))
}

fn matches_from<N: ElementNavigator + ?Sized>(
    selector: &Selector,
    index: usize,
    element: ElementId,
    navigator: &N,
) -> bool {
    let Some(context) = navigator.match_context(element) else {
        return false;
    };
    if !SelectorMatcher::part_matches(&selector.parts[index], &context) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Descendant => {
            let mut current = navigator.parent(element);
            while let Some(ancestor) = current {
                if matches_from(selector, next, ancestor, navigator) {
                    return true;
                }
                current = navigator.parent(ancestor);
            }
            false
        }
        Combinator::Child => navigator
            .parent(element)
            .is_some_and(|parent| matches_from(selector, next, parent, navigator)),
        Combinator::AdjacentSibling => navigator
            .previous_sibling(element)
            .is_some_and(|sibling| matches_from(selector, next, sibling, navigator)),
        Combinator::GeneralSibling => {
            let mut current = navigator.previous_sibling(element);
            while let Some(sibling) = current {
                if matches_from(selector, next, sibling, navigator) {
                    return true;
                }
                current = navigator.previous_sibling(sibling);
            }
            false
        }
    }
}
