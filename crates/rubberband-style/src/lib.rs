//! Element identity and selector matching for Rubberband.
//!
//! A press that starts on an element matching one of the configured
//! "ignore" selectors must not begin a drag selection. This crate provides
//! everything needed to answer "does this element match these selectors?":
//!
//! - **Selectors**: Type, class, ID, attribute, pseudo-class and combinator
//!   selectors, grouped into a [`SelectorList`]
//! - **Parsing**: Selector strings are tokenized with `cssparser`
//! - **Matching**: A right-to-left matcher over any [`ElementNavigator`]
//! - **Capability**: [`SelectorMatching`] lets a host supply native matching
//!   and falls back to a linear scan of `query_selector_all` otherwise
//! - **Element tree**: [`ElementTree`], an in-memory document implementing
//!   all of the above
//!
//! # Example
//!
//! ```
//! use rubberband_style::{element_matches, ElementData, ElementTree, SelectorList};
//!
//! let mut tree = ElementTree::new();
//! let list = tree.insert(ElementData::new("ul").with_class("items"), None);
//! let handle = tree.insert(ElementData::new("span").with_class("handle"), Some(list));
//!
//! let ignore = SelectorList::parse(".items > .handle, button").unwrap();
//! assert!(element_matches(&tree, handle, &ignore));
//! assert!(!element_matches(&tree, list, &ignore));
//! ```

pub mod element;
mod error;
pub mod matching;
pub mod parser;
pub mod selector;

pub use element::{ElementData, ElementId, ElementTree};
pub use error::{Error, Result};
pub use matching::{SelectorMatching, element_matches};
pub use parser::parse_selector_list;
pub use selector::{
    AttributeSelector, Combinator, ElementMatchContext, ElementNavigator, NthExpr, PseudoClass,
    Selector, SelectorList, SelectorMatcher, SelectorPart, SiblingInfo, TypeSelector, matches_any,
    matches_full,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::element::{ElementData, ElementId, ElementTree};
    pub use crate::matching::{SelectorMatching, element_matches};
    pub use crate::selector::{Selector, SelectorList, SelectorPart};
}
