//! Selector types and matching.

mod matcher;
mod types;

pub use matcher::{
    ElementMatchContext, ElementNavigator, SelectorMatcher, SiblingInfo, matches_any, matches_full,
};
pub use types::*;
