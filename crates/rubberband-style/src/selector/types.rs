//! Selector type definitions.

use std::fmt;

use crate::error::Result;

/// A group of selectors separated by commas (e.g., "button, .handle > *").
///
/// An element matches the list when it matches any selector in it. An empty
/// list matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorList {
    /// The alternatives, in source order.
    pub selectors: Vec<Selector>,
}

impl SelectorList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated selector group.
    ///
    /// Fails if any selector in the group is malformed.
    pub fn parse(input: &str) -> Result<Self> {
        crate::parser::parse_selector_list(input)
    }

    /// Parse several selector groups into one list, skipping groups that
    /// fail to parse.
    ///
    /// Each rejected group is logged at warn level together with the parse
    /// error, so a single typo does not disable the remaining selectors.
    pub fn parse_lenient<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for group in groups {
            let group = group.as_ref();
            match Self::parse(group) {
                Ok(parsed) => list.extend(parsed),
                Err(error) => {
                    tracing::warn!(target: "rubberband_style", selector = group, %error, "ignoring unparsable selector");
                }
            }
        }
        list
    }

    /// Append all selectors from another list.
    pub fn extend(&mut self, other: SelectorList) {
        self.selectors.extend(other.selectors);
    }

    /// Add a single selector.
    pub fn push(&mut self, selector: Selector) {
        self.selectors.push(selector);
    }

    /// Number of selectors in the list.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Returns true if the list has no selectors.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Iterate over the selectors.
    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.selectors.iter()
    }
}

impl From<Selector> for SelectorList {
    fn from(selector: Selector) -> Self {
        Self {
            selectors: vec![selector],
        }
    }
}

impl FromIterator<Selector> for SelectorList {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Self {
            selectors: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectorList {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

/// A complete selector (e.g., "ul.items > li:first-child").
///
/// Compound parts joined left to right by combinators; the last part is the
/// element being matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Chain of compound parts, leftmost first.
    pub parts: Vec<SelectorPart>,
    /// `combinators[i]` joins `parts[i]` and `parts[i + 1]`.
    pub combinators: Vec<Combinator>,
}

impl Selector {
    /// Create a single-part selector.
    pub fn from_part(part: SelectorPart) -> Self {
        Self {
            parts: vec![part],
            combinators: vec![],
        }
    }

    /// Create a simple tag selector.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::from_part(SelectorPart::tag_only(tag))
    }

    /// `*`
    pub fn universal() -> Self {
        Self::from_part(SelectorPart::universal())
    }

    /// Create a class selector.
    pub fn class(class_name: impl Into<String>) -> Self {
        Self::from_part(SelectorPart::class_only(class_name))
    }

    /// Create an ID selector.
    pub fn id(id: impl Into<String>) -> Self {
        Self::from_part(SelectorPart::id_only(id))
    }

    /// Append a part joined by `combinator`.
    pub fn then(mut self, combinator: Combinator, part: SelectorPart) -> Self {
        if !self.parts.is_empty() {
            self.combinators.push(combinator);
        }
        self.parts.push(part);
        self
    }

    /// Append `part` as a descendant of the current subject.
    pub fn descendant(self, part: SelectorPart) -> Self {
        self.then(Combinator::Descendant, part)
    }

    /// Add a child selector part.
    pub fn child(self, part: SelectorPart) -> Self {
        self.then(Combinator::Child, part)
    }

    /// The rightmost part, i.e. the element being matched.
    pub fn subject(&self) -> Option<&SelectorPart> {
        self.parts.last()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                match &self.combinators[i - 1] {
                    Combinator::Descendant => write!(f, " ")?,
                    Combinator::Child => write!(f, " > ")?,
                    Combinator::AdjacentSibling => write!(f, " + ")?,
                    Combinator::GeneralSibling => write!(f, " ~ ")?,
                }
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// A single compound selector (e.g., "button.primary[data-role]:disabled").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorPart {
    /// Type selector (tag name or universal).
    pub type_selector: Option<TypeSelector>,
    /// ID selector (#id).
    pub id: Option<String>,
    /// Class selectors (.class).
    pub classes: Vec<String>,
    /// Attribute selectors ([name] or [name=value]).
    pub attributes: Vec<AttributeSelector>,
    /// Pseudo-class selectors (:disabled, :first-child, etc.).
    pub pseudo_classes: Vec<PseudoClass>,
}

impl SelectorPart {
    /// A part with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tag-only selector.
    pub fn tag_only(tag: impl Into<String>) -> Self {
        Self {
            type_selector: Some(TypeSelector::Tag(tag.into())),
            ..Default::default()
        }
    }

    /// `*` as a compound part.
    pub fn universal() -> Self {
        Self {
            type_selector: Some(TypeSelector::Universal),
            ..Default::default()
        }
    }

    /// `.name`
    pub fn class_only(class_name: impl Into<String>) -> Self {
        Self {
            classes: vec![class_name.into()],
            ..Default::default()
        }
    }

    /// `#id`
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Add a tag selector.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_selector = Some(TypeSelector::Tag(tag.into()));
        self
    }

    /// Add an ID selector.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class selector.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute selector.
    pub fn with_attribute(mut self, attribute: AttributeSelector) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Require a pseudo-class.
    pub fn with_pseudo(mut self, pseudo: PseudoClass) -> Self {
        self.pseudo_classes.push(pseudo);
        self
    }

    /// Returns true if the part has no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.type_selector.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudo_classes.is_empty()
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_selector {
            Some(TypeSelector::Universal) => write!(f, "*")?,
            Some(TypeSelector::Tag(t)) => write!(f, "{}", t)?,
            None => {}
        }

        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }

        for class in &self.classes {
            write!(f, ".{}", class)?;
        }

        for attribute in &self.attributes {
            write!(f, "{}", attribute)?;
        }

        for pseudo in &self.pseudo_classes {
            write!(f, ":{}", pseudo)?;
        }

        Ok(())
    }
}

/// Type selector - matches the element's tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSelector {
    /// Universal selector (*) - matches any element.
    Universal,
    /// Named tag (e.g., "button", "li"). Compared ASCII case-insensitively.
    Tag(String),
}

/// Attribute selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// Attribute name.
    pub name: String,
    /// Required value; `None` only requires presence.
    pub value: Option<String>,
}

impl AttributeSelector {
    /// `[name]`
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// `[name="value"]`
    pub fn equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "[{}=\"{}\"]", self.name, value),
            None => write!(f, "[{}]", self.name),
        }
    }
}

/// How two adjacent compound parts relate in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    AdjacentSibling,
    /// `a ~ b`
    GeneralSibling,
}

/// Pseudo-class selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// :disabled - element is disabled.
    Disabled,
    /// :enabled - element is enabled (default).
    Enabled,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:nth-child(An+B)`, 1-based like CSS.
    NthChild(NthExpr),
    /// `:only-child`
    OnlyChild,
    /// :empty - has no children.
    Empty,
    /// :not(selector) - negation.
    Not(Box<SelectorPart>),
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoClass::Disabled => write!(f, "disabled"),
            PseudoClass::Enabled => write!(f, "enabled"),
            PseudoClass::FirstChild => write!(f, "first-child"),
            PseudoClass::LastChild => write!(f, "last-child"),
            PseudoClass::NthChild(expr) => write!(f, "nth-child({})", expr),
            PseudoClass::OnlyChild => write!(f, "only-child"),
            PseudoClass::Empty => write!(f, "empty"),
            PseudoClass::Not(inner) => write!(f, "not({})", inner),
        }
    }
}

impl PseudoClass {
    /// Parse an argument-less pseudo-class name.
    pub fn from_css(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" => Some(Self::Disabled),
            "enabled" => Some(Self::Enabled),
            "first-child" => Some(Self::FirstChild),
            "last-child" => Some(Self::LastChild),
            "only-child" => Some(Self::OnlyChild),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }
}

/// The `An+B` argument of `:nth-child`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NthExpr {
    /// Coefficient (A in An+B).
    pub a: i32,
    /// Offset (B in An+B).
    pub b: i32,
}

impl NthExpr {
    /// The expression `an+b`.
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Whether the element at 0-based `index` among its siblings matches.
    pub fn matches(&self, index: usize) -> bool {
        let n = index as i32 + 1;
        if self.a == 0 {
            n == self.b
        } else {
            let diff = n - self.b;
            if self.a > 0 {
                diff >= 0 && diff % self.a == 0
            } else {
                diff <= 0 && diff % self.a == 0
            }
        }
    }

    /// :nth-child(odd) = 2n+1.
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// :nth-child(even) = 2n.
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }
}

impl fmt::Display for NthExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (2, 1) => write!(f, "odd"),
            (2, 0) => write!(f, "even"),
            (0, b) => write!(f, "{}", b),
            (1, 0) => write!(f, "n"),
            (a, 0) => write!(f, "{}n", a),
            (1, b) if b > 0 => write!(f, "n+{}", b),
            (1, b) => write!(f, "n{}", b),
            (a, b) if b > 0 => write!(f, "{}n+{}", a, b),
            (a, b) => write!(f, "{}n{}", a, b),
        }
    }
}
