//! Selector parser using the `cssparser` crate.
//!
//! Parses comma-separated selector groups such as
//! `"button, .list > li:not(.draggable), [data-no-select]"` into a
//! [`SelectorList`]. Supported syntax:
//!
//! - Type (`li`), universal (`*`), class (`.a`) and ID (`#a`) selectors
//! - Attribute presence and equality (`[data-x]`, `[type="text"]`)
//! - `:disabled`, `:enabled`, `:first-child`, `:last-child`, `:only-child`,
//!   `:empty`, `:nth-child(An+B)` and `:not(<compound>)`
//! - Descendant, child (`>`), adjacent (`+`) and general (`~`) sibling
//!   combinators
//!
//! Anything else is rejected with an error rather than silently ignored.

use cssparser::{ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::selector::{
    AttributeSelector, Combinator, NthExpr, PseudoClass, Selector, SelectorList, SelectorPart,
    TypeSelector,
};
use crate::{Error, Result};

type CssResult<'i, T> = std::result::Result<T, CssParseError<'i, Error>>;

/// Parse a comma-separated selector group.
///
/// # Example
///
/// ```
/// use rubberband_style::parse_selector_list;
///
/// let list = parse_selector_list("button, .handle > *").unwrap();
/// assert_eq!(list.len(), 2);
/// assert!(parse_selector_list("> .orphan").is_err());
/// ```
pub fn parse_selector_list(input: &str) -> Result<SelectorList> {
    let mut css_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut css_input);
    let selectors = parser
        .parse_entirely(|p| p.parse_comma_separated(parse_selector))
        .map_err(into_error)?;
    Ok(SelectorList { selectors })
}

fn into_error(error: CssParseError<'_, Error>) -> Error {
    match error.kind {
        ParseErrorKind::Custom(inner) => inner,
        ParseErrorKind::Basic(kind) => Error::parse(
            format!("{:?}", kind),
            error.location.line,
            error.location.column,
        ),
    }
}

fn invalid<'i>(parser: &Parser<'i, '_>, selector: impl Into<String>, message: &str) -> CssParseError<'i, Error> {
    parser.new_custom_error(Error::invalid_selector(selector, message))
}

/// Accumulates compound parts and the combinators between them.
#[derive(Default)]
struct SelectorBuilder {
    parts: Vec<SelectorPart>,
    combinators: Vec<Combinator>,
    current: SelectorPart,
    pending: Option<Combinator>,
}

impl SelectorBuilder {
    /// Close the current compound, if it has anything in it.
    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.parts.push(std::mem::take(&mut self.current));
        }
    }

    /// Called before a simple selector is added to the current compound.
    fn begin_simple(&mut self) {
        if self.current.is_empty() && !self.parts.is_empty() {
            let combinator = self.pending.take().unwrap_or(Combinator::Descendant);
            self.combinators.push(combinator);
        }
    }

    fn combinator(&mut self, combinator: Combinator) -> bool {
        self.flush();
        if self.parts.is_empty() || self.pending.is_some() {
            return false;
        }
        self.pending = Some(combinator);
        true
    }

    fn finish(mut self) -> std::result::Result<Selector, &'static str> {
        self.flush();
        if self.pending.is_some() {
            return Err("Selector cannot end with a combinator");
        }
        if self.parts.is_empty() {
            return Err("Empty selector");
        }
        Ok(Selector {
            parts: self.parts,
            combinators: self.combinators,
        })
    }
}

/// Parse one complex selector (no commas).
fn parse_selector<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, Selector> {
    let mut builder = SelectorBuilder::default();

    while let Ok(token) = parser.next_including_whitespace().cloned() {
        match token {
            Token::WhiteSpace(_) => builder.flush(),
            Token::Delim(c @ ('>' | '+' | '~')) => {
                let combinator = match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::AdjacentSibling,
                    _ => Combinator::GeneralSibling,
                };
                if !builder.combinator(combinator) {
                    return Err(invalid(parser, c.to_string(), "Unexpected combinator"));
                }
            }
            ref simple if starts_simple_selector(simple) => {
                builder.begin_simple();
                parse_simple_selector(parser, simple, &mut builder.current)?;
            }
            other => {
                return Err(invalid(parser, format!("{:?}", other), "Unexpected token in selector"));
            }
        }
    }

    builder.finish().map_err(|message| invalid(parser, "", message))
}

fn starts_simple_selector(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::Delim('*')
            | Token::Delim('.')
            | Token::IDHash(_)
            | Token::SquareBracketBlock
            | Token::Colon
    )
}

/// Apply one simple selector, starting at `token`, to `part`.
fn parse_simple_selector<'i>(
    parser: &mut Parser<'i, '_>,
    token: &Token<'i>,
    part: &mut SelectorPart,
) -> CssResult<'i, ()> {
    match token {
        Token::Ident(name) => {
            if !part.is_empty() {
                return Err(invalid(parser, name.to_string(), "Type selector must come first"));
            }
            part.type_selector = Some(TypeSelector::Tag(name.to_string()));
        }
        Token::Delim('*') => {
            if !part.is_empty() {
                return Err(invalid(parser, "*", "Universal selector must come first"));
            }
            part.type_selector = Some(TypeSelector::Universal);
        }
        Token::Delim('.') => match parser.next_including_whitespace().cloned() {
            Ok(Token::Ident(class)) => part.classes.push(class.to_string()),
            _ => return Err(invalid(parser, ".", "Expected class name after '.'")),
        },
        Token::IDHash(id) => {
            if part.id.is_some() {
                return Err(invalid(parser, format!("#{}", id), "Multiple ID selectors"));
            }
            part.id = Some(id.to_string());
        }
        Token::SquareBracketBlock => {
            let attribute = parser.parse_nested_block(parse_attribute)?;
            part.attributes.push(attribute);
        }
        Token::Colon => {
            let pseudo = parse_pseudo_class(parser)?;
            part.pseudo_classes.push(pseudo);
        }
        other => {
            return Err(invalid(parser, format!("{:?}", other), "Expected a simple selector"));
        }
    }
    Ok(())
}

fn parse_pseudo_class<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, PseudoClass> {
    match parser.next_including_whitespace().cloned() {
        Ok(Token::Ident(name)) => PseudoClass::from_css(&name)
            .ok_or_else(|| invalid(parser, format!(":{}", name), "Unknown pseudo-class")),
        Ok(Token::Function(name)) => {
            let name = name.to_ascii_lowercase();
            match name.as_str() {
                "not" => {
                    let inner = parser.parse_nested_block(parse_compound)?;
                    Ok(PseudoClass::Not(Box::new(inner)))
                }
                "nth-child" => {
                    let expr = parser.parse_nested_block(parse_nth_expr)?;
                    Ok(PseudoClass::NthChild(expr))
                }
                _ => Err(invalid(parser, format!(":{}()", name), "Unknown pseudo-class")),
            }
        }
        Ok(Token::Colon) => Err(invalid(parser, "::", "Pseudo-elements are not supported")),
        _ => Err(invalid(parser, ":", "Expected pseudo-class name after ':'")),
    }
}

/// Parse a compound selector (the argument of `:not()`).
fn parse_compound<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, SelectorPart> {
    let mut part = SelectorPart::default();
    parser.skip_whitespace();

    while let Ok(token) = parser.next_including_whitespace().cloned() {
        match token {
            Token::WhiteSpace(_) => {
                parser.expect_exhausted()?;
                break;
            }
            ref simple if starts_simple_selector(simple) => {
                parse_simple_selector(parser, simple, &mut part)?;
            }
            other => {
                return Err(invalid(parser, format!("{:?}", other), "Expected a compound selector"));
            }
        }
    }

    if part.is_empty() {
        return Err(invalid(parser, ":not()", "Empty negation"));
    }
    Ok(part)
}

/// Parse `[name]` or `[name=value]`.
fn parse_attribute<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, AttributeSelector> {
    parser.skip_whitespace();
    let name = parser.expect_ident()?.to_string();
    parser.skip_whitespace();
    if parser.is_exhausted() {
        return Ok(AttributeSelector::exists(name));
    }

    parser.expect_delim('=')?;
    parser.skip_whitespace();
    let value = parser.expect_ident_or_string()?.to_string();
    parser.skip_whitespace();
    parser.expect_exhausted()?;
    Ok(AttributeSelector::equals(name, value))
}

/// Parse nth-child expression (e.g., "odd", "even", "3", "2n+1", "-n+2").
fn parse_nth_expr<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, NthExpr> {
    parser.skip_whitespace();

    let token = parser.next()?.clone();
    let expr = match token {
        Token::Ident(ref name) if name.eq_ignore_ascii_case("odd") => NthExpr::odd(),
        Token::Ident(ref name) if name.eq_ignore_ascii_case("even") => NthExpr::even(),
        Token::Number {
            int_value: Some(b), ..
        } => NthExpr::new(0, b),
        Token::Dimension {
            int_value: Some(a),
            ref unit,
            ..
        } => match split_n_unit(unit) {
            Some(Some(b)) => NthExpr::new(a, b),
            Some(None) => NthExpr::new(a, parse_nth_offset(parser)?),
            None => return Err(invalid(parser, unit.to_string(), "Invalid nth-child expression")),
        },
        Token::Ident(ref name) => {
            let lower = name.to_ascii_lowercase();
            let (a, unit) = match lower.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, lower.as_str()),
            };
            match split_n_unit(unit) {
                Some(Some(b)) => NthExpr::new(a, b),
                Some(None) => NthExpr::new(a, parse_nth_offset(parser)?),
                None => return Err(invalid(parser, name.to_string(), "Invalid nth-child expression")),
            }
        }
        other => {
            return Err(invalid(parser, format!("{:?}", other), "Invalid nth-child expression"));
        }
    };

    parser.skip_whitespace();
    parser.expect_exhausted()?;
    Ok(expr)
}

/// Split the `n` unit of an An+B expression.
///
/// `"n"` means the offset (if any) follows as separate tokens; `"n-3"` carries
/// it inline because `-` is an identifier character.
fn split_n_unit(unit: &str) -> Option<Option<i32>> {
    let rest = unit.strip_prefix('n').or_else(|| unit.strip_prefix('N'))?;
    if rest.is_empty() {
        return Some(None);
    }
    let digits = rest.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().map(|b| Some(-b))
}

/// Parse the `+B` / `-B` tail that follows a bare `An`.
fn parse_nth_offset<'i>(parser: &mut Parser<'i, '_>) -> CssResult<'i, i32> {
    parser.skip_whitespace();
    if parser.is_exhausted() {
        return Ok(0);
    }

    match parser.next()?.clone() {
        Token::Number {
            has_sign: true,
            int_value: Some(b),
            ..
        } => Ok(b),
        Token::Delim(sign @ ('+' | '-')) => {
            parser.skip_whitespace();
            match parser.next()?.clone() {
                Token::Number {
                    has_sign: false,
                    int_value: Some(b),
                    ..
                } => Ok(if sign == '-' { -b } else { b }),
                other => Err(invalid(parser, format!("{:?}", other), "Expected nth-child offset")),
            }
        }
        other => Err(invalid(parser, format!("{:?}", other), "Expected nth-child offset")),
    }
}
