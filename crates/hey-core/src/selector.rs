#![forbid(unsafe_code)]

//! A small CSS selector engine.
//!
//! Supports the subset modal markup relies on: type selectors and `*`,
//! `#id`, `.class`, `[attr]`, `[attr=value]` (quoted or bare), `:not(..)`
//! over a compound, the descendant (whitespace) and child (`>`) combinators,
//! and comma-separated selector lists.
//!
//! Matching runs right to left against any host implementing
//! [`MatchContext`], so the engine is not tied to [`MemoryDom`](crate::MemoryDom).

use std::fmt;

use crate::dom::NodeId;

/// Error produced when a selector cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    /// The selector text as given.
    pub input: String,
    /// Byte offset where parsing stopped.
    pub position: usize,
    pub reason: &'static str,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid selector '{}' at {}: {}",
            self.input, self.position, self.reason
        )
    }
}

impl std::error::Error for SelectorError {}

/// Read-only element view used while matching.
pub trait MatchContext {
    /// Lower-case tag, or `None` for non-element nodes.
    fn tag_of(&self, node: NodeId) -> Option<&str>;

    fn attribute_of(&self, node: NodeId, name: &str) -> Option<&str>;

    fn parent_of(&self, node: NodeId) -> Option<NodeId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
    Not(Box<Compound>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    /// `None` is the universal selector.
    tag: Option<String>,
    simples: Vec<Simple>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One comma-free alternative: compounds joined by combinators.
///
/// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// Whether `node` matches any alternative.
    pub fn matches<C: MatchContext + ?Sized>(&self, ctx: &C, node: NodeId) -> bool {
        ctx.tag_of(node).is_some()
            && self
                .alternatives
                .iter()
                .any(|complex| complex.matches_at(ctx, complex.compounds.len() - 1, node))
    }
}

impl Complex {
    fn matches_at<C: MatchContext + ?Sized>(&self, ctx: &C, index: usize, node: NodeId) -> bool {
        if !self.compounds[index].matches(ctx, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => ctx
                .parent_of(node)
                .is_some_and(|parent| self.matches_at(ctx, index - 1, parent)),
            Combinator::Descendant => {
                let mut cursor = ctx.parent_of(node);
                while let Some(ancestor) = cursor {
                    if self.matches_at(ctx, index - 1, ancestor) {
                        return true;
                    }
                    cursor = ctx.parent_of(ancestor);
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches<C: MatchContext + ?Sized>(&self, ctx: &C, node: NodeId) -> bool {
        let Some(tag) = ctx.tag_of(node) else {
            return false;
        };
        if let Some(expected) = &self.tag
            && expected != tag
        {
            return false;
        }
        self.simples.iter().all(|simple| match simple {
            Simple::Id(id) => ctx.attribute_of(node, "id") == Some(id.as_str()),
            Simple::Class(class) => ctx
                .attribute_of(node, "class")
                .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class)),
            Simple::Attribute { name, value } => match (ctx.attribute_of(node, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Simple::Not(inner) => !inner.matches(ctx, node),
        })
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.simples.is_empty()
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, reason: &'static str) -> SelectorError {
        SelectorError {
            input: self.input.to_owned(),
            position: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, returning whether any was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn parse_list(mut self) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => {
                    self.bump();
                }
                Some(_) => return Err(self.error("unexpected character")),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                None | Some(',') | Some(')') => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let universal = self.eat('*');
        if !universal && self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.simples.push(Simple::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    compound.simples.push(Simple::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    compound.simples.push(self.parse_attribute()?);
                }
                Some(':') => {
                    self.bump();
                    let name = self.parse_ident()?;
                    if !name.eq_ignore_ascii_case("not") || !self.eat('(') {
                        return Err(self.error("only :not(...) is supported"));
                    }
                    self.skip_ws();
                    let inner = self.parse_compound()?;
                    self.skip_ws();
                    if !self.eat(')') {
                        return Err(self.error("expected ')'"));
                    }
                    compound.simples.push(Simple::Not(Box::new(inner)));
                }
                _ => break,
            }
        }
        if compound.is_empty() && !universal {
            return Err(self.error("expected a selector"));
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<Simple, SelectorError> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();
        let value = if self.eat('=') {
            self.skip_ws();
            let value = match self.peek() {
                Some(quote @ ('"' | '\'')) => {
                    self.bump();
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c != quote) {
                        self.bump();
                    }
                    let value = self.input[start..self.pos].to_owned();
                    if !self.eat(quote) {
                        return Err(self.error("unterminated string"));
                    }
                    value
                }
                _ => self.parse_ident()?,
            };
            self.skip_ws();
            Some(value)
        } else {
            None
        };
        if !self.eat(']') {
            return Err(self.error("expected ']'"));
        }
        Ok(Simple::Attribute { name, value })
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.input[start..self.pos].to_owned())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
