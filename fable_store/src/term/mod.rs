//! Term and quad definitions - the values stored in the fact base.

mod quad;

pub use quad::*;

use serde::{Deserialize, Serialize};

/// A globally unique resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedNode(String);

impl NamedNode {
    /// Create a named node from a full IRI.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// The full IRI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final non-empty segment of the IRI, splitting on `/` and `#`.
    pub fn local_name(&self) -> Option<&str> {
        self.0
            .rsplit(|c: char| c == '/' || c == '#')
            .find(|segment| !segment.is_empty())
    }
}

impl std::fmt::Display for NamedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// An inline scalar value.
///
/// Plain strings carry neither datatype nor language. Equality covers all
/// three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<NamedNode>,
    pub language: Option<String>,
}

impl Literal {
    /// Create a plain string literal.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a literal with an explicit datatype.
    pub fn typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Create a language-tagged literal.
    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }
}

/// An unlabeled local identifier (`_:label`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlankNode(String);

impl BlankNode {
    /// Create a blank node. The label does not include the `_:` prefix.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A term appearing in a quad.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    NamedNode(NamedNode),
    Literal(Literal),
    BlankNode(BlankNode),
}

impl Term {
    /// Create a named node term.
    pub fn named(iri: impl Into<String>) -> Self {
        Term::NamedNode(NamedNode::new(iri))
    }

    /// Create a plain string literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::new(value))
    }

    /// Create a blank node term.
    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(BlankNode::new(label))
    }

    /// The underlying value: IRI, literal text, or blank label.
    ///
    /// This is the identity used for graph node keys.
    pub fn value(&self) -> &str {
        match self {
            Term::NamedNode(node) => node.as_str(),
            Term::Literal(literal) => &literal.value,
            Term::BlankNode(blank) => blank.as_str(),
        }
    }

    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Term::NamedNode(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Get the kind of this term.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::NamedNode(_) => "named",
            Term::Literal(_) => "literal",
            Term::BlankNode(_) => "blank",
        }
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<BlankNode> for Term {
    fn from(blank: BlankNode) -> Self {
        Term::BlankNode(blank)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::NamedNode(node) => write!(f, "{}", node),
            Term::Literal(literal) => {
                write!(f, "{:?}", literal.value)?;
                if let Some(language) = &literal.language {
                    write!(f, "@{}", language)?;
                } else if let Some(datatype) = &literal.datatype {
                    write!(f, "^^{}", datatype)?;
                }
                Ok(())
            }
            Term::BlankNode(blank) => write!(f, "_:{}", blank.as_str()),
        }
    }
}
