//! Turtle parser that streams quads into a `QuadSink`.
//!
//! Each triple is emitted as soon as its object is read, so on failure the
//! sink keeps every quad that preceded the offending token.

use std::collections::HashMap;

use tracing::debug;

use super::error::{Result, TurtleError};
use super::lexer::{Lexer, Token, TokenKind};
use crate::term::{BlankNode, Literal, NamedNode, Quad, QuadSink, Term};
use crate::vocab::{rdf, xsd};

/// Turtle parser state.
pub struct Parser<'a, S> {
    lexer: Lexer<'a>,
    current: Token,
    sink: &'a mut S,
    /// Prefix mappings (prefix -> namespace IRI).
    prefixes: HashMap<String, String>,
    /// Base IRI for relative IRI resolution.
    base: Option<String>,
    emitted: usize,
}

impl<'a, S: QuadSink> Parser<'a, S> {
    pub fn new(input: &'a str, sink: &'a mut S) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            sink,
            prefixes: HashMap::new(),
            base: None,
            emitted: 0,
        })
    }

    /// Parse the entire document, returning the number of quads emitted.
    pub fn parse(mut self) -> Result<usize> {
        while self.current.kind != TokenKind::Eof {
            self.parse_statement()?;
        }
        Ok(self.emitted)
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(&format!("{:?}", kind)))
        }
    }

    fn unexpected(&self, expected: &str) -> TurtleError {
        TurtleError::parse(
            self.current.start,
            format!("expected {}, found {:?}", expected, self.current.kind),
        )
    }

    fn parse_statement(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => self.parse_prefix_directive(),
            TokenKind::KwBase | TokenKind::KwSparqlBase => self.parse_base_directive(),
            _ => self.parse_triples(),
        }
    }

    /// Parse `@prefix` or `PREFIX`.
    fn parse_prefix_directive(&mut self) -> Result<()> {
        let sparql_style = self.advance()?.kind == TokenKind::KwSparqlPrefix;

        let prefix = match &self.current.kind {
            TokenKind::PrefixedName { prefix, local } if local.is_empty() => prefix.clone(),
            _ => return Err(self.unexpected("prefix namespace")),
        };
        self.advance()?;

        let namespace = match &self.current.kind {
            TokenKind::Iri(iri) => self.resolve_iri(iri)?,
            _ => return Err(self.unexpected("IRI for prefix namespace")),
        };
        self.advance()?;

        debug!(prefix = %prefix, namespace = %namespace, "registered prefix");
        self.prefixes.insert(prefix, namespace);

        if !sparql_style {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    /// Parse `@base` or `BASE`.
    fn parse_base_directive(&mut self) -> Result<()> {
        let sparql_style = self.advance()?.kind == TokenKind::KwSparqlBase;

        let base = match &self.current.kind {
            TokenKind::Iri(iri) => self.resolve_iri(iri)?,
            _ => return Err(self.unexpected("IRI for base")),
        };
        self.advance()?;
        self.base = Some(base);

        if !sparql_style {
            self.expect(&TokenKind::Dot)?;
        }
        Ok(())
    }

    fn parse_triples(&mut self) -> Result<()> {
        let subject = self.parse_subject()?;
        self.parse_predicate_object_list(&subject)?;
        self.expect(&TokenKind::Dot)?;
        Ok(())
    }

    fn parse_subject(&mut self) -> Result<NamedNode> {
        match self.current.kind {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => self.parse_named(),
            TokenKind::BlankNodeLabel(_) | TokenKind::LBracket => Err(TurtleError::parse(
                self.current.start,
                "blank node subjects are not supported",
            )),
            TokenKind::LParen => Err(TurtleError::parse(
                self.current.start,
                "collections are not supported",
            )),
            _ => Err(self.unexpected("subject")),
        }
    }

    fn parse_named(&mut self) -> Result<NamedNode> {
        let iri = match &self.current.kind {
            TokenKind::Iri(iri) => self.resolve_iri(iri)?,
            TokenKind::PrefixedName { prefix, local } => self.expand_prefixed_name(prefix, local)?,
            _ => return Err(self.unexpected("IRI")),
        };
        self.advance()?;
        Ok(NamedNode::new(iri))
    }

    fn parse_predicate_object_list(&mut self, subject: &NamedNode) -> Result<()> {
        loop {
            let predicate = self.parse_predicate()?;
            self.parse_object_list(subject, &predicate)?;

            if !self.check(&TokenKind::Semicolon) {
                return Ok(());
            }
            while self.check(&TokenKind::Semicolon) {
                self.advance()?;
            }
            // A trailing `;` before the terminating `.` is allowed.
            if self.check(&TokenKind::Dot) {
                return Ok(());
            }
        }
    }

    fn parse_predicate(&mut self) -> Result<NamedNode> {
        if self.check(&TokenKind::KwA) {
            self.advance()?;
            return Ok(NamedNode::new(rdf::TYPE));
        }
        match self.current.kind {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => self.parse_named(),
            _ => Err(self.unexpected("predicate")),
        }
    }

    fn parse_object_list(&mut self, subject: &NamedNode, predicate: &NamedNode) -> Result<()> {
        loop {
            let object = self.parse_object()?;
            self.sink
                .on_quad(Quad::new(subject.clone(), predicate.clone(), object));
            self.emitted += 1;

            if !self.check(&TokenKind::Comma) {
                return Ok(());
            }
            self.advance()?;
        }
    }

    fn parse_object(&mut self) -> Result<Term> {
        let start = self.current.start;
        match self.current.kind.clone() {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => Ok(self.parse_named()?.into()),
            TokenKind::BlankNodeLabel(label) => {
                self.advance()?;
                Ok(BlankNode::new(label).into())
            }
            TokenKind::String(value) => {
                self.advance()?;
                self.parse_literal_suffix(value)
            }
            TokenKind::Integer(lexical) => self.typed_literal(lexical, xsd::INTEGER),
            TokenKind::Decimal(lexical) => self.typed_literal(lexical, xsd::DECIMAL),
            TokenKind::Double(lexical) => self.typed_literal(lexical, xsd::DOUBLE),
            TokenKind::KwTrue => self.typed_literal("true".to_string(), xsd::BOOLEAN),
            TokenKind::KwFalse => self.typed_literal("false".to_string(), xsd::BOOLEAN),
            TokenKind::LBracket => Err(TurtleError::parse(
                start,
                "anonymous blank nodes are not supported",
            )),
            TokenKind::LParen => Err(TurtleError::parse(start, "collections are not supported")),
            _ => Err(self.unexpected("object")),
        }
    }

    fn typed_literal(&mut self, lexical: String, datatype: &str) -> Result<Term> {
        self.advance()?;
        Ok(Literal::typed(lexical, NamedNode::new(datatype)).into())
    }

    /// Optional `@lang` or `^^datatype` after a string.
    fn parse_literal_suffix(&mut self, value: String) -> Result<Term> {
        match self.current.kind.clone() {
            TokenKind::LangTag(language) => {
                self.advance()?;
                Ok(Literal::with_language(value, language).into())
            }
            TokenKind::DoubleCaret => {
                self.advance()?;
                let datatype = self.parse_named()?;
                Ok(Literal::typed(value, datatype).into())
            }
            _ => Ok(Literal::new(value).into()),
        }
    }

    fn expand_prefixed_name(&self, prefix: &str, local: &str) -> Result<String> {
        self.prefixes
            .get(prefix)
            .map(|namespace| format!("{}{}", namespace, local))
            .ok_or_else(|| TurtleError::UndefinedPrefix(prefix.to_string()))
    }

    fn resolve_iri(&self, iri: &str) -> Result<String> {
        if has_scheme(iri) {
            return Ok(iri.to_string());
        }
        let base = self
            .base
            .as_deref()
            .ok_or_else(|| TurtleError::IriResolution(iri.to_string()))?;

        if iri.is_empty() {
            Ok(base.to_string())
        } else if let Some(fragment) = iri.strip_prefix('#') {
            let stem = base.split('#').next().unwrap_or(base);
            Ok(format!("{}#{}", stem, fragment))
        } else {
            let stem = base.rfind('/').map(|i| &base[..=i]).unwrap_or(base);
            Ok(format!("{}{}", stem, iri))
        }
    }
}

/// `scheme:` per RFC 3986: a letter followed by letters, digits, `+`, `-`, `.`.
fn has_scheme(iri: &str) -> bool {
    match iri.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Parse a Turtle document into a sink, returning the number of quads emitted.
///
/// Stops at the first error; quads emitted before it remain in the sink.
pub fn parse<S: QuadSink>(input: &str, sink: &mut S) -> Result<usize> {
    Parser::new(input, sink)?.parse()
}

/// Parse a whole Turtle document, returning every quad or the first error.
pub fn parse_all(input: &str) -> Result<Vec<Quad>> {
    let mut quads = Vec::new();
    parse(input, &mut quads)?;
    Ok(quads)
}
