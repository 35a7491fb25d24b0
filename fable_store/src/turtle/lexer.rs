//! Pull-based Turtle lexer built on winnow.
//!
//! Tokens are produced one at a time so that a reader can emit quads before
//! a later part of the document turns out to be malformed.

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::error::{Result, TurtleError};

/// Lexer input; tracks byte offsets for token spans.
pub type Input<'a> = LocatingSlice<&'a str>;

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Start byte offset.
    pub start: usize,
    /// End byte offset.
    pub end: usize,
}

/// Token kinds for the supported Turtle subset.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `<http://example.org/>`, without the angle brackets.
    Iri(String),
    /// `prefix:local`; `local` may be empty.
    PrefixedName { prefix: String, local: String },
    /// `_:label`, without `_:`.
    BlankNodeLabel(String),

    /// Unescaped string content.
    String(String),
    /// Language tag without the `@`.
    LangTag(String),
    /// Numeric literals keep their lexical form.
    Integer(String),
    Decimal(String),
    Double(String),

    KwPrefix,
    KwBase,
    KwSparqlPrefix,
    KwSparqlBase,
    KwA,
    KwTrue,
    KwFalse,

    Dot,
    Comma,
    Semicolon,
    DoubleCaret,
    LBracket,
    RBracket,
    LParen,
    RParen,

    Eof,
}

pub struct Lexer<'a> {
    source: &'a str,
    input: Input<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
        }
    }

    /// Produce the next token. Returns `Eof` forever once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token> {
        skip_ws_and_comments(&mut self.input);
        let start = self.input.current_token_start();

        if self.input.is_empty() {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
                end: start,
            });
        }

        match next_kind(&mut self.input) {
            Ok(kind) => Ok(Token {
                kind,
                start,
                end: self.input.current_token_start(),
            }),
            // Only escape sequences cut.
            Err(ErrMode::Cut(_)) => Err(self.escape_error(start)),
            Err(_) => Err(self.unexpected(start)),
        }
    }

    fn escape_error(&self, start: usize) -> TurtleError {
        let end = self.input.current_token_start();
        let consumed = self.source.get(start..end).unwrap_or_default();
        let escape = consumed.rfind('\\').map_or(consumed, |i| &consumed[i..]);
        TurtleError::InvalidEscape(escape.to_string())
    }

    fn unexpected(&self, position: usize) -> TurtleError {
        let bad_char = self
            .source
            .get(position..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('?');
        let (line, column) = self.line_col(position);

        let message = match bad_char {
            '"' | '\'' => format!("unterminated string literal at line {}, column {}", line, column),
            '<' => format!("invalid or unterminated IRI at line {}, column {}", line, column),
            c => format!("unexpected character {:?} at line {}, column {}", c, line, column),
        };
        TurtleError::lexer(position, message)
    }

    /// 1-indexed line and column of a byte offset.
    fn line_col(&self, position: usize) -> (usize, usize) {
        let before = self.source.get(..position).unwrap_or(self.source);
        let line = before.matches('\n').count() + 1;
        let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        (line, column)
    }
}

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

fn bad_escape() -> ErrMode<ContextError> {
    ErrMode::Cut(ContextError::new())
}

fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str, ContextError> =
                take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
        } else {
            break;
        }
    }
}

fn next_kind(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "^^".map(|_| TokenKind::DoubleCaret),
        parse_iri_ref,
        parse_blank_node_label,
        parse_at_word,
        parse_string_literal,
        parse_number,
        parse_default_prefix,
        parse_prefixed_name_or_keyword,
        parse_punctuation,
    ))
    .parse_next(input)
}

fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('<', parse_iri_content, '>')
        .map(TokenKind::Iri)
        .parse_next(input)
}

fn parse_iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut iri = String::new();
    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        iri.push_str(chunk);

        if !input.starts_with('\\') {
            return Ok(iri);
        }
        '\\'.parse_next(input)?;
        iri.push(parse_unicode_escape(input)?);
    }
}

/// `uXXXX` or `UXXXXXXXX`, after the backslash.
fn parse_unicode_escape(input: &mut Input<'_>) -> ModalResult<char> {
    let marker: ModalResult<char> = any.parse_next(input);
    let digits: usize = match marker {
        Ok('u') => 4,
        Ok('U') => 8,
        _ => return Err(bad_escape()),
    };
    let hex: ModalResult<&str> = take_while(digits, AsChar::is_hex_digit).parse_next(input);
    let hex = hex.map_err(|_| bad_escape())?;
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(bad_escape)
}

fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    if input.starts_with('u') || input.starts_with('U') {
        return parse_unicode_escape(input);
    }
    let escaped: ModalResult<char> = any.parse_next(input);
    match escaped.map_err(|_| bad_escape())? {
        't' => Ok('\t'),
        'b' => Ok('\u{8}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\u{c}'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        _ => Err(bad_escape()),
    }
}

fn parse_at_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let word: &str = preceded(
        '@',
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
    )
    .parse_next(input)?;

    Ok(match word {
        "prefix" => TokenKind::KwPrefix,
        "base" => TokenKind::KwBase,
        tag => TokenKind::LangTag(tag.to_string()),
    })
}

fn parse_blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded(
        "_:",
        (
            take_while(1, |c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
            take_while(0.., is_pn_chars),
        )
            .take(),
    )
    .map(|label: &str| TokenKind::BlankNodeLabel(label.to_string()))
    .parse_next(input)
}

fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        delimited("\"\"\"", long_double_content, "\"\"\""),
        delimited("'''", long_single_content, "'''"),
        delimited('"', short_double_content, '"'),
        delimited('\'', short_single_content, '\''),
    ))
    .map(TokenKind::String)
    .parse_next(input)
}

fn long_double_content(input: &mut Input<'_>) -> ModalResult<String> {
    string_content(input, '"', true)
}

fn long_single_content(input: &mut Input<'_>) -> ModalResult<String> {
    string_content(input, '\'', true)
}

fn short_double_content(input: &mut Input<'_>) -> ModalResult<String> {
    string_content(input, '"', false)
}

fn short_single_content(input: &mut Input<'_>) -> ModalResult<String> {
    string_content(input, '\'', false)
}

/// String body up to, not including, the closing quote(s).
///
/// Short strings stop at a line break; long strings keep single quote
/// characters that do not close the literal.
fn string_content(input: &mut Input<'_>, quote: char, long: bool) -> ModalResult<String> {
    let closing = if quote == '"' { "\"\"\"" } else { "'''" };
    let mut value = String::new();

    loop {
        let chunk: &str = take_while(0.., |c: char| {
            c != quote && c != '\\' && (long || (c != '\n' && c != '\r'))
        })
        .parse_next(input)?;
        value.push_str(chunk);

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            value.push(parse_escape_char(input)?);
        } else if long && input.starts_with(quote) && !input.starts_with(closing) {
            let c: char = any.parse_next(input)?;
            value.push(c);
        } else {
            return Ok(value);
        }
    }
}

fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((parse_double, parse_decimal, parse_integer)).parse_next(input)
}

fn parse_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    (
        opt(one_of(['+', '-'])),
        alt((
            (digit1, '.', opt(digit1)).take(),
            ('.', digit1).take(),
            digit1,
        )),
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        digit1,
    )
        .take()
        .map(|lexical: &str| TokenKind::Double(lexical.to_string()))
        .parse_next(input)
}

fn parse_decimal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    (
        opt(one_of(['+', '-'])),
        alt(((digit1, '.', digit1).take(), ('.', digit1).take())),
    )
        .take()
        .map(|lexical: &str| TokenKind::Decimal(lexical.to_string()))
        .parse_next(input)
}

fn parse_integer(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    (opt(one_of(['+', '-'])), digit1)
        .take()
        .map(|lexical: &str| TokenKind::Integer(lexical.to_string()))
        .parse_next(input)
}

/// `:local` or a bare `:`.
fn parse_default_prefix(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;
    let local = opt(parse_pn_local).parse_next(input)?;
    Ok(TokenKind::PrefixedName {
        prefix: String::new(),
        local: local.unwrap_or_default(),
    })
}

fn parse_prefixed_name_or_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let start = input.checkpoint();
    let word = parse_pn_prefix(input)?;

    if opt(':').parse_next(input)?.is_some() {
        let local = opt(parse_pn_local).parse_next(input)?;
        return Ok(TokenKind::PrefixedName {
            prefix: word,
            local: local.unwrap_or_default(),
        });
    }

    match word.as_str() {
        "a" => Ok(TokenKind::KwA),
        "true" => Ok(TokenKind::KwTrue),
        "false" => Ok(TokenKind::KwFalse),
        w if w.eq_ignore_ascii_case("prefix") => Ok(TokenKind::KwSparqlPrefix),
        w if w.eq_ignore_ascii_case("base") => Ok(TokenKind::KwSparqlBase),
        _ => {
            input.reset(&start);
            Err(backtrack())
        }
    }
}

/// A prefix label. Inner dots are kept; a trailing dot ends the statement.
fn parse_pn_prefix(input: &mut Input<'_>) -> ModalResult<String> {
    let first: char = one_of(is_pn_chars_base).parse_next(input)?;
    let mut word = String::from(first);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        if dot_continues(input, is_pn_chars) {
            '.'.parse_next(input)?;
            word.push('.');
        } else {
            return Ok(word);
        }
    }
}

/// The part after the colon of a prefixed name.
fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    if !input.chars().next().is_some_and(is_pn_local_start) {
        return Err(backtrack());
    }

    let mut local = String::new();
    loop {
        let chunk: &str = take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        local.push_str(chunk);

        if dot_continues(input, |c| is_pn_chars(c) || c == ':' || c == '%') {
            '.'.parse_next(input)?;
            local.push('.');
        } else if input.starts_with('%') {
            let escape: &str = ('%', take_while(2..=2, AsChar::is_hex_digit))
                .take()
                .parse_next(input)?;
            local.push_str(escape);
        } else if local.is_empty() {
            return Err(backtrack());
        } else {
            return Ok(local);
        }
    }
}

/// Whether the input is a `.` followed by a name character.
fn dot_continues(input: &Input<'_>, name_char: impl Fn(char) -> bool) -> bool {
    let mut chars = input.chars();
    chars.next() == Some('.') && chars.next().is_some_and(name_char)
}

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        _ => None,
    })
    .parse_next(input)
}

/// Tokenize a whole document. Mostly useful for tests and diagnostics.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
