//! Streaming reader for the Turtle subset used by the fable data.
//!
//! The lexer is written with `winnow` combinators; the parser pulls one token
//! at a time and hands each quad to a `QuadSink` as soon as it is complete.
//!
//! ```
//! use fable_store::{turtle, QuadStore};
//!
//! let mut store = QuadStore::new();
//! let count = turtle::parse(
//!     r#"
//!     @prefix ex: <http://example.org/fable/ant-grasshopper/> .
//!     ex:Ant ex:hasTrait "부지런함" .
//!     "#,
//!     &mut store,
//! )
//! .unwrap();
//! assert_eq!(count, 1);
//! ```

mod chars;
mod error;
mod lexer;
mod parser;

pub use error::{Result, TurtleError};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{parse, parse_all, Parser};
