//! # Fable Store
//!
//! The fact base crate - terms, quads, and the in-memory quad store that hold
//! the facts of a fable. This crate contains no dialogue or presentation logic.
//!
//! ## Core Components
//!
//! - **term**: Named nodes, literals, blank nodes, and quads
//! - **store**: Append-only quad store with wildcard pattern lookup
//! - **turtle**: Streaming reader that feeds quads into a `QuadSink`
//! - **vocab**: Well-known IRIs

pub mod store;
pub mod term;
pub mod turtle;
pub mod vocab;

pub use store::*;
pub use term::*;
pub use turtle::TurtleError;
