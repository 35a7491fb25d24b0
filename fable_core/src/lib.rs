//! # Fable Core (The Storyteller)
//!
//! Turns the facts of a fable into something a reader can look at and talk
//! to. This crate reads from `fable_store`, projects the facts into a
//! node/edge graph, and answers questions with a keyword rule table.
//!
//! ## Core Components
//!
//! - **loader**: Fills a store from Turtle text, keeping quads read before an error
//! - **labels**: Display text for terms
//! - **projection**: Node/edge graph for a renderer
//! - **dialogue**: Rule-driven question answering with a focus node
//! - **chat**: Transcript and suggested questions around the dialogue engine
//! - **config**: TOML configuration
//!
//! ## Design Philosophy
//!
//! - **Load, then read**: Loading borrows the store mutably; projection and dialogue borrow it shared
//! - **Rules are data**: The rule table can be replaced from configuration
//! - **Never fail a question**: Missing facts give the default response

pub mod chat;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod labels;
pub mod loader;
pub mod projection;

pub use chat::*;
pub use config::*;
pub use dialogue::*;
pub use error::*;
pub use labels::*;
pub use loader::*;
pub use projection::*;
