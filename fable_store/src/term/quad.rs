//! Quad definitions - the facts held by the store.

use serde::{Deserialize, Serialize};

use super::{NamedNode, Term};

/// A subject-predicate-object fact, optionally scoped to a named graph.
///
/// Subject and predicate are always named nodes. Quads are never mutated
/// after they enter the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: NamedNode,
    pub predicate: NamedNode,
    pub object: Term,
    pub graph: Option<NamedNode>,
}

impl Quad {
    /// Create a quad in the default graph.
    pub fn new(subject: NamedNode, predicate: NamedNode, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
            graph: None,
        }
    }

    /// Scope this quad to a named graph.
    pub fn in_graph(mut self, graph: NamedNode) -> Self {
        self.graph = Some(graph);
        self
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(graph) = &self.graph {
            write!(f, " {}", graph)?;
        }
        write!(f, " .")
    }
}

/// Receiver for quads produced by a reader.
///
/// Readers call `on_quad` once per parsed fact, in document order.
pub trait QuadSink {
    fn on_quad(&mut self, quad: Quad);
}

impl QuadSink for Vec<Quad> {
    fn on_quad(&mut self, quad: Quad) {
        self.push(quad);
    }
}
