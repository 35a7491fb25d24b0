//! Graph Projector - converts the quad set into a node/edge graph.
//!
//! The projection walks every quad once:
//! 1. **Nodes**: subject and object each become a node the first time their
//!    value is seen, labeled and categorized
//! 2. **Edges**: every quad becomes one edge labeled with its predicate, even
//!    when an identical edge already exists

mod category;

pub use category::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use fable_store::{NamedNode, QuadStore, Term};

use crate::config::VocabularyConfig;
use crate::error::Result;
use crate::labels::LabelResolver;

/// A node handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    /// The term's value (IRI or literal text).
    pub id: String,
    pub label: String,
    pub category: NodeCategory,
}

/// An edge handed to the renderer. Parallel edges are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// The projected graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl VisualGraph {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Serialize as `{ "nodes": [...], "edges": [...] }` for the renderer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Projects a store into a `VisualGraph`.
pub struct GraphProjector<'a> {
    resolver: LabelResolver<'a>,
    type_predicate: NamedNode,
}

impl<'a> GraphProjector<'a> {
    /// Create a projector with the default vocabulary.
    pub fn new(store: &'a QuadStore) -> Self {
        Self::with_vocabulary(store, &VocabularyConfig::default())
    }

    /// Create a projector with configured label, name, and type predicates.
    pub fn with_vocabulary(store: &'a QuadStore, vocabulary: &VocabularyConfig) -> Self {
        Self {
            resolver: LabelResolver::with_vocabulary(store, vocabulary),
            type_predicate: NamedNode::new(vocabulary.type_predicate.as_str()),
        }
    }

    /// Build a fresh graph from every quad in the store.
    pub fn project(&self) -> VisualGraph {
        let mut graph = VisualGraph::default();
        let mut seen: HashSet<String> = HashSet::new();

        self.resolver.store().for_each(|quad| {
            let subject = Term::NamedNode(quad.subject.clone());
            for term in [&subject, &quad.object] {
                if seen.insert(term.value().to_string()) {
                    graph.nodes.push(VisualNode {
                        id: term.value().to_string(),
                        label: self.resolver.resolve(term),
                        category: self.classify(term),
                    });
                }
            }

            graph.edges.push(VisualEdge {
                from: quad.subject.as_str().to_string(),
                to: quad.object.value().to_string(),
                label: self.resolver.resolve_named(&quad.predicate),
            });
        });

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "projected fact graph"
        );
        graph
    }

    /// Category of a term. Non-named terms are always `Literal`.
    pub fn classify(&self, term: &Term) -> NodeCategory {
        match term {
            Term::NamedNode(node) => self
                .resolver
                .store()
                .first_object(node, &self.type_predicate)
                .map(|type_term| NodeCategory::from_type_value(type_term.value()))
                .unwrap_or(NodeCategory::Resource),
            Term::Literal(_) | Term::BlankNode(_) => NodeCategory::Literal,
        }
    }
}

/// Project a store with the default vocabulary.
pub fn project(store: &QuadStore) -> VisualGraph {
    GraphProjector::new(store).project()
}
