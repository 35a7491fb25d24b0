//! Quad Store - the in-memory fact base with wildcard pattern lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::term::{NamedNode, Quad, QuadSink, Term};

/// A lookup pattern. `None` fields are wildcards.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadPattern<'a> {
    pub subject: Option<&'a NamedNode>,
    pub predicate: Option<&'a NamedNode>,
    pub object: Option<&'a Term>,
    pub graph: Option<&'a NamedNode>,
}

impl<'a> QuadPattern<'a> {
    /// A pattern matching every quad.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: &'a NamedNode) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: &'a NamedNode) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: &'a Term) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_graph(mut self, graph: &'a NamedNode) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Check whether every concrete field equals the quad's field.
    pub fn matches(&self, quad: &Quad) -> bool {
        self.subject.map_or(true, |s| *s == quad.subject)
            && self.predicate.map_or(true, |p| *p == quad.predicate)
            && self.object.map_or(true, |o| *o == quad.object)
            && self.graph.map_or(true, |g| quad.graph.as_ref() == Some(g))
    }
}

/// The quad store.
///
/// Quads are kept in insertion order. Subject and predicate indexes narrow
/// the scan; they never change which quads match or their order.
///
/// A store serializes as its quad list. The indexes are rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(from = "Vec<Quad>", into = "Vec<Quad>")]
pub struct QuadStore {
    /// All quads in insertion order.
    quads: Vec<Quad>,

    /// Index: subject -> positions in `quads` (ascending).
    by_subject: HashMap<NamedNode, Vec<usize>>,

    /// Index: predicate -> positions in `quads` (ascending).
    by_predicate: HashMap<NamedNode, Vec<usize>>,
}

impl QuadStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quad. Duplicates are kept.
    pub fn add_quad(&mut self, quad: Quad) {
        let position = self.quads.len();

        self.by_subject
            .entry(quad.subject.clone())
            .or_default()
            .push(position);
        self.by_predicate
            .entry(quad.predicate.clone())
            .or_default()
            .push(position);

        self.quads.push(quad);
    }

    /// Get every quad matching the given fields, in insertion order.
    ///
    /// Each argument is either a concrete value or `None` for a wildcard.
    /// No match yields an empty vector.
    pub fn get_quads(
        &self,
        subject: Option<&NamedNode>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
        graph: Option<&NamedNode>,
    ) -> Vec<&Quad> {
        self.match_pattern(&QuadPattern {
            subject,
            predicate,
            object,
            graph,
        })
    }

    /// Get every quad matching a pattern, in insertion order.
    pub fn match_pattern(&self, pattern: &QuadPattern<'_>) -> Vec<&Quad> {
        let by_subject = pattern.subject.map(|s| positions(&self.by_subject, s));
        let by_predicate = pattern.predicate.map(|p| positions(&self.by_predicate, p));

        let candidates = match (by_subject, by_predicate) {
            (Some(s), Some(p)) => Some(if s.len() <= p.len() { s } else { p }),
            (Some(s), None) => Some(s),
            (None, Some(p)) => Some(p),
            (None, None) => None,
        };

        match candidates {
            Some(positions) => positions
                .iter()
                .filter_map(|&i| self.quads.get(i))
                .filter(|quad| pattern.matches(quad))
                .collect(),
            None => self.quads.iter().filter(|quad| pattern.matches(quad)).collect(),
        }
    }

    /// Object of the first quad with this subject and predicate.
    pub fn first_object(&self, subject: &NamedNode, predicate: &NamedNode) -> Option<&Term> {
        self.get_quads(Some(subject), Some(predicate), None, None)
            .first()
            .map(|quad| &quad.object)
    }

    /// Visit every quad once, in insertion order.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&Quad),
    {
        for quad in &self.quads {
            visitor(quad);
        }
    }

    /// Iterate all quads in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    /// Get the total number of quads.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

fn positions<'a>(index: &'a HashMap<NamedNode, Vec<usize>>, key: &NamedNode) -> &'a [usize] {
    index.get(key).map(|v| v.as_slice()).unwrap_or(&[])
}

impl From<Vec<Quad>> for QuadStore {
    fn from(quads: Vec<Quad>) -> Self {
        quads.into_iter().collect()
    }
}

impl From<QuadStore> for Vec<Quad> {
    fn from(store: QuadStore) -> Self {
        store.quads
    }
}

impl QuadSink for QuadStore {
    fn on_quad(&mut self, quad: Quad) {
        self.add_quad(quad);
    }
}

impl Extend<Quad> for QuadStore {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, quads: I) {
        for quad in quads {
            self.add_quad(quad);
        }
    }
}

impl FromIterator<Quad> for QuadStore {
    fn from_iter<I: IntoIterator<Item = Quad>>(quads: I) -> Self {
        let mut store = QuadStore::new();
        store.extend(quads);
        store
    }
}
