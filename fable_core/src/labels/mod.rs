//! Label Resolver - turns terms into display text.
//!
//! Resolution order for named nodes:
//! 1. **Label**: first object of the display label predicate
//! 2. **Name**: first object of the alternate name predicate
//! 3. **Local name**: last non-empty IRI segment split on `/` or `#`

use fable_store::{NamedNode, QuadStore, Term};

use crate::config::VocabularyConfig;

/// Resolves display text against a loaded store.
#[derive(Debug, Clone)]
pub struct LabelResolver<'a> {
    store: &'a QuadStore,
    label_predicate: NamedNode,
    name_predicate: NamedNode,
}

impl<'a> LabelResolver<'a> {
    /// Create a resolver using `rdfs:label` and `schema:name`.
    pub fn new(store: &'a QuadStore) -> Self {
        Self::with_vocabulary(store, &VocabularyConfig::default())
    }

    /// Create a resolver with configured label and name predicates.
    pub fn with_vocabulary(store: &'a QuadStore, vocabulary: &VocabularyConfig) -> Self {
        Self {
            store,
            label_predicate: NamedNode::new(vocabulary.label_predicate.as_str()),
            name_predicate: NamedNode::new(vocabulary.name_predicate.as_str()),
        }
    }

    /// The store this resolver reads from.
    pub fn store(&self) -> &'a QuadStore {
        self.store
    }

    /// Display text for any term. Literals resolve to their value verbatim.
    pub fn resolve(&self, term: &Term) -> String {
        match term {
            Term::NamedNode(node) => self.resolve_named(node),
            Term::Literal(literal) => literal.value.clone(),
            Term::BlankNode(blank) => blank.as_str().to_string(),
        }
    }

    /// Display text for a named node.
    pub fn resolve_named(&self, node: &NamedNode) -> String {
        self.store
            .first_object(node, &self.label_predicate)
            .or_else(|| self.store.first_object(node, &self.name_predicate))
            .map(|object| object.value().to_string())
            .unwrap_or_else(|| {
                node.local_name()
                    .unwrap_or_else(|| node.as_str())
                    .to_string()
            })
    }
}
