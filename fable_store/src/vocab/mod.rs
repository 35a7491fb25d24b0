//! Well-known IRIs used by the fable data set.

use crate::term::NamedNode;

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod schema {
    pub const NS: &str = "https://schema.org/";
    pub const NAME: &str = "https://schema.org/name";
}

pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
}

/// Namespace of "The Ant and the Grasshopper" facts.
pub mod fable {
    pub const NS: &str = "http://example.org/fable/ant-grasshopper/";
}

/// Build a named node inside the fable namespace.
pub fn fable(local: &str) -> NamedNode {
    NamedNode::new(format!("{}{}", fable::NS, local))
}
