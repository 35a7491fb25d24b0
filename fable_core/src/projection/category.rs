//! Node categories - display styling buckets for projected nodes.

use serde::{Deserialize, Serialize};

/// Display category of a projected node.
///
/// Only the renderer looks at this; queries and dialogue never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Character,
    Scene,
    /// Movie or schema.org derived resources.
    Media,
    /// Any other named resource.
    Resource,
    Literal,
}

impl NodeCategory {
    /// Classify by the raw value of a resource's type, case-insensitively.
    ///
    /// Substrings are tested in priority order: "character", "scene",
    /// then "movie" or "schema".
    pub fn from_type_value(type_value: &str) -> Self {
        let lowered = type_value.to_lowercase();
        if lowered.contains("character") {
            NodeCategory::Character
        } else if lowered.contains("scene") {
            NodeCategory::Scene
        } else if lowered.contains("movie") || lowered.contains("schema") {
            NodeCategory::Media
        } else {
            NodeCategory::Resource
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeCategory::Character => "character",
            NodeCategory::Scene => "scene",
            NodeCategory::Media => "media",
            NodeCategory::Resource => "resource",
            NodeCategory::Literal => "literal",
        }
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
