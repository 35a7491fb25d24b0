//! Configuration for the fable engine.
//!
//! Loaded from a TOML document. Every field has a default, so an empty file
//! yields the stock behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use fable_store::vocab::{rdf, rdfs, schema};

use crate::dialogue::{Emphasis, HighlightOptions, Rule};
use crate::error::Result;

/// Fallback answer when no rule applies.
pub const DEFAULT_RESPONSE: &str =
    "미안해, 그 질문은 잘 모르겠어. 개미나 배짱이가 여름이나 겨울에 무엇을 했는지 물어봐 줄래?";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FableConfig {
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Replacement rule table. `None` keeps the built-in rules.
    #[serde(default)]
    pub rules: Option<Vec<Rule>>,
}

impl FableConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }
}

/// Predicates used for labels and classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Preferred display label predicate.
    #[serde(default = "default_label_predicate")]
    pub label_predicate: String,

    /// Alternate naming predicate, consulted when no label exists.
    #[serde(default = "default_name_predicate")]
    pub name_predicate: String,

    /// Predicate linking a resource to its type.
    #[serde(default = "default_type_predicate")]
    pub type_predicate: String,
}

fn default_label_predicate() -> String {
    rdfs::LABEL.to_string()
}

fn default_name_predicate() -> String {
    schema::NAME.to_string()
}

fn default_type_predicate() -> String {
    rdf::TYPE.to_string()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            label_predicate: default_label_predicate(),
            name_predicate: default_name_predicate(),
            type_predicate: default_type_predicate(),
        }
    }
}

/// Dialogue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    #[serde(default = "default_response")]
    pub default_response: String,

    #[serde(default)]
    pub emphasis: Emphasis,

    /// Pause before a reply is shown. Presentation hint only.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    #[serde(default)]
    pub highlight: HighlightOptions,
}

impl DialogueConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

fn default_response() -> String {
    DEFAULT_RESPONSE.to_string()
}

fn default_reply_delay_ms() -> u64 {
    500
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            default_response: default_response(),
            emphasis: Emphasis::default(),
            reply_delay_ms: default_reply_delay_ms(),
            highlight: HighlightOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{FocusTarget, Selection};
    use crate::error::FableError;

    #[test]
    fn test_default_config() {
        let config = FableConfig::default();
        assert_eq!(config.vocabulary.label_predicate, rdfs::LABEL);
        assert_eq!(config.vocabulary.name_predicate, schema::NAME);
        assert_eq!(config.vocabulary.type_predicate, rdf::TYPE);
        assert_eq!(config.dialogue.default_response, DEFAULT_RESPONSE);
        assert_eq!(config.dialogue.emphasis, Emphasis::Html);
        assert_eq!(config.dialogue.reply_delay(), Duration::from_millis(500));
        assert!(config.rules.is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = FableConfig::from_toml_str("").unwrap();
        assert_eq!(config.dialogue.default_response, DEFAULT_RESPONSE);
        assert_eq!(config.dialogue.highlight, HighlightOptions::default());
    }

    #[test]
    fn test_partial_override() {
        let config = FableConfig::from_toml_str(
            r#"
            [vocabulary]
            label_predicate = "http://www.w3.org/2004/02/skos/core#prefLabel"

            [dialogue]
            emphasis = "markdown"
            reply_delay_ms = 0

            [dialogue.highlight]
            scale = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.vocabulary.label_predicate,
            "http://www.w3.org/2004/02/skos/core#prefLabel"
        );
        assert_eq!(config.vocabulary.name_predicate, schema::NAME);
        assert_eq!(config.dialogue.emphasis, Emphasis::Markdown);
        assert_eq!(config.dialogue.reply_delay(), Duration::ZERO);
        assert_eq!(config.dialogue.highlight.scale, 2.0);
        assert!(config.dialogue.highlight.animate);
    }

    #[test]
    fn test_rule_table_from_toml() {
        let config = FableConfig::from_toml_str(
            r#"
            [[rules]]
            name = "ant-age"
            trigger = [["개미"], ["나이", "몇 살"]]
            template = "개미는 {0}살이야."
            focus = { kind = "fixed", iri = "http://example.org/fable/ant-grasshopper/Ant" }

            [[rules.slots]]
            subject = "http://example.org/fable/ant-grasshopper/Ant"
            predicate = "http://example.org/fable/ant-grasshopper/age"
            select = { kind = "nth", index = 0 }
            "#,
        )
        .unwrap();

        let rules = config.rules.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "ant-age");
        assert_eq!(rules[0].trigger.groups().len(), 2);
        assert_eq!(rules[0].slots[0].select, Selection::Nth { index: 0 });
        assert!(!rules[0].slots[0].quoted);
        assert!(matches!(rules[0].focus, FocusTarget::Fixed { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let result = FableConfig::from_toml_str("[dialogue\nemphasis = 3");
        assert!(matches!(result, Err(FableError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = FableConfig::from_path("/nonexistent/fable.toml");
        assert!(matches!(result, Err(FableError::Io(_))));
    }
}
