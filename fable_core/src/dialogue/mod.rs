//! Dialogue Engine - answers free-text questions from the fact store.
//!
//! Answering works as follows:
//! 1. **Normalize**: lowercase the question
//! 2. **Select**: the first rule whose trigger matches wins; later rules are
//!    never consulted
//! 3. **Query**: each slot of the rule runs one store query
//! 4. **Render**: slot values are emphasized and substituted into the template
//!
//! Any empty slot, or no matching rule, yields the default response.

mod rule;

pub use rule::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fable_store::{NamedNode, QuadStore};

use crate::config::FableConfig;
use crate::labels::LabelResolver;

/// Markup used for answer fragments taken from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    /// `<strong>…</strong>`
    #[default]
    Html,
    /// `**…**`
    Markdown,
    Plain,
}

impl Emphasis {
    /// Mark up a fragment. `Html` escapes `&`, `<` and `>` in the text;
    /// the other modes pass it through unchanged.
    pub fn wrap(&self, text: &str) -> String {
        match self {
            Emphasis::Html => format!("<strong>{}</strong>", escape_html(text)),
            Emphasis::Markdown => format!("**{}**", text),
            Emphasis::Plain => text.to_string(),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// How the highlight collaborator should present a focus node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightOptions {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_animate")]
    pub animate: bool,
}

fn default_scale() -> f64 {
    1.2
}

fn default_animate() -> bool {
    true
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            animate: default_animate(),
        }
    }
}

/// The entity an answer is about.
#[derive(Debug, Clone, PartialEq)]
pub struct Focus {
    pub node: NamedNode,
    pub options: HighlightOptions,
}

/// An answer plus its optional focus.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub focus: Option<Focus>,
    /// Name of the rule that produced the answer.
    pub rule: Option<String>,
}

impl Answer {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            focus: None,
            rule: None,
        }
    }

    /// Whether this is the default non-answer.
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

/// External collaborator that highlights the focus node.
pub trait Highlighter {
    fn highlight(&mut self, node: &NamedNode, options: &HighlightOptions);
}

/// The dialogue engine.
pub struct DialogueEngine<'a> {
    resolver: LabelResolver<'a>,
    rules: Vec<Rule>,
    default_response: String,
    emphasis: Emphasis,
    highlight: HighlightOptions,
}

impl<'a> DialogueEngine<'a> {
    /// Create an engine with the built-in rules and default settings.
    pub fn new(store: &'a QuadStore) -> Self {
        Self::from_config(store, &FableConfig::default())
    }

    /// Create an engine from configuration.
    pub fn from_config(store: &'a QuadStore, config: &FableConfig) -> Self {
        Self {
            resolver: LabelResolver::with_vocabulary(store, &config.vocabulary),
            rules: config.rules.clone().unwrap_or_else(default_rules),
            default_response: config.dialogue.default_response.clone(),
            emphasis: config.dialogue.emphasis,
            highlight: config.dialogue.highlight,
        }
    }

    /// Replace the rule table.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_response(&self) -> &str {
        &self.default_response
    }

    /// The first rule whose trigger matches the question.
    pub fn select_rule(&self, question: &str) -> Option<&Rule> {
        let normalized = question.to_lowercase();
        self.rules.iter().find(|rule| rule.trigger.matches(&normalized))
    }

    /// Answer a question.
    pub fn answer(&self, question: &str) -> Answer {
        let Some(rule) = self.select_rule(question) else {
            debug!(question, "no rule matched");
            return Answer::fallback(&self.default_response);
        };
        debug!(question, rule = %rule.name, "rule selected");

        let Some(matches) = rule.evaluate(&self.resolver) else {
            warn!(rule = %rule.name, "rule matched but its facts are missing");
            return Answer::fallback(&self.default_response);
        };

        let values: Vec<String> = matches
            .iter()
            .map(|m| self.emphasis.wrap(&m.text))
            .collect();

        Answer {
            text: rule.render(&values),
            focus: rule.focus_node(&matches).map(|node| Focus {
                node,
                options: self.highlight,
            }),
            rule: Some(rule.name.clone()),
        }
    }

    /// Answer a question and pass its focus, if any, to the highlighter.
    pub fn respond<H: Highlighter>(&self, question: &str, highlighter: &mut H) -> String {
        let answer = self.answer(question);
        if let Some(focus) = &answer.focus {
            highlighter.highlight(&focus.node, &focus.options);
        }
        answer.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RESPONSE;
    use fable_store::vocab::{fable, rdfs};
    use fable_store::{Literal, Quad};

    fn setup_test_store() -> QuadStore {
        let mut store = QuadStore::new();
        let label = NamedNode::new(rdfs::LABEL);

        store.add_quad(Quad::new(fable("Ant"), fable("hasTrait"), Literal::new("부지런함")));
        store.add_quad(Quad::new(fable("Grasshopper"), fable("hasTrait"), Literal::new("노래함")));
        store.add_quad(Quad::new(fable("SummerEvent"), fable("hasOutcome"), Literal::new("식량을 비축함")));
        store.add_quad(Quad::new(fable("WinterEvent"), fable("hasOutcome"), fable("AntSuccess")));
        store.add_quad(Quad::new(fable("WinterEvent"), fable("hasOutcome"), fable("GrasshopperHardship")));
        store.add_quad(Quad::new(fable("AntSuccess"), label.clone(), Literal::new("따뜻하게 보냄")));
        store.add_quad(Quad::new(fable("GrasshopperHardship"), label.clone(), Literal::new("배고픔에 시달림")));
        store.add_quad(Quad::new(fable("AntAndGrasshopper"), fable("hasMoral"), fable("MoralLesson")));
        store.add_quad(Quad::new(fable("MoralLesson"), label, Literal::new("미리 준비하자")));
        store
    }

    #[derive(Default)]
    struct RecordingHighlighter {
        calls: Vec<(NamedNode, HighlightOptions)>,
    }

    impl Highlighter for RecordingHighlighter {
        fn highlight(&mut self, node: &NamedNode, options: &HighlightOptions) {
            self.calls.push((node.clone(), *options));
        }
    }

    #[test]
    fn test_character_answer() {
        let store = setup_test_store();
        let engine = DialogueEngine::new(&store);

        let answer = engine.answer("개미 성격 어때");
        assert_eq!(answer.text, "개미는 아주 <strong>부지런함</strong> 친구야!");
        assert_eq!(answer.rule.as_deref(), Some("ant-character"));
        assert_eq!(answer.focus.unwrap().node, fable("Ant"));

        let answer = engine.answer("베짱이는 어때?");
        assert!(answer.text.contains("<strong>노래함</strong>"));
        assert_eq!(answer.focus.unwrap().node, fable("Grasshopper"));
    }

    #[test]
    fn test_winter_answer_resolves_labels() {
        let store = setup_test_store();
        let engine = DialogueEngine::new(&store);

        let answer = engine.answer("겨울에는 어떻게 됐어?");
        assert!(answer.text.contains("<strong>따뜻하게 보냄</strong>"));
        assert!(answer.text.contains("<strong>배고픔에 시달림</strong>"));
        assert_eq!(answer.focus.unwrap().node, fable("WinterEvent"));
    }

    #[test]
    fn test_moral_focus_is_matched_subject() {
        let store = setup_test_store();
        let engine = DialogueEngine::new(&store);

        let answer = engine.answer("작가가 말하고 싶은 게 뭐야");
        assert_eq!(
            answer.text,
            "이 이야기의 교훈은 <strong>\"미리 준비하자\"</strong>란다."
        );
        assert_eq!(answer.focus.unwrap().node, fable("AntAndGrasshopper"));
    }

    #[test]
    fn test_rule_precedence() {
        let store = setup_test_store();
        let engine = DialogueEngine::new(&store);

        let question = "개미 여름에 성격 어때";
        assert_eq!(engine.select_rule(question).unwrap().name, "ant-character");
        assert_eq!(engine.answer(question).rule.as_deref(), Some("ant-character"));

        // Without a character intent the season rule applies.
        assert_eq!(engine.select_rule("개미 여름").unwrap().name, "summer");
    }

    #[test]
    fn test_unrecognized_question() {
        let store = setup_test_store();
        let engine = DialogueEngine::new(&store);

        let answer = engine.answer("وع");
        assert_eq!(answer.text, DEFAULT_RESPONSE);
        assert!(answer.focus.is_none());
        assert!(answer.is_fallback());
    }

    #[test]
    fn test_graceful_miss() {
        let empty = QuadStore::new();
        let engine = DialogueEngine::new(&empty);

        for question in ["교훈이 뭐야", "겨울", "여름", "개미 성격"] {
            let answer = engine.answer(question);
            assert_eq!(answer.text, DEFAULT_RESPONSE, "question: {}", question);
            assert!(answer.focus.is_none());
        }
    }

    #[test]
    fn test_partial_winter_facts_fall_back() {
        let mut store = QuadStore::new();
        store.add_quad(Quad::new(fable("WinterEvent"), fable("hasOutcome"), fable("AntSuccess")));
        let engine = DialogueEngine::new(&store);

        assert_eq!(engine.answer("겨울").text, DEFAULT_RESPONSE);
    }

    #[test]
    fn test_respond_calls_highlighter() {
        let store = setup_test_store();
        let engine = DialogueEngine::new(&store);
        let mut highlighter = RecordingHighlighter::default();

        engine.respond("여름에 뭐 했어", &mut highlighter);
        engine.respond("وع", &mut highlighter);

        assert_eq!(highlighter.calls.len(), 1);
        assert_eq!(highlighter.calls[0].0, fable("SummerEvent"));
        assert_eq!(highlighter.calls[0].1, HighlightOptions::default());
    }

    #[test]
    fn test_configured_engine() {
        let store = setup_test_store();
        let mut config = FableConfig::default();
        config.dialogue.emphasis = Emphasis::Markdown;
        config.dialogue.default_response = "모르겠어".to_string();
        config.dialogue.highlight.scale = 2.0;

        let engine = DialogueEngine::from_config(&store, &config);
        let answer = engine.answer("개미 특징");
        assert_eq!(answer.text, "개미는 아주 **부지런함** 친구야!");
        assert_eq!(answer.focus.unwrap().options.scale, 2.0);
        assert_eq!(engine.answer("?").text, "모르겠어");
    }

    #[test]
    fn test_rules_from_toml_replace_defaults() {
        let mut store = setup_test_store();
        store.add_quad(Quad::new(fable("Ant"), fable("age"), Literal::new("3")));

        let config = FableConfig::from_toml_str(
            r#"
            [dialogue]
            emphasis = "markdown"

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
        let engine = DialogueEngine::from_config(&store, &config);

        let answer = engine.answer("개미는 몇 살이야?");
        assert_eq!(answer.text, "개미는 **3**살이야.");
        assert_eq!(answer.rule.as_deref(), Some("ant-age"));
        assert_eq!(answer.focus.unwrap().node, fable("Ant"));

        let answer = engine.answer("개미 성격 어때");
        assert_eq!(answer.text, DEFAULT_RESPONSE);
        assert!(answer.is_fallback());
    }

    #[test]
    fn test_custom_rules() {
        let store = setup_test_store();
        let rule = Rule::new("story", Trigger::new([vec!["STORY"]]), "It is a fable.");
        let engine = DialogueEngine::new(&store).with_rules(vec![rule]);

        let answer = engine.answer("tell me the story");
        assert_eq!(answer.text, "It is a fable.");
        assert!(answer.focus.is_none());
        assert_eq!(engine.answer("개미 성격").text, DEFAULT_RESPONSE);
    }

    #[test]
    fn test_emphasis_wrap() {
        assert_eq!(Emphasis::Html.wrap("x"), "<strong>x</strong>");
        assert_eq!(Emphasis::Markdown.wrap("x"), "**x**");
        assert_eq!(Emphasis::Plain.wrap("x"), "x");
    }

    #[test]
    fn test_html_emphasis_escapes_markup() {
        assert_eq!(
            Emphasis::Html.wrap("<b>R&D</b>"),
            "<strong>&lt;b&gt;R&amp;D&lt;/b&gt;</strong>"
        );
        assert_eq!(Emphasis::Html.wrap("\"a\""), "<strong>\"a\"</strong>");
        assert_eq!(Emphasis::Markdown.wrap("<b>"), "**<b>**");
    }

    #[test]
    fn test_store_text_cannot_inject_markup() {
        let mut store = QuadStore::new();
        store.add_quad(Quad::new(
            fable("Ant"),
            fable("hasTrait"),
            Literal::new("<img src=x onerror=alert(1)>"),
        ));
        let engine = DialogueEngine::new(&store);

        let answer = engine.answer("개미 성격");
        assert_eq!(
            answer.text,
            "개미는 아주 <strong>&lt;img src=x onerror=alert(1)&gt;</strong> 친구야!"
        );
    }

    #[test]
    fn test_placeholder_text_in_labels_is_literal() {
        let mut store = QuadStore::new();
        let label = NamedNode::new(rdfs::LABEL);
        store.add_quad(Quad::new(fable("WinterEvent"), fable("hasOutcome"), fable("AntSuccess")));
        store.add_quad(Quad::new(fable("WinterEvent"), fable("hasOutcome"), fable("GrasshopperHardship")));
        store.add_quad(Quad::new(fable("AntSuccess"), label.clone(), Literal::new("보냄 {1}")));
        store.add_quad(Quad::new(fable("GrasshopperHardship"), label, Literal::new("배고픔")));
        let engine = DialogueEngine::new(&store);

        let answer = engine.answer("겨울");
        assert!(answer.text.contains("<strong>보냄 {1}</strong>"));
        assert_eq!(answer.text.matches("배고픔").count(), 1);
    }
}
