//! Rule definitions - the ordered keyword table behind the dialogue engine.

use serde::{Deserialize, Serialize};

use fable_store::vocab::fable;
use fable_store::NamedNode;

use crate::labels::LabelResolver;

/// Keyword condition that selects a rule.
///
/// Every group must contain at least one keyword found in the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trigger {
    groups: Vec<Vec<String>>,
}

impl Trigger {
    /// Create a trigger from keyword groups.
    pub fn new<G, K>(groups: G) -> Self
    where
        G: IntoIterator<Item = K>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            groups: groups
                .into_iter()
                .map(|group| group.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    /// Check against an already lowercased question.
    ///
    /// A trigger with no groups, or with an empty group, never matches.
    pub fn matches(&self, question: &str) -> bool {
        !self.groups.is_empty()
            && self.groups.iter().all(|group| {
                group
                    .iter()
                    .any(|keyword| question.contains(keyword.to_lowercase().as_str()))
            })
    }
}

/// Which results of a slot query feed the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selection {
    /// Every result, joined by the separator.
    All {
        #[serde(default = "default_separator")]
        separator: String,
    },
    /// A single result by position.
    Nth { index: usize },
}

fn default_separator() -> String {
    ", ".to_string()
}

impl Default for Selection {
    fn default() -> Self {
        Selection::All {
            separator: default_separator(),
        }
    }
}

/// One store query feeding one template placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Subject IRI; `None` queries every subject.
    #[serde(default)]
    pub subject: Option<String>,
    pub predicate: String,
    #[serde(default)]
    pub select: Selection,
    /// Put double quotes around the text, inside any emphasis.
    #[serde(default)]
    pub quoted: bool,
}

impl Slot {
    pub fn new(subject: Option<&NamedNode>, predicate: &NamedNode, select: Selection) -> Self {
        Self {
            subject: subject.map(|s| s.as_str().to_string()),
            predicate: predicate.as_str().to_string(),
            select,
            quoted: false,
        }
    }

    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }

    /// Run the query and pick the selected values.
    ///
    /// Returns `None` when the selection is empty.
    pub fn evaluate(&self, resolver: &LabelResolver<'_>) -> Option<SlotMatch> {
        let subject = self.subject.as_deref().map(NamedNode::new);
        let predicate = NamedNode::new(self.predicate.as_str());
        let quads = resolver
            .store()
            .get_quads(subject.as_ref(), Some(&predicate), None, None);

        let (text, subject) = match &self.select {
            Selection::All { separator } => {
                let first = quads.first()?;
                let text = quads
                    .iter()
                    .map(|quad| resolver.resolve(&quad.object))
                    .collect::<Vec<_>>()
                    .join(separator);
                (text, first.subject.clone())
            }
            Selection::Nth { index } => {
                let quad = quads.get(*index)?;
                (resolver.resolve(&quad.object), quad.subject.clone())
            }
        };

        let text = if self.quoted {
            format!("\"{}\"", text)
        } else {
            text
        };
        Some(SlotMatch { text, subject })
    }
}

/// A filled slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMatch {
    pub text: String,
    /// Subject of the first selected quad.
    pub subject: NamedNode,
}

/// What an answer is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FocusTarget {
    #[default]
    None,
    /// A fixed resource.
    Fixed { iri: String },
    /// The subject matched by a slot.
    SlotSubject { slot: usize },
}

/// A dialogue rule: trigger, queries, and answer template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub slots: Vec<Slot>,
    /// Answer text with `{0}`, `{1}`, ... placeholders, one per slot.
    pub template: String,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl Rule {
    pub fn new(name: impl Into<String>, trigger: Trigger, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger,
            slots: Vec::new(),
            template: template.into(),
            focus: FocusTarget::None,
        }
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_focus(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }

    /// Fill every slot, or `None` if any slot comes back empty.
    pub fn evaluate(&self, resolver: &LabelResolver<'_>) -> Option<Vec<SlotMatch>> {
        self.slots.iter().map(|slot| slot.evaluate(resolver)).collect()
    }

    /// The focus node for a set of filled slots.
    pub fn focus_node(&self, matches: &[SlotMatch]) -> Option<NamedNode> {
        match &self.focus {
            FocusTarget::None => None,
            FocusTarget::Fixed { iri } => Some(NamedNode::new(iri.as_str())),
            FocusTarget::SlotSubject { slot } => matches.get(*slot).map(|m| m.subject.clone()),
        }
    }

    /// Substitute slot texts into the template.
    ///
    /// The template is scanned once, so placeholder-like text inside a value
    /// is never substituted again. Placeholders without a value are kept.
    pub fn render(&self, values: &[String]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((values.get(index)?, close))
            });
            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

const CHARACTER_INTENTS: [&str; 3] = ["성격", "특징", "어때"];

/// The built-in rule table for "The Ant and the Grasshopper", in match order.
pub fn default_rules() -> Vec<Rule> {
    let has_trait = fable("hasTrait");
    let has_outcome = fable("hasOutcome");
    let ant = fable("Ant");
    let grasshopper = fable("Grasshopper");
    let winter = fable("WinterEvent");
    let summer = fable("SummerEvent");

    vec![
        Rule::new(
            "ant-character",
            Trigger::new([vec!["개미"], CHARACTER_INTENTS.to_vec()]),
            "개미는 아주 {0} 친구야!",
        )
        .with_slot(Slot::new(Some(&ant), &has_trait, Selection::default()))
        .with_focus(FocusTarget::Fixed {
            iri: ant.as_str().to_string(),
        }),
        Rule::new(
            "grasshopper-character",
            Trigger::new([vec!["배짱이", "베짱이"], CHARACTER_INTENTS.to_vec()]),
            "배짱이는 노래를 좋아하고 {0} 면이 있어.",
        )
        .with_slot(Slot::new(Some(&grasshopper), &has_trait, Selection::default()))
        .with_focus(FocusTarget::Fixed {
            iri: grasshopper.as_str().to_string(),
        }),
        Rule::new(
            "winter",
            Trigger::new([vec!["겨울", "나중"]]),
            "추운 겨울이 되자, 개미의 결과는 {0}, 배짱이의 결과는 {1}이었단다.",
        )
        .with_slot(Slot::new(Some(&winter), &has_outcome, Selection::Nth { index: 0 }))
        .with_slot(Slot::new(Some(&winter), &has_outcome, Selection::Nth { index: 1 }))
        .with_focus(FocusTarget::Fixed {
            iri: winter.as_str().to_string(),
        }),
        Rule::new(
            "summer",
            Trigger::new([vec!["여름"]]),
            "더운 여름에 개미는 {0}. 반면에 배짱이는 노래만 부르며 놀았어.",
        )
        .with_slot(Slot::new(Some(&summer), &has_outcome, Selection::Nth { index: 0 }))
        .with_focus(FocusTarget::Fixed {
            iri: summer.as_str().to_string(),
        }),
        Rule::new(
            "moral",
            Trigger::new([vec!["교훈", "작가", "말하고"]]),
            "이 이야기의 교훈은 {0}란다.",
        )
        .with_slot(Slot::new(None, &fable("hasMoral"), Selection::Nth { index: 0 }).quoted())
        .with_focus(FocusTarget::SlotSubject { slot: 0 }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_store::{Literal, Quad, QuadStore};

    #[test]
    fn test_trigger_groups() {
        let trigger = Trigger::new([vec!["개미"], vec!["성격", "어때"]]);
        assert!(trigger.matches("개미 성격 어때"));
        assert!(trigger.matches("개미는 어때?"));
        assert!(!trigger.matches("개미"));
        assert!(!trigger.matches("성격 어때"));
    }

    #[test]
    fn test_trigger_case_insensitive_keywords() {
        let trigger = Trigger::new([vec!["Moral"]]);
        assert!(trigger.matches("what is the moral?"));
    }

    #[test]
    fn test_empty_trigger_never_matches() {
        let empty: Vec<Vec<String>> = Vec::new();
        assert!(!Trigger::new(empty).matches("anything"));
        assert!(!Trigger::new([Vec::<String>::new()]).matches("anything"));
    }

    #[test]
    fn test_render_placeholders() {
        let rule = Rule::new("r", Trigger::new([vec!["x"]]), "{0} and {1}, then {0}");
        assert_eq!(
            rule.render(&["a".to_string(), "b".to_string()]),
            "a and b, then a"
        );
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let rule = Rule::new("r", Trigger::new([vec!["x"]]), "{0} / {1}");
        assert_eq!(
            rule.render(&["보냄 {1}".to_string(), "배고픔".to_string()]),
            "보냄 {1} / 배고픔"
        );
    }

    #[test]
    fn test_render_keeps_unknown_braces() {
        let rule = Rule::new("r", Trigger::new([vec!["x"]]), "{a} {0} {7} {");
        assert_eq!(rule.render(&["v".to_string()]), "{a} v {7} {");
    }

    #[test]
    fn test_slot_selection() {
        let mut store = QuadStore::new();
        let ant = fable("Ant");
        let has_trait = fable("hasTrait");
        store.add_quad(Quad::new(ant.clone(), has_trait.clone(), Literal::new("부지런함")));
        store.add_quad(Quad::new(ant.clone(), has_trait.clone(), Literal::new("성실함")));
        let resolver = LabelResolver::new(&store);

        let all = Slot::new(Some(&ant), &has_trait, Selection::default());
        assert_eq!(all.evaluate(&resolver).unwrap().text, "부지런함, 성실함");

        let second = Slot::new(Some(&ant), &has_trait, Selection::Nth { index: 1 });
        assert_eq!(second.evaluate(&resolver).unwrap().text, "성실함");

        let third = Slot::new(Some(&ant), &has_trait, Selection::Nth { index: 2 });
        assert!(third.evaluate(&resolver).is_none());

        let missing = Slot::new(Some(&fable("Grasshopper")), &has_trait, Selection::default());
        assert!(missing.evaluate(&resolver).is_none());
    }

    #[test]
    fn test_wildcard_subject_slot() {
        let mut store = QuadStore::new();
        store.add_quad(Quad::new(
            fable("AntAndGrasshopper"),
            fable("hasMoral"),
            fable("MoralLesson"),
        ));
        let resolver = LabelResolver::new(&store);

        let slot = Slot::new(None, &fable("hasMoral"), Selection::Nth { index: 0 });
        let matched = slot.evaluate(&resolver).unwrap();
        assert_eq!(matched.text, "MoralLesson");
        assert_eq!(matched.subject, fable("AntAndGrasshopper"));

        let quoted = slot.quoted().evaluate(&resolver).unwrap();
        assert_eq!(quoted.text, "\"MoralLesson\"");
    }

    #[test]
    fn test_focus_targets() {
        let matches = vec![SlotMatch {
            text: "x".to_string(),
            subject: fable("Story"),
        }];
        let base = Rule::new("r", Trigger::new([vec!["x"]]), "{0}");

        assert_eq!(base.focus_node(&matches), None);
        assert_eq!(
            base.clone()
                .with_focus(FocusTarget::SlotSubject { slot: 0 })
                .focus_node(&matches),
            Some(fable("Story"))
        );
        assert_eq!(
            base.clone()
                .with_focus(FocusTarget::SlotSubject { slot: 3 })
                .focus_node(&matches),
            None
        );
        assert_eq!(
            base.with_focus(FocusTarget::Fixed {
                iri: fable("Ant").as_str().to_string()
            })
            .focus_node(&matches),
            Some(fable("Ant"))
        );
    }

    #[test]
    fn test_default_rule_order() {
        let names: Vec<_> = default_rules().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "ant-character",
                "grasshopper-character",
                "winter",
                "summer",
                "moral"
            ]
        );
    }

    #[test]
    fn test_rule_serde_shape() {
        let rule = &default_rules()[4];
        let json = serde_json::to_value(rule).unwrap();
        assert_eq!(json["trigger"][0][0], "교훈");
        assert_eq!(json["slots"][0]["select"]["kind"], "nth");
        assert_eq!(json["slots"][0]["quoted"], true);
        assert_eq!(json["focus"]["kind"], "slot_subject");
    }
}
