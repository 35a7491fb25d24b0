//! Chat session - the transcript around the dialogue engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::DialogueConfig;
use crate::dialogue::{Answer, DialogueEngine, Highlighter};
use crate::projection::VisualNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

/// A conversation with the storyteller.
pub struct ChatSession<'a> {
    engine: DialogueEngine<'a>,
    transcript: Vec<ChatMessage>,
    reply_delay: Duration,
}

impl<'a> ChatSession<'a> {
    pub fn new(engine: DialogueEngine<'a>) -> Self {
        Self::with_config(engine, &DialogueConfig::default())
    }

    pub fn with_config(engine: DialogueEngine<'a>, config: &DialogueConfig) -> Self {
        Self {
            engine,
            transcript: Vec::new(),
            reply_delay: config.reply_delay(),
        }
    }

    /// Record a question and its answer. Blank input is ignored.
    pub fn submit(&mut self, input: &str) -> Option<Answer> {
        let question = input.trim();
        if question.is_empty() {
            return None;
        }

        self.push(Sender::User, question);
        let answer = self.engine.answer(question);
        self.push(Sender::Bot, &answer.text);
        Some(answer)
    }

    /// Like `submit`, also forwarding the focus to a highlighter.
    pub fn submit_with<H: Highlighter>(&mut self, input: &str, highlighter: &mut H) -> Option<Answer> {
        let answer = self.submit(input)?;
        if let Some(focus) = &answer.focus {
            highlighter.highlight(&focus.node, &focus.options);
        }
        Some(answer)
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// How long a front end should wait before showing a reply.
    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn engine(&self) -> &DialogueEngine<'a> {
        &self.engine
    }

    fn push(&mut self, sender: Sender, text: &str) {
        self.transcript.push(ChatMessage {
            sender,
            text: text.to_string(),
        });
    }
}

/// The question a node click suggests.
pub fn suggest_question(label: &str) -> String {
    format!("{}에 대해 알려줘", label)
}

/// Suggested question for a projected node.
pub fn suggest_for_node(node: &VisualNode) -> String {
    suggest_question(&node.label)
}
