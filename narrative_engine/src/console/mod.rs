//! The M.A.R.C. research console.
//!
//! The console answers free-text questions from a [`ConsoleScript`]. A
//! question is matched case-insensitively by substring, in tiers where the
//! first match wins:
//!
//! 1. The current mission, by id or title
//! 2. A glossary term, in declared order
//! 3. A canned prompt, in declared order
//! 4. The next fallback line
//!
//! Fallback lines rotate, so the same session always gives the same sequence
//! of answers. A reply is computed at once; [`PendingReply`] holds it back
//! for the thinking delay.

use adventure_rules::content::MissionDef;
use adventure_rules::ContentError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::presentation::ThinkingDelay;

/// Everything the console can say.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleScript {
    /// Shown when the console is opened.
    pub greeting: String,

    /// Answer about the current mission. `{title}` and `{description}` are
    /// filled in from the mission.
    pub mission_reply: String,

    #[serde(default)]
    pub fallbacks: Vec<String>,

    #[serde(default)]
    pub glossary: Vec<GlossaryEntry>,

    #[serde(default, rename = "prompt")]
    pub prompts: Vec<Prompt>,
}

/// A marketing term and what the console says about it.
#[derive(Debug, Clone, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
}

/// A fixed reply to any of several phrasings.
#[derive(Debug, Clone, Deserialize)]
pub struct Prompt {
    pub triggers: Vec<String>,
    pub reply: String,
    #[serde(default = "helpful_by_default")]
    pub helpful: bool,
}

fn helpful_by_default() -> bool {
    true
}

impl ConsoleScript {
    /// The script shipped with the game.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_toml_str(include_str!("../../content/console.toml"))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ContentError> {
        toml::from_str(text).map_err(|source| ContentError::Parse {
            file: "console",
            source,
        })
    }
}

/// Which tier produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Greeting,
    Mission,
    Glossary,
    Prompt,
    Fallback,
}

/// One answer from the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleReply {
    pub text: String,
    pub source: ReplySource,
    /// False for the brush-offs.
    pub helpful: bool,
}

impl ConsoleReply {
    fn new(text: impl Into<String>, source: ReplySource, helpful: bool) -> Self {
        Self {
            text: text.into(),
            source,
            helpful,
        }
    }
}

/// Answers questions for one player.
#[derive(Debug, Clone)]
pub struct Console {
    script: Arc<ConsoleScript>,
    next_fallback: usize,
}

impl Console {
    pub fn new(script: Arc<ConsoleScript>) -> Self {
        Self {
            script,
            next_fallback: 0,
        }
    }

    pub fn script(&self) -> &ConsoleScript {
        &self.script
    }

    pub fn greeting(&self) -> ConsoleReply {
        ConsoleReply::new(self.script.greeting.as_str(), ReplySource::Greeting, true)
    }

    /// Answer a question. Blank questions get no answer.
    pub fn reply(&mut self, question: &str, mission: Option<&MissionDef>) -> Option<ConsoleReply> {
        let question = question.trim().to_lowercase();
        if question.is_empty() {
            return None;
        }

        let reply = mission
            .and_then(|def| self.mission_reply(&question, def))
            .or_else(|| self.glossary_reply(&question))
            .or_else(|| self.prompt_reply(&question))
            .unwrap_or_else(|| self.fallback_reply());

        debug!(source = ?reply.source, "console reply");
        Some(reply)
    }

    fn mission_reply(&self, question: &str, def: &MissionDef) -> Option<ConsoleReply> {
        let named = question.contains(&def.id.as_str().to_lowercase())
            || question.contains(&def.title.to_lowercase());
        if !named {
            return None;
        }

        let text = self
            .script
            .mission_reply
            .replace("{title}", &def.title)
            .replace("{description}", &def.description);
        Some(ConsoleReply::new(text, ReplySource::Mission, true))
    }

    fn glossary_reply(&self, question: &str) -> Option<ConsoleReply> {
        self.script
            .glossary
            .iter()
            .find(|entry| question.contains(&entry.term.to_lowercase()))
            .map(|entry| ConsoleReply::new(entry.definition.as_str(), ReplySource::Glossary, true))
    }

    fn prompt_reply(&self, question: &str) -> Option<ConsoleReply> {
        self.script
            .prompts
            .iter()
            .find(|prompt| {
                prompt
                    .triggers
                    .iter()
                    .any(|trigger| question.contains(&trigger.to_lowercase()))
            })
            .map(|prompt| {
                ConsoleReply::new(prompt.reply.as_str(), ReplySource::Prompt, prompt.helpful)
            })
    }

    /// With no fallback lines the greeting is repeated.
    fn fallback_reply(&mut self) -> ConsoleReply {
        let fallbacks = &self.script.fallbacks;
        if fallbacks.is_empty() {
            return ConsoleReply::new(self.script.greeting.as_str(), ReplySource::Fallback, false);
        }

        let index = self.next_fallback % fallbacks.len();
        self.next_fallback = (index + 1) % fallbacks.len();
        ConsoleReply::new(fallbacks[index].as_str(), ReplySource::Fallback, false)
    }
}

/// A reply waiting out the thinking delay.
#[derive(Debug, Clone)]
pub struct PendingReply {
    reply: ConsoleReply,
    delay: ThinkingDelay,
}

impl PendingReply {
    pub fn new(reply: ConsoleReply, delay: Duration) -> Self {
        Self {
            reply,
            delay: ThinkingDelay::new(delay),
        }
    }

    /// Advance by `dt`. Returns the reply once the delay has run out.
    pub fn advance(&mut self, dt: Duration) -> Option<&ConsoleReply> {
        if self.delay.advance(dt) {
            Some(&self.reply)
        } else {
            None
        }
    }

    /// Drop the reply, e.g. because the console was closed.
    pub fn cancel(&mut self) {
        self.delay.cancel();
    }

    pub fn is_ready(&self) -> bool {
        self.delay.is_ready()
    }

    /// The reply without waiting.
    pub fn into_reply(self) -> ConsoleReply {
        self.reply
    }
}
