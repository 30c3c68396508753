//! Static question answering from a canned-answer table.

use crate::config::ResponderSettings;
use std::collections::BTreeMap;

/// Answers questions by exact lookup in a fixed table.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    answers: BTreeMap<String, String>,
    fallback: String,
}

impl CannedResponder {
    pub fn new(answers: BTreeMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            answers,
            fallback: fallback.into(),
        }
    }

    pub fn from_settings(settings: &ResponderSettings) -> Self {
        Self::new(settings.answers.clone(), settings.fallback.clone())
    }

    /// The answer for `question`, matched exactly, or the fallback.
    pub fn respond(&self, question: &str) -> &str {
        self.answers
            .get(question)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Questions the table knows about.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::from_settings(&ResponderSettings::default())
    }
}
