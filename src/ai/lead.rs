use async_trait::async_trait;

use super::Summarizer;
use crate::errors::BotError;

/// Offline summarizer that keeps the leading sentences of the text.
///
/// Used when no LLM is configured. Sentences end at `.`, `!` or `?` followed
/// by whitespace, or at a line break. The boundary hint is not used.
#[derive(Debug, Clone)]
pub struct LeadSummarizer {
    max_sentences: usize,
}

impl LeadSummarizer {
    #[must_use]
    pub fn new(max_sentences: usize) -> Self {
        Self { max_sentences }
    }
}

#[async_trait]
impl Summarizer for LeadSummarizer {
    async fn summarize(&self, _boundary_hint: &str, text: &str) -> Result<Vec<String>, BotError> {
        Ok(split_sentences(text)
            .into_iter()
            .take(self.max_sentences)
            .collect())
    }
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            flush(&mut sentences, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|next| next.is_whitespace()) {
            flush(&mut sentences, &mut current);
        }
    }
    flush(&mut sentences, &mut current);
    sentences
}

fn flush(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    current.clear();
}
