//! Google Translate text-to-speech client.
//!
//! The endpoint only accepts short inputs, so text is cut into chunks of at
//! most [`MAX_CHUNK_CHARS`] characters on word boundaries and the returned MP3
//! segments are concatenated in order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::info;
use url::Url;

use super::SpeechSynthesizer;
use crate::errors::BotError;

const TTS_URL: &str = "https://translate.google.com/translate_tts";
pub const MAX_CHUNK_CHARS: usize = 100;

pub struct GoogleTts {
    client: Client,
    lang: String,
}

impl GoogleTts {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(lang: impl Into<String>, timeout: Duration) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::SpeechError(format!("Failed to build TTS HTTP client: {e}")))?;
        Ok(Self {
            client,
            lang: lang.into(),
        })
    }

    fn chunk_url(&self, chunk: &str, idx: usize, total: usize) -> Result<Url, BotError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        Url::parse_with_params(
            TTS_URL,
            &[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ],
        )
        .map_err(|e| BotError::SpeechError(format!("Invalid TTS URL: {e}")))
    }

    async fn fetch_chunk(&self, url: &Url) -> Result<Vec<u8>, BotError> {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(2);
        Retry::spawn(strategy, || async {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| BotError::SpeechError(format!("TTS request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(BotError::SpeechError(format!("TTS returned {status}")));
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| BotError::SpeechError(format!("Failed to read TTS audio: {e}")))
        })
        .await
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, BotError> {
        let chunks = split_for_tts(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(BotError::SpeechError("Nothing to speak".to_string()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, idx, chunks.len())?;
            audio.extend(self.fetch_chunk(&url).await?);
        }

        info!(
            "Synthesized {} bytes of audio from {} chunks",
            audio.len(),
            chunks.len()
        );
        Ok(audio)
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace where possible and hard-splitting words that are too long.
#[must_use]
pub fn split_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            chunks.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_for_tts("emeralds", 100), vec!["emeralds".to_string()]);
        assert!(split_for_tts("   ", 100).is_empty());
    }

    #[test]
    fn test_chunks_respect_limit_and_keep_words() {
        let text = "the quick brown fox jumps over the lazy dog";
        let chunks = split_for_tts(text, 10);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_long_word_is_hard_split() {
        let chunks = split_for_tts("ab abcdefghij", 4);
        assert_eq!(chunks, vec!["ab", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunk_url_carries_query() {
        let tts = GoogleTts::new("en", Duration::from_secs(5)).unwrap();
        let url = tts.chunk_url("hello world", 0, 1).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "hello world".to_string())));
        assert!(pairs.contains(&("tl".to_string(), "en".to_string())));
        assert!(pairs.contains(&("textlen".to_string(), "11".to_string())));
    }
}
