//! LLM (`OpenAI`) API client module
//!
//! Summarizes text through the `OpenAI` Responses API.

use std::time::Duration;

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use super::Summarizer;
use super::prompt_builder::{SYSTEM_PROMPT, build_user_message};
use crate::errors::BotError;

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const MAX_CONTEXT_TOKENS: usize = 400_000;
const MAX_OUTPUT_TOKENS: usize = 4_000;
const TOKEN_BUFFER: usize = 250;
const MIN_OUTPUT_TOKENS: usize = 500;

pub const TOO_LARGE_MESSAGE: &str = "This is too long to summarize in full.";

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        model_name: String,
        timeout: Duration,
    ) -> Result<Self, BotError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            BotError::SummarizerError(format!("Failed to build OpenAI HTTP client: {e}"))
        })?;
        Ok(Self {
            http,
            api_key,
            org_id,
            model_name,
        })
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn build_prompt(&self, boundary_hint: &str, source_text: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(SYSTEM_PROMPT.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(build_user_message(boundary_hint, source_text)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, BotError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key).parse().map_err(|e| {
            BotError::SummarizerError(format!("Invalid Authorization header: {e}"))
        })?;
        headers.insert("Authorization", auth_value);

        if let Some(org) = &self.org_id {
            let org_value = org.parse().map_err(|e| {
                BotError::SummarizerError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }
        Ok(headers)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP request to `OpenAI` fails or the response
    /// cannot be parsed into the expected shape.
    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<String, BotError> {
        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{:?}", prompt);

        let estimated_input_tokens = prompt
            .iter()
            .map(|msg| estimate_tokens(&format!("{:?}", msg.content)))
            .sum::<usize>();

        // Use saturating math to avoid underflow when input exceeds context
        let max_output_tokens = MAX_CONTEXT_TOKENS
            .saturating_sub(estimated_input_tokens)
            .saturating_sub(TOKEN_BUFFER)
            .min(MAX_OUTPUT_TOKENS);

        info!(
            "Estimated input tokens: {}, max output tokens: {}",
            estimated_input_tokens, max_output_tokens
        );

        if max_output_tokens < MIN_OUTPUT_TOKENS {
            return Ok(TOO_LARGE_MESSAGE.to_string());
        }

        let request_body = json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(&prompt),
            "max_output_tokens": max_output_tokens
        });

        let response = self
            .http
            .post(RESPONSES_URL)
            .headers(self.headers()?)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BotError::SummarizerError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(BotError::SummarizerError(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            BotError::SummarizerError(format!("Failed to parse OpenAI response: {e}"))
        })?;

        extract_output_text(&response_json)
            .ok_or_else(|| BotError::SummarizerError("No text in response".to_string()))
    }
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(&self, boundary_hint: &str, text: &str) -> Result<Vec<String>, BotError> {
        let prompt = self.build_prompt(boundary_hint, text);
        let summary = self.generate_summary(prompt).await?;
        Ok(split_summary_lines(&summary))
    }
}

/// Non-empty, trimmed lines of the model output.
#[must_use]
pub fn split_summary_lines(summary: &str) -> Vec<String> {
    summary
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pulls the generated text out of a Responses API payload.
///
/// Prefers the top-level `output_text` convenience field and falls back to
/// concatenating every `output_text` part of every output item.
#[must_use]
pub fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let mut collected: Vec<String> = Vec::new();
    let items = response_json.get("output").and_then(Value::as_array)?;
    for item in items {
        let Some(parts) = item.get("content").and_then(Value::as_array) else {
            continue;
        };
        for p in parts {
            let is_output_text = p
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| t == "output_text");
            if !is_output_text {
                continue;
            }
            if let Some(s) = p.get("text").and_then(Value::as_str) {
                collected.push(s.to_string());
            } else if let Some(s) = p
                .get("text")
                .and_then(|t| t.get("value"))
                .and_then(Value::as_str)
            {
                collected.push(s.to_string());
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

/// Build Responses API input payload from a chat-style prompt.
/// - Filters out assistant messages (Responses treats assistant content as output)
/// - Emits typed `input_text` parts
pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter(|m| !matches!(m.role, MessageRole::assistant))
        .map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };

            let parts: Vec<Value> = match &m.content {
                Content::Text(t) => vec![json!({
                    "type": "input_text",
                    "text": t
                })],
                Content::ImageUrl(_) => Vec::new(),
            };

            json!({
                "role": role_str,
                "content": parts
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LlmClient {
        LlmClient::new(
            "test_key".to_string(),
            None,
            "gpt-5".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("hello"), 2);
    }

    #[test]
    fn test_build_responses_input_uses_typed_parts() {
        let prompt = client().build_prompt(". .", "emeralds");
        let input = build_responses_input_from_prompt(&prompt);

        assert_eq!(input.len(), 2);
        assert_eq!(input[0]["role"], "system");
        assert_eq!(input[1]["role"], "user");
        assert_eq!(input[1]["content"][0]["type"], "input_text");
        assert_eq!(input[1]["content"][0]["text"], "Title: . .\n\nemeralds");
    }

    #[test]
    fn test_extract_output_text_prefers_convenience_field() {
        let payload = json!({ "output_text": "one\ntwo" });
        assert_eq!(extract_output_text(&payload).as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn test_extract_output_text_walks_output_items() {
        let payload = json!({
            "output": [
                { "type": "reasoning", "content": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "first" },
                    { "type": "refusal", "text": "ignored" },
                    { "type": "output_text", "text": { "value": "second" } }
                ]}
            ]
        });
        assert_eq!(extract_output_text(&payload).as_deref(), Some("first\nsecond"));
        assert_eq!(extract_output_text(&json!({ "output": [] })), None);
    }

    #[test]
    fn test_split_summary_lines_drops_blank_lines() {
        assert_eq!(
            split_summary_lines("  Sonic won.\n\nRobotnik lost.  \n"),
            vec!["Sonic won.".to_string(), "Robotnik lost.".to_string()]
        );
        assert!(split_summary_lines("").is_empty());
    }

    #[tokio::test]
    async fn test_generate_summary_short_circuits_on_large_input() {
        let client = client();
        let prompt: Vec<ChatCompletionMessage> = (0..10)
            .map(|_| ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text("a".repeat(190_000)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            })
            .collect();

        // no network call happens on this path
        let res = client.generate_summary(prompt).await.unwrap();
        assert_eq!(res, TOO_LARGE_MESSAGE);
    }
}
