use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::BotError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///:memory:";
pub const DEFAULT_HISTORY_LIMIT: usize = 300;
pub const DEFAULT_SUMMARY_HINT: &str = ". .";
pub const DEFAULT_SUMMARY_SENTENCES: usize = 5;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5";
pub const DEFAULT_TTS_LANG: &str = "en";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub database_url: String,
    pub openai_api_key: Option<String>,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
    pub history_limit: usize,
    pub summary_hint: String,
    pub summary_sentences: usize,
    pub tts_lang: String,
    pub fetch_timeout: Duration,
    pub summary_timeout: Duration,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` when `TELEGRAM_TOKEN` is missing or a
    /// numeric setting does not parse.
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let telegram_token = get("TELEGRAM_TOKEN")
            .ok_or_else(|| BotError::ConfigError("TELEGRAM_TOKEN is not set".to_string()))?;

        Ok(Self {
            telegram_token,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_org_id: get("OPENAI_ORG_ID"),
            openai_model: get("OPENAI_MODEL"),
            history_limit: parse_or(get("TLDR_HISTORY_LIMIT"), "TLDR_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?,
            summary_hint: lookup("TLDR_SUMMARY_HINT")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SUMMARY_HINT.to_string()),
            summary_sentences: parse_or(
                get("TLDR_SUMMARY_SENTENCES"),
                "TLDR_SUMMARY_SENTENCES",
                DEFAULT_SUMMARY_SENTENCES,
            )?,
            tts_lang: get("TLDR_TTS_LANG").unwrap_or_else(|| DEFAULT_TTS_LANG.to_string()),
            fetch_timeout: Duration::from_secs(parse_or(
                get("TLDR_FETCH_TIMEOUT_SECS"),
                "TLDR_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            summary_timeout: Duration::from_secs(parse_or(
                get("TLDR_SUMMARY_TIMEOUT_SECS"),
                "TLDR_SUMMARY_TIMEOUT_SECS",
                DEFAULT_SUMMARY_TIMEOUT_SECS,
            )?),
        })
    }

    #[must_use]
    pub fn openai_model_or_default(&self) -> String {
        self.openai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string())
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, BotError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| BotError::ConfigError(format!("{key}: invalid value '{value}'"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, BotError::ConfigError(_)));
        assert!(err.to_string().contains("TELEGRAM_TOKEN"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("TELEGRAM_TOKEN", "123:abc")])).unwrap();
        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.database_url, "sqlite:///:memory:");
        assert_eq!(config.history_limit, 300);
        assert_eq!(config.summary_hint, ". .");
        assert_eq!(config.tts_lang, "en");
        assert_eq!(config.fetch_timeout, Duration::from_secs(20));
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_model_or_default(), "gpt-5");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_TOKEN", "t"),
            ("DATABASE_URL", "sqlite:///tldr.db"),
            ("TLDR_HISTORY_LIMIT", "50"),
            ("TLDR_SUMMARY_HINT", "|"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite:///tldr.db");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.summary_hint, "|");
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_model_or_default(), "gpt-4o");
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_TOKEN", "t"),
            ("TLDR_HISTORY_LIMIT", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("TLDR_HISTORY_LIMIT"));
    }
}
