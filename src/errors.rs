use teloxide::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to access message store: {0}")]
    StoreError(String),

    #[error("Corrupt message log: {0}")]
    CodecError(String),

    #[error("Failed to fetch web page: {0}")]
    FetchError(String),

    #[error("Failed to generate summary: {0}")]
    SummarizerError(String),

    #[error("Failed to synthesize speech: {0}")]
    SpeechError(String),

    #[error("Failed to access Telegram API: {0}")]
    MessagingError(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl BotError {
    /// Whether the failure came from retrieving a referenced web page.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, BotError::FetchError(_))
    }
}

impl From<sqlx::Error> for BotError {
    fn from(error: sqlx::Error) -> Self {
        BotError::StoreError(error.to_string())
    }
}

impl From<RequestError> for BotError {
    fn from(error: RequestError) -> Self {
        BotError::MessagingError(error.to_string())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::FetchError(error.to_string())
    }
}
