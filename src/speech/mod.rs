//! Text-to-speech for `/tldraudio`

pub mod google;

use async_trait::async_trait;

use crate::errors::BotError;

pub use google::GoogleTts;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Encoded MP3 audio speaking `text`.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, BotError>;
}
