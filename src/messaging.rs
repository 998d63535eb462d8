use async_trait::async_trait;

use crate::core::models::AudioReply;
use crate::errors::BotError;

/// Outbound side of the messaging platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), BotError>;

    async fn send_audio(&self, chat_id: &str, audio: AudioReply) -> Result<(), BotError>;
}
