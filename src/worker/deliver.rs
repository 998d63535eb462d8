use tracing::{error, info};

use crate::core::models::AudioReply;
use crate::errors::BotError;
use crate::messaging::Messenger;

/// The single reply a command produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Audio(AudioReply),
}

pub async fn deliver_reply(
    messenger: &dyn Messenger,
    chat_id: &str,
    reply: Reply,
) -> Result<(), BotError> {
    match reply {
        Reply::Text(text) => {
            info!("Sending {} char reply to chat_id={}", text.len(), chat_id);
            messenger.send_text(chat_id, &text).await
        }
        Reply::Audio(audio) => {
            info!(
                "Sending audio {} ({} bytes) to chat_id={}",
                audio.filename,
                audio.bytes.len(),
                chat_id
            );
            messenger.send_audio(chat_id, audio).await
        }
    }
}

/// Delivers `reply`, logging instead of propagating a messaging failure.
pub async fn deliver_or_log(messenger: &dyn Messenger, chat_id: &str, reply: Reply) -> bool {
    match deliver_reply(messenger, chat_id, reply).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to deliver reply to chat_id={}: {}", chat_id, e);
            false
        }
    }
}
