use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::debug;

use crate::core::models::AudioReply;
use crate::errors::BotError;
use crate::messaging::Messenger;

/// Telegram rejects messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// [`Messenger`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    #[must_use]
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// The generated file name doubles as the track title.
    fn audio_request(&self, chat: ChatId, audio: AudioReply) -> <Bot as Requester>::SendAudio {
        let title = audio.filename.clone();
        let file = InputFile::memory(audio.bytes).file_name(audio.filename);
        self.bot.send_audio(chat, file).title(title)
    }
}

fn parse_chat_id(chat_id: &str) -> Result<ChatId, BotError> {
    chat_id
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| BotError::MessagingError(format!("Invalid chat id {chat_id:?}: {e}")))
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        let chat = parse_chat_id(chat_id)?;
        let chunks = split_message(text, MAX_MESSAGE_CHARS);
        debug!("Sending reply in {} message(s)", chunks.len());
        for chunk in chunks {
            self.bot.send_message(chat, chunk).await?;
        }
        Ok(())
    }

    async fn send_audio(&self, chat_id: &str, audio: AudioReply) -> Result<(), BotError> {
        let chat = parse_chat_id(chat_id)?;
        self.audio_request(chat, audio).await?;
        Ok(())
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, preferring to
/// break after a newline. The newline at a break is dropped.
#[must_use]
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.chars().count() > max_chars {
        let limit = remaining
            .char_indices()
            .nth(max_chars)
            .map_or(remaining.len(), |(idx, _)| idx);
        let window = &remaining[..limit];

        match window.rfind('\n') {
            Some(0) | None => {
                chunks.push(window.to_string());
                remaining = &remaining[limit..];
            }
            Some(newline) => {
                chunks.push(window[..newline].to_string());
                remaining = &remaining[newline + 1..];
            }
        }
    }

    if !remaining.is_empty() || chunks.is_empty() {
        chunks.push(remaining.to_string());
    }
    chunks
}
