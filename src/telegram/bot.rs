use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{error, info};

use crate::core::models::IncomingMessage;
use crate::worker::TldrBot;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand {
            command: "tldr".into(),
            description: "Summarize this chat, or the page at a URL".into(),
        },
        BotCommand {
            command: "tldraudio".into(),
            description: "Like /tldr, but read aloud".into(),
        },
    ]
}

/// Converts a Telegram message into the platform-neutral form. Messages
/// without text (stickers, photos, service messages) yield `None`.
#[must_use]
pub fn to_incoming(msg: &Message) -> Option<IncomingMessage> {
    let text = msg.text()?;
    let (user_id, username) = msg
        .from
        .as_ref()
        .map(|user| (user.id.0.to_string(), user.username.clone().unwrap_or_default()))
        .unwrap_or_default();

    Some(IncomingMessage {
        chat_id: msg.chat.id.0.to_string(),
        user_id,
        username,
        text: text.to_string(),
    })
}

async fn handle_update(msg: Message, tldr: Arc<TldrBot>) -> HandlerResult {
    if let Some(incoming) = to_incoming(&msg) {
        tldr.handle_message(incoming).await;
    }
    Ok(())
}

/// Registers the bot's commands and long-polls for updates until Ctrl-C.
pub async fn run_polling(bot: Bot, tldr: Arc<TldrBot>) {
    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        error!("Failed to set Telegram bot commands: {}", e);
    }

    info!("Polling Telegram for updates");
    let handler = Update::filter_message().endpoint(handle_update);

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(dptree::deps![tldr])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram dispatcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_message_is_converted() {
        let msg = message(json!({
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": {"id": -42, "type": "group", "title": "Green Hill"},
            "from": {"id": 7, "is_bot": false, "first_name": "Ivo", "username": "doc_robotnik"},
            "text": "emeralds"
        }));

        assert_eq!(
            to_incoming(&msg),
            Some(IncomingMessage {
                chat_id: "-42".to_string(),
                user_id: "7".to_string(),
                username: "doc_robotnik".to_string(),
                text: "emeralds".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_username_is_empty() {
        let msg = message(json!({
            "message_id": 2,
            "date": 1_700_000_000,
            "chat": {"id": 7, "type": "private", "first_name": "Sonic"},
            "from": {"id": 7, "is_bot": false, "first_name": "Sonic"},
            "text": "/tldr"
        }));

        let incoming = to_incoming(&msg).unwrap();
        assert_eq!(incoming.username, "");
        assert_eq!(incoming.text, "/tldr");
    }

    #[test]
    fn test_bot_commands() {
        let names: Vec<String> = bot_commands().into_iter().map(|c| c.command).collect();
        assert_eq!(names, vec!["tldr".to_string(), "tldraudio".to_string()]);
    }
}
