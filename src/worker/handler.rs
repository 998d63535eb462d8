use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::deliver::{Reply, deliver_or_log};
use super::{
    CANONICAL_FAILURE_MESSAGE, CommandRouter, FETCH_FAILURE_MESSAGE, INSUFFICIENT_DATA_MESSAGE,
    SummaryDispatcher,
};
use crate::command_parser::parse_update;
use crate::core::models::{CommandName, Entry, IncomingMessage, InboundUpdate};
use crate::messaging::Messenger;
use crate::storage::MessageLogStore;

/// What became of one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Plain text appended to the conversation log.
    Stored,
    /// Neither logged nor answered.
    Ignored,
    /// A command that was answered (delivery failures are logged).
    Replied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyFormat {
    Text,
    Audio,
}

pub struct TldrBot {
    store: Arc<MessageLogStore>,
    router: CommandRouter,
    dispatcher: SummaryDispatcher,
    messenger: Arc<dyn Messenger>,
}

impl TldrBot {
    pub fn new(
        store: Arc<MessageLogStore>,
        router: CommandRouter,
        dispatcher: SummaryDispatcher,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            store,
            router,
            dispatcher,
            messenger,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<MessageLogStore> {
        &self.store
    }

    /// Handles one inbound message. Never fails: every error is logged and,
    /// for commands, turned into a reply.
    #[instrument(
        skip_all,
        fields(
            chat_id = %message.chat_id,
            user_id = %message.user_id,
            correlation_id = %Uuid::new_v4()
        )
    )]
    pub async fn handle_message(&self, message: IncomingMessage) -> Outcome {
        match parse_update(&message.text) {
            InboundUpdate::PlainText(text) => self.store_text(&message, text).await,
            InboundUpdate::Command {
                name: CommandName::Tldr,
                argument,
            } => self.answer(&message.chat_id, &argument, ReplyFormat::Text).await,
            InboundUpdate::Command {
                name: CommandName::TldrAudio,
                argument,
            } => self.answer(&message.chat_id, &argument, ReplyFormat::Audio).await,
            InboundUpdate::Command {
                name: CommandName::Other(name),
                ..
            } => {
                debug!("Ignoring unsupported command /{}", name);
                Outcome::Ignored
            }
        }
    }

    async fn store_text(&self, message: &IncomingMessage, text: String) -> Outcome {
        let entry = Entry::new(&message.user_id, &message.username, text);
        match self.store.append(&message.chat_id, entry).await {
            Ok(()) => Outcome::Stored,
            Err(e) => {
                error!("Failed to log message: {}", e);
                Outcome::Ignored
            }
        }
    }

    async fn answer(&self, chat_id: &str, argument: &str, format: ReplyFormat) -> Outcome {
        let reply = self.compose(chat_id, argument, format).await;
        deliver_or_log(self.messenger.as_ref(), chat_id, reply).await;
        Outcome::Replied
    }

    async fn compose(&self, chat_id: &str, argument: &str, format: ReplyFormat) -> Reply {
        let request = match self.router.resolve(chat_id, argument).await {
            Ok(request) => request,
            Err(e) if e.is_fetch_failure() => {
                warn!("Could not fetch referenced page: {}", e);
                return Reply::Text(FETCH_FAILURE_MESSAGE.to_string());
            }
            Err(e) => {
                error!("Failed to resolve command input: {}", e);
                return Reply::Text(CANONICAL_FAILURE_MESSAGE.to_string());
            }
        };
        info!(
            "Resolved {:?} input of {} chars",
            request.origin,
            request.source_text.len()
        );

        let summary = match self.dispatcher.summarize(&request.source_text).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Failed to generate summary: {}", e);
                return Reply::Text(CANONICAL_FAILURE_MESSAGE.to_string());
            }
        };

        let Some(text) = summary.text() else {
            return Reply::Text(INSUFFICIENT_DATA_MESSAGE.to_string());
        };

        match format {
            ReplyFormat::Text => Reply::Text(text),
            ReplyFormat::Audio => match self.dispatcher.to_speech(&summary).await {
                Ok(audio) => Reply::Audio(audio),
                Err(e) => {
                    error!("Failed to synthesize summary: {}", e);
                    Reply::Text(CANONICAL_FAILURE_MESSAGE.to_string())
                }
            },
        }
    }
}
