//! TLDR - A Telegram chat bot that summarizes the conversation, or a linked web page.
//!
//! Every plain-text message is appended to a per-chat log. `/tldr` replies
//! with a summary of the most recent lines of that log, or of the page when
//! the command carries a URL. `/tldraudio` does the same and replies with
//! synthesized speech.
//!
//! # Architecture
//!
//! - [`telegram`] receives updates by long polling (teloxide) and sends replies
//! - [`worker`] routes each update, summarizes, and produces exactly one reply per command
//! - [`storage`] keeps the per-chat logs in SQLite (sqlx) as delimited rows
//! - [`web`], [`ai`] and [`speech`] wrap page fetching, summarization and text-to-speech
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use tldr::ai::LeadSummarizer;
//! use tldr::speech::GoogleTts;
//! use tldr::storage::{MessageLogStore, MemoryRowStore};
//! use tldr::telegram::TelegramMessenger;
//! use tldr::web::HttpPageFetcher;
//! use tldr::worker::{CommandRouter, SummaryDispatcher, TldrBot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tldr::setup_logging();
//!
//!     let store = Arc::new(MessageLogStore::new(MemoryRowStore::new()));
//!     let router = CommandRouter::new(
//!         store.clone(),
//!         Arc::new(HttpPageFetcher::new(Duration::from_secs(20))?),
//!         300,
//!     );
//!     let dispatcher = SummaryDispatcher::new(
//!         Arc::new(LeadSummarizer::new(5)),
//!         Arc::new(GoogleTts::new("en", Duration::from_secs(60))?),
//!         ". .",
//!         Duration::from_secs(60),
//!     );
//!
//!     let bot = teloxide::Bot::new("123:token");
//!     let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
//!     let tldr = Arc::new(TldrBot::new(store, router, dispatcher, messenger));
//!
//!     tldr::telegram::run_polling(bot, tldr).await;
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod command_parser;
pub mod core;
pub mod errors;
pub mod history;
pub mod messaging;
pub mod speech;
pub mod storage;
pub mod telegram;
pub mod web;
pub mod worker;

pub use ai::estimate_tokens;
pub use errors::BotError;

/// Configure structured JSON logging.
///
/// The level filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once keeps the first subscriber.
///
/// # Example
///
/// ```
/// tldr::setup_logging();
/// tldr::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
