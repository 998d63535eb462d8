use std::sync::Arc;

use anyhow::Context;
use teloxide::Bot;
use tldr::ai::summarizer_from_config;
use tldr::core::config::AppConfig;
use tldr::speech::GoogleTts;
use tldr::storage::{MessageLogStore, connect_row_store};
use tldr::telegram::{TelegramMessenger, run_polling};
use tldr::web::HttpPageFetcher;
use tldr::worker::{CommandRouter, SummaryDispatcher, TldrBot};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tldr::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        e
    })?;

    let rows = connect_row_store(&config.database_url)
        .await
        .context("Failed to open message store")?;
    let store = Arc::new(MessageLogStore::from_boxed(rows));

    let fetcher = Arc::new(HttpPageFetcher::new(config.fetch_timeout)?);
    let router = CommandRouter::new(store.clone(), fetcher, config.history_limit);

    let summarizer = summarizer_from_config(&config)?;
    let synthesizer = Arc::new(GoogleTts::new(
        config.tts_lang.clone(),
        config.summary_timeout,
    )?);
    let dispatcher = SummaryDispatcher::new(
        summarizer,
        synthesizer,
        config.summary_hint.clone(),
        config.summary_timeout,
    );

    let bot = Bot::new(&config.telegram_token);
    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let tldr = Arc::new(TldrBot::new(store.clone(), router, dispatcher, messenger));

    info!("Starting tldr bot");
    run_polling(bot, tldr).await;

    store.close().await;
    info!("Message store closed, exiting");
    Ok(())
}
