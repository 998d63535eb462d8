//! All Telegram-specific functionality

pub mod bot;
pub mod client;

pub use bot::{run_polling, to_incoming};
pub use client::{MAX_MESSAGE_CHARS, TelegramMessenger, split_message};
