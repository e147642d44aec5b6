//! Channel adapters.
//!
//! One adapter per chat platform, each implementing the `Channel` trait
//! from fitcheck-core. Telegram is the only platform today.

pub mod telegram;

pub use telegram::{TelegramChannel, TelegramConfig, TELEGRAM_MESSAGE_LIMIT};
