//! The bot: command grammar, handlers, dispatch loop, daily job.
//!
//! Everything in here is channel-agnostic — it works against the
//! `Channel`, `OutfitSuggester`, and `WeatherReporter` traits, so the
//! tests run on in-process fakes and production runs on Telegram.

pub mod command;
pub mod dispatch;
pub mod handlers;
pub mod scheduler;

pub use command::{Command, ListCommand};
pub use handlers::BotHandler;
pub use scheduler::DailyScheduler;
