//! `fitcheck run` — Start the bot.
//!
//! Wires the whole stack from config: storage backend, wardrobe,
//! suggester, weather, Telegram channel, dispatch loop, daily job.

use std::sync::Arc;

use fitcheck_bot::{dispatch, BotHandler, DailyScheduler};
use fitcheck_channels::TelegramChannel;
use fitcheck_config::AppConfig;
use fitcheck_core::repository::WardrobeRepository;
use fitcheck_core::suggest::WeatherReporter;
use fitcheck_providers::{GeminiSuggester, WttrWeather};
use fitcheck_store::{FileRepository, SqliteRepository};
use fitcheck_wardrobe::Wardrobe;
use tracing::info;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let bot_token = config
        .telegram
        .bot_token
        .clone()
        .ok_or("telegram.bot_token is not set — run `fitcheck onboard`")?;
    let api_key = config
        .ai
        .api_key
        .clone()
        .ok_or("ai.api_key is not set — run `fitcheck onboard`")?;

    let storage_path = config.storage_path();
    let repo: Arc<dyn WardrobeRepository> = match config.storage.backend.as_str() {
        "sqlite" => Arc::new(SqliteRepository::new(&storage_path.to_string_lossy()).await?),
        _ => Arc::new(FileRepository::new(storage_path.clone())),
    };
    info!(
        backend = %config.storage.backend,
        path = %storage_path.display(),
        "Storage ready"
    );

    let wardrobe = Arc::new(Wardrobe::open(config.categories.clone(), repo).await?);

    let suggester = Arc::new(GeminiSuggester::new(api_key, config.ai.model.clone()));
    let weather: Option<Arc<dyn WeatherReporter>> = if config.weather.enabled {
        Some(Arc::new(WttrWeather::new()))
    } else {
        None
    };

    let handler = Arc::new(BotHandler::new(
        wardrobe,
        suggester,
        weather,
        config.daily.utc_offset_hours,
    ));

    let channel = Arc::new(TelegramChannel::new(fitcheck_channels::TelegramConfig {
        bot_token,
        allowed_users: config.telegram.allowed_users.clone(),
    }));

    let scheduler = DailyScheduler::new(
        handler.clone(),
        channel.clone(),
        config.daily.clone(),
        config.telegram.owner_chat_id,
    );
    tokio::spawn(scheduler.run());

    info!("fitcheck is up");
    dispatch::run(handler, channel).await?;

    Ok(())
}
