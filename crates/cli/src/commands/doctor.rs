//! `fitcheck doctor` — Diagnose configuration health.

use fitcheck_channels::{TelegramChannel, TelegramConfig};
use fitcheck_config::AppConfig;
use fitcheck_core::channel::Channel;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 fitcheck Doctor — Diagnostics");
    println!("================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");

                if let Some(bot_token) = config.telegram.bot_token.clone() {
                    println!("  ✅ Telegram token configured");

                    let channel = TelegramChannel::new(TelegramConfig {
                        bot_token,
                        allowed_users: config.telegram.allowed_users.clone(),
                    });
                    match channel.health_check().await {
                        Ok(true) => println!("  ✅ Telegram API reachable (getMe ok)"),
                        Ok(false) => {
                            println!("  ⚠️  Telegram getMe returned no bot identity");
                            issues += 1;
                        }
                        Err(e) => {
                            println!("  ⚠️  Telegram check failed: {e}");
                            issues += 1;
                        }
                    }
                } else {
                    println!("  ⚠️  No Telegram token — set telegram.bot_token or FITCHECK_TELEGRAM_TOKEN");
                    issues += 1;
                }

                if config.ai.api_key.is_some() {
                    println!("  ✅ Gemini API key configured");
                } else {
                    println!("  ⚠️  No Gemini API key — set ai.api_key or FITCHECK_GEMINI_API_KEY");
                    issues += 1;
                }

                if config.telegram.allowed_users.is_empty() {
                    println!("  ⚠️  allowed_users is empty — the bot will ignore everyone");
                    issues += 1;
                } else {
                    println!("  ✅ Allowlist has {} entries", config.telegram.allowed_users.len());
                }

                if config.telegram.owner_chat_id == 0 {
                    println!("  ⚠️  owner_chat_id unset — daily outfit delivery disabled");
                    issues += 1;
                } else {
                    println!("  ✅ Owner chat configured");
                }

                let storage_path = config.storage_path();
                if storage_path.exists() {
                    println!("  ✅ Wardrobe data at {}", storage_path.display());
                } else {
                    println!("  ℹ️  No wardrobe data yet ({} will be created)", storage_path.display());
                }
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No config file — run `fitcheck onboard`");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
