//! `fitcheck status` — Show wardrobe status.

use std::sync::Arc;

use fitcheck_config::AppConfig;
use fitcheck_core::item::ItemStatus;
use fitcheck_core::repository::WardrobeRepository;
use fitcheck_store::{FileRepository, SqliteRepository};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let storage_path = config.storage_path();
    let repo: Arc<dyn WardrobeRepository> = match config.storage.backend.as_str() {
        "sqlite" => Arc::new(SqliteRepository::new(&storage_path.to_string_lossy()).await?),
        _ => Arc::new(FileRepository::new(storage_path.clone())),
    };
    let snapshot = repo.load().await?;

    println!("👔 fitcheck Status");
    println!("==================\n");
    println!("  Storage:  {} ({})", storage_path.display(), config.storage.backend);

    let count = |status: ItemStatus| {
        snapshot
            .items
            .values()
            .filter(|i| i.status == status)
            .count()
    };

    println!("  Items:    {} total", snapshot.items.len());
    println!("    ✅ clean:   {}", count(ItemStatus::Clean));
    println!("    🧺 dirty:   {}", count(ItemStatus::Dirty));
    println!("    ❓ lost:    {}", count(ItemStatus::Lost));
    println!("    ⚠️ damaged: {}", count(ItemStatus::Damaged));

    println!("  Lists:    {}", snapshot.lists.len());
    for list in &snapshot.lists {
        println!("    📋 {} ({} items)", list.name, list.items.len());
    }

    println!("  History:  {} outfits, {} feedback notes", snapshot.history.len(), snapshot.feedback.len());
    println!(
        "  Daily:    {} ({:02}:{:02} UTC{:+})",
        if snapshot.profile.daily_enabled { "on" } else { "off" },
        config.daily.hour,
        config.daily.minute,
        config.daily.utc_offset_hours
    );

    Ok(())
}
