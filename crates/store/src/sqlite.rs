//! SQLite repository — one table per entity.
//!
//! Tables: `items`, `packing_lists`, `profile` (single row), `history`,
//! `feedback`. Items and lists are rewritten per save; history and feedback
//! are append-only, so only rows beyond the stored count are inserted.
//! No multi-row transaction is taken: a crash mid-save can leave one save
//! partially applied, which matches the whole-document file backend losing
//! its most recent save.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitcheck_core::error::StorageError;
use fitcheck_core::history::{FeedbackEntry, HistoryEntry};
use fitcheck_core::item::{Item, ItemId, ItemStatus};
use fitcheck_core::packing::PackingList;
use fitcheck_core::repository::WardrobeRepository;
use fitcheck_core::snapshot::WardrobeSnapshot;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::info;

/// A SQLite-backed wardrobe repository.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (or create) the database at the given path.
    ///
    /// Pass `":memory:"` for an in-process ephemeral database (tests).
    pub async fn new(path: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StorageError::Io(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        // One connection: the bot is single-writer, and ":memory:" databases
        // are per-connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Io(format!("Failed to open SQLite: {e}")))?;

        let repo = Self { pool };
        repo.run_migrations().await?;
        info!("SQLite wardrobe repository initialized at {path}");
        Ok(repo)
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id            TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                category      TEXT NOT NULL,
                status        TEXT NOT NULL,
                status_reason TEXT,
                details       TEXT NOT NULL DEFAULT '{}',
                added         TEXT NOT NULL,
                times_worn    INTEGER NOT NULL DEFAULT 0,
                last_worn     TEXT,
                location      TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS packing_lists (
                name        TEXT PRIMARY KEY,
                description TEXT,
                items       TEXT NOT NULL DEFAULT '[]'
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS profile (
                id   INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS history (
                seq        INTEGER PRIMARY KEY AUTOINCREMENT,
                date       TEXT NOT NULL,
                occasion   TEXT NOT NULL,
                suggestion TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS feedback (
                seq  INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                text TEXT NOT NULL
            )
            "#,
        ];

        for stmt in statements {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        }

        Ok(())
    }

    fn parse_date(s: &str) -> Result<DateTime<Utc>, StorageError> {
        s.parse::<DateTime<Utc>>()
            .map_err(|e| StorageError::QueryFailed(format!("Bad timestamp '{s}': {e}")))
    }
}

#[async_trait]
impl WardrobeRepository for SqliteRepository {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<WardrobeSnapshot, StorageError> {
        let q = |e: sqlx::Error| StorageError::QueryFailed(e.to_string());

        let mut items = BTreeMap::new();
        let rows = sqlx::query("SELECT * FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(q)?;
        for row in rows {
            let id: String = row.try_get("id").map_err(q)?;
            let status_str: String = row.try_get("status").map_err(q)?;
            let status = ItemStatus::parse(&status_str).ok_or_else(|| {
                StorageError::QueryFailed(format!("Unknown item status '{status_str}'"))
            })?;
            let details_json: String = row.try_get("details").map_err(q)?;
            let details: BTreeMap<String, String> = serde_json::from_str(&details_json)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let added: String = row.try_get("added").map_err(q)?;
            let last_worn: Option<String> = row.try_get("last_worn").map_err(q)?;

            let item = Item {
                id: ItemId(id.clone()),
                name: row.try_get("name").map_err(q)?,
                category: row.try_get("category").map_err(q)?,
                status,
                status_reason: row.try_get("status_reason").map_err(q)?,
                details,
                added: Self::parse_date(&added)?,
                times_worn: row.try_get::<i64, _>("times_worn").map_err(q)? as u32,
                last_worn: last_worn.as_deref().map(Self::parse_date).transpose()?,
                location: row.try_get("location").map_err(q)?,
            };
            items.insert(id, item);
        }

        let mut lists = Vec::new();
        let rows = sqlx::query("SELECT name, description, items FROM packing_lists ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(q)?;
        for row in rows {
            let items_json: String = row.try_get("items").map_err(q)?;
            lists.push(PackingList {
                name: row.try_get("name").map_err(q)?,
                description: row.try_get("description").map_err(q)?,
                items: serde_json::from_str(&items_json)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?,
            });
        }

        let profile = match sqlx::query("SELECT data FROM profile WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(q)?
        {
            Some(row) => {
                let data: String = row.try_get("data").map_err(q)?;
                serde_json::from_str(&data)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?
            }
            None => Default::default(),
        };

        let mut history = Vec::new();
        let rows = sqlx::query("SELECT date, occasion, suggestion FROM history ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(q)?;
        for row in rows {
            let date: String = row.try_get("date").map_err(q)?;
            history.push(HistoryEntry {
                date: Self::parse_date(&date)?,
                occasion: row.try_get("occasion").map_err(q)?,
                suggestion: row.try_get("suggestion").map_err(q)?,
            });
        }

        let mut feedback = Vec::new();
        let rows = sqlx::query("SELECT date, text FROM feedback ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(q)?;
        for row in rows {
            let date: String = row.try_get("date").map_err(q)?;
            feedback.push(FeedbackEntry {
                date: Self::parse_date(&date)?,
                text: row.try_get("text").map_err(q)?,
            });
        }

        Ok(WardrobeSnapshot {
            items,
            lists,
            profile,
            history,
            feedback,
        })
    }

    async fn save(&self, snapshot: &WardrobeSnapshot) -> Result<(), StorageError> {
        let q = |e: sqlx::Error| StorageError::QueryFailed(e.to_string());

        // Items are never hard-deleted in the domain, so upserting covers them.
        for item in snapshot.items.values() {
            let details = serde_json::to_string(&item.details)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO items
                    (id, name, category, status, status_reason, details,
                     added, times_worn, last_worn, location)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id.0)
            .bind(&item.name)
            .bind(&item.category)
            .bind(item.status.to_string())
            .bind(&item.status_reason)
            .bind(details)
            .bind(item.added.to_rfc3339())
            .bind(item.times_worn as i64)
            .bind(item.last_worn.map(|d| d.to_rfc3339()))
            .bind(&item.location)
            .execute(&self.pool)
            .await
            .map_err(q)?;
        }

        // Lists support deletion, so rewrite the table.
        sqlx::query("DELETE FROM packing_lists")
            .execute(&self.pool)
            .await
            .map_err(q)?;
        for list in &snapshot.lists {
            let items = serde_json::to_string(&list.items)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            sqlx::query("INSERT INTO packing_lists (name, description, items) VALUES (?, ?, ?)")
                .bind(&list.name)
                .bind(&list.description)
                .bind(items)
                .execute(&self.pool)
                .await
                .map_err(q)?;
        }

        let profile = serde_json::to_string(&snapshot.profile)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        sqlx::query("INSERT OR REPLACE INTO profile (id, data) VALUES (1, ?)")
            .bind(profile)
            .execute(&self.pool)
            .await
            .map_err(q)?;

        // History and feedback are append-only: insert rows past the stored count.
        let stored: i64 = sqlx::query("SELECT COUNT(*) AS n FROM history")
            .fetch_one(&self.pool)
            .await
            .map_err(q)?
            .try_get("n")
            .map_err(q)?;
        for entry in snapshot.history.iter().skip(stored as usize) {
            sqlx::query("INSERT INTO history (date, occasion, suggestion) VALUES (?, ?, ?)")
                .bind(entry.date.to_rfc3339())
                .bind(&entry.occasion)
                .bind(&entry.suggestion)
                .execute(&self.pool)
                .await
                .map_err(q)?;
        }

        let stored: i64 = sqlx::query("SELECT COUNT(*) AS n FROM feedback")
            .fetch_one(&self.pool)
            .await
            .map_err(q)?
            .try_get("n")
            .map_err(q)?;
        for entry in snapshot.feedback.iter().skip(stored as usize) {
            sqlx::query("INSERT INTO feedback (date, text) VALUES (?, ?)")
                .bind(entry.date.to_rfc3339())
                .bind(&entry.text)
                .execute(&self.pool)
                .await
                .map_err(q)?;
        }

        Ok(())
    }
}
