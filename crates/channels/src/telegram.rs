//! Telegram channel adapter.
//!
//! Long-polls the Bot API (`getUpdates` with a 30s hold) on a spawned
//! task and forwards text messages through an mpsc channel. Outbound
//! text is chunked to stay under Telegram's message size limit.

use async_trait::async_trait;
use fitcheck_core::channel::{Channel, ChannelId, ChannelMessage};
use fitcheck_core::error::ChannelError;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Longest message we send in one `sendMessage` call. Telegram caps at
/// 4096; we stay under to leave room for markers the handlers add.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// How long `getUpdates` holds the connection waiting for updates.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Telegram channel configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub bot_token: String,
    /// Allowed user IDs. Empty = deny all, ["*"] = allow all.
    pub allowed_users: Vec<String>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

/// Telegram channel adapter.
pub struct TelegramChannel {
    config: TelegramConfig,
    channel_id: ChannelId,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, config)
    }

    /// Point at a custom endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>, config: TelegramConfig) -> Self {
        // Long-poll requests hold for POLL_TIMEOUT_SECS, so the client
        // timeout has to sit above that.
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(POLL_TIMEOUT_SECS + 15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            channel_id: ChannelId("telegram".into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.config.bot_token, method)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, ChannelError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionLost(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(ChannelError::NotConfigured(
                "Telegram rejected the bot token".into(),
            ));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ChannelError::InvalidPayload(e.to_string()))?;

        if !envelope.ok {
            return Err(ChannelError::DeliveryFailed {
                channel: "telegram".into(),
                reason: envelope.description.unwrap_or_else(|| "unknown".into()),
            });
        }

        envelope
            .result
            .ok_or_else(|| ChannelError::InvalidPayload("ok response without result".into()))
    }
}

/// Split text into chunks that fit under `limit` characters.
///
/// Prefers line boundaries; a single line longer than the limit is
/// hard-split on a char boundary. Never splits inside a UTF-8 scalar.
pub fn chunk_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if line_len > limit {
            // Flush what we have, then hard-split the oversized line.
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut piece = String::new();
            let mut piece_len = 0usize;
            for ch in line.chars() {
                if piece_len == limit {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
                piece.push(ch);
                piece_len += 1;
            }
            current = piece;
            current_len = piece_len;
            continue;
        }

        // +1 for the newline we would re-insert.
        let needed = if current.is_empty() { line_len } else { line_len + 1 };
        if current_len + needed > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn id(&self) -> &ChannelId {
        &self.channel_id
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        if self.config.bot_token.is_empty() {
            return Err(ChannelError::NotConfigured(
                "Telegram bot token is empty".into(),
            ));
        }

        info!("Telegram channel starting (long polling)");

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let url = self.method_url("getUpdates");
        let channel_id = self.channel_id.clone();

        // The loop ends when the receiver side is dropped.
        tokio::spawn(async move {
            let mut offset: i64 = 0;

            'poll: loop {
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message"],
                });

                let response = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        warn!(error = %e, "getUpdates failed, backing off");
                        if tx
                            .send(Err(ChannelError::ConnectionLost(e.to_string())))
                            .await
                            .is_err()
                        {
                            break 'poll;
                        }
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let envelope: ApiEnvelope<Vec<ApiUpdate>> = match response.json().await {
                    Ok(e) => e,
                    Err(e) => {
                        warn!(error = %e, "getUpdates returned unparseable body");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                if !envelope.ok {
                    warn!(
                        description = envelope.description.as_deref().unwrap_or("unknown"),
                        "getUpdates returned an API error"
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }

                for update in envelope.result.unwrap_or_default() {
                    offset = offset.max(update.update_id + 1);

                    let Some(message) = update.message else { continue };
                    let Some(text) = message.text else { continue };
                    let Some(from) = message.from else { continue };

                    let msg = ChannelMessage {
                        channel_id: channel_id.clone(),
                        sender_id: from.id.to_string(),
                        sender_name: Some(from.first_name),
                        text,
                        chat_id: message.chat.id.to_string(),
                    };

                    debug!(sender_id = %msg.sender_id, "Telegram update received");
                    if tx.send(Ok(msg)).await.is_err() {
                        break 'poll;
                    }
                }
            }

            info!("Telegram polling loop stopped");
        });

        Ok(rx)
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        for chunk in chunk_message(text, TELEGRAM_MESSAGE_LIMIT) {
            let _: ApiMessage = self
                .call(
                    "sendMessage",
                    serde_json::json!({ "chat_id": chat_id, "text": chunk }),
                )
                .await?;
        }
        Ok(())
    }

    async fn send_typing(&self, chat_id: &str) -> Result<(), ChannelError> {
        let _: bool = self
            .call(
                "sendChatAction",
                serde_json::json!({ "chat_id": chat_id, "action": "typing" }),
            )
            .await?;
        Ok(())
    }

    fn is_allowed(&self, sender_id: &str) -> bool {
        if self.config.allowed_users.is_empty() {
            return false;
        }
        if self.config.allowed_users.iter().any(|u| u == "*") {
            return true;
        }
        self.config.allowed_users.iter().any(|u| u == sender_id)
    }

    async fn health_check(&self) -> Result<bool, ChannelError> {
        if self.config.bot_token.is_empty() {
            return Ok(false);
        }
        let me: ApiUser = self.call("getMe", serde_json::json!({})).await?;
        Ok(me.id != 0)
    }
}

// --- Telegram Bot API types (internal) ---

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUpdate {
    update_id: i64,
    #[serde(default)]
    message: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    chat: ApiChat,
    #[serde(default)]
    from: Option<ApiUser>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: i64,
    #[serde(default)]
    first_name: String,
}
