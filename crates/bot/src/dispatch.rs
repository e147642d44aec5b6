//! The dispatch loop.
//!
//! One loop per channel: receive, allowlist-check, handle, reply.
//! Handlers run to completion before the next message is taken, so
//! there is never more than one mutation in flight. Nothing in here
//! panics or returns early on a bad message — the loop only ends when
//! the channel closes its receiver.

use std::sync::Arc;

use fitcheck_core::channel::Channel;
use fitcheck_core::error::{Error, Result};
use tracing::{debug, info, warn};

use crate::handlers::BotHandler;

/// Run the dispatch loop until the channel stops producing messages.
pub async fn run(handler: Arc<BotHandler>, channel: Arc<dyn Channel>) -> Result<()> {
    let mut rx = channel.start().await.map_err(Error::Channel)?;
    info!(channel = channel.name(), "Dispatch loop started");

    while let Some(incoming) = rx.recv().await {
        let msg = match incoming {
            Ok(msg) => msg,
            Err(e) => {
                warn!(channel = channel.name(), error = %e, "Channel delivered an error");
                continue;
            }
        };

        if !channel.is_allowed(&msg.sender_id) {
            warn!(sender_id = %msg.sender_id, "Dropping message from unauthorized sender");
            continue;
        }

        if let Err(e) = channel.send_typing(&msg.chat_id).await {
            debug!(error = %e, "Typing indicator failed");
        }

        let reply = handler.handle_message(&msg).await;

        if let Err(e) = channel.send(&msg.chat_id, &reply).await {
            warn!(chat_id = %msg.chat_id, error = %e, "Failed to deliver reply");
        }
    }

    info!(channel = channel.name(), "Dispatch loop ended");
    Ok(())
}
