//! The daily outfit job.
//!
//! A minute-granularity tick loop: every 60 seconds it checks whether the
//! configured local time has been reached today and, if the user has the
//! daily outfit enabled, pushes a suggestion to the owner chat. At most
//! one delivery per local calendar day; a restart after the fire time
//! does not re-fire.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};
use fitcheck_config::DailyConfig;
use fitcheck_core::channel::Channel;
use tracing::{info, warn};

use crate::handlers::BotHandler;

const TICK: std::time::Duration = std::time::Duration::from_secs(60);

pub struct DailyScheduler {
    handler: Arc<BotHandler>,
    channel: Arc<dyn Channel>,
    config: DailyConfig,
    owner_chat_id: i64,
}

impl DailyScheduler {
    pub fn new(
        handler: Arc<BotHandler>,
        channel: Arc<dyn Channel>,
        config: DailyConfig,
        owner_chat_id: i64,
    ) -> Self {
        Self {
            handler,
            channel,
            config,
            owner_chat_id,
        }
    }

    /// Run the tick loop forever.
    pub async fn run(self) {
        if !should_deliver(self.owner_chat_id, true) {
            info!("Daily job disabled: no owner chat configured");
            return;
        }

        let offset = FixedOffset::east_opt(self.config.utc_offset_hours.clamp(-12, 14) * 3600)
            .unwrap_or_else(|| Utc.fix());

        // Starting after today's fire time counts as already fired, so a
        // midday restart stays quiet until tomorrow.
        let now = Utc::now().with_timezone(&offset).naive_local();
        let mut last_fired = if is_due(now, self.config.hour, self.config.minute, None) {
            Some(now.date())
        } else {
            None
        };

        info!(
            hour = self.config.hour,
            minute = self.config.minute,
            "Daily job scheduled"
        );

        loop {
            tokio::time::sleep(TICK).await;

            let now = Utc::now().with_timezone(&offset).naive_local();
            if !is_due(now, self.config.hour, self.config.minute, last_fired) {
                continue;
            }
            last_fired = Some(now.date());

            let enabled = self.handler.wardrobe().profile().await.daily_enabled;
            if !should_deliver(self.owner_chat_id, enabled) {
                continue;
            }

            info!("Daily outfit firing");
            // A failed suggestion stays silent; it was already logged.
            let Some(reply) = self.handler.daily_outfit().await else {
                continue;
            };

            if let Err(e) = self
                .channel
                .send(&self.owner_chat_id.to_string(), &reply)
                .await
            {
                warn!(error = %e, "Daily outfit delivery failed");
            }
        }
    }
}

/// Whether a due tick should actually deliver to the owner chat.
///
/// Requires a configured owner chat (0 = unset) and the user's opt-in.
pub fn should_deliver(owner_chat_id: i64, daily_enabled: bool) -> bool {
    owner_chat_id != 0 && daily_enabled
}

/// Whether the daily job should fire at `now`.
///
/// Due once the configured time has passed, at most once per local day.
pub fn is_due(now: NaiveDateTime, hour: u32, minute: u32, last_fired: Option<NaiveDate>) -> bool {
    if last_fired == Some(now.date()) {
        return false;
    }
    let due_at = NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or_default();
    now.time() >= due_at
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        format!("{date}T{time}").parse().unwrap()
    }

    #[test]
    fn not_due_before_the_configured_time() {
        assert!(!is_due(at("2026-08-29", "06:59:00"), 7, 0, None));
    }

    #[test]
    fn due_at_and_after_the_configured_time() {
        assert!(is_due(at("2026-08-29", "07:00:00"), 7, 0, None));
        assert!(is_due(at("2026-08-29", "07:01:30"), 7, 0, None));
        assert!(is_due(at("2026-08-29", "23:59:00"), 7, 0, None));
    }

    #[test]
    fn fires_at_most_once_per_day() {
        let today = at("2026-08-29", "07:05:00");
        assert!(!is_due(today, 7, 0, Some(today.date())));
    }

    #[test]
    fn fires_again_the_next_day() {
        let yesterday = at("2026-08-29", "07:00:00").date();
        assert!(is_due(at("2026-08-30", "07:00:00"), 7, 0, Some(yesterday)));
    }

    #[test]
    fn respects_the_minute() {
        assert!(!is_due(at("2026-08-29", "08:29:00"), 8, 30, None));
        assert!(is_due(at("2026-08-29", "08:30:00"), 8, 30, None));
    }

    #[test]
    fn delivery_needs_owner_chat_and_opt_in() {
        assert!(should_deliver(42, true));
        assert!(!should_deliver(0, true));
        assert!(!should_deliver(42, false));
        assert!(!should_deliver(0, false));
    }
}
