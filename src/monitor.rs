//! Update monitoring loop for daemon mode.
//!
//! Polls the platform-wide recent-updates listing on a fixed interval and
//! feeds newly-updated posts into the downloader. Already-seen posts are
//! filtered out by comparing update timestamps against the high-water mark
//! left by the previous successful poll.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::api::types::UpdateEvent;
use crate::api::FanboxApi;
use crate::download::Downloader;

/// Delay before the first poll after startup.
const STARTUP_DELAY: Duration = Duration::from_millis(500);

/// The daemon's polling loop.
pub struct Monitor {
    api: Arc<dyn FanboxApi>,
    downloader: Downloader,
    interval: Duration,
}

impl Monitor {
    pub fn new(api: Arc<dyn FanboxApi>, downloader: Downloader, interval: Duration) -> Self {
        Self {
            api,
            downloader,
            interval,
        }
    }

    /// Poll until `cancel` fires. A failed update fetch skips the cycle's
    /// dispatch and leaves the high-water mark unchanged; the loop never
    /// ends on its own error. Download batches are dispatched detached so a
    /// slow batch cannot delay the next poll.
    pub async fn run(&self, cancel: CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = sleep(STARTUP_DELAY) => {}
        }

        let mut high_water = Utc::now();
        let mut dispatched: JoinSet<()> = JoinSet::new();

        loop {
            tracing::info!("Getting updates from fanbox");
            match self.api.recent_updates().await {
                None => {
                    tracing::error!("Failed to get updates from fanbox");
                }
                Some(events) => {
                    let (post_ids, new_high_water) = select_new_posts(&events, high_water);
                    if post_ids.is_empty() {
                        tracing::info!("No update available");
                    } else {
                        tracing::info!("Posts to download: {}", post_ids.join(", "));
                        let downloader = self.downloader.clone();
                        dispatched.spawn(async move {
                            let result = downloader.download_posts(&post_ids).await;
                            tracing::info!("Posts download result: {}", result);
                        });
                    }
                    high_water = new_high_water;
                }
            }

            // Reap finished dispatches; in-flight ones keep running.
            while dispatched.try_join_next().is_some() {}

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }
        // Dropping the set aborts any dispatch still in flight.
    }
}

/// Select the accessible posts updated strictly after `high_water` and
/// compute the advanced mark: the batch's maximum update timestamp, never
/// moving backwards.
fn select_new_posts(
    events: &[UpdateEvent],
    high_water: DateTime<Utc>,
) -> (Vec<String>, DateTime<Utc>) {
    let mut batch_max = high_water;
    let mut post_ids = Vec::new();

    for event in events {
        let updated = match DateTime::parse_from_rfc3339(&event.updated_datetime) {
            Ok(updated) => updated.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!(
                    "Unparseable update timestamp '{}' for post {}: {}",
                    event.updated_datetime,
                    event.id,
                    e
                );
                continue;
            }
        };

        if updated > batch_max {
            batch_max = updated;
        }
        if updated <= high_water {
            continue;
        }
        if event.is_restricted {
            tracing::info!("No access to post {}, skipping it", event.id);
            continue;
        }
        post_ids.push(event.id.clone());
    }

    (post_ids, batch_max)
}
