//! In-process topic queues for the stat import pipeline.
//!
//! Messages cross the queue boundary serialized; `pop` decodes back into
//! the tagged [`ImportMessage`] union. A payload that fails to decode is
//! logged and skipped, never surfaced as a fault. Delivery is
//! at-least-once in steady state; messages still queued at shutdown are
//! lost with the process.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;
use tracing::warn;

use crate::cli::types::{GameId, Guid, PlayerKey, Season, Week};
use crate::error::{Result, SyncError};
use crate::model::{
    ImportMessage, ImportPlayer, ImportPlayerStat, PLAYER_PAGE_COUNT, PLAYER_PAGE_SIZE,
};

/// One logical message topic carrying serialized import payloads.
pub struct ImportQueue {
    topic: &'static str,
    messages: Mutex<VecDeque<String>>,
    notify: Notify,
    closed: AtomicBool,
}

impl ImportQueue {
    pub fn new(topic: &'static str) -> Self {
        Self {
            topic,
            messages: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn topic(&self) -> &'static str {
        self.topic
    }

    /// Serialize and enqueue a message.
    pub fn push(&self, message: &ImportMessage) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SyncError::QueueClosed {
                topic: self.topic.to_string(),
            });
        }

        let raw = serde_json::to_string(message)?;
        self.messages.lock().unwrap().push_back(raw);
        self.notify.notify_one();
        Ok(())
    }

    /// Await the next message, decoding at the boundary.
    ///
    /// Returns `None` once the queue is closed and fully drained.
    /// Undecodable payloads are logged and skipped.
    pub async fn pop(&self) -> Option<ImportMessage> {
        loop {
            // Register for a wakeup before checking the queue so a push
            // between the check and the await cannot be missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(raw) = self.messages.lock().unwrap().pop_front() {
                match serde_json::from_str(&raw) {
                    Ok(message) => return Some(message),
                    Err(err) => {
                        warn!(topic = self.topic, error = %err, "skipping undecodable payload");
                        continue;
                    }
                }
            }

            if self.closed.load(Ordering::Acquire) {
                return None;
            }

            notified.await;
        }
    }

    /// Close the queue: pending messages stay poppable, new pushes fail,
    /// and blocked consumers wake to observe the drain.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Enqueue the fixed page sweep for one game's player catalog.
///
/// Always 60 pages of 25, offsets `0, 25, .., 1475` — a fixed upper
/// bound rather than the true catalog size; pages past the end come
/// back empty and are dropped by the workers.
pub fn queue_all_players(queue: &ImportQueue, guid: &Guid, game_id: GameId) -> Result<u32> {
    for page in 0..PLAYER_PAGE_COUNT {
        queue.push(&ImportMessage::PlayerPage(ImportPlayer {
            guid: guid.clone(),
            game_id,
            offset: PLAYER_PAGE_SIZE * page,
            limit: PLAYER_PAGE_SIZE,
        }))?;
    }
    Ok(PLAYER_PAGE_COUNT)
}

/// Enqueue one stat request per player for a given week.
pub fn queue_player_stats(
    queue: &ImportQueue,
    guid: &Guid,
    player_keys: &[PlayerKey],
    week: Week,
    season: Season,
) -> Result<u32> {
    for player_key in player_keys {
        queue.push(&ImportMessage::PlayerStat(ImportPlayerStat {
            guid: guid.clone(),
            player_key: player_key.clone(),
            week,
            season,
        }))?;
    }
    Ok(player_keys.len() as u32)
}
