//! One-shot delayed actions.
//!
//! A scheduled action never touches game state directly. When its delay
//! elapses it is posted back onto the engine queue and runs there like any
//! other command. Scheduled actions cannot be cancelled.

use crate::engine::EngineMessage;
use log::{debug, warn};
use shared::Color;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Load the next stage, or settle the match if none is left.
    AdvanceStage,
    /// Put a dead player back at their start position.
    Respawn(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAction {
    pub action: DeferredAction,
    pub delay: Duration,
}

impl ScheduledAction {
    pub fn new(action: DeferredAction, delay: Duration) -> Self {
        Self { action, delay }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    queue: mpsc::UnboundedSender<EngineMessage>,
}

impl Scheduler {
    pub fn new(queue: mpsc::UnboundedSender<EngineMessage>) -> Self {
        Self { queue }
    }

    pub fn schedule(&self, scheduled: ScheduledAction) {
        let queue = self.queue.clone();
        debug!(
            "Scheduling {:?} in {}ms",
            scheduled.action,
            scheduled.delay.as_millis()
        );

        tokio::spawn(async move {
            tokio::time::sleep(scheduled.delay).await;
            if let Err(e) = queue.send(EngineMessage::Deferred(scheduled.action)) {
                warn!("Dropping deferred action, engine is gone: {}", e);
            }
        });
    }
}
