//! Serialized execution context for the command engine.
//!
//! One task owns the [`CommandEngine`] and drains a single queue. Network
//! commands and timer-fired deferred actions both arrive on that queue, so
//! they are applied one at a time in arrival order with no priority between
//! them.

use crate::commands::CommandEngine;
use crate::protocol::CommandResponse;
use crate::scheduler::{DeferredAction, Scheduler};
use log::{info, warn};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Work items consumed by the engine task.
#[derive(Debug)]
pub enum EngineMessage {
    Command {
        name: String,
        args: Vec<String>,
        reply: oneshot::Sender<CommandResponse>,
    },
    Deferred(DeferredAction),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("game engine is not running")]
pub struct EngineClosed;

/// Cloneable submission side of the engine queue.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineMessage>,
}

impl EngineHandle {
    /// Submits a command and waits for its result.
    pub async fn execute(
        &self,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Result<CommandResponse, EngineClosed> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(EngineMessage::Command {
                name: name.into(),
                args,
                reply,
            })
            .map_err(|_| EngineClosed)?;
        response.await.map_err(|_| EngineClosed)
    }

    pub fn shutdown(&self) {
        if self.tx.send(EngineMessage::Shutdown).is_err() {
            warn!("Engine already stopped");
        }
    }
}

pub struct Engine {
    engine: CommandEngine,
    scheduler: Scheduler,
    rx: mpsc::UnboundedReceiver<EngineMessage>,
}

impl Engine {
    pub fn new(engine: CommandEngine) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Engine {
            engine,
            scheduler: Scheduler::new(tx.clone()),
            rx,
        };
        (engine, EngineHandle { tx })
    }

    /// Processes queued work until shutdown.
    pub async fn run(mut self) {
        info!("Game engine started");

        while let Some(message) = self.rx.recv().await {
            match message {
                EngineMessage::Command { name, args, reply } => {
                    let response = self.engine.execute(&name, &args);
                    self.flush_scheduled();
                    if reply.send(response).is_err() {
                        warn!("Caller for '{}' went away before the result", name);
                    }
                }
                EngineMessage::Deferred(action) => {
                    self.engine.run_deferred(action);
                    self.flush_scheduled();
                }
                EngineMessage::Shutdown => break,
            }
        }

        info!("Game engine shutting down");
    }

    fn flush_scheduled(&mut self) {
        for scheduled in self.engine.take_scheduled() {
            self.scheduler.schedule(scheduled);
        }
    }
}
