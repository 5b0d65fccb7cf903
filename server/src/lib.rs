//! # Game Server Library
//!
//! Authoritative state service for a two-player color-matching platformer.
//! Two avatars, black and white, race through a fixed sequence of stages,
//! collecting gems of their own color, avoiding hazards of the other color,
//! and reaching the exit once their gem quota is met. The server owns every
//! entity, the stage progression, the scores and the match result.
//!
//! ## Architecture Design
//!
//! ### Single Serialized Engine
//! All state lives in one [`commands::CommandEngine`] owned by a single task
//! ([`engine::Engine`]). Network commands and timer-fired follow-ups
//! (respawns, stage advances) are posted to the same queue and applied one at
//! a time, so no command ever observes another half-applied.
//!
//! ### Client-Reported Telemetry
//! Positions and lives are accepted from clients as reported. The server
//! decides collection, hazard deaths, stage wins and the match winner.
//!
//! ## Module Organization
//!
//! - `entity`: live players, gems, hazards, walls and exit of the active stage
//! - `match_state`: stage index, scores, stage and match winners, match clock
//! - `game`: gameplay rules tying entities and match state together
//! - `commands`: command decoding and the synchronous engine entry point
//! - `scheduler`: delayed one-shot actions posted back onto the engine queue
//! - `engine`: the task that serializes all engine access
//! - `network` / `http`: TCP gateway speaking a minimal HTTP/1.0 dialect
//! - `assets`: sprites rendered once at start-up
//! - `protocol`: result shapes returned to clients
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::{assets::RenderAssets, commands::CommandEngine, engine::Engine};
//! use server::{game::MatchRules, network::Server};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assets = Arc::new(RenderAssets::generate()?);
//!     let (engine, handle) = Engine::new(CommandEngine::new(MatchRules::default(), assets)?);
//!     tokio::spawn(engine.run());
//!
//!     let server = Server::bind("127.0.0.1:8889", handle, ".").await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod commands;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod game;
pub mod http;
pub mod match_state;
pub mod network;
pub mod protocol;
pub mod scheduler;

pub use commands::{Command, CommandEngine};
pub use engine::{Engine, EngineHandle};
pub use error::GameError;
pub use game::{GameState, MatchRules};
pub use protocol::CommandResponse;
