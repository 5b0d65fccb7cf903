//! Result shapes returned by the command engine.
//!
//! Every result serializes to a JSON object carrying `"status": "OK"` or
//! `"status": "ERROR"`; success payloads are flattened next to the tag.

use crate::assets::RenderAssets;
use crate::entity::{EntitySnapshot, RequiredGems};
use crate::error::GameError;
use crate::match_state::Scores;
use log::error;
use serde::Serialize;
use shared::Color;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum CommandResponse {
    #[serde(rename = "OK")]
    Ok(Payload),
    #[serde(rename = "ERROR")]
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Registered(Registration),
    State(Box<GameSnapshot>),
    Ack {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub player_id: String,
    pub color_type: Color,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameInfo {
    pub current_stage: usize,
    pub total_stages: usize,
    pub scores: Scores,
    pub elapsed_time: f64,
    pub stage_winner: Option<String>,
    pub match_winner: Option<String>,
    pub required_gems: RequiredGems,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    #[serde(flatten)]
    pub entities: EntitySnapshot,
    pub images: Arc<RenderAssets>,
    pub game_info: GameInfo,
}

impl Payload {
    /// Bare acknowledgement: serializes to `{"status":"OK"}`.
    pub fn ack() -> Self {
        Payload::Ack { message: None }
    }

    pub fn ack_with(message: impl Into<String>) -> Self {
        Payload::Ack {
            message: Some(message.into()),
        }
    }
}

impl CommandResponse {
    pub fn error(err: &GameError) -> Self {
        CommandResponse::Error {
            message: Some(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResponse::Ok(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CommandResponse::Ok(Payload::Ack { message }) | CommandResponse::Error { message } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// JSON body for the wire. Falls back to a bare error object if encoding fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            error!("Failed to encode response: {}", e);
            r#"{"status":"ERROR","message":"Encoding failure"}"#.to_string()
        })
    }
}

impl From<Result<Payload, GameError>> for CommandResponse {
    fn from(result: Result<Payload, GameError>) -> Self {
        match result {
            Ok(payload) => CommandResponse::Ok(payload),
            Err(e) => CommandResponse::error(&e),
        }
    }
}
