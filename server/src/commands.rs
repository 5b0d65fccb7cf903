//! Command decoding and dispatch.

use crate::assets::RenderAssets;
use crate::error::GameError;
use crate::game::{GameState, MatchRules};
use crate::protocol::{CommandResponse, GameSnapshot, Payload};
use crate::scheduler::{DeferredAction, ScheduledAction};
use log::{debug, error};
use std::sync::Arc;
use std::time::Instant;

/// A decoded request against the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RegisterPlayer {
        color: String,
    },
    SetPlayerState {
        player_id: String,
        x: i32,
        y: i32,
        lives: i32,
    },
    GetGameState,
    CollectGem {
        player_id: String,
        gem_id: String,
    },
    CheckHazardCollision {
        player_id: String,
        hazard_id: String,
    },
    PlayerAtExit {
        player_id: String,
    },
    ResetGame,
}

impl Command {
    /// Decodes a command name (case-insensitive) and its positional arguments.
    pub fn parse<S: AsRef<str>>(name: &str, args: &[S]) -> Result<Self, GameError> {
        let name = name.to_ascii_lowercase();
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();

        let command = match name.as_str() {
            "register_player" => {
                let [color] = expect_args::<1>(&name, &args)?;
                Command::RegisterPlayer {
                    color: color.to_string(),
                }
            }
            "set_player_state" => {
                let [player_id, x, y, lives] = expect_args::<4>(&name, &args)?;
                Command::SetPlayerState {
                    player_id: player_id.to_string(),
                    x: parse_int(x)?,
                    y: parse_int(y)?,
                    lives: parse_int(lives)?,
                }
            }
            "get_game_state" => {
                expect_args::<0>(&name, &args)?;
                Command::GetGameState
            }
            "collect_gem" => {
                let [player_id, gem_id] = expect_args::<2>(&name, &args)?;
                Command::CollectGem {
                    player_id: player_id.to_string(),
                    gem_id: gem_id.to_string(),
                }
            }
            "check_hazard_collision" => {
                let [player_id, hazard_id] = expect_args::<2>(&name, &args)?;
                Command::CheckHazardCollision {
                    player_id: player_id.to_string(),
                    hazard_id: hazard_id.to_string(),
                }
            }
            "player_at_exit" => {
                let [player_id] = expect_args::<1>(&name, &args)?;
                Command::PlayerAtExit {
                    player_id: player_id.to_string(),
                }
            }
            "reset_game" => {
                expect_args::<0>(&name, &args)?;
                Command::ResetGame
            }
            _ => return Err(GameError::UnknownCommand),
        };
        Ok(command)
    }
}

fn expect_args<'a, const N: usize>(
    name: &str,
    args: &[&'a str],
) -> Result<[&'a str; N], GameError> {
    <[&str; N]>::try_from(args).map_err(|_| {
        GameError::MalformedCommand(format!(
            "{} expects {} argument(s), got {}",
            name,
            N,
            args.len()
        ))
    })
}

fn parse_int(value: &str) -> Result<i32, GameError> {
    value
        .parse()
        .map_err(|_| GameError::MalformedCommand(format!("'{}' is not an integer", value)))
}

/// Single entry point for every state change.
///
/// Holding `&mut CommandEngine` is the exclusion boundary: a command body runs
/// to completion, including queuing its deferred follow-ups, before anything
/// else can observe the state.
#[derive(Debug)]
pub struct CommandEngine {
    state: GameState,
    assets: Arc<RenderAssets>,
}

impl CommandEngine {
    pub fn new(rules: MatchRules, assets: Arc<RenderAssets>) -> Result<Self, GameError> {
        Ok(Self {
            state: GameState::new(rules)?,
            assets,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn execute<S: AsRef<str>>(&mut self, name: &str, args: &[S]) -> CommandResponse {
        self.state.observe_clock(Instant::now());

        let result = Command::parse(name, args).and_then(|command| self.apply(command));
        if let Err(e) = &result {
            debug!("Command {} failed: {}", name, e);
        }
        result.into()
    }

    pub fn apply(&mut self, command: Command) -> Result<Payload, GameError> {
        match command {
            Command::RegisterPlayer { color } => {
                self.state.register_player(&color).map(Payload::Registered)
            }
            Command::SetPlayerState {
                player_id,
                x,
                y,
                lives,
            } => {
                self.state.set_player_state(&player_id, x, y, lives)?;
                Ok(Payload::ack())
            }
            Command::GetGameState => Ok(Payload::State(Box::new(self.snapshot()))),
            Command::CollectGem { player_id, gem_id } => {
                self.state.collect_gem(&player_id, &gem_id)?;
                Ok(Payload::ack())
            }
            Command::CheckHazardCollision {
                player_id,
                hazard_id,
            } => {
                self.state.check_hazard_collision(&player_id, &hazard_id)?;
                Ok(Payload::ack())
            }
            Command::PlayerAtExit { player_id } => {
                let outcome = self.state.player_at_exit(&player_id)?;
                Ok(Payload::ack_with(outcome.message()))
            }
            Command::ResetGame => {
                self.state.full_reset()?;
                Ok(Payload::ack())
            }
        }
    }

    /// Runs a deferred action under the same exclusion as a command.
    pub fn run_deferred(&mut self, action: DeferredAction) {
        if let Err(e) = self.state.run_deferred(action) {
            error!("Deferred action {:?} failed: {}", action, e);
        }
    }

    pub fn take_scheduled(&mut self) -> Vec<ScheduledAction> {
        self.state.take_scheduled()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            entities: self.state.entities(),
            images: Arc::clone(&self.assets),
            game_info: self.state.game_info(Instant::now()),
        }
    }
}
