use crate::game::MatchRules;
use clap::Parser;
use shared::DEFAULT_LIVES;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line configuration for the game server.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8889")]
    pub port: u16,

    /// Lives each player starts a stage with
    #[arg(short, long, default_value_t = DEFAULT_LIVES)]
    pub lives: i32,

    /// Grace period between a stage win and the next stage, in milliseconds
    #[arg(long, default_value = "3000")]
    pub stage_delay_ms: u64,

    /// Delay before a player who hit a hazard respawns, in milliseconds
    #[arg(long, default_value = "1000")]
    pub respawn_delay_ms: u64,

    /// Directory served for non-game GET paths
    #[arg(long, default_value = ".")]
    pub static_root: PathBuf,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rules(&self) -> MatchRules {
        MatchRules {
            default_lives: self.lives,
            stage_advance_delay: Duration::from_millis(self.stage_delay_ms),
            respawn_delay: Duration::from_millis(self.respawn_delay_ms),
        }
    }
}
