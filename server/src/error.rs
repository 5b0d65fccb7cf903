use shared::LevelError;
use thiserror::Error;

/// Failures reported back to the caller inside an `ERROR` result.
///
/// None of these are fatal to the process; the `Display` text becomes the
/// result's `message` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid color.")]
    InvalidColor,

    #[error("Color is taken.")]
    ColorTaken,

    #[error("{kind} not found.")]
    NotFound { kind: EntityKind, id: String },

    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    #[error("Unknown command")]
    UnknownCommand,

    #[error("Stage has already been won.")]
    AlreadyDecided,

    #[error("Gem color does not match player.")]
    ColorMismatch,

    #[error("Collision could not be processed.")]
    CollisionIgnored,

    #[error(transparent)]
    Level(#[from] LevelError),
}

impl GameError {
    pub fn player_not_found(id: &str) -> Self {
        GameError::NotFound {
            kind: EntityKind::Player,
            id: id.to_string(),
        }
    }

    pub fn gem_not_found(id: &str) -> Self {
        GameError::NotFound {
            kind: EntityKind::Gem,
            id: id.to_string(),
        }
    }

    pub fn hazard_not_found(id: &str) -> Self {
        GameError::NotFound {
            kind: EntityKind::Hazard,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Gem,
    Hazard,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Player => write!(f, "Player"),
            EntityKind::Gem => write!(f, "Gem"),
            EntityKind::Hazard => write!(f, "Hazard"),
        }
    }
}
