use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod levels;

pub use levels::{GemDef, HazardDef, LevelCatalog, LevelDefinition, LevelError};

pub const WORLD_WIDTH: i32 = 800;
pub const WORLD_HEIGHT: i32 = 600;
pub const WALL_THICKNESS: i32 = 20;
pub const PLAYER_SIZE: i32 = 48;
pub const DEFAULT_LIVES: i32 = 3;

/// One of the two avatars. Each color may be registered at most once per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }

    pub fn opposite(&self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Wire identity of the player holding this color, e.g. `player_black`.
    pub fn player_id(&self) -> &'static str {
        match self {
            Color::Black => "player_black",
            Color::White => "player_white",
        }
    }

    pub fn from_player_id(id: &str) -> Option<Color> {
        Color::ALL.into_iter().find(|c| c.player_id() == id)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized color '{0}'")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::Black),
            "white" => Ok(Color::White),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, top-left anchored, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The four walls enclosing every stage: floor, left, right, ceiling.
pub fn boundary_walls() -> [Rect; 4] {
    [
        Rect::new(0, WORLD_HEIGHT - WALL_THICKNESS, WORLD_WIDTH, WALL_THICKNESS),
        Rect::new(0, 0, WALL_THICKNESS, WORLD_HEIGHT),
        Rect::new(WORLD_WIDTH - WALL_THICKNESS, 0, WALL_THICKNESS, WORLD_HEIGHT),
        Rect::new(0, 0, WORLD_WIDTH, WALL_THICKNESS),
    ]
}

/// Start position used when a level omits one for a color.
pub fn fallback_start(color: Color) -> Point {
    let x = match color {
        Color::Black => 50,
        Color::White => WORLD_WIDTH - 50 - PLAYER_SIZE,
    };
    Point::new(x, WORLD_HEIGHT - WALL_THICKNESS - PLAYER_SIZE)
}
