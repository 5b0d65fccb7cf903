//! Static stage catalog.
//!
//! Every stage is a `'static` definition, so lookups hand out shared
//! references and need no synchronization.

use crate::{fallback_start, Color, Point, Rect};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardDef {
    pub color: Color,
    pub area: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemDef {
    pub color: Color,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDefinition {
    pub black_start: Option<Point>,
    pub white_start: Option<Point>,
    pub walls: &'static [Rect],
    pub hazards: &'static [HazardDef],
    pub gems: &'static [GemDef],
    pub exit: Rect,
}

impl LevelDefinition {
    /// Start position configured for `color`, if the level names one.
    pub fn configured_start(&self, color: Color) -> Option<Point> {
        match color {
            Color::Black => self.black_start,
            Color::White => self.white_start,
        }
    }

    pub fn start_position(&self, color: Color) -> Point {
        self.configured_start(color)
            .unwrap_or_else(|| fallback_start(color))
    }

    pub fn required_gems(&self, color: Color) -> u32 {
        self.gems.iter().filter(|g| g.color == color).count() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("stage index {index} out of range (catalog has {count} stages)")]
    OutOfRange { index: usize, count: usize },
}

const fn wall(x: i32, y: i32, width: i32, height: i32) -> Rect {
    Rect::new(x, y, width, height)
}

const fn hazard(color: Color, x: i32, y: i32, width: i32, height: i32) -> HazardDef {
    HazardDef {
        color,
        area: Rect::new(x, y, width, height),
    }
}

const fn gem(color: Color, x: i32, y: i32) -> GemDef {
    GemDef {
        color,
        position: Point::new(x, y),
    }
}

use crate::Color::{Black, White};

static LEVELS: [LevelDefinition; 3] = [
    LevelDefinition {
        black_start: Some(Point::new(50, 532)),
        white_start: Some(Point::new(702, 532)),
        walls: &[
            wall(0, 580, 800, 20),
            wall(200, 480, 400, 20),
            wall(300, 380, 200, 20),
            wall(150, 280, 100, 20),
            wall(550, 280, 100, 20),
            wall(350, 180, 100, 20),
        ],
        hazards: &[],
        gems: &[
            gem(Black, 250, 450),
            gem(White, 500, 450),
            gem(Black, 320, 350),
            gem(White, 460, 350),
        ],
        exit: Rect::new(360, 100, 80, 80),
    },
    LevelDefinition {
        black_start: Some(Point::new(40, 532)),
        white_start: Some(Point::new(712, 532)),
        walls: &[
            wall(100, 180, 600, 20),
            wall(340, 260, 20, 380),
            wall(440, 260, 20, 380),
            wall(20, 260, 70, 20),
            wall(170, 260, 185, 20),
            wall(710, 260, 70, 20),
            wall(455, 260, 185, 20),
            wall(20, 340, 180, 20),
            wall(600, 340, 180, 20),
            wall(160, 420, 200, 20),
            wall(460, 420, 180, 20),
            wall(20, 500, 220, 20),
            wall(560, 500, 220, 20),
        ],
        hazards: &[
            hazard(White, 360, 470, 20, 20),
            hazard(Black, 420, 470, 20, 20),
        ],
        gems: &[
            gem(White, 50, 90),
            gem(Black, 730, 90),
            gem(Black, 50, 300),
            gem(White, 730, 300),
            gem(White, 300, 330),
            gem(Black, 480, 330),
            gem(White, 300, 550),
            gem(Black, 480, 550),
        ],
        exit: Rect::new(360, 500, 80, 80),
    },
    LevelDefinition {
        black_start: Some(Point::new(40, 532)),
        white_start: Some(Point::new(712, 532)),
        walls: &[
            wall(160, 510, 80, 20),
            wall(560, 510, 80, 20),
            wall(20, 440, 80, 20),
            wall(310, 440, 80, 20),
            wall(410, 440, 80, 20),
            wall(700, 440, 80, 20),
            wall(110, 360, 180, 20),
            wall(500, 360, 180, 20),
            wall(20, 280, 80, 20),
            wall(310, 280, 80, 20),
            wall(410, 280, 80, 20),
            wall(700, 280, 80, 20),
            wall(150, 210, 70, 20),
            wall(220, 170, 70, 20),
            wall(300, 130, 70, 20),
            wall(430, 130, 70, 20),
            wall(500, 170, 70, 20),
            wall(570, 210, 70, 20),
            wall(390, 280, 20, 300),
        ],
        hazards: &[
            hazard(Black, 160, 380, 70, 20),
            hazard(White, 550, 380, 70, 20),
            hazard(Black, 280, 220, 20, 20),
            hazard(White, 490, 220, 20, 20),
            hazard(Black, 370, 120, 20, 20),
            hazard(White, 410, 120, 20, 20),
        ],
        gems: &[
            gem(Black, 50, 410),
            gem(Black, 320, 410),
            gem(White, 350, 550),
            gem(White, 440, 410),
            gem(White, 720, 410),
            gem(Black, 430, 550),
        ],
        exit: Rect::new(360, 200, 80, 80),
    },
];

/// Read-only, ordered set of stages. Indices are 0-based.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelCatalog;

impl LevelCatalog {
    pub fn stage_count(&self) -> usize {
        LEVELS.len()
    }

    pub fn stage(&self, index: usize) -> Result<&'static LevelDefinition, LevelError> {
        LEVELS.get(index).ok_or(LevelError::OutOfRange {
            index,
            count: LEVELS.len(),
        })
    }
}
