//! Live entities of the active stage.
//!
//! The store is rebuilt from a [`LevelDefinition`] on every stage load.
//! Players survive stage loads and are reset in place; everything else is
//! recreated with fresh identities.

use crate::error::GameError;
use log::info;
use serde::Serialize;
use shared::{boundary_walls, Color, LevelDefinition, Point, Rect};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    #[serde(rename = "color_type")]
    pub color: Color,
    pub x: i32,
    pub y: i32,
    pub lives: i32,
    #[serde(rename = "gems_collected")]
    pub collected: u32,
    pub at_exit: bool,
    pub is_dead: bool,
}

impl Player {
    pub fn new(color: Color, start: Point, lives: i32) -> Self {
        Self {
            color,
            x: start.x,
            y: start.y,
            lives,
            collected: 0,
            at_exit: false,
            is_dead: false,
        }
    }

    pub fn id(&self) -> &'static str {
        self.color.player_id()
    }

    /// Puts the player back at `start` with full lives and stage counters cleared.
    fn reset_for_stage(&mut self, start: Point, lives: i32) {
        self.x = start.x;
        self.y = start.y;
        self.lives = lives;
        self.collected = 0;
        self.at_exit = false;
        self.is_dead = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collectible {
    pub id: String,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hazard {
    pub id: String,
    #[serde(rename = "type")]
    pub color: Color,
    #[serde(flatten)]
    pub area: Rect,
}

impl Hazard {
    /// Hazards only hurt the opposite color.
    pub fn is_lethal_to(&self, color: Color) -> bool {
        self.color != color
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wall {
    pub id: String,
    #[serde(flatten)]
    pub area: Rect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequiredGems {
    pub black: u32,
    pub white: u32,
}

impl RequiredGems {
    pub fn for_color(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

/// Immutable copy of every entity, used for outbound serialization.
#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    pub players: BTreeMap<&'static str, Player>,
    pub gems: Vec<Collectible>,
    pub hazards: Vec<Hazard>,
    pub walls: Vec<Wall>,
    pub exit_area: Rect,
}

#[derive(Debug)]
pub struct EntityStore {
    players: BTreeMap<Color, Player>,
    collectibles: Vec<Collectible>,
    hazards: Vec<Hazard>,
    walls: Vec<Wall>,
    exit_area: Rect,
    required: RequiredGems,
    level: &'static LevelDefinition,
    default_lives: i32,
    next_gem_id: u32,
    next_hazard_id: u32,
    next_wall_id: u32,
}

impl EntityStore {
    pub fn new(level: &'static LevelDefinition, default_lives: i32) -> Self {
        let mut store = Self {
            players: BTreeMap::new(),
            collectibles: Vec::new(),
            hazards: Vec::new(),
            walls: Vec::new(),
            exit_area: level.exit,
            required: RequiredGems::default(),
            level,
            default_lives,
            next_gem_id: 0,
            next_hazard_id: 0,
            next_wall_id: 0,
        };
        store.load_stage(level);
        store
    }

    /// Replaces stage geometry and resets every registered player.
    pub fn load_stage(&mut self, level: &'static LevelDefinition) {
        self.level = level;
        self.collectibles.clear();
        self.hazards.clear();
        self.walls.clear();
        self.next_gem_id = 0;
        self.next_hazard_id = 0;
        self.next_wall_id = 0;
        self.required = RequiredGems::default();

        for area in boundary_walls().into_iter().chain(level.walls.iter().copied()) {
            self.place_wall(area);
        }
        for def in level.hazards {
            self.place_hazard(def.color, def.area);
        }
        for def in level.gems {
            self.place_gem(def.color, def.position);
        }
        self.exit_area = level.exit;

        let lives = self.default_lives;
        for player in self.players.values_mut() {
            player.reset_for_stage(level.start_position(player.color), lives);
        }
    }

    fn place_wall(&mut self, area: Rect) {
        let id = format!("wall_{}", self.next_wall_id);
        self.next_wall_id += 1;
        self.walls.push(Wall { id, area });
    }

    fn place_hazard(&mut self, color: Color, area: Rect) {
        let id = format!("{}_pool_{}", color, self.next_hazard_id);
        self.next_hazard_id += 1;
        self.hazards.push(Hazard { id, color, area });
    }

    fn place_gem(&mut self, color: Color, position: Point) {
        let id = format!("{}_gem_{}", color, self.next_gem_id);
        self.next_gem_id += 1;
        match color {
            Color::Black => self.required.black += 1,
            Color::White => self.required.white += 1,
        }
        self.collectibles.push(Collectible {
            id,
            x: position.x,
            y: position.y,
            color,
        });
    }

    pub fn register_player(&mut self, color: Color) -> Result<&Player, GameError> {
        if self.players.contains_key(&color) {
            return Err(GameError::ColorTaken);
        }
        let player = Player::new(color, self.level.start_position(color), self.default_lives);
        info!("Player {} registered at ({}, {})", player.id(), player.x, player.y);
        Ok(self.players.entry(color).or_insert(player))
    }

    pub fn player(&self, id: &str) -> Result<&Player, GameError> {
        Color::from_player_id(id)
            .and_then(|c| self.players.get(&c))
            .ok_or_else(|| GameError::player_not_found(id))
    }

    pub fn player_mut(&mut self, id: &str) -> Result<&mut Player, GameError> {
        Color::from_player_id(id)
            .and_then(|c| self.players.get_mut(&c))
            .ok_or_else(|| GameError::player_not_found(id))
    }

    pub fn player_by_color_mut(&mut self, color: Color) -> Option<&mut Player> {
        self.players.get_mut(&color)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn clear_players(&mut self) {
        self.players.clear();
    }

    pub fn collectible(&self, id: &str) -> Result<&Collectible, GameError> {
        self.collectibles
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| GameError::gem_not_found(id))
    }

    pub fn collectible_exists(&self, id: &str) -> bool {
        self.collectibles.iter().any(|c| c.id == id)
    }

    pub fn remove_collectible(&mut self, id: &str) -> Result<Collectible, GameError> {
        let index = self
            .collectibles
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| GameError::gem_not_found(id))?;
        Ok(self.collectibles.remove(index))
    }

    pub fn hazard(&self, id: &str) -> Result<&Hazard, GameError> {
        self.hazards
            .iter()
            .find(|h| h.id == id)
            .ok_or_else(|| GameError::hazard_not_found(id))
    }

    pub fn required_gems(&self) -> RequiredGems {
        self.required
    }

    pub fn level(&self) -> &'static LevelDefinition {
        self.level
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            players: self.players.values().map(|p| (p.id(), p.clone())).collect(),
            gems: self.collectibles.clone(),
            hazards: self.hazards.clone(),
            walls: self.walls.clone(),
            exit_area: self.exit_area,
        }
    }
}
