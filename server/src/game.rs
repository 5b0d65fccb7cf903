use crate::entity::{EntitySnapshot, EntityStore};
use crate::error::GameError;
use crate::match_state::{MatchPhase, MatchState, StageWinOutcome};
use crate::protocol::{GameInfo, Registration};
use crate::scheduler::{DeferredAction, ScheduledAction};
use log::{info, warn};
use shared::{Color, LevelCatalog, DEFAULT_LIVES};
use std::time::{Duration, Instant};

/// Tunables for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    pub default_lives: i32,
    pub stage_advance_delay: Duration,
    pub respawn_delay: Duration,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            default_lives: DEFAULT_LIVES,
            stage_advance_delay: Duration::from_secs(3),
            respawn_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardOutcome {
    /// Life lost, respawn scheduled.
    Respawning,
    /// Out of lives; the opponent took the stage.
    Eliminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    StageWon,
    NotEnoughGems,
    AlreadyDecided,
}

impl ExitOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ExitOutcome::StageWon => "Player at exit processed.",
            ExitOutcome::NotEnoughGems => "Player at exit, but not enough gems collected.",
            ExitOutcome::AlreadyDecided => "Stage has already been won.",
        }
    }
}

/// Authoritative match: entities of the active stage plus progression.
///
/// Every mutation goes through `&mut self`, so whoever owns the value owns the
/// only write path. Delayed follow-ups are queued in `scheduled` and must be
/// drained by the owner after each call.
#[derive(Debug)]
pub struct GameState {
    rules: MatchRules,
    catalog: LevelCatalog,
    store: EntityStore,
    match_state: MatchState,
    scheduled: Vec<ScheduledAction>,
}

impl GameState {
    pub fn new(rules: MatchRules) -> Result<Self, GameError> {
        let catalog = LevelCatalog;
        let first = catalog.stage(0)?;
        info!("Server: Level 1 loaded.");
        Ok(Self {
            rules,
            catalog,
            store: EntityStore::new(first, rules.default_lives),
            match_state: MatchState::new(catalog.stage_count()),
            scheduled: Vec::new(),
        })
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    /// Starts the match clock the first time a player is present.
    pub fn observe_clock(&mut self, now: Instant) {
        if !self.match_state.clock_started() && self.store.player_count() >= 1 {
            self.match_state.start_clock(now);
        }
    }

    pub fn register_player(&mut self, color: &str) -> Result<Registration, GameError> {
        let color: Color = color.parse().map_err(|_| GameError::InvalidColor)?;
        let player = self.store.register_player(color)?;
        let registration = Registration {
            player_id: player.id().to_string(),
            color_type: player.color,
            x: player.x,
            y: player.y,
        };
        self.observe_clock(Instant::now());
        Ok(registration)
    }

    /// Overwrites client-reported telemetry.
    pub fn set_player_state(
        &mut self,
        player_id: &str,
        x: i32,
        y: i32,
        lives: i32,
    ) -> Result<(), GameError> {
        let player = self.store.player_mut(player_id)?;
        player.x = x;
        player.y = y;
        player.lives = lives;
        Ok(())
    }

    pub fn collect_gem(&mut self, player_id: &str, gem_id: &str) -> Result<(), GameError> {
        if self.match_state.is_decided() {
            return Err(GameError::AlreadyDecided);
        }
        let color = self.store.player(player_id)?.color;
        if self.store.collectible(gem_id)?.color != color {
            return Err(GameError::ColorMismatch);
        }

        self.store.remove_collectible(gem_id)?;
        self.store.player_mut(player_id)?.collected += 1;
        Ok(())
    }

    pub fn check_hazard_collision(
        &mut self,
        player_id: &str,
        hazard_id: &str,
    ) -> Result<HazardOutcome, GameError> {
        if self.match_state.is_decided() {
            return Err(GameError::AlreadyDecided);
        }
        // Unknown ids report the same way as an ignored hit.
        let color = self
            .store
            .player(player_id)
            .map_err(|_| GameError::CollisionIgnored)?
            .color;
        let lethal = self
            .store
            .hazard(hazard_id)
            .map_err(|_| GameError::CollisionIgnored)?
            .is_lethal_to(color);

        let player = self.store.player_mut(player_id)?;
        if !lethal || player.is_dead {
            return Err(GameError::CollisionIgnored);
        }

        player.is_dead = true;
        player.lives -= 1;
        let (color, lives) = (player.color, player.lives);
        info!("Player {} hit a hazard. Lives remaining: {}", player_id, lives);

        if lives <= 0 {
            self.handle_stage_win(color.opposite());
            Ok(HazardOutcome::Eliminated)
        } else {
            self.schedule(DeferredAction::Respawn(color), self.rules.respawn_delay);
            Ok(HazardOutcome::Respawning)
        }
    }

    pub fn player_at_exit(&mut self, player_id: &str) -> Result<ExitOutcome, GameError> {
        if self.match_state.is_decided() {
            return Ok(ExitOutcome::AlreadyDecided);
        }
        let required = self.store.required_gems();
        let player = self.store.player_mut(player_id)?;

        if player.collected >= required.for_color(player.color) {
            player.at_exit = true;
            let color = player.color;
            self.handle_stage_win(color);
            Ok(ExitOutcome::StageWon)
        } else {
            player.at_exit = false;
            Ok(ExitOutcome::NotEnoughGems)
        }
    }

    fn handle_stage_win(&mut self, color: Color) {
        if self.match_state.record_stage_win(color) == StageWinOutcome::AdvancePending {
            self.schedule(DeferredAction::AdvanceStage, self.rules.stage_advance_delay);
        }
    }

    fn schedule(&mut self, action: DeferredAction, delay: Duration) {
        self.scheduled.push(ScheduledAction::new(action, delay));
    }

    /// Hands over actions queued since the last call.
    pub fn take_scheduled(&mut self) -> Vec<ScheduledAction> {
        std::mem::take(&mut self.scheduled)
    }

    pub fn run_deferred(&mut self, action: DeferredAction) -> Result<(), GameError> {
        match action {
            DeferredAction::AdvanceStage => self.advance_stage(),
            DeferredAction::Respawn(color) => {
                self.respawn(color);
                Ok(())
            }
        }
    }

    pub fn advance_stage(&mut self) -> Result<(), GameError> {
        if self.match_state.phase() == MatchPhase::MatchOver {
            return Ok(());
        }
        match self.match_state.next_stage() {
            Some(next) => self.load_stage(next),
            None => {
                self.match_state.finish_match();
                Ok(())
            }
        }
    }

    /// Respawns regardless of what happened since the hit was scheduled.
    pub fn respawn(&mut self, color: Color) {
        let start = self.store.level().configured_start(color);
        if let Some(player) = self.store.player_by_color_mut(color) {
            if let Some(start) = start {
                player.x = start.x;
                player.y = start.y;
            }
            player.is_dead = false;
            info!(
                "Player {} respawned at {}, {}",
                player.id(),
                player.x,
                player.y
            );
        }
    }

    fn load_stage(&mut self, index: usize) -> Result<(), GameError> {
        let level = self.catalog.stage(index)?;
        self.store.load_stage(level);
        self.match_state.begin_stage(index);
        info!("Server: Level {} loaded.", index + 1);
        Ok(())
    }

    /// Drops all players and scores and reloads the first stage.
    pub fn full_reset(&mut self) -> Result<(), GameError> {
        self.store.clear_players();
        self.match_state.reset();
        self.load_stage(0)?;
        warn!("SERVER: Full game has been reset to initial state.");
        Ok(())
    }

    pub fn entities(&self) -> EntitySnapshot {
        self.store.snapshot()
    }

    pub fn game_info(&self, now: Instant) -> GameInfo {
        let m = &self.match_state;
        GameInfo {
            current_stage: m.stage_index() + 1,
            total_stages: m.total_stages(),
            scores: m.scores(),
            elapsed_time: m.elapsed_secs(now),
            stage_winner: m.stage_winner().map(|c| c.player_id().to_string()),
            match_winner: m.match_winner().map(|c| c.player_id().to_string()),
            required_gems: self.store.required_gems(),
        }
    }
}
