//! Stage progression, scoring, and winner determination.

use log::{info, warn};
use serde::Serialize;
use shared::Color;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// A stage is being played.
    InProgress,
    /// The stage has a winner and the next stage load is scheduled.
    StagePending,
    /// Terminal until a full reset. May end without a winner on a tie.
    MatchOver,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scores {
    #[serde(rename = "player_black")]
    pub black: u32,
    #[serde(rename = "player_white")]
    pub white: u32,
}

impl Scores {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn increment(&mut self, color: Color) -> u32 {
        let score = match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        *score += 1;
        *score
    }
}

/// What a stage win led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageWinOutcome {
    /// A winner was already recorded for this stage; nothing changed.
    AlreadyDecided,
    /// The next stage should be loaded after the grace delay.
    AdvancePending,
    MatchOver { winner: Option<Color> },
}

#[derive(Debug)]
pub struct MatchState {
    stage_index: usize,
    total_stages: usize,
    scores: Scores,
    stage_winner: Option<Color>,
    match_winner: Option<Color>,
    phase: MatchPhase,
    started_at: Option<Instant>,
}

impl MatchState {
    pub fn new(total_stages: usize) -> Self {
        Self {
            stage_index: 0,
            total_stages,
            scores: Scores::default(),
            stage_winner: None,
            match_winner: None,
            phase: MatchPhase::InProgress,
            started_at: None,
        }
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn total_stages(&self) -> usize {
        self.total_stages
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn stage_winner(&self) -> Option<Color> {
        self.stage_winner
    }

    pub fn match_winner(&self) -> Option<Color> {
        self.match_winner
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// True once gameplay for the current stage can no longer change.
    pub fn is_decided(&self) -> bool {
        self.stage_winner.is_some() || self.match_winner.is_some()
    }

    /// Stage wins needed to take the match outright.
    pub fn win_threshold(&self) -> u32 {
        (self.total_stages / 2 + 1) as u32
    }

    pub fn record_stage_win(&mut self, color: Color) -> StageWinOutcome {
        if self.stage_winner.is_some() {
            return StageWinOutcome::AlreadyDecided;
        }

        self.stage_winner = Some(color);
        let score = self.scores.increment(color);
        warn!(
            "STAGE {} WON by {}! Score: {:?}",
            self.stage_index + 1,
            color.player_id(),
            self.scores
        );

        if score >= self.win_threshold() || self.stage_index + 1 >= self.total_stages {
            StageWinOutcome::MatchOver {
                winner: self.finish_match(),
            }
        } else {
            self.phase = MatchPhase::StagePending;
            StageWinOutcome::AdvancePending
        }
    }

    /// Index of the stage that follows the current one, if any.
    pub fn next_stage(&self) -> Option<usize> {
        let next = self.stage_index + 1;
        (next < self.total_stages).then_some(next)
    }

    /// Marks `index` as the active stage and clears its winner.
    pub fn begin_stage(&mut self, index: usize) {
        self.stage_index = index;
        self.stage_winner = None;
        self.phase = MatchPhase::InProgress;
    }

    /// Settles the match on current scores. A tie leaves no winner.
    pub fn finish_match(&mut self) -> Option<Color> {
        self.match_winner = match self.scores.black.cmp(&self.scores.white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        };
        self.phase = MatchPhase::MatchOver;
        warn!(
            "MATCH OVER! Final Winner: {}",
            self.match_winner.map(|c| c.player_id()).unwrap_or("none (draw)")
        );
        self.match_winner
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.total_stages);
        info!("Match state reset");
    }

    /// Starts the clock if it is not already running.
    pub fn start_clock(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn clock_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        self.started_at
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0)
    }
}
