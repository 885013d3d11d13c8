use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// An enemy died with no respawns left.
    Victory,
    /// The player tank was destroyed.
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Active,
    Terminated(Outcome),
}

/// Score, the respawn budget shared by all enemies, and the one-way
/// termination flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    score: f32,
    respawn_budget: u32,
    status: MatchStatus,
}

impl MatchState {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            score: 0.0,
            respawn_budget: rules.respawn_budget,
            status: MatchStatus::Active,
        }
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn respawn_budget(&self) -> u32 {
        self.respawn_budget
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.status, MatchStatus::Terminated(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            MatchStatus::Active => None,
            MatchStatus::Terminated(outcome) => Some(outcome),
        }
    }

    /// Ends the match. Later calls keep the first outcome.
    pub fn terminate(&mut self, outcome: Outcome) {
        if self.is_terminated() {
            return;
        }
        log::info!("match over: {:?} with score {}", outcome, self.score);
        self.status = MatchStatus::Terminated(outcome);
    }

    /// Books an enemy kill against the budget. Returns false when the budget
    /// is exhausted, in which case nothing changes.
    pub fn consume_respawn(&mut self, kill_score: f32) -> bool {
        if self.respawn_budget == 0 {
            return false;
        }
        self.score += kill_score;
        self.respawn_budget -= 1;
        true
    }
}
