//! Frenzy phases, run statistics and tick reports

use crate::types::RateKind;
use serde::{Deserialize, Serialize};

/// Where a frenzy kind currently sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrenzyPhase {
    /// No token and no stacks
    Idle,
    /// A token is waiting to be claimed
    Available,
    /// At least one stack is running
    Active,
}

/// Statistics for one Active period, emitted once when it ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrenzyRun {
    pub kind: RateKind,
    pub started_at: f64,
    /// Expiry time of the last stack
    pub ended_at: f64,
    /// Manual actions recorded while the run was active
    pub actions: u64,
    /// Tokens claimed during the run
    pub claims: u32,
    pub peak_stacks: u32,
}

impl FrenzyRun {
    pub fn duration_secs(&self) -> f64 {
        (self.ended_at - self.started_at).max(0.0)
    }
}

/// What changed during one engine tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrenzyTickReport {
    /// Kinds that spawned a token
    pub spawned: Vec<RateKind>,
    /// Kinds whose token disappeared unclaimed
    pub expired_tokens: Vec<RateKind>,
    /// Stacks that expired
    pub expired_stacks: u32,
    /// Runs that went from Active to Idle
    pub finished_runs: Vec<FrenzyRun>,
}

impl FrenzyTickReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any multiplier-relevant state changed
    pub fn changes_multipliers(&self) -> bool {
        self.expired_stacks > 0 || !self.finished_runs.is_empty()
    }

    pub fn merge(&mut self, other: FrenzyTickReport) {
        self.spawned.extend(other.spawned);
        self.expired_tokens.extend(other.expired_tokens);
        self.expired_stacks += other.expired_stacks;
        self.finished_runs.extend(other.finished_runs);
    }
}

/// Result of a claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// A new stack was added
    Stacked { stacks: u32 },
    /// The soonest-expiring stack was replaced
    Replaced { stacks: u32 },
    /// No live token to claim
    NoToken,
}

impl ClaimOutcome {
    pub fn is_claimed(&self) -> bool {
        !matches!(self, ClaimOutcome::NoToken)
    }
}
