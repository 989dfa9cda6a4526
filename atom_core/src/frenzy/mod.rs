//! Frenzy: claimable tokens that grant compounding, time-limited stacks

mod engine;
mod types;

pub use engine::FrenzyEngine;
pub use types::{ClaimOutcome, FrenzyPhase, FrenzyRun, FrenzyTickReport};
