//! Critical hits on manual actions and the decaying critical-timer multiplier

mod resolution;
mod timer;

pub use resolution::{resolve_critical, resolve_critical_with_rng, CriticalRoll, CriticalState};
pub use timer::{CoverageSegment, CriticalTimer, TimedBoost};
