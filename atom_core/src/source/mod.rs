//! ProductionSource - Trait and implementations for production bonus providers

mod collection;
mod debug;
mod fusion;
mod shop;
mod transient;
mod trophy;

pub use collection::{CollectionSource, GroupTally};
pub use debug::DebugSource;
pub use fusion::FusionSource;
pub use shop::UpgradeSource;
pub use transient::{CriticalTimerSource, FrenzySource};
pub use trophy::TrophySource;

use crate::production::ProductionAccumulator;

/// Trait for anything that contributes to production
pub trait ProductionSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Sources with equal priority keep their insertion order.
    /// Priorities in use:
    /// - Upgrades: 0
    /// - Collection: 100
    /// - Crafted items: 200
    /// - Debug override: 250
    /// - Achievements: 300
    /// - Frenzy: 400
    /// - Critical timer: 500
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's bonuses to the accumulator
    fn apply(&self, production: &mut ProductionAccumulator);
}
