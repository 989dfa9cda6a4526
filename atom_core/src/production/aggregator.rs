//! Aggregator - Rebuilds both production entries from the game state

use super::{Production, ProductionAccumulator};
use crate::config::{Catalog, ProductionConfig};
use crate::source::{
    CollectionSource, CriticalTimerSource, DebugSource, FrenzySource, FusionSource, ProductionSource,
    TrophySource, UpgradeSource,
};
use crate::state::GameState;

/// Pure recompute over a catalog and constants
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a ProductionConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ProductionConfig) -> Self {
        Aggregator { catalog, config }
    }

    /// Build every source that applies to `state`
    fn sources<'s>(&self, state: &'s GameState, now: f64) -> Vec<Box<dyn ProductionSource + 's>>
    where
        'a: 's,
    {
        let mut sources: Vec<Box<dyn ProductionSource + 's>> = Vec::new();

        for def in &self.catalog.upgrades {
            let level = state.upgrade_level(&def.id);
            if level > 0 {
                sources.push(Box::new(UpgradeSource::new(def, level)));
            }
        }
        for id in state.upgrades.keys() {
            if self.catalog.upgrade(id).is_none() {
                tracing::debug!(upgrade = %id, "skipping unknown upgrade");
            }
        }

        sources.push(Box::new(CollectionSource::new(
            self.catalog,
            self.config,
            &state.collectibles,
        )));

        for def in &self.catalog.crafted {
            if state.crafted.contains(&def.id) {
                sources.push(Box::new(FusionSource::new(def)));
            }
        }
        for id in &state.crafted {
            if self.catalog.crafted_item(id).is_none() {
                tracing::debug!(crafted = %id, "skipping unknown crafted item");
            }
        }

        sources.push(Box::new(DebugSource::new(state.debug_flat_per_time)));

        let unlocked = self
            .catalog
            .achievements
            .iter()
            .filter(|a| state.achievements.contains(&a.id))
            .collect();
        for id in &state.achievements {
            if self.catalog.achievement(id).is_none() {
                tracing::debug!(achievement = %id, "skipping unknown achievement");
            }
        }
        sources.push(Box::new(TrophySource::new(unlocked)));

        sources.push(Box::new(FrenzySource::new(&state.frenzy, &self.config.frenzy, now)));
        sources.push(Box::new(CriticalTimerSource::new(&state.critical_timer)));

        sources
    }

    /// Rebuild both entries and the derived effects from scratch
    pub fn recompute(&self, state: &GameState, now: f64) -> Production {
        let mut sources = self.sources(state, now);
        sources.sort_by_key(|s| s.priority());

        let mut accumulator = ProductionAccumulator::new(self.config);
        for source in &sources {
            source.apply(&mut accumulator);
        }

        let (per_action, per_time, derived) = accumulator.finish(self.config);
        tracing::debug!(
            per_action = %per_action.total,
            per_time = %per_time.total,
            sources = sources.len(),
            "production recomputed"
        );
        Production {
            per_action,
            per_time,
            derived,
        }
    }
}

/// Recompute without keeping an aggregator around
pub fn recompute(
    catalog: &Catalog,
    config: &ProductionConfig,
    state: &GameState,
    now: f64,
) -> Production {
    Aggregator::new(catalog, config).recompute(state, now)
}
