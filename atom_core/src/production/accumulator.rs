//! ProductionAccumulator - Collects bonuses from every source before the
//! totals are resolved

use super::entry::{ProductionEntry, SourceTag};
use crate::config::ProductionConfig;
use crate::critical::CriticalState;
use crate::tower::TowerNumber;
use crate::types::{RateKind, SourceCategory};
use serde::{Deserialize, Serialize};

/// Frenzy stack caps for both kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrenzyCaps {
    pub per_action: u32,
    pub per_time: u32,
}

impl FrenzyCaps {
    pub fn get(&self, kind: RateKind) -> u32 {
        match kind {
            RateKind::PerAction => self.per_action,
            RateKind::PerTime => self.per_time,
        }
    }

    pub fn add(&mut self, kind: RateKind, amount: u32) {
        match kind {
            RateKind::PerAction => self.per_action = self.per_action.saturating_add(amount),
            RateKind::PerTime => self.per_time = self.per_time.saturating_add(amount),
        }
    }
}

/// Side outputs computed in the same pass as the totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedEffects {
    /// Seconds between ticket spawns
    pub ticket_interval_secs: f64,
    /// Fraction of the per-time rate credited while away
    pub offline_multiplier: f64,
    /// Multiplier on the base frenzy spawn chance
    pub frenzy_spawn_multiplier: f64,
    pub frenzy_max_stacks: FrenzyCaps,
    pub critical: CriticalState,
}

impl Default for DerivedEffects {
    fn default() -> Self {
        DerivedEffects {
            ticket_interval_secs: 0.0,
            offline_multiplier: 1.0,
            frenzy_spawn_multiplier: 1.0,
            frenzy_max_stacks: FrenzyCaps::default(),
            critical: CriticalState::default(),
        }
    }
}

/// Accumulates production modifications from various sources
///
/// Sources push additions and multipliers in the order they are applied;
/// that order is the composition order of the resulting entries.
#[derive(Debug, Clone)]
pub struct ProductionAccumulator {
    pub per_action: ProductionEntry,
    pub per_time: ProductionEntry,

    // === Critical ===
    pub critical_chance: f64,
    pub critical_multiplier: f64,
    pub critical_max_multiplier: f64,

    // === Frenzy ===
    pub frenzy_max_stacks: FrenzyCaps,
    /// Additive bonus on the spawn chance multiplier
    pub frenzy_spawn_bonus: f64,
    /// Factor from completing the special rarity group
    pub frenzy_special_multiplier: f64,

    // === Special group side outputs ===
    pub ticket_interval_secs: f64,
    pub offline_multiplier: f64,
}

impl ProductionAccumulator {
    /// Start from the configured bases
    pub fn new(config: &ProductionConfig) -> Self {
        ProductionAccumulator {
            per_action: ProductionEntry::with_base(
                RateKind::PerAction,
                TowerNumber::from_f64(config.base.per_action),
            ),
            per_time: ProductionEntry::with_base(
                RateKind::PerTime,
                TowerNumber::from_f64(config.base.per_time),
            ),
            critical_chance: config.critical.base_chance,
            critical_multiplier: config.critical.base_multiplier,
            critical_max_multiplier: config.critical.base_max_multiplier,
            frenzy_max_stacks: FrenzyCaps {
                per_action: config.frenzy.per_action.base_max_stacks,
                per_time: config.frenzy.per_time.base_max_stacks,
            },
            frenzy_spawn_bonus: 0.0,
            frenzy_special_multiplier: 1.0,
            ticket_interval_secs: config.ticket.base_interval_secs,
            offline_multiplier: config.offline.base_multiplier,
        }
    }

    pub fn entry_mut(&mut self, kind: RateKind) -> &mut ProductionEntry {
        match kind {
            RateKind::PerAction => &mut self.per_action,
            RateKind::PerTime => &mut self.per_time,
        }
    }

    /// Record a flat addition on one rate
    pub fn add_flat(
        &mut self,
        kind: RateKind,
        id: &str,
        label: &str,
        category: SourceCategory,
        value: TowerNumber,
    ) {
        self.entry_mut(kind)
            .add_addition(SourceTag::new(id, label, category, value));
    }

    /// Record a multiplier on one rate
    pub fn add_multiplier(
        &mut self,
        kind: RateKind,
        id: &str,
        label: &str,
        category: SourceCategory,
        value: TowerNumber,
    ) {
        self.entry_mut(kind)
            .add_multiplier(SourceTag::new(id, label, category, value));
    }

    /// Resolve both entries and the derived effects
    pub fn finish(mut self, config: &ProductionConfig) -> (ProductionEntry, ProductionEntry, DerivedEffects) {
        self.per_action.resolve(&config.normalization);
        self.per_time.resolve(&config.normalization);

        let critical = CriticalState::new(
            self.critical_chance.clamp(0.0, 1.0),
            self.critical_multiplier.max(1.0),
            self.critical_max_multiplier.max(1.0),
        );
        let derived = DerivedEffects {
            ticket_interval_secs: self.ticket_interval_secs,
            offline_multiplier: self.offline_multiplier,
            frenzy_spawn_multiplier: (1.0 + self.frenzy_spawn_bonus).max(0.0)
                * self.frenzy_special_multiplier,
            frenzy_max_stacks: self.frenzy_max_stacks,
            critical,
        };
        (self.per_action, self.per_time, derived)
    }
}
