//! UpgradeSource - Bonuses from purchased upgrade levels

use crate::config::{UpgradeDef, UpgradeEffect};
use crate::production::ProductionAccumulator;
use crate::source::ProductionSource;
use crate::tower::TowerNumber;
use crate::types::{RateKind, SourceCategory};

/// One owned upgrade at its current level
pub struct UpgradeSource<'a> {
    pub def: &'a UpgradeDef,
    pub level: u32,
}

impl<'a> UpgradeSource<'a> {
    /// Levels past `max_level` are clamped
    pub fn new(def: &'a UpgradeDef, level: u32) -> Self {
        let level = match def.max_level {
            Some(max) if level > max => {
                tracing::warn!(upgrade = %def.id, level, max, "upgrade level above max_level, clamping");
                max
            }
            _ => level,
        };
        UpgradeSource { def, level }
    }
}

impl ProductionSource for UpgradeSource<'_> {
    fn id(&self) -> &str {
        &self.def.id
    }

    fn priority(&self) -> i32 {
        0 // Upgrades apply first
    }

    fn apply(&self, production: &mut ProductionAccumulator) {
        let level = self.level as f64;
        let id = self.def.id.as_str();
        let label = self.def.name.as_str();

        match &self.def.effect {
            UpgradeEffect::Flat {
                per_action,
                per_time,
            } => {
                production.add_flat(
                    RateKind::PerAction,
                    id,
                    label,
                    SourceCategory::Shop,
                    TowerNumber::from_f64(per_action * level),
                );
                production.add_flat(
                    RateKind::PerTime,
                    id,
                    label,
                    SourceCategory::Shop,
                    TowerNumber::from_f64(per_time * level),
                );
            }
            UpgradeEffect::Multiplier { rate, factor } => {
                let multiplier = TowerNumber::from_f64(*factor).pow_f64(level);
                production.add_multiplier(*rate, id, label, SourceCategory::Shop, multiplier);
            }
            UpgradeEffect::CriticalChance { per_level } => {
                production.critical_chance += per_level * level;
            }
            UpgradeEffect::CriticalMultiplier { per_level } => {
                production.critical_multiplier += per_level * level;
            }
            UpgradeEffect::CriticalMaxMultiplier { per_level } => {
                production.critical_max_multiplier += per_level * level;
            }
            UpgradeEffect::FrenzyMaxStacks { kind, per_level } => {
                production
                    .frenzy_max_stacks
                    .add(*kind, per_level.saturating_mul(self.level));
            }
            UpgradeEffect::FrenzySpawnChance { per_level } => {
                production.frenzy_spawn_bonus += per_level * level;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProductionConfig;

    fn upgrade(effect: UpgradeEffect, max_level: Option<u32>) -> UpgradeDef {
        UpgradeDef {
            id: "test".to_string(),
            name: "Test".to_string(),
            base_cost: 10.0,
            cost_growth: 1.15,
            max_level,
            effect,
        }
    }

    #[test]
    fn test_flat_scales_with_level() {
        let config = ProductionConfig::default();
        let def = upgrade(
            UpgradeEffect::Flat {
                per_action: 0.0,
                per_time: 2.5,
            },
            None,
        );
        let mut acc = ProductionAccumulator::new(&config);
        UpgradeSource::new(&def, 4).apply(&mut acc);
        assert_eq!(acc.per_time.additions.len(), 1);
        assert_eq!(acc.per_time.additions[0].value.to_f64(), 10.0);
        // Zero additions are still recorded
        assert!(acc.per_action.additions[0].value.is_zero());
    }

    #[test]
    fn test_multiplier_compounds() {
        let config = ProductionConfig::default();
        let def = upgrade(
            UpgradeEffect::Multiplier {
                rate: RateKind::PerAction,
                factor: 2.0,
            },
            None,
        );
        let mut acc = ProductionAccumulator::new(&config);
        UpgradeSource::new(&def, 10).apply(&mut acc);
        assert_eq!(acc.per_action.multipliers[0].value.to_f64(), 1024.0);
        assert!(acc.per_time.multipliers.is_empty());
    }

    #[test]
    fn test_level_clamped() {
        let def = upgrade(UpgradeEffect::CriticalChance { per_level: 0.01 }, Some(5));
        let source = UpgradeSource::new(&def, 50);
        assert_eq!(source.level, 5);
    }
}
