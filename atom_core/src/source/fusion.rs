//! FusionSource - Bonuses from crafted items

use crate::config::CraftedDef;
use crate::production::ProductionAccumulator;
use crate::source::ProductionSource;
use crate::tower::TowerNumber;
use crate::types::{RateKind, SourceCategory};

/// One unlocked crafted item
pub struct FusionSource<'a> {
    pub def: &'a CraftedDef,
}

impl<'a> FusionSource<'a> {
    pub fn new(def: &'a CraftedDef) -> Self {
        FusionSource { def }
    }
}

impl ProductionSource for FusionSource<'_> {
    fn id(&self) -> &str {
        &self.def.id
    }

    fn priority(&self) -> i32 {
        200
    }

    fn apply(&self, production: &mut ProductionAccumulator) {
        for &kind in RateKind::all() {
            production.add_flat(
                kind,
                &self.def.id,
                &self.def.name,
                SourceCategory::Fusion,
                TowerNumber::from_f64(self.def.flat.get(kind)),
            );
        }
        production.critical_chance += self.def.critical_chance;
        production.critical_multiplier += self.def.critical_multiplier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProductionConfig;
    use crate::types::RateValues;

    #[test]
    fn test_crafted_item_bonuses() {
        let config = ProductionConfig::default();
        let def = CraftedDef {
            id: "steel".to_string(),
            name: "Steel".to_string(),
            flat: RateValues::new(10.0, 20.0),
            critical_chance: 0.02,
            critical_multiplier: 0.5,
        };
        let mut acc = ProductionAccumulator::new(&config);
        FusionSource::new(&def).apply(&mut acc);

        assert_eq!(acc.per_action.additions[0].value.to_f64(), 10.0);
        assert_eq!(acc.per_time.additions[0].value.to_f64(), 20.0);
        assert!((acc.critical_chance - 0.02).abs() < 1e-12);
        assert!((acc.critical_multiplier - 2.5).abs() < 1e-12);
    }
}
