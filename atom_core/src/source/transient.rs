//! Time-limited multipliers: frenzy stacks and the critical timer

use crate::config::FrenzyConstants;
use crate::critical::CriticalTimer;
use crate::frenzy::FrenzyEngine;
use crate::production::ProductionAccumulator;
use crate::source::ProductionSource;
use crate::tower::TowerNumber;
use crate::types::{RateKind, SourceCategory};

/// Frenzy stacks live at `now`
pub struct FrenzySource<'a> {
    pub engine: &'a FrenzyEngine,
    pub constants: &'a FrenzyConstants,
    pub now: f64,
}

impl<'a> FrenzySource<'a> {
    pub fn new(engine: &'a FrenzyEngine, constants: &'a FrenzyConstants, now: f64) -> Self {
        FrenzySource {
            engine,
            constants,
            now,
        }
    }
}

impl ProductionSource for FrenzySource<'_> {
    fn id(&self) -> &str {
        "frenzy"
    }

    fn priority(&self) -> i32 {
        400
    }

    fn apply(&self, production: &mut ProductionAccumulator) {
        for &kind in RateKind::all() {
            let base = self.constants.get(kind).base_multiplier;
            let multiplier = self.engine.multiplier_at(kind, self.now, base);
            production.add_multiplier(
                kind,
                "frenzy",
                "Frenzy",
                SourceCategory::Frenzy,
                multiplier,
            );
        }
    }
}

/// Critical-timer multiplier on the per-time rate
pub struct CriticalTimerSource<'a> {
    pub timer: &'a CriticalTimer,
}

impl<'a> CriticalTimerSource<'a> {
    pub fn new(timer: &'a CriticalTimer) -> Self {
        CriticalTimerSource { timer }
    }
}

impl ProductionSource for CriticalTimerSource<'_> {
    fn id(&self) -> &str {
        "critical_timer"
    }

    fn priority(&self) -> i32 {
        500 // Applied last
    }

    fn apply(&self, production: &mut ProductionAccumulator) {
        production.add_multiplier(
            RateKind::PerTime,
            "critical_timer",
            "Critical timer",
            SourceCategory::Critical,
            TowerNumber::from_f64(self.timer.multiplier()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProductionConfig;

    #[test]
    fn test_frenzy_multiplier_per_kind() {
        let config = ProductionConfig::default();
        let mut engine = FrenzyEngine::new();
        engine.spawn_token(RateKind::PerAction, 0.0, 10.0);
        engine.claim(RateKind::PerAction, 0.0, 30.0, 5);

        let mut acc = ProductionAccumulator::new(&config);
        FrenzySource::new(&engine, &config.frenzy, 1.0).apply(&mut acc);
        assert_eq!(acc.per_action.multipliers[0].value.to_f64(), 2.0);
        assert!(acc.per_time.multipliers[0].value.is_effectively_one());

        // Stack gone after its duration
        let mut acc = ProductionAccumulator::new(&config);
        FrenzySource::new(&engine, &config.frenzy, 31.0).apply(&mut acc);
        assert!(acc.per_action.multipliers[0].value.is_effectively_one());
    }

    #[test]
    fn test_critical_timer_only_per_time() {
        let config = ProductionConfig::default();
        let mut timer = CriticalTimer::new();
        timer.grant(60.0, 1.5);

        let mut acc = ProductionAccumulator::new(&config);
        CriticalTimerSource::new(&timer).apply(&mut acc);
        assert!(acc.per_action.multipliers.is_empty());
        assert_eq!(acc.per_time.multipliers[0].value.to_f64(), 2.5);
    }
}
