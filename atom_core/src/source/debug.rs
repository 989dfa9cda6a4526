//! DebugSource - Debug override on the per-time rate

use crate::production::ProductionAccumulator;
use crate::source::ProductionSource;
use crate::tower::TowerNumber;
use crate::types::{RateKind, SourceCategory};

pub struct DebugSource {
    pub flat_per_time: f64,
}

impl DebugSource {
    pub fn new(flat_per_time: f64) -> Self {
        DebugSource { flat_per_time }
    }
}

impl ProductionSource for DebugSource {
    fn id(&self) -> &str {
        "debug"
    }

    fn priority(&self) -> i32 {
        250 // After crafted items, before any multiplier source
    }

    fn apply(&self, production: &mut ProductionAccumulator) {
        production.add_flat(
            RateKind::PerTime,
            "debug",
            "Debug",
            SourceCategory::Debug,
            TowerNumber::from_f64(self.flat_per_time),
        );
    }
}
