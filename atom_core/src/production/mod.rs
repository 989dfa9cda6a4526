//! Production pipeline: entries, accumulation and the aggregator

mod accumulator;
mod aggregator;
mod entry;

pub use accumulator::{DerivedEffects, FrenzyCaps, ProductionAccumulator};
pub use aggregator::{recompute, Aggregator};
pub use entry::{normalize_total, BreakdownKind, BreakdownLine, ProductionEntry, SourceTag};

use crate::config::ProductionConfig;
use crate::types::RateKind;
use serde::{Deserialize, Serialize};

/// Output of one recompute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production {
    pub per_action: ProductionEntry,
    pub per_time: ProductionEntry,
    pub derived: DerivedEffects,
}

impl Production {
    pub fn entry(&self, kind: RateKind) -> &ProductionEntry {
        match kind {
            RateKind::PerAction => &self.per_action,
            RateKind::PerTime => &self.per_time,
        }
    }

    /// Visible breakdown lines of both rates, per-action first
    pub fn breakdown(&self) -> Vec<BreakdownLine> {
        let mut lines = self.per_action.breakdown();
        lines.extend(self.per_time.breakdown());
        lines
    }
}

impl Default for Production {
    /// Bases from the default constants with no bonuses applied
    fn default() -> Self {
        let config = ProductionConfig::default();
        let (per_action, per_time, _) = ProductionAccumulator::new(&config).finish(&config);
        Production {
            per_action,
            per_time,
            derived: DerivedEffects::default(),
        }
    }
}
