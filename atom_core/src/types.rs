//! Core types shared across the production pipeline

use serde::{Deserialize, Serialize};

/// One of the two output rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// Atoms granted by each manual action
    PerAction,
    /// Atoms granted per second of passive accrual
    PerTime,
}

impl RateKind {
    /// Get both rates, per-action first
    pub fn all() -> &'static [RateKind] {
        &[RateKind::PerAction, RateKind::PerTime]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateKind::PerAction => "per action",
            RateKind::PerTime => "per second",
        }
    }
}

/// A pair of plain values, one per rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateValues {
    pub per_action: f64,
    pub per_time: f64,
}

impl RateValues {
    pub fn new(per_action: f64, per_time: f64) -> Self {
        RateValues {
            per_action,
            per_time,
        }
    }

    /// Same value for both rates
    pub fn splat(value: f64) -> Self {
        RateValues::new(value, value)
    }

    pub fn get(&self, kind: RateKind) -> f64 {
        match kind {
            RateKind::PerAction => self.per_action,
            RateKind::PerTime => self.per_time,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        RateValues::new(self.per_action * factor, self.per_time * factor)
    }

    pub fn is_zero(&self) -> bool {
        self.per_action == 0.0 && self.per_time == 0.0
    }
}

/// Where a production bonus comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    /// Configured base rate
    Base,
    /// Purchasable upgrades
    Shop,
    /// Rarity-group collection bonuses
    Collection,
    /// Thematic family collection bonuses
    Family,
    /// Crafted (fusion) items
    Fusion,
    /// Meta-achievements
    Trophy,
    /// Frenzy stacks
    Frenzy,
    /// Critical-timer transient multiplier
    Critical,
    /// Debug overrides
    Debug,
}

impl SourceCategory {
    /// Categories that contribute multipliers, in breakdown order
    pub fn multiplier_categories() -> &'static [SourceCategory] {
        &[
            SourceCategory::Shop,
            SourceCategory::Collection,
            SourceCategory::Family,
            SourceCategory::Trophy,
            SourceCategory::Frenzy,
            SourceCategory::Critical,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceCategory::Base => "Base",
            SourceCategory::Shop => "Shop",
            SourceCategory::Collection => "Collection",
            SourceCategory::Family => "Family",
            SourceCategory::Fusion => "Fusion",
            SourceCategory::Trophy => "Trophy",
            SourceCategory::Frenzy => "Frenzy",
            SourceCategory::Critical => "Critical",
            SourceCategory::Debug => "Debug",
        }
    }
}
