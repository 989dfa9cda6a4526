//! GameState - Everything the production pipeline reads, plus resources

use crate::critical::CriticalTimer;
use crate::frenzy::FrenzyEngine;
use crate::tower::TowerNumber;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Accrued resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    /// Spendable atoms
    pub atoms: TowerNumber,
    /// Every atom ever earned; purchases do not reduce it
    pub lifetime_atoms: TowerNumber,
    pub manual_actions: u64,
    pub critical_hits: u64,
}

impl Resources {
    /// Credit earned atoms
    pub fn earn(&mut self, amount: TowerNumber) {
        if !amount.is_positive() {
            return;
        }
        self.atoms += amount;
        self.lifetime_atoms += amount;
    }

    /// Spend atoms if enough are held
    /// Returns false and leaves the balance untouched otherwise
    pub fn spend(&mut self, cost: TowerNumber) -> bool {
        if self.atoms < cost {
            return false;
        }
        self.atoms = (self.atoms - cost).max(TowerNumber::ZERO);
        true
    }
}

/// All inputs to the production pipeline
#[derive(Debug, Clone, Default)]
pub struct GameState {
    /// Owned level per upgrade id
    pub upgrades: BTreeMap<String, u32>,
    /// Owned copies per collectible id
    pub collectibles: BTreeMap<String, u32>,
    pub crafted: BTreeSet<String>,
    pub achievements: BTreeSet<String>,
    /// Debug override added to the per-time rate
    pub debug_flat_per_time: f64,
    pub critical_timer: CriticalTimer,
    pub frenzy: FrenzyEngine,
    pub resources: Resources,
}

/// Inbound state changes. Each one triggers a recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    UpgradePurchased { id: String, level: u32 },
    CollectibleCountChanged { id: String, count: u32 },
    AchievementUnlocked { id: String },
    CraftedUnlocked { id: String },
    DebugFlatSet { value: f64 },
    CriticalTimerGranted {
        duration_secs: f64,
        multiplier_add: f64,
    },
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.upgrades.get(id).copied().unwrap_or(0)
    }

    pub fn collectible_count(&self, id: &str) -> u32 {
        self.collectibles.get(id).copied().unwrap_or(0)
    }

    /// Apply an inbound event to the aggregator inputs
    pub fn apply_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::UpgradePurchased { id, level } => {
                if *level == 0 {
                    self.upgrades.remove(id);
                } else {
                    self.upgrades.insert(id.clone(), *level);
                }
            }
            GameEvent::CollectibleCountChanged { id, count } => {
                if *count == 0 {
                    self.collectibles.remove(id);
                } else {
                    self.collectibles.insert(id.clone(), *count);
                }
            }
            GameEvent::AchievementUnlocked { id } => {
                self.achievements.insert(id.clone());
            }
            GameEvent::CraftedUnlocked { id } => {
                self.crafted.insert(id.clone());
            }
            GameEvent::DebugFlatSet { value } => {
                self.debug_flat_per_time = if value.is_finite() { *value } else { 0.0 };
            }
            GameEvent::CriticalTimerGranted {
                duration_secs,
                multiplier_add,
            } => {
                self.critical_timer.grant(*duration_secs, *multiplier_add);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_events() {
        let mut state = GameState::new();
        state.apply_event(&GameEvent::UpgradePurchased {
            id: "proton_press".to_string(),
            level: 3,
        });
        state.apply_event(&GameEvent::CollectibleCountChanged {
            id: "helium".to_string(),
            count: 2,
        });
        state.apply_event(&GameEvent::AchievementUnlocked {
            id: "first_split".to_string(),
        });
        state.apply_event(&GameEvent::DebugFlatSet { value: f64::NAN });

        assert_eq!(state.upgrade_level("proton_press"), 3);
        assert_eq!(state.collectible_count("helium"), 2);
        assert_eq!(state.collectible_count("neon"), 0);
        assert!(state.achievements.contains("first_split"));
        assert_eq!(state.debug_flat_per_time, 0.0);

        state.apply_event(&GameEvent::CollectibleCountChanged {
            id: "helium".to_string(),
            count: 0,
        });
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event: GameEvent =
            serde_json::from_str(r#"{"type":"upgrade_purchased","id":"glove","level":2}"#).unwrap();
        assert_eq!(
            event,
            GameEvent::UpgradePurchased {
                id: "glove".to_string(),
                level: 2
            }
        );
    }

    #[test]
    fn test_spend_and_earn() {
        let mut resources = Resources::default();
        resources.earn(TowerNumber::from_f64(100.0));
        assert!(!resources.spend(TowerNumber::from_f64(150.0)));
        assert!(resources.spend(TowerNumber::from_f64(40.0)));
        assert_eq!(resources.atoms.to_f64(), 60.0);
        assert_eq!(resources.lifetime_atoms.to_f64(), 100.0);
    }
}
