//! Bonus catalog: every upgrade, collectible, crafted item and achievement

use super::{load_toml, parse_toml, ConfigError};
use crate::tower::TowerNumber;
use crate::types::{RateKind, RateValues};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// All bonus source definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub upgrades: Vec<UpgradeDef>,
    #[serde(default)]
    pub rarity_groups: Vec<RarityGroupDef>,
    #[serde(default)]
    pub families: Vec<FamilyDef>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleDef>,
    #[serde(default)]
    pub crafted: Vec<CraftedDef>,
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

/// A purchasable, levelled upgrade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    /// Cost of the first level
    pub base_cost: f64,
    /// Cost multiplier per owned level
    #[serde(default = "default_cost_growth")]
    pub cost_growth: f64,
    #[serde(default)]
    pub max_level: Option<u32>,
    pub effect: UpgradeEffect,
}

fn default_cost_growth() -> f64 {
    1.15
}

impl UpgradeDef {
    /// Cost of buying the level after `owned`
    pub fn cost_at(&self, owned: u32) -> TowerNumber {
        TowerNumber::from_f64(self.cost_growth)
            .pow_f64(owned as f64)
            .mul_scalar(self.base_cost)
    }
}

/// What one upgrade level does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Flat atoms per level
    Flat {
        #[serde(default)]
        per_action: f64,
        #[serde(default)]
        per_time: f64,
    },
    /// `factor ^ level` on one rate
    Multiplier { rate: RateKind, factor: f64 },
    CriticalChance { per_level: f64 },
    CriticalMultiplier { per_level: f64 },
    CriticalMaxMultiplier { per_level: f64 },
    FrenzyMaxStacks { kind: RateKind, per_level: u32 },
    /// Additive bonus to the frenzy spawn chance multiplier
    FrenzySpawnChance { per_level: f64 },
}

/// A rarity group of collectibles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityGroupDef {
    pub id: String,
    pub name: String,
    /// Flat bonus per owned copy (duplicates included)
    #[serde(default)]
    pub per_copy: RateValues,
    /// Flat bonus per distinct item owned
    #[serde(default)]
    pub per_unique: RateValues,
    /// Flat bonus per copy beyond the first
    #[serde(default)]
    pub per_duplicate: RateValues,
    /// One-time flat bonus once every item in the group is owned
    #[serde(default)]
    pub completion_flat: RateValues,
    /// Group multiplier is `1 + multiplier_per_unique × unique`
    #[serde(default)]
    pub multiplier_per_unique: RateValues,
    /// Extra factor on the group multiplier once complete
    #[serde(default = "neutral_rates")]
    pub completion_multiplier: RateValues,
}

/// A thematic family cutting across rarity groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub per_unique: RateValues,
    #[serde(default)]
    pub completion_flat: RateValues,
    #[serde(default = "neutral_rates")]
    pub completion_multiplier: RateValues,
}

fn neutral_rates() -> RateValues {
    RateValues::splat(1.0)
}

/// One collectible item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleDef {
    pub id: String,
    pub name: String,
    /// Rarity group id
    pub rarity: String,
    #[serde(default)]
    pub family: Option<String>,
}

/// A crafted (fusion) item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftedDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub flat: RateValues,
    #[serde(default)]
    pub critical_chance: f64,
    #[serde(default)]
    pub critical_multiplier: f64,
}

/// A meta-achievement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    pub reward: AchievementReward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementReward {
    /// Its own multiplier entry
    Multiplier { rate: RateKind, factor: f64 },
    /// Summed with other bonuses and applied once as `1 + Σ bonus`
    MultiplierBonus { rate: RateKind, bonus: f64 },
    CriticalMaxMultiplier { amount: f64 },
    FrenzyMaxStacks { kind: RateKind, amount: u32 },
}

impl Catalog {
    /// Parse a catalog from a TOML string and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = parse_toml(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let catalog: Catalog = load_toml(path)?;
        catalog.validate()?;
        tracing::debug!("Loaded catalog from {}", path.display());
        Ok(catalog)
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn rarity_group(&self, id: &str) -> Option<&RarityGroupDef> {
        self.rarity_groups.iter().find(|g| g.id == id)
    }

    pub fn family(&self, id: &str) -> Option<&FamilyDef> {
        self.families.iter().find(|f| f.id == id)
    }

    pub fn collectible(&self, id: &str) -> Option<&CollectibleDef> {
        self.collectibles.iter().find(|c| c.id == id)
    }

    pub fn crafted_item(&self, id: &str) -> Option<&CraftedDef> {
        self.crafted.iter().find(|c| c.id == id)
    }

    pub fn achievement(&self, id: &str) -> Option<&AchievementDef> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Collectibles belonging to a rarity group
    pub fn collectibles_in_group<'a>(
        &'a self,
        group_id: &'a str,
    ) -> impl Iterator<Item = &'a CollectibleDef> + 'a {
        self.collectibles.iter().filter(move |c| c.rarity == group_id)
    }

    /// Collectibles belonging to a family
    pub fn collectibles_in_family<'a>(
        &'a self,
        family_id: &'a str,
    ) -> impl Iterator<Item = &'a CollectibleDef> + 'a {
        self.collectibles
            .iter()
            .filter(move |c| c.family.as_deref() == Some(family_id))
    }

    /// Structural checks. References to unknown rarity groups are not
    /// rejected here; the aggregator skips them at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unique("upgrade", self.upgrades.iter().map(|u| u.id.as_str()))?;
        check_unique("rarity group", self.rarity_groups.iter().map(|g| g.id.as_str()))?;
        check_unique("family", self.families.iter().map(|f| f.id.as_str()))?;
        check_unique("collectible", self.collectibles.iter().map(|c| c.id.as_str()))?;
        check_unique("crafted item", self.crafted.iter().map(|c| c.id.as_str()))?;
        check_unique("achievement", self.achievements.iter().map(|a| a.id.as_str()))?;

        for upgrade in &self.upgrades {
            if upgrade.base_cost <= 0.0 || upgrade.cost_growth < 1.0 {
                return Err(ConfigError::ValidationError(format!(
                    "upgrade '{}' needs a positive base_cost and cost_growth >= 1",
                    upgrade.id
                )));
            }
            match &upgrade.effect {
                UpgradeEffect::Flat {
                    per_action,
                    per_time,
                } if *per_action < 0.0 || *per_time < 0.0 => {
                    return Err(ConfigError::ValidationError(format!(
                        "upgrade '{}' has a negative flat bonus",
                        upgrade.id
                    )));
                }
                UpgradeEffect::Multiplier { factor, .. } if *factor < 1.0 => {
                    return Err(ConfigError::ValidationError(format!(
                        "upgrade '{}' has a multiplier factor below 1",
                        upgrade.id
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate {} id '{}'",
                kind, id
            )));
        }
    }
    Ok(())
}

/// Get the built-in catalog
pub fn default_catalog() -> Catalog {
    let toml = include_str!("../../config/catalog.toml");
    Catalog::from_toml_str(toml).unwrap_or_else(|err| {
        tracing::warn!("built-in catalog failed to load: {}", err);
        Catalog::default()
    })
}
