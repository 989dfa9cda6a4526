//! Production constants configuration

use super::{load_toml, parse_toml, ConfigError};
use crate::types::{RateKind, RateValues};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable production constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionConfig {
    #[serde(default)]
    pub base: BaseRates,
    #[serde(default)]
    pub critical: CriticalConstants,
    #[serde(default)]
    pub frenzy: FrenzyConstants,
    #[serde(default)]
    pub special: SpecialGroupConstants,
    #[serde(default)]
    pub ticket: TicketConstants,
    #[serde(default)]
    pub offline: OfflineConstants,
    #[serde(default)]
    pub collection: CollectionConstants,
    #[serde(default)]
    pub normalization: NormalizationConstants,
    #[serde(default)]
    pub replay: ReplayConstants,
}

impl ProductionConfig {
    /// Parse constants from a TOML string and validate them
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProductionConfig = parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a constants file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: ProductionConfig = load_toml(path)?;
        config.validate()?;
        tracing::debug!("Loaded production constants from {}", path.display());
        Ok(config)
    }

    /// Built-in constants
    pub fn builtin() -> Self {
        let toml = include_str!("../../config/production.toml");
        Self::from_toml_str(toml).unwrap_or_else(|err| {
            tracing::warn!("built-in production constants failed to load: {}", err);
            ProductionConfig::default()
        })
    }

    /// Reject values that would make the pipeline meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base.per_action < 0.0 || self.base.per_time < 0.0 {
            return Err(ConfigError::ValidationError(
                "base rates must not be negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.critical.base_chance) {
            return Err(ConfigError::ValidationError(
                "critical.base_chance must be within 0..=1".to_string(),
            ));
        }
        for kind in RateKind::all() {
            let frenzy = self.frenzy.get(*kind);
            if frenzy.base_multiplier < 1.0 {
                return Err(ConfigError::ValidationError(format!(
                    "frenzy {} base_multiplier must be at least 1",
                    kind.label()
                )));
            }
            if frenzy.effect_duration_secs <= 0.0 || frenzy.token_lifetime_secs <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "frenzy {} durations must be positive",
                    kind.label()
                )));
            }
        }
        if self.ticket.min_interval_secs > self.ticket.base_interval_secs {
            return Err(ConfigError::ValidationError(
                "ticket.min_interval_secs exceeds base_interval_secs".to_string(),
            ));
        }
        if self.offline.max_elapsed_secs <= 0.0 {
            return Err(ConfigError::ValidationError(
                "offline.max_elapsed_secs must be positive".to_string(),
            ));
        }
        if self.replay.online_step_secs <= 0.0 {
            return Err(ConfigError::ValidationError(
                "replay.online_step_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseRates {
    /// Atoms per manual action before any bonus
    #[serde(default = "default_base_per_action")]
    pub per_action: f64,
    /// Atoms per second before any bonus
    #[serde(default)]
    pub per_time: f64,
}

impl Default for BaseRates {
    fn default() -> Self {
        BaseRates {
            per_action: 1.0,
            per_time: 0.0,
        }
    }
}

impl BaseRates {
    pub fn get(&self, kind: RateKind) -> f64 {
        match kind {
            RateKind::PerAction => self.per_action,
            RateKind::PerTime => self.per_time,
        }
    }
}

fn default_base_per_action() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalConstants {
    /// Chance (0..=1) of a critical manual action before bonuses
    #[serde(default)]
    pub base_chance: f64,
    /// Critical multiplier before bonuses
    #[serde(default = "default_crit_multiplier")]
    pub base_multiplier: f64,
    /// Ceiling on the critical multiplier before bonuses
    #[serde(default = "default_crit_max_multiplier")]
    pub base_max_multiplier: f64,
}

impl Default for CriticalConstants {
    fn default() -> Self {
        CriticalConstants {
            base_chance: 0.0,
            base_multiplier: 2.0,
            base_max_multiplier: 10.0,
        }
    }
}

fn default_crit_multiplier() -> f64 {
    2.0
}
fn default_crit_max_multiplier() -> f64 {
    10.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrenzyConstants {
    #[serde(default)]
    pub per_action: FrenzyKindConstants,
    #[serde(default)]
    pub per_time: FrenzyKindConstants,
}

impl FrenzyConstants {
    pub fn get(&self, kind: RateKind) -> &FrenzyKindConstants {
        match kind {
            RateKind::PerAction => &self.per_action,
            RateKind::PerTime => &self.per_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrenzyKindConstants {
    /// Probability of a token spawning per elapsed second
    #[serde(default = "default_spawn_chance")]
    pub spawn_chance: f64,
    /// How long an unclaimed token stays visible
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: f64,
    /// How long one claimed stack lasts
    #[serde(default = "default_effect_duration")]
    pub effect_duration_secs: f64,
    /// Multiplier per stack; stacks compound (`base ^ stacks`)
    #[serde(default = "default_frenzy_multiplier")]
    pub base_multiplier: f64,
    /// Stack cap before bonuses
    #[serde(default = "default_max_stacks")]
    pub base_max_stacks: u32,
}

impl Default for FrenzyKindConstants {
    fn default() -> Self {
        FrenzyKindConstants {
            spawn_chance: 0.01,
            token_lifetime_secs: 10.0,
            effect_duration_secs: 30.0,
            base_multiplier: 2.0,
            base_max_stacks: 1,
        }
    }
}

fn default_spawn_chance() -> f64 {
    0.01
}
fn default_token_lifetime() -> f64 {
    10.0
}
fn default_effect_duration() -> f64 {
    30.0
}
fn default_frenzy_multiplier() -> f64 {
    2.0
}
fn default_max_stacks() -> u32 {
    1
}

/// The rarity group whose tallies drive ticket, offline and frenzy side effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialGroupConstants {
    #[serde(default = "default_special_group")]
    pub group: String,
    /// Frenzy spawn-chance multiplier once the group is fully collected
    #[serde(default = "default_special_frenzy_multiplier")]
    pub frenzy_spawn_multiplier: f64,
}

impl Default for SpecialGroupConstants {
    fn default() -> Self {
        SpecialGroupConstants {
            group: default_special_group(),
            frenzy_spawn_multiplier: 1.5,
        }
    }
}

fn default_special_group() -> String {
    "mythic".to_string()
}
fn default_special_frenzy_multiplier() -> f64 {
    1.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketConstants {
    #[serde(default = "default_ticket_interval")]
    pub base_interval_secs: f64,
    #[serde(default = "default_ticket_min_interval")]
    pub min_interval_secs: f64,
    /// Interval reduction per unique item owned in the special group
    #[serde(default = "default_ticket_reduction")]
    pub reduction_per_unique_secs: f64,
}

impl Default for TicketConstants {
    fn default() -> Self {
        TicketConstants {
            base_interval_secs: 600.0,
            min_interval_secs: 120.0,
            reduction_per_unique_secs: 30.0,
        }
    }
}

fn default_ticket_interval() -> f64 {
    600.0
}
fn default_ticket_min_interval() -> f64 {
    120.0
}
fn default_ticket_reduction() -> f64 {
    30.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConstants {
    /// Longest absence that is credited
    #[serde(default = "default_offline_cap")]
    pub max_elapsed_secs: f64,
    /// Offline multiplier with no special-group duplicates
    #[serde(default = "default_offline_base")]
    pub base_multiplier: f64,
    /// Offline multiplier gained per special-group duplicate
    #[serde(default = "default_offline_per_duplicate")]
    pub per_duplicate: f64,
    #[serde(default = "default_offline_max")]
    pub max_multiplier: f64,
    /// Duplicates past this count become flat bonuses instead
    #[serde(default = "default_offline_saturation")]
    pub saturation_duplicates: u32,
    /// Flat bonus per duplicate past saturation
    #[serde(default = "default_overflow_flat")]
    pub overflow_flat: RateValues,
}

impl Default for OfflineConstants {
    fn default() -> Self {
        OfflineConstants {
            max_elapsed_secs: default_offline_cap(),
            base_multiplier: 0.5,
            per_duplicate: 0.05,
            max_multiplier: 1.0,
            saturation_duplicates: 10,
            overflow_flat: default_overflow_flat(),
        }
    }
}

fn default_offline_cap() -> f64 {
    8.0 * 3600.0
}
fn default_offline_base() -> f64 {
    0.5
}
fn default_offline_per_duplicate() -> f64 {
    0.05
}
fn default_offline_max() -> f64 {
    1.0
}
fn default_offline_saturation() -> u32 {
    10
}
fn default_overflow_flat() -> RateValues {
    RateValues::new(1.0, 5.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConstants {
    /// Rarity group whose completion amplifies every group multiplier
    #[serde(default = "default_amplifier_group")]
    pub amplifier_group: String,
    /// Factor applied to the bonus part of each group multiplier
    #[serde(default = "default_amplifier_factor")]
    pub amplifier_factor: f64,
}

impl Default for CollectionConstants {
    fn default() -> Self {
        CollectionConstants {
            amplifier_group: default_amplifier_group(),
            amplifier_factor: 2.0,
        }
    }
}

fn default_amplifier_group() -> String {
    "mythic".to_string()
}
fn default_amplifier_factor() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConstants {
    /// Totals below `10^round_below_exponent` are rounded to whole atoms
    #[serde(default = "default_round_below_exponent")]
    pub round_below_exponent: f64,
}

impl Default for NormalizationConstants {
    fn default() -> Self {
        NormalizationConstants {
            round_below_exponent: 14.0,
        }
    }
}

fn default_round_below_exponent() -> f64 {
    14.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConstants {
    /// Longest simulated step in online replay
    #[serde(default = "default_online_step")]
    pub online_step_secs: f64,
}

impl Default for ReplayConstants {
    fn default() -> Self {
        ReplayConstants {
            online_step_secs: 60.0,
        }
    }
}

fn default_online_step() -> f64 {
    60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = ProductionConfig::default();
        assert!((config.base.per_action - 1.0).abs() < f64::EPSILON);
        assert!((config.offline.max_elapsed_secs - 28800.0).abs() < f64::EPSILON);
        assert_eq!(config.frenzy.per_time.base_max_stacks, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builtin_constants_load() {
        let config = ProductionConfig::builtin();
        assert!(config.validate().is_ok());
        assert_eq!(config.special.group, "mythic");
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[base]
per_time = 10.0

[frenzy.per_time]
base_multiplier = 3.0
base_max_stacks = 4

[offline]
max_elapsed_secs = 3600
"#;

        let config = ProductionConfig::from_toml_str(toml).unwrap();
        assert!((config.base.per_action - 1.0).abs() < f64::EPSILON);
        assert!((config.base.per_time - 10.0).abs() < f64::EPSILON);
        assert!((config.frenzy.per_time.base_multiplier - 3.0).abs() < f64::EPSILON);
        assert!((config.frenzy.per_time.effect_duration_secs - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.frenzy.per_time.base_max_stacks, 4);
        assert!((config.offline.max_elapsed_secs - 3600.0).abs() < f64::EPSILON);
        assert!((config.offline.base_multiplier - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation_rejects_bad_chance() {
        let toml = r#"
[critical]
base_chance = 1.5
"#;
        let result = ProductionConfig::from_toml_str(toml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rejects_ticket_floor() {
        let toml = r#"
[ticket]
base_interval_secs = 60
min_interval_secs = 120
"#;
        let result = ProductionConfig::from_toml_str(toml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
