//! Save data: the persisted subset of the game state, as JSON

use crate::critical::{CriticalTimer, TimedBoost};
use crate::state::{GameState, Resources};
use crate::tower::TowerNumber;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Save document loading error
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to read or write save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse save data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything that survives a restart. Production entries and frenzy stacks
/// are rebuilt, not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub version: u32,
    /// Clock time of the save, in seconds
    pub saved_at: f64,
    pub atoms: TowerNumber,
    pub lifetime_atoms: TowerNumber,
    pub manual_actions: u64,
    pub critical_hits: u64,
    pub upgrades: BTreeMap<String, u32>,
    pub collectibles: BTreeMap<String, u32>,
    pub crafted: BTreeSet<String>,
    pub achievements: BTreeSet<String>,
    pub debug_flat_per_time: f64,
    pub critical_timer: Vec<TimedBoost>,
}

impl Default for SaveData {
    fn default() -> Self {
        SaveData {
            version: SAVE_VERSION,
            saved_at: 0.0,
            atoms: TowerNumber::ZERO,
            lifetime_atoms: TowerNumber::ZERO,
            manual_actions: 0,
            critical_hits: 0,
            upgrades: BTreeMap::new(),
            collectibles: BTreeMap::new(),
            crafted: BTreeSet::new(),
            achievements: BTreeSet::new(),
            debug_flat_per_time: 0.0,
            critical_timer: Vec::new(),
        }
    }
}

impl SaveData {
    /// Capture the persisted part of `state`
    pub fn capture(state: &GameState, saved_at: f64) -> Self {
        SaveData {
            version: SAVE_VERSION,
            saved_at,
            atoms: state.resources.atoms,
            lifetime_atoms: state.resources.lifetime_atoms,
            manual_actions: state.resources.manual_actions,
            critical_hits: state.resources.critical_hits,
            upgrades: state.upgrades.clone(),
            collectibles: state.collectibles.clone(),
            crafted: state.crafted.clone(),
            achievements: state.achievements.clone(),
            debug_flat_per_time: state.debug_flat_per_time,
            critical_timer: state.critical_timer.boosts().to_vec(),
        }
    }

    /// Rebuild a game state. Frenzy starts idle.
    pub fn restore(&self) -> GameState {
        GameState {
            upgrades: self.upgrades.clone(),
            collectibles: self.collectibles.clone(),
            crafted: self.crafted.clone(),
            achievements: self.achievements.clone(),
            debug_flat_per_time: if self.debug_flat_per_time.is_finite() {
                self.debug_flat_per_time
            } else {
                0.0
            },
            critical_timer: CriticalTimer::from_boosts(self.critical_timer.clone()),
            frenzy: Default::default(),
            resources: Resources {
                atoms: self.atoms.max(TowerNumber::ZERO),
                lifetime_atoms: self.lifetime_atoms.max(TowerNumber::ZERO),
                manual_actions: self.manual_actions,
                critical_hits: self.critical_hits,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a save document. Missing fields take their defaults; a document
    /// that is not JSON is an error.
    pub fn from_json(content: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write to `path` through a temporary file and an atomic rename
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, self.to_json()?)?;
        fs::rename(&temp_path, path)?;
        tracing::debug!("Saved game to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let content = fs::read_to_string(path)?;
        let data = Self::from_json(&content)?;
        tracing::debug!("Loaded game from {}", path.display());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_restore() {
        let mut state = GameState::new();
        state.upgrades.insert("proton_press".to_string(), 4);
        state.collectibles.insert("helium".to_string(), 2);
        state.crafted.insert("bronze".to_string());
        state.critical_timer.grant(30.0, 1.0);
        state.resources.earn(TowerNumber::from_scientific(2.5, 1200.0));
        state.resources.manual_actions = 17;

        let data = SaveData::capture(&state, 1000.0);
        let json = data.to_json().unwrap();
        let parsed = SaveData::from_json(&json).unwrap();
        assert_eq!(parsed, data);

        let restored = parsed.restore();
        assert_eq!(restored.upgrades, state.upgrades);
        assert_eq!(restored.resources, state.resources);
        assert_eq!(restored.critical_timer, state.critical_timer);
    }

    #[test]
    fn test_missing_fields_default() {
        let data = SaveData::from_json(r#"{"manual_actions": 5}"#).unwrap();
        assert_eq!(data.manual_actions, 5);
        assert_eq!(data.version, SAVE_VERSION);
        assert!(data.atoms.is_zero());
    }

    #[test]
    fn test_not_json() {
        let result = SaveData::from_json("definitely not json");
        assert!(matches!(result, Err(SaveError::Parse(_))));
    }

    #[test]
    fn test_spent_boosts_dropped_on_restore() {
        let data = SaveData {
            critical_timer: vec![TimedBoost::new(0.0, 1.0), TimedBoost::new(20.0, 0.5)],
            ..Default::default()
        };
        let state = data.restore();
        assert_eq!(state.critical_timer.boosts().len(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("atom_core_save_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("save.json");

        let data = SaveData {
            saved_at: 12.5,
            atoms: TowerNumber::from_f64(99.0),
            ..Default::default()
        };
        data.save(&path).unwrap();
        assert_eq!(SaveData::load(&path).unwrap(), data);

        fs::remove_dir_all(&dir).unwrap();
    }
}
