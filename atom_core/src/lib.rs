//! atom_core - Production core for an incremental atom simulator
//!
//! This library provides:
//! - TowerNumber: Signed numbers far beyond f64 range
//! - Production pipeline: Per-action and per-time rates rebuilt from every bonus source
//! - Critical hits and the decaying critical-timer multiplier
//! - Frenzy: Claimable, stacking time-limited multipliers
//! - Progress replay for online and offline time
//! - Game: Session facade that keeps production in sync with the state

pub mod config;
pub mod critical;
pub mod frenzy;
pub mod game;
pub mod persist;
pub mod prelude;
pub mod production;
pub mod replay;
pub mod source;
pub mod state;
pub mod tower;
pub mod types;

// Re-export core types for convenience
pub use config::{default_catalog, Catalog, ConfigError, ProductionConfig};
pub use critical::{resolve_critical, resolve_critical_with_rng, CriticalRoll, CriticalState, CriticalTimer};
pub use frenzy::{ClaimOutcome, FrenzyEngine, FrenzyPhase, FrenzyRun};
pub use game::{ClickOutcome, Game, PurchaseOutcome};
pub use persist::{SaveData, SaveError};
pub use production::{Aggregator, BreakdownLine, Production, ProductionEntry, SourceTag};
pub use replay::{replay_offline, replay_online, OfflineReport, OnlineReport};
pub use source::ProductionSource;
pub use state::{GameEvent, GameState, Resources};
pub use tower::TowerNumber;
pub use types::{RateKind, RateValues, SourceCategory};
