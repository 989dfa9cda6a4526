//! Prelude module for convenient imports
//!
//! ```rust
//! use atom_core::prelude::*;
//! ```

// Core types
pub use crate::tower::TowerNumber;
pub use crate::types::{RateKind, RateValues, SourceCategory};

// Production
pub use crate::production::{Aggregator, BreakdownKind, BreakdownLine, Production, ProductionEntry};

// Critical and frenzy
pub use crate::critical::{CriticalRoll, CriticalState, CriticalTimer};
pub use crate::frenzy::{ClaimOutcome, FrenzyEngine, FrenzyPhase};

// Session
pub use crate::game::{ClickOutcome, Game, PurchaseOutcome};
pub use crate::persist::SaveData;
pub use crate::state::{GameEvent, GameState};

// Config
pub use crate::config::{default_catalog, Catalog, ProductionConfig};
