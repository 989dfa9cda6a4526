//! Game - Session facade that keeps production in sync with the state
//!
//! Every entry point that changes an aggregator input recomputes before it
//! returns, so `production()` is never stale.

use crate::config::{default_catalog, Catalog, ProductionConfig};
use crate::critical::{resolve_critical_with_rng, CriticalRoll};
use crate::frenzy::ClaimOutcome;
use crate::persist::SaveData;
use crate::production::{Aggregator, BreakdownLine, Production};
use crate::replay::{replay_offline, replay_online, OfflineReport, OnlineReport};
use crate::state::{GameEvent, GameState};
use crate::tower::{TowerNumber, EPSILON};
use crate::types::{RateKind, SourceCategory};
use rand::Rng;

/// Result of one manual action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOutcome {
    pub gained: TowerNumber,
    pub roll: CriticalRoll,
}

/// Result of a purchase attempt. None of these are errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Purchased { level: u32, cost: TowerNumber },
    InsufficientFunds { cost: TowerNumber },
    MaxLevel,
    Unknown,
}

pub struct Game {
    catalog: Catalog,
    config: ProductionConfig,
    state: GameState,
    production: Production,
    /// Clock time of the last online tick
    last_tick: Option<f64>,
    /// Clock time stamped on the loaded save
    saved_at: Option<f64>,
}

impl Game {
    pub fn new(catalog: Catalog, config: ProductionConfig) -> Self {
        let mut game = Game {
            catalog,
            config,
            state: GameState::new(),
            production: Production::default(),
            last_tick: None,
            saved_at: None,
        };
        game.recompute(0.0);
        game
    }

    /// Built-in catalog and constants
    pub fn with_defaults() -> Self {
        Self::new(default_catalog(), ProductionConfig::builtin())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ProductionConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn production(&self) -> &Production {
        &self.production
    }

    pub fn rate(&self, kind: RateKind) -> TowerNumber {
        self.production.entry(kind).total
    }

    pub fn breakdown(&self) -> Vec<BreakdownLine> {
        self.production.breakdown()
    }

    fn recompute(&mut self, now: f64) {
        self.production = Aggregator::new(&self.catalog, &self.config).recompute(&self.state, now);
    }

    /// Recompute when frenzy stacks have expired since the last recompute
    fn refresh_frenzy(&mut self, now: f64) {
        let stale = RateKind::all().iter().any(|&kind| {
            let base = self.config.frenzy.get(kind).base_multiplier;
            let live = self.state.frenzy.multiplier_at(kind, now, base);
            let applied = self
                .production
                .entry(kind)
                .category_multiplier(SourceCategory::Frenzy);
            // Relative drift, measured in log space so huge stack counts compare
            (live.log10() - applied.log10()).abs() > TowerNumber::from_f64(EPSILON)
        });
        if stale {
            self.recompute(now);
        }
    }

    /// Apply an inbound state change
    pub fn apply_event(&mut self, event: &GameEvent, now: f64) {
        self.state.apply_event(event);
        self.recompute(now);
    }

    /// One manual action: the per-action rate through the critical resolver
    pub fn click(&mut self, now: f64, rng: &mut impl Rng) -> ClickOutcome {
        self.refresh_frenzy(now);

        let critical = self.production.derived.critical;
        let (gained, roll) = resolve_critical_with_rng(self.production.per_action.total, &critical, rng);

        let resources = &mut self.state.resources;
        resources.earn(gained);
        resources.manual_actions += 1;
        if roll.is_critical {
            resources.critical_hits += 1;
        }
        self.state.frenzy.record_action(now);

        ClickOutcome { gained, roll }
    }

    /// Cost of the next level of an upgrade
    pub fn upgrade_cost(&self, id: &str) -> Option<TowerNumber> {
        let def = self.catalog.upgrade(id)?;
        Some(def.cost_at(self.state.upgrade_level(id)))
    }

    /// Buy one level of an upgrade
    pub fn purchase(&mut self, id: &str, now: f64) -> PurchaseOutcome {
        let Some(def) = self.catalog.upgrade(id) else {
            tracing::debug!(upgrade = %id, "purchase of unknown upgrade");
            return PurchaseOutcome::Unknown;
        };
        let level = self.state.upgrade_level(id);
        if def.max_level.is_some_and(|max| level >= max) {
            return PurchaseOutcome::MaxLevel;
        }
        let cost = def.cost_at(level);
        if !self.state.resources.spend(cost) {
            return PurchaseOutcome::InsufficientFunds { cost };
        }

        let level = level + 1;
        self.state.apply_event(&GameEvent::UpgradePurchased {
            id: id.to_string(),
            level,
        });
        self.recompute(now);
        tracing::debug!(upgrade = %id, level, cost = %cost, "upgrade purchased");
        PurchaseOutcome::Purchased { level, cost }
    }

    /// Claim the visible frenzy token of `kind`
    pub fn claim_frenzy(&mut self, kind: RateKind, now: f64) -> ClaimOutcome {
        let duration = self.config.frenzy.get(kind).effect_duration_secs;
        let max_stacks = self.production.derived.frenzy_max_stacks.get(kind);
        let outcome = self.state.frenzy.claim(kind, now, duration, max_stacks);
        self.recompute(now);
        outcome
    }

    /// Online replay over the time since the previous tick
    pub fn tick(&mut self, now: f64, rng: &mut impl Rng) -> OnlineReport {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            self.state.frenzy.tick(
                now,
                &self.config.frenzy,
                self.production.derived.frenzy_spawn_multiplier,
                rng,
            );
            self.recompute(now);
            return OnlineReport::default();
        };

        let elapsed = now - last;
        let report = replay_online(
            &mut self.state,
            &self.production,
            &self.config,
            last,
            elapsed,
            rng,
        );
        if elapsed > 0.0 {
            self.last_tick = Some(now);
        }
        self.recompute(now);
        report
    }

    /// Offline replay over the time since the loaded save
    pub fn resume_offline(&mut self, now: f64) -> OfflineReport {
        let elapsed = self.saved_at.map(|saved_at| now - saved_at).unwrap_or(0.0);
        // Rates must not include stacks that expired while away
        self.recompute(now);
        let report = replay_offline(&mut self.state, &self.production, &self.config.offline, elapsed);
        self.saved_at = None;
        self.last_tick = Some(now);
        self.recompute(now);
        report
    }

    /// Capture a save document stamped with `now`
    pub fn save(&self, now: f64) -> SaveData {
        SaveData::capture(&self.state, now)
    }

    /// Replace all state from a save document
    pub fn load(&mut self, data: &SaveData, now: f64) {
        self.state = data.restore();
        self.saved_at = Some(data.saved_at);
        self.last_tick = None;
        self.recompute(now);
    }

    /// Overwrite every piece of core state with a fresh start
    pub fn reset(&mut self) {
        self.state = GameState::new();
        self.last_tick = None;
        self.saved_at = None;
        self.recompute(0.0);
    }
}
