//! Headless session simulation utilities

use atom_core::{FrenzyPhase, Game, PurchaseOutcome, RateKind, TowerNumber};
use rand::Rng;

/// Seconds between online ticks
const TICK_SECS: f64 = 1.0;

/// Manual actions performed per second while clicks remain
const CLICKS_PER_SEC: u64 = 5;

/// What to simulate
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    /// Manual actions spread over the online phase
    pub clicks: u64,
    /// Seconds of online play
    pub online_secs: f64,
    /// Buy the cheapest affordable upgrade after every tick
    pub auto_buy: bool,
    /// Claim visible frenzy tokens
    pub auto_claim: bool,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        SimulationPlan {
            clicks: 0,
            online_secs: 0.0,
            auto_buy: true,
            auto_claim: true,
        }
    }
}

/// Totals gathered over an online session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub clicks: u64,
    pub critical_hits: u64,
    pub click_gain: TowerNumber,
    pub passive_gain: TowerNumber,
    pub purchases: u32,
    pub spent: TowerNumber,
    pub frenzy_claims: u32,
    pub frenzy_runs: usize,
    /// Clock time when the session ended
    pub ended_at: f64,
}

/// Play `plan` starting at clock time `start`
pub fn run_session(game: &mut Game, plan: &SimulationPlan, start: f64, rng: &mut impl Rng) -> SessionSummary {
    let mut summary = SessionSummary {
        ended_at: start,
        ..Default::default()
    };
    game.tick(start, rng);

    let mut clicks_left = plan.clicks;
    let mut now = start;
    while now - start < plan.online_secs || clicks_left > 0 {
        let batch = clicks_left.min(CLICKS_PER_SEC);
        for i in 0..batch {
            let at = now + i as f64 / CLICKS_PER_SEC as f64;
            let click = game.click(at, rng);
            summary.click_gain += click.gained;
            summary.clicks += 1;
            if click.roll.is_critical {
                summary.critical_hits += 1;
            }
        }
        clicks_left -= batch;

        now += TICK_SECS;
        let report = game.tick(now, rng);
        summary.passive_gain += report.gained;
        summary.frenzy_runs += report.finished_runs.len();

        if plan.auto_claim {
            summary.frenzy_claims += claim_visible_tokens(game, now);
        }
        if plan.auto_buy {
            while let Some((cost, _)) = buy_cheapest(game, now) {
                summary.purchases += 1;
                summary.spent += cost;
            }
        }
    }

    summary.ended_at = now;
    tracing::info!(
        clicks = summary.clicks,
        purchases = summary.purchases,
        frenzy_claims = summary.frenzy_claims,
        "online session finished"
    );
    summary
}

fn claim_visible_tokens(game: &mut Game, now: f64) -> u32 {
    let mut claimed = 0;
    for &kind in RateKind::all() {
        if game.state().frenzy.phase(kind, now) == FrenzyPhase::Available
            && game.claim_frenzy(kind, now).is_claimed()
        {
            tracing::debug!(kind = kind.label(), "claimed frenzy token");
            claimed += 1;
        }
    }
    claimed
}

/// Buy one level of the cheapest affordable upgrade
pub fn buy_cheapest(game: &mut Game, now: f64) -> Option<(TowerNumber, String)> {
    let atoms = game.state().resources.atoms;
    let (_, id) = game
        .catalog()
        .upgrades
        .iter()
        .filter(|def| {
            def.max_level
                .map_or(true, |max| game.state().upgrade_level(&def.id) < max)
        })
        .filter_map(|def| game.upgrade_cost(&def.id).map(|cost| (cost, def.id.clone())))
        .filter(|(cost, _)| *cost <= atoms)
        .min_by(|a, b| a.0.cmp(&b.0))?;

    match game.purchase(&id, now) {
        PurchaseOutcome::Purchased { cost, .. } => Some((cost, id)),
        _ => None,
    }
}

/// Render the production breakdown as text lines
pub fn format_breakdown(game: &Game) -> Vec<String> {
    let mut lines = Vec::new();
    for &kind in RateKind::all() {
        let entry = game.production().entry(kind);
        lines.push(format!(
            "{}: {} = {} x {}",
            kind.label(),
            entry.total,
            entry.total_addition,
            entry.total_multiplier
        ));
        for line in entry.breakdown() {
            lines.push(format!(
                "  {:?} {} [{:?}]: {}",
                line.kind, line.tag.label, line.tag.category, line.tag.value
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use atom_core::config::{Catalog, ProductionConfig, UpgradeDef, UpgradeEffect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    fn test_game() -> Game {
        let catalog = Catalog {
            upgrades: vec![
                UpgradeDef {
                    id: "cheap".to_string(),
                    name: "Cheap".to_string(),
                    base_cost: 5.0,
                    cost_growth: 2.0,
                    max_level: Some(1),
                    effect: UpgradeEffect::Flat {
                        per_action: 1.0,
                        per_time: 0.0,
                    },
                },
                UpgradeDef {
                    id: "dear".to_string(),
                    name: "Dear".to_string(),
                    base_cost: 1.0e9,
                    cost_growth: 2.0,
                    max_level: None,
                    effect: UpgradeEffect::Flat {
                        per_action: 0.0,
                        per_time: 1.0,
                    },
                },
            ],
            ..Default::default()
        };
        let mut config = ProductionConfig::default();
        config.critical.base_chance = 0.0;
        Game::new(catalog, config)
    }

    #[test]
    fn test_session_clicks_and_buys() {
        let mut game = test_game();
        let mut rng = make_test_rng();
        let plan = SimulationPlan {
            clicks: 10,
            online_secs: 0.0,
            auto_buy: true,
            auto_claim: false,
        };
        let summary = run_session(&mut game, &plan, 0.0, &mut rng);
        assert_eq!(summary.clicks, 10);
        assert_eq!(summary.purchases, 1);
        assert_eq!(game.state().upgrade_level("cheap"), 1);
        // 5 clicks at 1, then 5 clicks at 2, minus the cost of 5
        assert_eq!(summary.click_gain.to_f64(), 15.0);
        assert_eq!(game.state().resources.atoms.to_f64(), 10.0);
    }

    #[test]
    fn test_buy_cheapest_respects_funds() {
        let mut game = test_game();
        assert!(buy_cheapest(&mut game, 0.0).is_none());
    }

    #[test]
    fn test_breakdown_lists_rates() {
        let game = test_game();
        let lines = format_breakdown(&game);
        assert!(lines[0].starts_with("per action"));
        assert!(lines.iter().any(|line| line.starts_with("per second")));
    }
}
