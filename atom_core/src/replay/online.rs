//! Online replay: step through elapsed time while the session is open

use crate::config::ProductionConfig;
use crate::frenzy::{FrenzyRun, FrenzyTickReport};
use crate::production::Production;
use crate::state::GameState;
use crate::tower::TowerNumber;
use crate::types::RateKind;
use rand::Rng;

/// Result of an online replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnlineReport {
    pub elapsed_secs: f64,
    pub steps: u32,
    pub gained: TowerNumber,
    /// Frenzy tokens that spawned, by kind
    pub spawned: Vec<RateKind>,
    pub finished_runs: Vec<FrenzyRun>,
    /// Critical-timer boosts that ran out
    pub expired_boosts: usize,
    /// Whether frenzy stacks changed and production needs a recompute
    pub frenzy_changed: bool,
}

/// Replay `elapsed_secs` starting at clock time `start`
///
/// The per-time rate is sampled once from `production`. Each step of at most
/// `online_step_secs` credits atoms, decays the critical timer and ticks the
/// frenzy engine. Only the trailing window in which a frenzy token could
/// still be visible is stepped; anything before it is credited in one step.
pub fn replay_online(
    state: &mut GameState,
    production: &Production,
    config: &ProductionConfig,
    start: f64,
    elapsed_secs: f64,
    rng: &mut impl Rng,
) -> OnlineReport {
    let mut report = OnlineReport::default();
    if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return report;
    }

    let rate = production.per_time.total;
    let step_limit = config.replay.online_step_secs.max(f64::EPSILON);
    let spawn_multiplier = production.derived.frenzy_spawn_multiplier;
    let mut frenzy = FrenzyTickReport::new();
    let mut done = 0.0;

    let window = stepped_window(config, step_limit);
    if elapsed_secs > window {
        done = elapsed_secs - window;
        let gained = rate.mul_scalar(done);
        state.resources.earn(gained);
        report.gained += gained;
        report.expired_boosts += state.critical_timer.advance(done);
        report.steps += 1;
    }

    while done < elapsed_secs {
        let step = step_limit.min(elapsed_secs - done);
        done += step;

        let gained = rate.mul_scalar(step);
        state.resources.earn(gained);
        report.gained += gained;

        report.expired_boosts += state.critical_timer.advance(step);
        frenzy.merge(state.frenzy.tick(start + done, &config.frenzy, spawn_multiplier, rng));
        report.steps += 1;
    }

    report.elapsed_secs = elapsed_secs;
    report.frenzy_changed = frenzy.changes_multipliers();
    report.spawned = frenzy.spawned;
    report.finished_runs = frenzy.finished_runs;

    tracing::debug!(
        elapsed_secs,
        steps = report.steps,
        gained = %report.gained,
        "online replay finished"
    );
    report
}

/// Longest token lifetime plus one step
fn stepped_window(config: &ProductionConfig, step_limit: f64) -> f64 {
    let lifetime = RateKind::all()
        .iter()
        .map(|&kind| config.frenzy.get(kind).token_lifetime_secs)
        .fold(0.0, f64::max);
    lifetime + step_limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Catalog;
    use crate::production::recompute;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    #[test]
    fn test_steps_and_gain() {
        let catalog = Catalog::default();
        let config = ProductionConfig::default();
        let mut state = GameState::new();
        state.debug_flat_per_time = 10.0;
        let production = recompute(&catalog, &config, &state, 0.0);

        let mut rng = make_test_rng();
        let report = replay_online(&mut state, &production, &config, 0.0, 150.0, &mut rng);
        assert_eq!(report.steps, 3);
        assert_eq!(report.gained.to_f64(), 1500.0);
        assert_eq!(state.resources.atoms.to_f64(), 1500.0);
    }

    #[test]
    fn test_long_gap_is_bounded() {
        let catalog = Catalog::default();
        let config = ProductionConfig::default();
        let mut state = GameState::new();
        state.debug_flat_per_time = 10.0;
        state.critical_timer.grant(90.0, 1.0);
        let production = recompute(&catalog, &config, &state, 0.0);

        let mut rng = make_test_rng();
        let report = replay_online(&mut state, &production, &config, 0.0, 1.0e9, &mut rng);
        assert!(report.steps <= 4, "took {} steps", report.steps);
        assert_eq!(report.expired_boosts, 1);
        let expected = production.per_time.total.to_f64() * 1.0e9;
        let gained = report.gained.to_f64();
        assert!((gained - expected).abs() <= expected * 1e-9, "{} vs {}", gained, expected);
    }

    #[test]
    fn test_critical_timer_decays() {
        let catalog = Catalog::default();
        let config = ProductionConfig::default();
        let mut state = GameState::new();
        state.critical_timer.grant(90.0, 1.0);
        let production = recompute(&catalog, &config, &state, 0.0);

        let mut rng = make_test_rng();
        let report = replay_online(&mut state, &production, &config, 0.0, 120.0, &mut rng);
        assert_eq!(report.expired_boosts, 1);
        assert!(state.critical_timer.is_empty());
    }

    #[test]
    fn test_nothing_elapsed() {
        let catalog = Catalog::default();
        let config = ProductionConfig::default();
        let mut state = GameState::new();
        let production = recompute(&catalog, &config, &state, 0.0);
        let mut rng = make_test_rng();
        let report = replay_online(&mut state, &production, &config, 0.0, -5.0, &mut rng);
        assert_eq!(report.steps, 0);
        assert!(report.gained.is_zero());
    }
}
