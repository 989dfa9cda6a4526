//! Offline replay: one lump-sum credit for time spent away

use crate::config::OfflineConstants;
use crate::production::Production;
use crate::state::GameState;
use crate::tower::TowerNumber;
use crate::types::SourceCategory;

/// Result of an offline replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfflineReport {
    /// Time away as reported by the caller
    pub requested_secs: f64,
    /// Time actually credited
    pub applied_secs: f64,
    pub gained: TowerNumber,
    /// Credited seconds covered by the critical timer
    pub boosted_secs: f64,
    pub capped: bool,
}

/// Credit `requested_secs` of absence
///
/// Seconds covered by the critical timer earn the per-time rate at the
/// timer's multiplier; the rest earn it at the offline multiplier. The
/// timer then decays by the credited time.
pub fn replay_offline(
    state: &mut GameState,
    production: &Production,
    constants: &OfflineConstants,
    requested_secs: f64,
) -> OfflineReport {
    let requested = if requested_secs.is_nan() { 0.0 } else { requested_secs.max(0.0) };
    let applied = requested.min(constants.max_elapsed_secs.max(0.0));
    let mut report = OfflineReport {
        requested_secs: requested,
        applied_secs: applied,
        capped: requested > applied,
        ..Default::default()
    };
    if applied <= 0.0 {
        return report;
    }

    // Unboosted and unrounded; coverage segments supply their own multiplier
    let rate = production.per_time.total_excluding(SourceCategory::Critical);

    let mut remaining = applied;
    let mut gained = TowerNumber::ZERO;
    for segment in state.critical_timer.coverage_profile() {
        if remaining <= 0.0 {
            break;
        }
        let covered = segment.duration_secs.min(remaining);
        gained += rate.mul_scalar(segment.multiplier * covered);
        report.boosted_secs += covered;
        remaining -= covered;
    }
    if remaining > 0.0 {
        gained += rate.mul_scalar(production.derived.offline_multiplier * remaining);
    }

    state.critical_timer.advance(applied);
    state.resources.earn(gained);
    report.gained = gained;

    tracing::debug!(
        requested_secs = report.requested_secs,
        applied_secs = report.applied_secs,
        boosted_secs = report.boosted_secs,
        gained = %report.gained,
        "offline replay finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Catalog, ProductionConfig};
    use crate::production::recompute;

    fn setup(per_time: f64) -> (GameState, ProductionConfig, Catalog) {
        let mut state = GameState::new();
        state.debug_flat_per_time = per_time;
        (state, ProductionConfig::default(), Catalog::default())
    }

    #[test]
    fn test_cap() {
        let (mut state, config, catalog) = setup(10.0);
        let production = recompute(&catalog, &config, &state, 0.0);
        let ten_days = 10.0 * 24.0 * 3600.0;

        let report = replay_offline(&mut state, &production, &config.offline, ten_days);
        assert!(report.capped);
        assert_eq!(report.requested_secs, ten_days);
        assert_eq!(report.applied_secs, 8.0 * 3600.0);
        // No catalog, so the offline multiplier is the configured base of 0.5
        assert_eq!(report.gained.to_f64(), 10.0 * 0.5 * 28800.0);
    }

    #[test]
    fn test_timer_covers_first_seconds() {
        let (mut state, config, catalog) = setup(10.0);
        state.critical_timer.grant(100.0, 1.0);
        let production = recompute(&catalog, &config, &state, 0.0);
        assert_eq!(production.per_time.total.to_f64(), 20.0);

        let report = replay_offline(&mut state, &production, &config.offline, 300.0);
        assert!(!report.capped);
        assert_eq!(report.boosted_secs, 100.0);
        // 100 s at 10 × 2, then 200 s at 10 × 0.5
        assert_eq!(report.gained.to_f64(), 2000.0 + 1000.0);
        assert!(state.critical_timer.is_empty());
    }

    #[test]
    fn test_fractional_boosted_rate() {
        let (mut state, config, catalog) = setup(3.0);
        state.critical_timer.grant(1.0, 0.5);
        let production = recompute(&catalog, &config, &state, 0.0);
        // 4.5 is rounded up for display
        assert_eq!(production.per_time.total.to_f64(), 5.0);

        let report = replay_offline(&mut state, &production, &config.offline, 1001.0);
        // 1 s at 3 × 1.5, then 1000 s at 3 × 0.5
        assert!((report.gained.to_f64() - 1504.5).abs() < 1e-9);
    }

    #[test]
    fn test_negative_elapsed() {
        let (mut state, config, catalog) = setup(10.0);
        let production = recompute(&catalog, &config, &state, 0.0);
        let report = replay_offline(&mut state, &production, &config.offline, -60.0);
        assert_eq!(report.applied_secs, 0.0);
        assert!(report.gained.is_zero());
        assert!(state.resources.atoms.is_zero());
    }
}
