//! Critical-timer effects: transient per-time multipliers that decay with
//! simulated seconds

use serde::{Deserialize, Serialize};

/// A single timed multiplier bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedBoost {
    /// Simulated seconds left
    pub remaining_seconds: f64,
    /// Amount added to the multiplier while active
    pub multiplier_add: f64,
}

impl TimedBoost {
    pub fn new(remaining_seconds: f64, multiplier_add: f64) -> Self {
        TimedBoost {
            remaining_seconds,
            multiplier_add,
        }
    }

    /// Tick the boost
    /// Returns true if it is still active
    pub fn tick(&mut self, delta: f64) -> bool {
        self.remaining_seconds -= delta;
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.remaining_seconds > 0.0
    }
}

/// A stretch of time during which the timer multiplier is constant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSegment {
    pub duration_secs: f64,
    pub multiplier: f64,
}

/// All critical-timer boosts; persisted verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriticalTimer {
    boosts: Vec<TimedBoost>,
}

impl CriticalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from persisted boosts, dropping entries that are already spent
    /// or malformed
    pub fn from_boosts(boosts: Vec<TimedBoost>) -> Self {
        let mut timer = CriticalTimer { boosts };
        timer
            .boosts
            .retain(|b| b.is_active() && b.remaining_seconds.is_finite() && b.multiplier_add.is_finite());
        timer
    }

    pub fn boosts(&self) -> &[TimedBoost] {
        &self.boosts
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }

    /// Add a boost. Non-positive or non-finite durations are ignored.
    pub fn grant(&mut self, duration_secs: f64, multiplier_add: f64) {
        if !duration_secs.is_finite() || duration_secs <= 0.0 || !multiplier_add.is_finite() {
            tracing::debug!(duration_secs, multiplier_add, "ignoring invalid critical-timer grant");
            return;
        }
        self.boosts.push(TimedBoost::new(duration_secs, multiplier_add));
    }

    /// Advance every boost by `seconds` of simulated time
    /// Returns how many boosts expired
    pub fn advance(&mut self, seconds: f64) -> usize {
        if seconds.is_nan() || seconds <= 0.0 {
            return 0;
        }
        let before = self.boosts.len();
        self.boosts.retain_mut(|b| b.tick(seconds));
        before - self.boosts.len()
    }

    /// `1 + Σ multiplier_add` over active boosts
    pub fn multiplier(&self) -> f64 {
        1.0 + self
            .boosts
            .iter()
            .filter(|b| b.is_active())
            .map(|b| b.multiplier_add)
            .sum::<f64>()
    }

    pub fn longest_remaining(&self) -> f64 {
        self.boosts
            .iter()
            .map(|b| b.remaining_seconds)
            .fold(0.0, f64::max)
    }

    /// Split the time until the last boost expires into segments of constant
    /// multiplier, earliest first
    pub fn coverage_profile(&self) -> Vec<CoverageSegment> {
        let mut ends: Vec<f64> = self
            .boosts
            .iter()
            .filter(|b| b.is_active())
            .map(|b| b.remaining_seconds)
            .collect();
        ends.sort_by(|a, b| a.total_cmp(b));
        ends.dedup();

        let mut segments = Vec::with_capacity(ends.len());
        let mut start = 0.0;
        for end in ends {
            let multiplier = 1.0
                + self
                    .boosts
                    .iter()
                    .filter(|b| b.remaining_seconds >= end)
                    .map(|b| b.multiplier_add)
                    .sum::<f64>();
            segments.push(CoverageSegment {
                duration_secs: end - start,
                multiplier,
            });
            start = end;
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_sums_active_boosts() {
        let mut timer = CriticalTimer::new();
        assert!((timer.multiplier() - 1.0).abs() < f64::EPSILON);
        timer.grant(30.0, 1.0);
        timer.grant(60.0, 0.5);
        assert!((timer.multiplier() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_advance_expires() {
        let mut timer = CriticalTimer::new();
        timer.grant(30.0, 1.0);
        timer.grant(60.0, 0.5);

        assert_eq!(timer.advance(30.0), 1);
        assert!((timer.multiplier() - 1.5).abs() < f64::EPSILON);
        assert!((timer.longest_remaining() - 30.0).abs() < f64::EPSILON);

        assert_eq!(timer.advance(45.0), 1);
        assert!(timer.is_empty());
        assert!((timer.multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_grant_ignored() {
        let mut timer = CriticalTimer::new();
        timer.grant(0.0, 1.0);
        timer.grant(-5.0, 1.0);
        timer.grant(f64::NAN, 1.0);
        assert!(timer.is_empty());
    }

    #[test]
    fn test_coverage_profile() {
        let mut timer = CriticalTimer::new();
        timer.grant(100.0, 1.0);
        timer.grant(300.0, 0.5);

        let profile = timer.coverage_profile();
        assert_eq!(profile.len(), 2);
        assert!((profile[0].duration_secs - 100.0).abs() < f64::EPSILON);
        assert!((profile[0].multiplier - 2.5).abs() < f64::EPSILON);
        assert!((profile[1].duration_secs - 200.0).abs() < f64::EPSILON);
        assert!((profile[1].multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_persisted_verbatim() {
        let mut timer = CriticalTimer::new();
        timer.grant(42.5, 0.75);
        let json = serde_json::to_string(&timer).unwrap();
        assert_eq!(json, r#"[{"remaining_seconds":42.5,"multiplier_add":0.75}]"#);
        let restored: CriticalTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, timer);
    }
}
