//! Critical resolution for a single manual action

use crate::tower::TowerNumber;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Critical parameters derived on every recompute. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalState {
    /// Probability (0..=1) of a critical action
    pub chance: f64,
    /// Multiplier applied on a critical action
    pub multiplier: f64,
    /// Ceiling on `multiplier`
    pub max_multiplier: f64,
}

impl Default for CriticalState {
    fn default() -> Self {
        CriticalState {
            chance: 0.0,
            multiplier: 1.0,
            max_multiplier: 1.0,
        }
    }
}

impl CriticalState {
    pub fn new(chance: f64, multiplier: f64, max_multiplier: f64) -> Self {
        CriticalState {
            chance,
            multiplier,
            max_multiplier,
        }
    }

    /// Multiplier after the ceiling is applied
    pub fn resolved_multiplier(&self) -> f64 {
        self.multiplier.min(self.max_multiplier)
    }

    /// Whether a roll could ever change the amount
    pub fn can_crit(&self) -> bool {
        self.chance > 0.0 && self.resolved_multiplier() > 1.0
    }
}

/// Outcome of one critical roll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalRoll {
    pub is_critical: bool,
    /// 1.0 when the action was not critical
    pub applied_multiplier: f64,
}

impl CriticalRoll {
    pub fn normal() -> Self {
        CriticalRoll {
            is_critical: false,
            applied_multiplier: 1.0,
        }
    }
}

/// Resolve a critical roll with the thread-local RNG
pub fn resolve_critical(amount: TowerNumber, state: &CriticalState) -> (TowerNumber, CriticalRoll) {
    let mut rng = rand::thread_rng();
    resolve_critical_with_rng(amount, state, &mut rng)
}

/// Resolve a critical roll with a provided RNG (for deterministic testing)
///
/// Draws exactly one uniform value per call, or none at all when the state
/// can never crit.
pub fn resolve_critical_with_rng(
    amount: TowerNumber,
    state: &CriticalState,
    rng: &mut impl Rng,
) -> (TowerNumber, CriticalRoll) {
    if !state.can_crit() {
        return (amount, CriticalRoll::normal());
    }

    if rng.gen::<f64>() < state.chance {
        let multiplier = state.resolved_multiplier();
        (
            amount.mul_scalar(multiplier),
            CriticalRoll {
                is_critical: true,
                applied_multiplier: multiplier,
            },
        )
    } else {
        (amount, CriticalRoll::normal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    /// Counts how many times the RNG was consulted
    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    #[test]
    fn test_guaranteed_crit() {
        let state = CriticalState::new(1.0, 5.0, 10.0);
        let mut rng = make_test_rng();
        for _ in 0..100 {
            let (amount, roll) = resolve_critical_with_rng(TowerNumber::one(), &state, &mut rng);
            assert!(roll.is_critical);
            assert_eq!(amount.to_f64(), 5.0);
        }
    }

    #[test]
    fn test_multiplier_capped() {
        let state = CriticalState::new(1.0, 50.0, 8.0);
        let mut rng = make_test_rng();
        let (amount, roll) = resolve_critical_with_rng(TowerNumber::from_f64(3.0), &state, &mut rng);
        assert!((roll.applied_multiplier - 8.0).abs() < f64::EPSILON);
        assert_eq!(amount.to_f64(), 24.0);
    }

    #[test]
    fn test_zero_chance_never_draws() {
        let state = CriticalState::new(0.0, 5.0, 10.0);
        let mut rng = CountingRng {
            inner: make_test_rng(),
            draws: 0,
        };
        for _ in 0..10_000 {
            let (amount, roll) = resolve_critical_with_rng(TowerNumber::one(), &state, &mut rng);
            assert!(!roll.is_critical);
            assert_eq!(amount, TowerNumber::one());
        }
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn test_neutral_multiplier_never_draws() {
        let state = CriticalState::new(0.5, 3.0, 1.0);
        let mut rng = CountingRng {
            inner: make_test_rng(),
            draws: 0,
        };
        let (_, roll) = resolve_critical_with_rng(TowerNumber::one(), &state, &mut rng);
        assert!(!roll.is_critical);
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn test_partial_chance_hits_sometimes() {
        let state = CriticalState::new(0.25, 2.0, 10.0);
        let mut rng = make_test_rng();
        let crits = (0..10_000)
            .filter(|_| resolve_critical_with_rng(TowerNumber::one(), &state, &mut rng).1.is_critical)
            .count();
        assert!(crits > 2_000 && crits < 3_000);
    }
}
