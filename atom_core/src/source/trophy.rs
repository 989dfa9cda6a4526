//! TrophySource - Rewards from unlocked achievements

use crate::config::{AchievementDef, AchievementReward};
use crate::production::ProductionAccumulator;
use crate::source::ProductionSource;
use crate::tower::TowerNumber;
use crate::types::{RateKind, RateValues, SourceCategory};

/// Every unlocked achievement, applied together so bonus rewards collapse
/// into one multiplier per rate
pub struct TrophySource<'a> {
    pub unlocked: Vec<&'a AchievementDef>,
}

impl<'a> TrophySource<'a> {
    pub fn new(unlocked: Vec<&'a AchievementDef>) -> Self {
        TrophySource { unlocked }
    }
}

impl ProductionSource for TrophySource<'_> {
    fn id(&self) -> &str {
        "achievements"
    }

    fn priority(&self) -> i32 {
        300
    }

    fn apply(&self, production: &mut ProductionAccumulator) {
        let mut bonus = RateValues::default();

        for achievement in &self.unlocked {
            match &achievement.reward {
                AchievementReward::Multiplier { rate, factor } => {
                    production.add_multiplier(
                        *rate,
                        &achievement.id,
                        &achievement.name,
                        SourceCategory::Trophy,
                        TowerNumber::from_f64(*factor),
                    );
                }
                AchievementReward::MultiplierBonus { rate, bonus: amount } => match rate {
                    RateKind::PerAction => bonus.per_action += amount,
                    RateKind::PerTime => bonus.per_time += amount,
                },
                AchievementReward::CriticalMaxMultiplier { amount } => {
                    production.critical_max_multiplier += amount;
                }
                AchievementReward::FrenzyMaxStacks { kind, amount } => {
                    production.frenzy_max_stacks.add(*kind, *amount);
                }
            }
        }

        for &kind in RateKind::all() {
            production.add_multiplier(
                kind,
                "achievement_bonus",
                "Achievement bonus",
                SourceCategory::Trophy,
                TowerNumber::from_f64(1.0 + bonus.get(kind)),
            );
        }
    }
}
