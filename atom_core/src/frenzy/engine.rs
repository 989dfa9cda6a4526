//! Frenzy engine: token spawning, claiming and stack expiry per rate kind

use super::{ClaimOutcome, FrenzyPhase, FrenzyRun, FrenzyTickReport};
use crate::config::{FrenzyConstants, FrenzyKindConstants};
use crate::tower::TowerNumber;
use crate::types::RateKind;
use rand::Rng;

/// State for one frenzy kind
#[derive(Debug, Clone, Default)]
struct FrenzyTrack {
    /// Expiry time of the unclaimed token, if one is visible
    token_expires_at: Option<f64>,
    /// Expiry time of each active stack
    stacks: Vec<f64>,
    /// Clock time of the last whole-second spawn roll
    last_roll_at: Option<f64>,
    run: Option<FrenzyRun>,
}

impl FrenzyTrack {
    fn live_stacks(&self, now: f64) -> usize {
        self.stacks.iter().filter(|&&expires_at| expires_at > now).count()
    }

    fn has_token(&self, now: f64) -> bool {
        self.token_expires_at.is_some_and(|expires_at| expires_at > now)
    }

    /// Drop expired stacks. Returns how many expired and, when the last
    /// stack went, the finished run.
    fn prune_stacks(&mut self, now: f64) -> (u32, Option<FrenzyRun>) {
        let last_expiry = self
            .stacks
            .iter()
            .copied()
            .filter(|&expires_at| expires_at <= now)
            .fold(f64::NEG_INFINITY, f64::max);
        let before = self.stacks.len();
        self.stacks.retain(|&expires_at| expires_at > now);
        let expired = (before - self.stacks.len()) as u32;

        let finished = if self.stacks.is_empty() {
            self.run.take().map(|mut run| {
                run.ended_at = if last_expiry.is_finite() { last_expiry } else { now };
                run
            })
        } else {
            None
        };
        (expired, finished)
    }
}

/// Stacking frenzy multipliers for both rates
///
/// Expiry is decided by comparing stored expiry times against the clock
/// passed in, so reads never need a prior tick to be correct.
#[derive(Debug, Clone, Default)]
pub struct FrenzyEngine {
    per_action: FrenzyTrack,
    per_time: FrenzyTrack,
    /// Runs that ended outside a tick, reported by the next tick
    pending_runs: Vec<FrenzyRun>,
}

impl FrenzyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn track(&self, kind: RateKind) -> &FrenzyTrack {
        match kind {
            RateKind::PerAction => &self.per_action,
            RateKind::PerTime => &self.per_time,
        }
    }

    fn track_mut(&mut self, kind: RateKind) -> &mut FrenzyTrack {
        match kind {
            RateKind::PerAction => &mut self.per_action,
            RateKind::PerTime => &mut self.per_time,
        }
    }

    pub fn phase(&self, kind: RateKind, now: f64) -> FrenzyPhase {
        let track = self.track(kind);
        if track.live_stacks(now) > 0 {
            FrenzyPhase::Active
        } else if track.has_token(now) {
            FrenzyPhase::Available
        } else {
            FrenzyPhase::Idle
        }
    }

    pub fn stack_count(&self, kind: RateKind, now: f64) -> u32 {
        self.track(kind).live_stacks(now) as u32
    }

    /// Expiry time of the visible token
    pub fn token_expires_at(&self, kind: RateKind, now: f64) -> Option<f64> {
        let track = self.track(kind);
        track.token_expires_at.filter(|_| track.has_token(now))
    }

    /// `base_multiplier ^ live_stacks`, without overflowing past f64 range
    pub fn multiplier_at(&self, kind: RateKind, now: f64, base_multiplier: f64) -> TowerNumber {
        let stacks = self.stack_count(kind, now);
        if stacks == 0 {
            return TowerNumber::ONE;
        }
        TowerNumber::from_f64(base_multiplier).pow_f64(stacks as f64)
    }

    /// Advance the clock: expire tokens and stacks, then roll for new tokens
    /// once per elapsed whole second
    pub fn tick(
        &mut self,
        now: f64,
        constants: &FrenzyConstants,
        spawn_multiplier: f64,
        rng: &mut impl Rng,
    ) -> FrenzyTickReport {
        let mut report = FrenzyTickReport::new();
        report.finished_runs.append(&mut self.pending_runs);
        if !now.is_finite() {
            return report;
        }

        for &kind in RateKind::all() {
            let kind_constants = constants.get(kind);
            let track = self.track_mut(kind);
            roll_spawns(track, kind, now, kind_constants, spawn_multiplier, rng, &mut report);

            if track.token_expires_at.is_some() && !track.has_token(now) {
                track.token_expires_at = None;
                report.expired_tokens.push(kind);
            }

            let (expired, finished) = track.prune_stacks(now);
            report.expired_stacks += expired;
            if let Some(run) = finished {
                tracing::debug!(
                    kind = kind.label(),
                    actions = run.actions,
                    peak_stacks = run.peak_stacks,
                    "frenzy run finished"
                );
                report.finished_runs.push(run);
            }
        }

        report
    }

    /// Make a token visible immediately
    pub fn spawn_token(&mut self, kind: RateKind, now: f64, lifetime_secs: f64) {
        self.track_mut(kind).token_expires_at = Some(now + lifetime_secs);
    }

    /// Claim the visible token of `kind`, adding a stack that lasts
    /// `effect_duration_secs`. At the cap the soonest-expiring stack is
    /// replaced.
    pub fn claim(
        &mut self,
        kind: RateKind,
        now: f64,
        effect_duration_secs: f64,
        max_stacks: u32,
    ) -> ClaimOutcome {
        let track = self.track_mut(kind);
        if !track.has_token(now) {
            track.token_expires_at = None;
            return ClaimOutcome::NoToken;
        }
        track.token_expires_at = None;

        let (_, finished) = track.prune_stacks(now);
        if let Some(run) = finished {
            self.pending_runs.push(run);
        }

        let track = self.track_mut(kind);
        let cap = max_stacks.max(1) as usize;
        let mut replaced = false;
        while track.stacks.len() >= cap {
            let soonest = track
                .stacks
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .map(|(index, _)| index);
            match soonest {
                Some(index) => {
                    track.stacks.remove(index);
                    replaced = true;
                }
                None => break,
            }
        }
        track.stacks.push(now + effect_duration_secs);

        let stacks = track.stacks.len() as u32;
        let run = track.run.get_or_insert_with(|| FrenzyRun {
            kind,
            started_at: now,
            ended_at: now,
            actions: 0,
            claims: 0,
            peak_stacks: 0,
        });
        run.claims += 1;
        run.peak_stacks = run.peak_stacks.max(stacks);

        tracing::debug!(kind = kind.label(), stacks, replaced, "frenzy token claimed");
        if replaced {
            ClaimOutcome::Replaced { stacks }
        } else {
            ClaimOutcome::Stacked { stacks }
        }
    }

    /// Count a manual action toward every active run
    pub fn record_action(&mut self, now: f64) {
        for kind in RateKind::all() {
            let track = self.track_mut(*kind);
            if track.live_stacks(now) > 0 {
                if let Some(run) = track.run.as_mut() {
                    run.actions += 1;
                }
            }
        }
    }

    /// Drop every token, stack and run without reporting
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn roll_spawns(
    track: &mut FrenzyTrack,
    kind: RateKind,
    now: f64,
    constants: &FrenzyKindConstants,
    spawn_multiplier: f64,
    rng: &mut impl Rng,
    report: &mut FrenzyTickReport,
) {
    let last = match track.last_roll_at {
        Some(last) if last <= now => last,
        _ => {
            track.last_roll_at = Some(now);
            return;
        }
    };

    let mut rolls = (now - last).floor() as u64;
    if rolls == 0 {
        return;
    }

    // Rolls older than a token lifetime cannot leave a visible token
    let useful = constants.token_lifetime_secs.max(0.0).ceil() as u64 + 1;
    let mut at = last;
    if rolls > useful {
        at += (rolls - useful) as f64;
        rolls = useful;
    }

    let chance = (constants.spawn_chance * spawn_multiplier).clamp(0.0, 1.0);
    for _ in 0..rolls {
        at += 1.0;
        if let Some(expires_at) = track.token_expires_at {
            if expires_at > at {
                continue;
            }
            track.token_expires_at = None;
            report.expired_tokens.push(kind);
        }
        if chance > 0.0 && rng.gen::<f64>() < chance {
            track.token_expires_at = Some(at + constants.token_lifetime_secs);
            report.spawned.push(kind);
            tracing::debug!(kind = kind.label(), at, "frenzy token spawned");
        }
    }
    track.last_roll_at = Some(at);
}
