//! Shoot-the-ball round
//!
//! Three floating balls, one of which is the winner. The player fires once
//! (at a tapped ball or a random one via the trigger), the projectile flies
//! for a fixed time, then the shot is scored and the round is over. A round
//! that sees no shot within the idle window ends as a loss.
//!
//! Deferred work runs on the engine's own [`Scheduler`]; the idle timeout and
//! the flight resolution share one [`TimerSlot`], so arming one always
//! cancels the other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::events::GameEvent;
use super::rng::{PcgSource, RandomSource};
use super::timer::{Scheduler, TimerSlot};
use crate::consts::*;
use crate::settings::{Settings, TriggerMode};
use crate::{Bounds, heading};

/// Where the round is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round started yet
    Idle,
    /// Waiting for a shot
    AcceptingInput,
    /// Projectile on its way
    Flying,
    /// Scored or timed out; waiting for reset
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundTimer {
    IdleTimeout,
    Resolve,
}

/// A projectile travelling from the launcher to a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub origin: Vec2,
    pub target: Vec2,
    pub launched_at: f64,
    pub duration: f64,
    /// Sprite rotation (radians)
    pub heading: f32,
}

impl Projectile {
    /// Fraction of the flight covered at `now` (0..=1)
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.launched_at) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn position_at(&self, now: f64) -> Vec2 {
        self.origin.lerp(self.target, self.progress(now))
    }
}

/// Per-round state, rebuilt on every reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub targets: Vec<Body>,
    pub correct_target: usize,
    pub selected_target: Option<usize>,
    /// `HIT_SCORE` or `MISS_SCORE` on the selected target once resolved
    pub scores: [Option<u32>; TARGET_COUNT],
    pub did_win: Option<bool>,
    pub has_interacted: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            correct_target: 0,
            selected_target: None,
            scores: [None; TARGET_COUNT],
            did_win: None,
            has_interacted: false,
        }
    }
}

/// The shooting round engine
#[derive(Debug, Clone)]
pub struct ShootingGame<R: RandomSource = PcgSource> {
    settings: Settings,
    rng: R,
    bounds: Bounds,
    phase: RoundPhase,
    round: RoundState,
    round_number: u32,
    projectile: Option<Projectile>,
    fired_at: Option<f64>,
    timers: Scheduler<RoundTimer>,
    round_timer: TimerSlot,
    events: Vec<GameEvent>,
}

impl ShootingGame<PcgSource> {
    /// Engine with a seeded PCG source
    pub fn with_seed(settings: Settings, bounds: Bounds, seed: u64, now: f64) -> Self {
        Self::new(settings, bounds, PcgSource::new(seed), now)
    }
}

impl<R: RandomSource> ShootingGame<R> {
    /// Create an idle engine; call [`start_round`](Self::start_round) to play
    pub fn new(settings: Settings, bounds: Bounds, rng: R, now: f64) -> Self {
        Self {
            settings,
            rng,
            bounds,
            phase: RoundPhase::Idle,
            round: RoundState::default(),
            round_number: 0,
            projectile: None,
            fired_at: None,
            timers: Scheduler::new(now),
            round_timer: TimerSlot::default(),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn is_accepting_input(&self) -> bool {
        self.phase == RoundPhase::AcceptingInput
    }

    pub fn projectile_in_flight(&self) -> bool {
        self.phase == RoundPhase::Flying
    }

    pub fn round_over(&self) -> bool {
        self.phase == RoundPhase::RoundOver
    }

    /// Engine clock (last time seen from the host)
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    /// Deadline of the outstanding idle timeout or resolution
    pub fn pending_deadline(&self) -> Option<f64> {
        self.round_timer.handle().and_then(|h| self.timers.due_at(h))
    }

    /// Outstanding deferred tasks (at most one)
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Where projectiles start: horizontal centre, above the bottom edge
    pub fn launcher_position(&self) -> Vec2 {
        Vec2::new(
            self.bounds.width / 2.0,
            (self.bounds.height - self.settings.launcher_offset).max(0.0),
        )
    }

    /// Drain queued events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// New play area; targets are pulled inside on the next update
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Begin the first round. Ignored once a round exists (use [`reset`](Self::reset)).
    pub fn start_round(&mut self, now: f64) {
        if self.phase != RoundPhase::Idle {
            log::debug!("start_round ignored while {:?}", self.phase);
            return;
        }
        self.timers.advance_to(now);
        self.begin_round();
    }

    /// Drop the current round, whatever its state, and start a fresh one
    pub fn reset(&mut self, now: f64) {
        self.round_timer.disarm(&mut self.timers);
        self.timers.clear();
        self.timers.advance_to(now);
        self.begin_round();
    }

    /// Fire at `index`. Ignored unless the round is accepting input.
    pub fn fire(&mut self, index: usize, now: f64) -> bool {
        self.update(now);
        if self.phase != RoundPhase::AcceptingInput {
            log::debug!("Shot at target {index} ignored while {:?}", self.phase);
            return false;
        }
        self.launch(index, true)
    }

    /// Fire at a random target. Ignored unless the round is accepting input.
    pub fn fire_random(&mut self, now: f64) -> bool {
        self.update(now);
        if self.phase != RoundPhase::AcceptingInput {
            log::debug!("Random shot ignored while {:?}", self.phase);
            return false;
        }
        let index = self.rng.index(self.round.targets.len());
        self.launch(index, false)
    }

    /// A target was tapped
    pub fn tap_target(&mut self, index: usize, now: f64) -> bool {
        self.fire(index, now)
    }

    /// The trigger button: shoots while the round is live, then either resets
    /// or hands control back to the host depending on [`TriggerMode`].
    pub fn press_trigger(&mut self, now: f64) {
        self.update(now);
        match self.phase {
            RoundPhase::AcceptingInput => {
                self.fire_random(now);
            }
            RoundPhase::RoundOver => match self.settings.trigger_mode {
                TriggerMode::Reset => self.reset(now),
                TriggerMode::NotifyHost => {
                    log::info!("Loader action triggered");
                    self.events.push(GameEvent::LoaderActionTriggered);
                }
            },
            RoundPhase::Idle | RoundPhase::Flying => {
                log::debug!("Trigger ignored while {:?}", self.phase);
            }
        }
    }

    /// Advance to `now`: drift targets while the round is live and run any
    /// timers that came due.
    pub fn update(&mut self, now: f64) {
        let now = now.max(self.timers.now());

        while let Some((handle, timer)) = self.timers.pop_due(now) {
            if !self.round_timer.settle(handle) {
                continue;
            }
            // Targets stop where they were at the deadline
            self.drift_targets(self.timers.now());
            match timer {
                RoundTimer::IdleTimeout => self.on_idle_timeout(),
                RoundTimer::Resolve => self.resolve_shot(),
            }
        }
        self.timers.advance_to(now);
        self.drift_targets(now);
    }

    /// Launcher scale for the recoil animation
    pub fn gun_scale(&self, now: f64) -> f32 {
        let Some(fired_at) = self.fired_at else {
            return 1.0;
        };
        let elapsed = now - fired_at;
        let dip = self.settings.recoil_duration;
        let depth = 1.0 - self.settings.recoil_scale;
        if elapsed < 0.0 || dip <= 0.0 {
            1.0
        } else if elapsed < dip {
            1.0 - depth * (elapsed / dip) as f32
        } else if elapsed < dip * 4.0 {
            let back = ((elapsed - dip) / (dip * 3.0)) as f32;
            self.settings.recoil_scale + depth * back
        } else {
            1.0
        }
    }

    fn drift_targets(&mut self, now: f64) {
        if self.phase != RoundPhase::AcceptingInput {
            return;
        }
        let bounds = self.bounds;
        let motion = &self.settings.motion;
        for body in &mut self.round.targets {
            *body = body.updated(now, bounds, motion);
        }
    }

    fn begin_round(&mut self) {
        let now = self.timers.now();
        let correct_target = self.rng.index(TARGET_COUNT).min(TARGET_COUNT - 1);
        let targets = (0..TARGET_COUNT)
            .map(|_| Body::random(&mut self.rng, self.bounds, &self.settings.motion, now))
            .collect();

        self.round = RoundState {
            targets,
            correct_target,
            ..RoundState::default()
        };
        self.projectile = None;
        self.fired_at = None;
        self.round_number += 1;
        self.phase = RoundPhase::AcceptingInput;
        self.round_timer.rearm(
            &mut self.timers,
            self.settings.idle_timeout,
            RoundTimer::IdleTimeout,
        );

        log::info!("Round {} started", self.round_number);
        log::debug!("Round {} winner is target {}", self.round_number, correct_target);
        self.events.push(GameEvent::RoundStarted {
            round: self.round_number,
        });
    }

    fn launch(&mut self, index: usize, aimed: bool) -> bool {
        let Some(target) = self.round.targets.get(index).map(|body| body.position) else {
            log::warn!("Shot at missing target {index} ignored");
            return false;
        };
        let now = self.timers.now();
        let origin = self.launcher_position();

        self.round.selected_target = Some(index);
        self.round.has_interacted = true;
        self.projectile = Some(Projectile {
            origin,
            target,
            launched_at: now,
            duration: self.settings.flight_duration,
            heading: heading(origin, target),
        });
        self.fired_at = Some(now);
        self.phase = RoundPhase::Flying;
        // Replaces the idle timeout
        self.round_timer.rearm(
            &mut self.timers,
            self.settings.resolution_delay(),
            RoundTimer::Resolve,
        );

        log::debug!("Shot fired at target {index} (aimed: {aimed})");
        self.events.push(GameEvent::ShotFired {
            target: index,
            aimed,
        });
        true
    }

    fn on_idle_timeout(&mut self) {
        if self.phase != RoundPhase::AcceptingInput {
            return;
        }
        self.round.did_win = Some(false);
        self.phase = RoundPhase::RoundOver;
        log::info!("Round {} timed out", self.round_number);
        self.events.push(GameEvent::RoundTimedOut);
    }

    fn resolve_shot(&mut self) {
        if self.phase != RoundPhase::Flying {
            return;
        }
        let Some(index) = self.round.selected_target else {
            return;
        };
        let won = index == self.round.correct_target;
        self.round.scores[index] = Some(if won { HIT_SCORE } else { MISS_SCORE });
        self.round.did_win = Some(won);
        self.projectile = None;
        self.round_timer.disarm(&mut self.timers);
        self.phase = RoundPhase::RoundOver;

        log::info!(
            "Round {} resolved: target {index} {}",
            self.round_number,
            if won { "won" } else { "missed" }
        );
        self.events.push(GameEvent::RoundResolved { target: index, won });
    }
}
