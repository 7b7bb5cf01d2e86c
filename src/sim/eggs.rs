//! Floating egg picker
//!
//! Eggs drift around the screen until one is tapped; then all of them line up
//! under the result card. Collecting the reward brings the motion back and,
//! after a short delay, a fresh set of eggs. Every tap leads to the same
//! reward, there is nothing to win or lose.

use glam::Vec2;

use super::body::Body;
use super::events::GameEvent;
use super::rng::{PcgSource, RandomSource};
use super::timer::{Scheduler, TimerSlot};
use crate::Bounds;
use crate::consts::TARGET_COUNT;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EggTimer {
    Regenerate,
}

/// The egg picker engine
#[derive(Debug, Clone)]
pub struct EggAnimator<R: RandomSource = PcgSource> {
    settings: Settings,
    rng: R,
    bounds: Bounds,
    eggs: Vec<Body>,
    correct_egg: usize,
    active: bool,
    showing_result: bool,
    timers: Scheduler<EggTimer>,
    regenerate: TimerSlot,
    events: Vec<GameEvent>,
}

impl EggAnimator<PcgSource> {
    pub fn with_seed(settings: Settings, seed: u64, now: f64) -> Self {
        Self::new(settings, PcgSource::new(seed), now)
    }
}

impl<R: RandomSource> EggAnimator<R> {
    pub fn new(settings: Settings, rng: R, now: f64) -> Self {
        Self {
            settings,
            rng,
            bounds: Bounds::default(),
            eggs: Vec::new(),
            correct_egg: 0,
            active: true,
            showing_result: false,
            timers: Scheduler::new(now),
            regenerate: TimerSlot::default(),
            events: Vec::new(),
        }
    }

    pub fn eggs(&self) -> &[Body] {
        &self.eggs
    }

    /// The egg drawn larger once the result is showing
    pub fn correct_egg(&self) -> usize {
        self.correct_egg
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_showing_result(&self) -> bool {
        self.showing_result
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn the eggs on first appearance
    pub fn start(&mut self, bounds: Bounds, now: f64) {
        self.bounds = bounds;
        self.timers.advance_to(now);
        if self.eggs.is_empty() {
            self.draw_correct_egg();
            self.scatter();
        }
    }

    /// Per-frame update
    pub fn tick(&mut self, now: f64, bounds: Bounds) {
        self.bounds = bounds;
        let now = now.max(self.timers.now());

        while let Some((handle, timer)) = self.timers.pop_due(now) {
            if !self.regenerate.settle(handle) {
                continue;
            }
            match timer {
                EggTimer::Regenerate => {
                    self.draw_correct_egg();
                    self.scatter();
                }
            }
        }
        self.timers.advance_to(now);

        if !self.active {
            return;
        }
        let motion = &self.settings.motion;
        for egg in &mut self.eggs {
            *egg = egg.updated(now, bounds, motion);
        }
    }

    /// An egg was tapped: stop and line everything up under the result card
    pub fn select(&mut self, index: usize, now: f64) -> bool {
        self.tick(now, self.bounds);
        if !self.active {
            log::debug!("Egg {index} tap ignored, picker is stopped");
            return false;
        }
        if index >= self.eggs.len() {
            log::debug!("Tap on missing egg {index} ignored");
            return false;
        }

        self.regenerate.disarm(&mut self.timers);
        self.active = false;
        let now = self.timers.now();
        let row = self.row_positions();
        for (egg, slot) in self.eggs.iter_mut().zip(row) {
            egg.settle_at(slot, now);
        }
        self.showing_result = true;

        log::info!("Egg {index} picked");
        self.events.push(GameEvent::EggSelected { index });
        true
    }

    /// Collect the reward: hide the result, resume motion, and schedule a
    /// fresh set of eggs
    pub fn restart(&mut self, now: f64) -> bool {
        self.tick(now, self.bounds);
        if !self.showing_result {
            log::debug!("Restart ignored, no result showing");
            return false;
        }
        self.showing_result = false;
        self.active = true;
        self.regenerate.rearm(
            &mut self.timers,
            self.settings.restart_delay,
            EggTimer::Regenerate,
        );
        log::info!("Result collected");
        self.events.push(GameEvent::ResultCollected);
        true
    }

    /// Evenly spaced, centred row at the configured height
    pub fn row_positions(&self) -> Vec<Vec2> {
        let count = self.eggs.len();
        let spacing = self.settings.row_spacing;
        let total = spacing * count.saturating_sub(1) as f32;
        let start_x = self.bounds.width / 2.0 - total / 2.0;
        let y = self.bounds.height * self.settings.row_height_fraction;
        (0..count)
            .map(|i| Vec2::new(start_x + spacing * i as f32, y))
            .collect()
    }

    fn draw_correct_egg(&mut self) {
        self.correct_egg = self.rng.index(TARGET_COUNT).min(TARGET_COUNT - 1);
    }

    fn scatter(&mut self) {
        let now = self.timers.now();
        self.eggs = (0..TARGET_COUNT)
            .map(|_| Body::random(&mut self.rng, self.bounds, &self.settings.motion, now))
            .collect();
        log::debug!("Scattered {} eggs", self.eggs.len());
        self.events.push(GameEvent::EggsScattered);
    }
}
