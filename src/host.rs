//! WebAssembly bindings
//!
//! The page drives these from `requestAnimationFrame` and its input
//! handlers. Time comes from `Date.now()`; snapshots and events cross the
//! boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::sim::{EggAnimator, GameEvent, ShootingGame};
use crate::view::{EggView, ShootingView};
use crate::{Bounds, Settings};

fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

fn settings_from(json: Option<String>) -> Settings {
    match json {
        Some(json) => Settings::from_json(&json).unwrap_or_else(|err| {
            log::warn!("{err}; using default settings");
            Settings::default()
        }),
        None => Settings::default(),
    }
}

fn events_json(events: &[GameEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| "[]".to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Preloader engines ready");
}

/// Shoot-the-ball round driven from JavaScript
#[wasm_bindgen]
pub struct ShootingHost {
    game: ShootingGame,
}

#[wasm_bindgen]
impl ShootingHost {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, settings_json: Option<String>) -> ShootingHost {
        let now = now_secs();
        let seed = js_sys::Date::now() as u64;
        let mut game = ShootingGame::with_seed(
            settings_from(settings_json),
            Bounds::new(width, height),
            seed,
            now,
        );
        game.start_round(now);
        log::info!("Shooting round created with seed: {}", seed);
        Self { game }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.resize(Bounds::new(width, height));
    }

    /// Call once per animation frame
    pub fn update(&mut self) {
        self.game.update(now_secs());
    }

    pub fn tap_target(&mut self, index: usize) -> bool {
        self.game.tap_target(index, now_secs())
    }

    pub fn press_trigger(&mut self) {
        self.game.press_trigger(now_secs());
    }

    pub fn reset(&mut self) {
        self.game.reset(now_secs());
    }

    /// `ShootingView` as JSON
    pub fn snapshot(&self) -> String {
        ShootingView::capture(&self.game, now_secs())
            .to_json()
            .unwrap_or_default()
    }

    /// Events since the last call, as a JSON array
    pub fn take_events(&mut self) -> String {
        events_json(&self.game.take_events())
    }
}

/// Egg picker driven from JavaScript
#[wasm_bindgen]
pub struct EggHost {
    animator: EggAnimator,
}

#[wasm_bindgen]
impl EggHost {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, settings_json: Option<String>) -> EggHost {
        let now = now_secs();
        let seed = js_sys::Date::now() as u64;
        let mut animator = EggAnimator::with_seed(settings_from(settings_json), seed, now);
        animator.start(Bounds::new(width, height), now);
        Self { animator }
    }

    /// Call once per animation frame with the current canvas size
    pub fn tick(&mut self, width: f32, height: f32) {
        self.animator.tick(now_secs(), Bounds::new(width, height));
    }

    pub fn select(&mut self, index: usize) -> bool {
        self.animator.select(index, now_secs())
    }

    /// The "Collect" button
    pub fn collect(&mut self) -> bool {
        self.animator.restart(now_secs())
    }

    /// `EggView` as JSON
    pub fn snapshot(&self) -> String {
        EggView::capture(&self.animator).to_json().unwrap_or_default()
    }

    pub fn take_events(&mut self) -> String {
        events_json(&self.animator.take_events())
    }
}
