//! Preloader - game-like loading screen engines
//!
//! Core modules:
//! - `sim`: Timer-driven state machines (shoot-the-ball round, egg picker) and body kinematics
//! - `view`: Render snapshots handed to the presentation layer
//! - `settings`: Tunable timings and motion parameters
//! - `host`: WebAssembly bindings (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod host;
pub mod settings;
pub mod sim;
pub mod view;

pub use settings::{MotionSettings, Settings, SettingsError, TriggerMode};
pub use sim::{EggAnimator, GameEvent, RoundPhase, ShootingGame};
pub use view::{EggView, ShootingView};

use glam::Vec2;

/// Engine configuration defaults
pub mod consts {
    /// Targets in a shooting round and eggs in the picker
    pub const TARGET_COUNT: usize = 3;

    /// Score marker for a hit on the correct target
    pub const HIT_SCORE: u32 = 100;
    /// Score marker for a hit on any other target
    pub const MISS_SCORE: u32 = 10;

    /// Inset boundary bodies bounce off (units from each edge)
    pub const BOUNDARY_MARGIN: f32 = 50.0;
    /// Spawn inset from the left/right edges
    pub const SPAWN_INSET_X: f32 = 60.0;
    /// Spawn inset from the top/bottom edges
    pub const SPAWN_INSET_Y: f32 = 100.0;
    /// Max absolute velocity component at spawn (units/s)
    pub const MAX_SPAWN_SPEED: f32 = 200.0;

    /// Wobble amplitude (degrees)
    pub const ANGLE_AMPLITUDE: f32 = 15.0;
    /// Wobble speed range (degrees/s)
    pub const MIN_ANGULAR_SPEED: f32 = 25.0;
    pub const MAX_ANGULAR_SPEED: f32 = 40.0;

    /// Largest time step applied in one kinematic update (seconds)
    pub const MAX_STEP: f32 = 0.1;

    /// Projectile travel time (seconds)
    pub const FLIGHT_DURATION: f64 = 2.0;
    /// Extra wait after the flight before the hit is evaluated
    pub const RESOLUTION_SLACK: f64 = 0.02;
    /// Round ends as a loss if nothing is fired within this window
    pub const IDLE_TIMEOUT: f64 = 5.0;

    /// Launcher recoil
    pub const RECOIL_DURATION: f64 = 0.1;
    pub const RECOIL_SCALE: f32 = 0.9;
    /// Launcher height above the bottom edge
    pub const LAUNCHER_OFFSET: f32 = 150.0;

    /// Delay before fresh eggs replace the collected row (seconds)
    pub const RESTART_DELAY: f64 = 0.3;
    /// Egg result row
    pub const ROW_SPACING: f32 = 140.0;
    pub const ROW_HEIGHT_FRACTION: f32 = 0.7;

    /// Tolerance when comparing timer deadlines against the clock
    pub const TIME_EPSILON: f64 = 1e-9;
}

/// Size of the area bodies move in, as supplied by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Negative, NaN, and infinite extents become 0
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: extent(width),
            height: extent(height),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Closed range `[inset, size - inset]` on both axes.
    ///
    /// An axis narrower than twice the inset collapses to its centre.
    pub fn inset_range(&self, inset: Vec2) -> (Vec2, Vec2) {
        let (min_x, max_x) = axis_range(self.width, inset.x);
        let (min_y, max_y) = axis_range(self.height, inset.y);
        (Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }
}

fn extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn axis_range(extent: f32, inset: f32) -> (f32, f32) {
    if extent >= inset * 2.0 {
        (inset, extent - inset)
    } else {
        (extent / 2.0, extent / 2.0)
    }
}

/// Heading (radians) for a sprite drawn pointing up that travels `from` → `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x) + std::f32::consts::FRAC_PI_2
}
