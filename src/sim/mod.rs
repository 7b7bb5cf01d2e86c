//! Loading screen simulation
//!
//! All engine logic lives here. Nothing in this module touches rendering or
//! the platform:
//! - Time comes from the host as plain seconds
//! - Randomness only through `RandomSource`
//! - Deferred work only through the engine's own `Scheduler`

pub mod body;
pub mod eggs;
pub mod events;
pub mod rng;
pub mod shooting;
pub mod timer;

pub use body::Body;
pub use eggs::EggAnimator;
pub use events::GameEvent;
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use shooting::{Projectile, RoundPhase, RoundState, ShootingGame};
pub use timer::{Scheduler, TaskHandle, TimerSlot};
