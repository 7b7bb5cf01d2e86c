//! Events engines queue for their host

use serde::{Deserialize, Serialize};

/// Something the host may want to react to (sounds, haptics, navigation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A shooting round began accepting input
    RoundStarted { round: u32 },
    /// A projectile left the launcher. `aimed` is false for the generic trigger.
    ShotFired { target: usize, aimed: bool },
    /// The projectile arrived and the hit was scored
    RoundResolved { target: usize, won: bool },
    /// Nothing was fired in time
    RoundTimedOut,
    /// The host should move past the loading screen
    LoaderActionTriggered,
    /// Fresh eggs were spawned
    EggsScattered,
    /// An egg was tapped and the result overlay is showing
    EggSelected { index: usize },
    /// The result overlay was dismissed
    ResultCollected,
}
