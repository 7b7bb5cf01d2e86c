//! Engine settings
//!
//! Every timing and motion constant can be overridden from JSON; missing keys
//! keep their defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What the trigger button does once a shooting round is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TriggerMode {
    /// Start a new round in place
    #[default]
    Reset,
    /// Tell the host to move past the loading screen
    NotifyHost,
}

impl TriggerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Reset => "Reset",
            TriggerMode::NotifyHost => "NotifyHost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reset" => Some(TriggerMode::Reset),
            "notify" | "notifyhost" | "notify_host" => Some(TriggerMode::NotifyHost),
            _ => None,
        }
    }
}

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Free-floating body motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Inset boundary bodies bounce off
    pub boundary_margin: f32,
    /// Spawn inset per axis
    pub spawn_inset: Vec2,
    /// Max absolute velocity component at spawn (units/s)
    pub max_spawn_speed: f32,
    /// Wobble amplitude (degrees)
    pub angle_amplitude: f32,
    /// Wobble speed range (degrees/s)
    pub min_angular_speed: f32,
    pub max_angular_speed: f32,
    /// Largest time step applied in one update (seconds)
    pub max_step: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            boundary_margin: BOUNDARY_MARGIN,
            spawn_inset: Vec2::new(SPAWN_INSET_X, SPAWN_INSET_Y),
            max_spawn_speed: MAX_SPAWN_SPEED,
            angle_amplitude: ANGLE_AMPLITUDE,
            min_angular_speed: MIN_ANGULAR_SPEED,
            max_angular_speed: MAX_ANGULAR_SPEED,
            max_step: MAX_STEP,
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub motion: MotionSettings,

    // === Shooting round ===
    /// Projectile travel time (seconds)
    pub flight_duration: f64,
    /// Wait after the flight before the hit is evaluated
    pub resolution_slack: f64,
    /// No shot within this window ends the round as a loss
    pub idle_timeout: f64,
    /// Launcher recoil length (seconds) and depth
    pub recoil_duration: f64,
    pub recoil_scale: f32,
    /// Launcher height above the bottom edge
    pub launcher_offset: f32,
    /// Trigger behaviour after the round is over
    pub trigger_mode: TriggerMode,

    // === Egg picker ===
    /// Delay before fresh eggs replace the collected row
    pub restart_delay: f64,
    /// Horizontal spacing of the result row
    pub row_spacing: f32,
    /// Vertical position of the result row (fraction of height)
    pub row_height_fraction: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            motion: MotionSettings::default(),

            flight_duration: FLIGHT_DURATION,
            resolution_slack: RESOLUTION_SLACK,
            idle_timeout: IDLE_TIMEOUT,
            recoil_duration: RECOIL_DURATION,
            recoil_scale: RECOIL_SCALE,
            launcher_offset: LAUNCHER_OFFSET,
            trigger_mode: TriggerMode::Reset,

            restart_delay: RESTART_DELAY,
            row_spacing: ROW_SPACING,
            row_height_fraction: ROW_HEIGHT_FRACTION,
        }
    }
}

impl Settings {
    /// Defaults with a different trigger behaviour
    pub fn with_trigger_mode(mode: TriggerMode) -> Self {
        Self {
            trigger_mode: mode,
            ..Self::default()
        }
    }

    /// Time from a shot to its evaluation
    #[inline]
    pub fn resolution_delay(&self) -> f64 {
        self.flight_duration + self.resolution_slack
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Check that timings and ranges are usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        let m = &self.motion;
        let finite = [
            ("motion.boundary_margin", m.boundary_margin.is_finite()),
            ("motion.spawn_inset", m.spawn_inset.is_finite()),
            ("motion.max_spawn_speed", m.max_spawn_speed.is_finite()),
            ("motion.angle_amplitude", m.angle_amplitude.is_finite()),
            ("motion.min_angular_speed", m.min_angular_speed.is_finite()),
            ("motion.max_angular_speed", m.max_angular_speed.is_finite()),
            ("motion.max_step", m.max_step.is_finite()),
            ("flight_duration", self.flight_duration.is_finite()),
            ("resolution_slack", self.resolution_slack.is_finite()),
            ("idle_timeout", self.idle_timeout.is_finite()),
            ("recoil_duration", self.recoil_duration.is_finite()),
            ("recoil_scale", self.recoil_scale.is_finite()),
            ("launcher_offset", self.launcher_offset.is_finite()),
            ("restart_delay", self.restart_delay.is_finite()),
            ("row_spacing", self.row_spacing.is_finite()),
            ("row_height_fraction", self.row_height_fraction.is_finite()),
        ];
        if let Some(&(field, _)) = finite.iter().find(|(_, ok)| !ok) {
            return Err(invalid(field, "must be finite"));
        }
        // Symmetric spawn ranges span twice these values
        if m.max_spawn_speed > MAX_SYMMETRIC_BOUND {
            return Err(invalid("motion.max_spawn_speed", "is too large"));
        }
        if m.angle_amplitude > MAX_SYMMETRIC_BOUND {
            return Err(invalid("motion.angle_amplitude", "is too large"));
        }
        if !(m.boundary_margin >= 0.0) {
            return Err(invalid("motion.boundary_margin", "must be non-negative"));
        }
        if !(m.spawn_inset.x >= 0.0 && m.spawn_inset.y >= 0.0) {
            return Err(invalid("motion.spawn_inset", "must be non-negative"));
        }
        if !(m.max_spawn_speed >= 0.0) {
            return Err(invalid("motion.max_spawn_speed", "must be non-negative"));
        }
        if !(m.angle_amplitude > 0.0) {
            return Err(invalid("motion.angle_amplitude", "must be positive"));
        }
        if !(m.min_angular_speed >= 0.0 && m.min_angular_speed <= m.max_angular_speed) {
            return Err(invalid(
                "motion.min_angular_speed",
                "must be non-negative and not above max_angular_speed",
            ));
        }
        if !(m.max_step > 0.0) {
            return Err(invalid("motion.max_step", "must be positive"));
        }
        if !(self.flight_duration > 0.0) {
            return Err(invalid("flight_duration", "must be positive"));
        }
        if !(self.resolution_slack >= 0.0) {
            return Err(invalid("resolution_slack", "must be non-negative"));
        }
        if !(self.idle_timeout > 0.0) {
            return Err(invalid("idle_timeout", "must be positive"));
        }
        if !(self.recoil_duration >= 0.0) {
            return Err(invalid("recoil_duration", "must be non-negative"));
        }
        if !(self.restart_delay >= 0.0) {
            return Err(invalid("restart_delay", "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.row_height_fraction) {
            return Err(invalid("row_height_fraction", "must be within 0..=1"));
        }
        Ok(())
    }
}

const MAX_SYMMETRIC_BOUND: f32 = f32::MAX / 2.0;

fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!((settings.resolution_delay() - 2.02).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "idle_timeout": 8.0, "motion": { "max_step": 0.05 } }"#)
                .unwrap();
        assert_eq!(settings.idle_timeout, 8.0);
        assert_eq!(settings.motion.max_step, 0.05);
        assert_eq!(settings.motion.boundary_margin, BOUNDARY_MARGIN);
        assert_eq!(settings.flight_duration, FLIGHT_DURATION);
    }

    #[test]
    fn test_trigger_mode_from_json() {
        let settings = Settings::from_json(r#"{ "trigger_mode": "NotifyHost" }"#).unwrap();
        assert_eq!(settings.trigger_mode, TriggerMode::NotifyHost);
    }

    #[test]
    fn test_rejects_negative_flight() {
        let err = Settings::from_json(r#"{ "flight_duration": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "flight_duration",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_angular_range() {
        let err = Settings::from_json(
            r#"{ "motion": { "min_angular_speed": 50.0, "max_angular_speed": 10.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_overflowing_speed() {
        // Parses to infinity as f32
        let err = Settings::from_json(r#"{ "motion": { "max_spawn_speed": 1e39 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "motion.max_spawn_speed",
                reason: "must be finite"
            }
        ));

        let err = Settings::from_json(r#"{ "motion": { "max_spawn_speed": 3.0e38 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "motion.max_spawn_speed",
                reason: "is too large"
            }
        ));
    }

    #[test]
    fn test_rejects_oversized_amplitude() {
        let err = Settings::from_json(r#"{ "motion": { "angle_amplitude": 2.0e38 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "motion.angle_amplitude",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_infinite_timings() {
        let mut settings = Settings::default();
        settings.idle_timeout = f64::INFINITY;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "idle_timeout",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.motion.spawn_inset.y = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_largest_accepted_speed_spawns() {
        use crate::Bounds;
        use crate::sim::ShootingGame;

        let settings =
            Settings::from_json(r#"{ "motion": { "max_spawn_speed": 1.0e38 } }"#).unwrap();
        let mut game = ShootingGame::with_seed(settings, Bounds::new(400.0, 800.0), 11, 0.0);
        game.start_round(0.0);
        assert!(game.round().targets.iter().all(|b| b.velocity.is_finite()));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ idle_timeout: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load_or_default(Path::new("/nonexistent/preloader.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_json_roundtrip_preserves_mode() {
        let settings = Settings::with_trigger_mode(TriggerMode::NotifyHost);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_trigger_mode_names() {
        assert_eq!(TriggerMode::from_str("notify"), Some(TriggerMode::NotifyHost));
        assert_eq!(TriggerMode::from_str("RESET"), Some(TriggerMode::Reset));
        assert_eq!(TriggerMode::from_str("other"), None);
        assert_eq!(TriggerMode::NotifyHost.as_str(), "NotifyHost");
    }
}
