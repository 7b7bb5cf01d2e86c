//! Render snapshots
//!
//! The presentation layer draws whatever these say and makes no decisions of
//! its own. Snapshots serialize to JSON for hosts outside Rust.

use glam::Vec2;
use serde::Serialize;

use crate::consts::HIT_SCORE;
use crate::sim::{EggAnimator, RandomSource, RoundPhase, ShootingGame};

/// Largest target sprite edge
pub const TARGET_MAX_SIZE: f32 = 130.0;
/// Gap between target sprites in the row they are sized for
pub const TARGET_SPACING: f32 = 10.0;
pub const HIT_TARGET_SCALE: f32 = 0.8;
pub const TARGET_SCALE: f32 = 1.5;
pub const MISSED_TARGET_OPACITY: f32 = 0.5;
/// Shown over any scored target
pub const SCORE_MARKER: &str = "+100FS";

pub const EGG_SIZE: Vec2 = Vec2::new(100.0, 120.0);
pub const PICKED_EGG_SIZE: Vec2 = Vec2::new(120.0, 144.0);
pub const OTHER_EGG_OPACITY: f32 = 0.8;

/// Headline text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Banner {
    Instructions,
    Winner,
    TryAgain,
}

impl Banner {
    pub fn text(&self) -> &'static str {
        match self {
            Banner::Instructions => "Click on any of the balls",
            Banner::Winner => "Winner",
            Banner::TryAgain => "Try again",
        }
    }
}

/// Trigger button caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggerLabel {
    Arrow,
    Reset,
}

impl TriggerLabel {
    pub fn text(&self) -> &'static str {
        match self {
            TriggerLabel::Arrow => "ARROW",
            TriggerLabel::Reset => "Reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSprite {
    pub position: Vec2,
    /// Degrees
    pub angle: f32,
    pub size: f32,
    pub scale: f32,
    pub opacity: f32,
    pub score: Option<u32>,
    /// Uses the "hit" artwork
    pub hit: bool,
    pub marker: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileSprite {
    pub position: Vec2,
    /// Radians
    pub heading: f32,
}

/// Everything needed to draw the shooting round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShootingView {
    pub phase: RoundPhase,
    pub round: u32,
    pub targets: Vec<TargetSprite>,
    pub projectile: Option<ProjectileSprite>,
    pub launcher: Vec2,
    pub launcher_scale: f32,
    pub banner: Banner,
    pub banner_text: &'static str,
    pub trigger_label: TriggerLabel,
    pub trigger_text: &'static str,
    pub trigger_enabled: bool,
    pub targets_enabled: bool,
    pub round_over: bool,
    pub did_win: Option<bool>,
}

impl ShootingView {
    pub fn capture<R: RandomSource>(game: &ShootingGame<R>, now: f64) -> Self {
        let round = game.round();
        let size = target_size(game.bounds().width);
        let targets = round
            .targets
            .iter()
            .zip(round.scores.iter())
            .map(|(body, score)| {
                let hit = *score == Some(HIT_SCORE);
                TargetSprite {
                    position: body.position,
                    angle: body.angle,
                    size,
                    scale: if hit { HIT_TARGET_SCALE } else { TARGET_SCALE },
                    opacity: match score {
                        Some(s) if *s != HIT_SCORE => MISSED_TARGET_OPACITY,
                        _ => 1.0,
                    },
                    score: *score,
                    hit,
                    marker: score.map(|_| SCORE_MARKER),
                }
            })
            .collect();

        let projectile = game.projectile().map(|p| ProjectileSprite {
            position: p.position_at(now),
            heading: p.heading,
        });

        let round_over = game.round_over();
        let banner = match (round_over, round.did_win) {
            (true, Some(true)) => Banner::Winner,
            (true, _) => Banner::TryAgain,
            (false, _) => Banner::Instructions,
        };
        let trigger_label = if round_over {
            TriggerLabel::Reset
        } else {
            TriggerLabel::Arrow
        };

        Self {
            phase: game.phase(),
            round: game.round_number(),
            targets,
            projectile,
            launcher: game.launcher_position(),
            launcher_scale: game.gun_scale(now),
            banner,
            banner_text: banner.text(),
            trigger_label,
            trigger_text: trigger_label.text(),
            trigger_enabled: matches!(
                game.phase(),
                RoundPhase::AcceptingInput | RoundPhase::RoundOver
            ),
            targets_enabled: game.is_accepting_input(),
            round_over,
            did_win: round.did_win,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Target edge length for a screen `width` wide
pub fn target_size(width: f32) -> f32 {
    let width = width.max(1.0);
    TARGET_MAX_SIZE.min(((width - TARGET_SPACING * 2.0) / 3.0).max(0.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EggSprite {
    pub position: Vec2,
    /// Degrees
    pub angle: f32,
    pub size: Vec2,
    pub opacity: f32,
}

/// Everything needed to draw the egg picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EggView {
    pub eggs: Vec<EggSprite>,
    pub active: bool,
    pub show_result: bool,
}

impl EggView {
    pub fn capture<R: RandomSource>(animator: &EggAnimator<R>) -> Self {
        let stopped = !animator.is_active();
        let correct = animator.correct_egg();
        let eggs = animator
            .eggs()
            .iter()
            .enumerate()
            .map(|(i, egg)| {
                let picked = stopped && i == correct;
                EggSprite {
                    position: egg.position,
                    angle: egg.angle,
                    size: if picked { PICKED_EGG_SIZE } else { EGG_SIZE },
                    opacity: if stopped && i != correct {
                        OTHER_EGG_OPACITY
                    } else {
                        1.0
                    },
                }
            })
            .collect();

        Self {
            eggs,
            active: animator.is_active(),
            show_result: animator.is_showing_result(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
