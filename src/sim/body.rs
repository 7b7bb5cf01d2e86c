//! Free-floating bodies (eggs and balls)
//!
//! Motion is linear with reflection off an inset boundary, plus a wobble that
//! swings between ±amplitude as a triangle wave.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::Bounds;
use crate::settings::MotionSettings;

/// A floating body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    /// Wobble angle (degrees)
    pub angle: f32,
    /// Degrees per second
    pub angular_speed: f32,
    /// +1 or -1
    pub angular_direction: f32,
    /// Clock time of the last update (seconds)
    pub last_update: f64,
}

impl Body {
    /// Spawn a body at a random spot inside `bounds`
    pub fn random(
        rng: &mut dyn RandomSource,
        bounds: Bounds,
        motion: &MotionSettings,
        now: f64,
    ) -> Self {
        let (min, max) = bounds.inset_range(motion.spawn_inset);
        let amplitude = motion.angle_amplitude;
        let speed = motion.max_spawn_speed;
        Self {
            position: Vec2::new(rng.range(min.x, max.x), rng.range(min.y, max.y)),
            velocity: Vec2::new(rng.range(-speed, speed), rng.range(-speed, speed)),
            angle: rng.range(-amplitude, amplitude),
            angular_speed: rng.range(motion.min_angular_speed, motion.max_angular_speed),
            angular_direction: if rng.coin() { 1.0 } else { -1.0 },
            last_update: now,
        }
    }

    /// The body as it is at `now`.
    ///
    /// Elapsed time is clamped to `[0, max_step]`; a body that passes the
    /// boundary is mirrored back inside with its velocity turned inward.
    pub fn updated(&self, now: f64, bounds: Bounds, motion: &MotionSettings) -> Body {
        let dt = (now - self.last_update).clamp(0.0, motion.max_step as f64) as f32;
        let mut next = *self;
        next.last_update = now.max(self.last_update);

        next.position += next.velocity * dt;
        let (min, max) = bounds.inset_range(Vec2::splat(motion.boundary_margin));
        bounce_axis(&mut next.position.x, &mut next.velocity.x, min.x, max.x);
        bounce_axis(&mut next.position.y, &mut next.velocity.y, min.y, max.y);

        next.angle += next.angular_direction * next.angular_speed * dt;
        let amplitude = motion.angle_amplitude;
        if next.angle > amplitude {
            next.angle = (2.0 * amplitude - next.angle).max(-amplitude);
            next.angular_direction = -1.0;
        } else if next.angle < -amplitude {
            next.angle = (-2.0 * amplitude - next.angle).min(amplitude);
            next.angular_direction = 1.0;
        }

        next
    }

    /// Park the body: no wobble, clock synced to `now`
    pub fn settle_at(&mut self, position: Vec2, now: f64) {
        self.position = position;
        self.angle = 0.0;
        self.last_update = now;
    }
}

fn bounce_axis(pos: &mut f32, vel: &mut f32, min: f32, max: f32) {
    if *pos < min {
        *pos = (2.0 * min - *pos).min(max);
        *vel = vel.abs();
    } else if *pos > max {
        *pos = (2.0 * max - *pos).max(min);
        *vel = -vel.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::PcgSource;
    use proptest::prelude::*;

    fn body_at(position: Vec2, velocity: Vec2) -> Body {
        Body {
            position,
            velocity,
            angle: 0.0,
            angular_speed: 30.0,
            angular_direction: 1.0,
            last_update: 0.0,
        }
    }

    #[test]
    fn test_linear_motion() {
        let motion = MotionSettings::default();
        let body = body_at(Vec2::new(200.0, 400.0), Vec2::new(100.0, -50.0));
        let next = body.updated(0.05, Bounds::new(400.0, 800.0), &motion);
        assert!((next.position - Vec2::new(205.0, 397.5)).length() < 1e-4);
        assert_eq!(next.velocity, body.velocity);
        assert_eq!(next.last_update, 0.05);
    }

    #[test]
    fn test_bounces_off_right_margin() {
        let motion = MotionSettings::default();
        let body = body_at(Vec2::new(345.0, 400.0), Vec2::new(200.0, 0.0));
        let next = body.updated(0.05, Bounds::new(400.0, 800.0), &motion);
        // 345 + 10 = 355 mirrors to 345 off the boundary at 350
        assert!((next.position.x - 345.0).abs() < 1e-4);
        assert_eq!(next.velocity.x, -200.0);
    }

    #[test]
    fn test_bounces_off_top_margin() {
        let motion = MotionSettings::default();
        let body = body_at(Vec2::new(200.0, 52.0), Vec2::new(0.0, -100.0));
        let next = body.updated(0.05, Bounds::new(400.0, 800.0), &motion);
        assert!(next.position.y >= 50.0);
        assert_eq!(next.velocity.y, 100.0);
    }

    #[test]
    fn test_wobble_turns_at_amplitude() {
        let motion = MotionSettings::default();
        let mut body = body_at(Vec2::new(200.0, 400.0), Vec2::ZERO);
        body.angle = 14.0;
        let next = body.updated(0.1, Bounds::new(400.0, 800.0), &motion);
        // 14 + 3 = 17 folds back to 13
        assert!((next.angle - 13.0).abs() < 1e-4);
        assert_eq!(next.angular_direction, -1.0);
    }

    #[test]
    fn test_large_gap_is_capped() {
        let motion = MotionSettings::default();
        let body = body_at(Vec2::new(200.0, 400.0), Vec2::new(100.0, 0.0));
        let next = body.updated(30.0, Bounds::new(400.0, 800.0), &motion);
        assert!((next.position.x - 210.0).abs() < 1e-3);
        assert_eq!(next.last_update, 30.0);
    }

    #[test]
    fn test_clock_going_backward_does_not_move() {
        let motion = MotionSettings::default();
        let mut body = body_at(Vec2::new(200.0, 400.0), Vec2::new(100.0, 0.0));
        body.last_update = 10.0;
        let next = body.updated(9.0, Bounds::new(400.0, 800.0), &motion);
        assert_eq!(next.position, body.position);
        assert_eq!(next.last_update, 10.0);
    }

    #[test]
    fn test_spawn_inside_inset() {
        let motion = MotionSettings::default();
        let mut rng = PcgSource::new(3);
        for _ in 0..200 {
            let body = Body::random(&mut rng, Bounds::new(400.0, 800.0), &motion, 0.0);
            assert!((60.0..=340.0).contains(&body.position.x));
            assert!((100.0..=700.0).contains(&body.position.y));
            assert!(body.velocity.x.abs() <= 200.0 && body.velocity.y.abs() <= 200.0);
            assert!(body.angle.abs() <= 15.0);
            assert!((25.0..=40.0).contains(&body.angular_speed));
            assert!(body.angular_direction == 1.0 || body.angular_direction == -1.0);
        }
    }

    #[test]
    fn test_spawn_in_tiny_area_is_centered() {
        let motion = MotionSettings::default();
        let mut rng = PcgSource::new(3);
        let body = Body::random(&mut rng, Bounds::new(50.0, 90.0), &motion, 0.0);
        assert_eq!(body.position, Vec2::new(25.0, 45.0));
    }

    proptest! {
        #[test]
        fn prop_stays_inside_margin(
            width in 0.0f32..2000.0,
            height in 0.0f32..2000.0,
            seed in any::<u64>(),
            steps in prop::collection::vec(0.0f64..0.5, 1..200),
        ) {
            let motion = MotionSettings::default();
            let bounds = Bounds::new(width, height);
            let mut rng = PcgSource::new(seed);
            let mut body = Body::random(&mut rng, bounds, &motion, 0.0);
            let (min, max) = bounds.inset_range(Vec2::splat(motion.boundary_margin));
            let mut now = 0.0;
            for dt in steps {
                now += dt;
                body = body.updated(now, bounds, &motion);
                prop_assert!(body.position.x >= min.x - 1e-3 && body.position.x <= max.x + 1e-3);
                prop_assert!(body.position.y >= min.y - 1e-3 && body.position.y <= max.y + 1e-3);
            }
        }

        #[test]
        fn prop_angle_within_amplitude(
            seed in any::<u64>(),
            steps in prop::collection::vec(0.0f64..2.0, 1..200),
        ) {
            let motion = MotionSettings::default();
            let bounds = Bounds::new(400.0, 800.0);
            let mut rng = PcgSource::new(seed);
            let mut body = Body::random(&mut rng, bounds, &motion, 0.0);
            let mut now = 0.0;
            for dt in steps {
                now += dt;
                body = body.updated(now, bounds, &motion);
                prop_assert!(body.angle.abs() <= motion.angle_amplitude + 1e-4);
            }
        }
    }
}
