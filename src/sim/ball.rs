//! Ball entity
//!
//! The ball advances in sub-steps so fast shots cannot tunnel through a
//! paddle between ticks. It never touches scores itself: a vertical-wall
//! breach is reported as the side to credit and the instance flags itself
//! for replacement.

use glam::Vec2;
use rand::Rng;

use super::collision::{self, WallHit};
use super::state::{Paddle, Side, Viewport};
use crate::consts::*;

/// The ball in play
#[derive(Debug, Clone)]
pub struct Ball {
    /// Offset from the screen center
    pub pos: Vec2,
    /// Travel angle in degrees; 0 = toward +Y, decomposed as `(sin a, cos a)`
    pub angle: f32,
    /// Ratio-scaled distance covered per tick
    pub speed: f32,
    /// Ratio-scaled radius
    pub radius: f32,
    /// Set once a point is scored; the driver must discard this instance
    pub replaced: bool,
    viewport: Viewport,
}

impl Ball {
    /// Serve a fresh ball from the center with a random angle. The magnitude
    /// stays in [20, 160) degrees so the serve is never near-horizontal; the
    /// sign picks which player receives.
    pub fn serve<R: Rng>(viewport: Viewport, rng: &mut R) -> Self {
        let magnitude: f32 = rng.random_range(ANGLE_MIN..ANGLE_MAX);
        let angle = if rng.random_bool(0.5) {
            magnitude
        } else {
            -magnitude
        };
        let ratio = viewport.ratio();
        Self {
            pos: Vec2::ZERO,
            angle,
            speed: BALL_SPEED * ratio,
            radius: BALL_RADIUS * ratio,
            replaced: false,
            viewport,
        }
    }

    /// Rescale speed and radius for a new viewport. Must be invoked together
    /// with both paddles' `resync` in the same tick boundary.
    pub fn sync_dimensions(&mut self, viewport: Viewport) {
        let ratio = viewport.ratio();
        self.viewport = viewport;
        self.speed = BALL_SPEED * ratio;
        self.radius = BALL_RADIUS * ratio;
    }

    /// Advance one tick. Returns the side to credit when a point was scored;
    /// in that case `replaced` is set and the ball stops processing.
    pub fn advance<R: Rng>(
        &mut self,
        tick_scale: f32,
        paddles: &[Paddle; 2],
        rng: &mut R,
    ) -> Option<Side> {
        if self.replaced {
            return None;
        }

        let step = self.speed * tick_scale / BALL_ACCURACY as f32;
        // At most one paddle rebound is registered per tick
        let mut paddle_hit = false;

        for _ in 0..BALL_ACCURACY {
            let delta = collision::heading(self.angle) * step;
            self.pos += delta;

            if collision::wall_collision(self.pos, self.radius, self.viewport)
                == WallHit::Horizontal
            {
                // Undo this sub-step's vertical displacement and bounce
                self.pos.y -= delta.y;
                self.angle = collision::mirror_angle(self.angle);
                log::debug!("ball bounced off horizontal wall, new angle {:.1}", self.angle);
            }

            // Re-test: the bounce may leave a simultaneous vertical breach
            if collision::wall_collision(self.pos, self.radius, self.viewport) == WallHit::Vertical
            {
                // The defender whose wall was NOT breached scores
                let scorer = if self.pos.x > 0.0 {
                    Side::Left
                } else {
                    Side::Right
                };
                log::debug!("ball breached {} wall", scorer.as_str());
                self.replaced = true;
                return Some(scorer);
            }

            if !paddle_hit {
                for paddle in paddles {
                    if collision::paddle_overlap(self.pos, self.radius, paddle) {
                        let magnitude: f32 = rng.random_range(ANGLE_MIN..ANGLE_MAX);
                        // Always redirect back toward the opposite side
                        self.angle = match paddle.side {
                            Side::Left => magnitude,
                            Side::Right => -magnitude,
                        };
                        log::debug!(
                            "ball hit {} paddle, new angle {:.1}",
                            paddle.side.as_str(),
                            self.angle
                        );
                        paddle_hit = true;
                        break;
                    }
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 562.0)
    }

    fn paddles() -> [Paddle; 2] {
        [
            Paddle::new(viewport(), Side::Left, input::LEFT_BUTTONS),
            Paddle::new(viewport(), Side::Right, input::RIGHT_BUTTONS),
        ]
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_serve_angle_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let ball = Ball::serve(viewport(), &mut rng);
            let magnitude = ball.angle.abs();
            assert!((ANGLE_MIN..ANGLE_MAX).contains(&magnitude), "{}", ball.angle);
            assert_eq!(ball.pos, Vec2::ZERO);
            assert!(!ball.replaced);
        }
    }

    #[test]
    fn test_serve_sign_is_balanced() {
        let mut rng = rng();
        let positive = (0..500)
            .filter(|_| Ball::serve(viewport(), &mut rng).angle > 0.0)
            .count();
        assert!((150..350).contains(&positive), "{positive}");
    }

    #[test]
    fn test_pure_sideways_travel() {
        // Angle 90 is pure +X; speed 5 over one unit tick lands at (5, 0)
        let mut ball = Ball::serve(viewport(), &mut rng());
        ball.pos = Vec2::ZERO;
        ball.angle = 90.0;
        let scored = ball.advance(1.0, &paddles(), &mut rng());
        assert_eq!(scored, None);
        assert!((ball.pos.x - 5.0).abs() < 1e-4, "{}", ball.pos.x);
        assert!(ball.pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_wall_bounce_preserves_horizontal_motion() {
        let mut ball = Ball::serve(viewport(), &mut rng());
        // Heading up-right, just below the top wall
        ball.angle = 45.0;
        ball.pos = Vec2::new(0.0, 273.0);
        let before = collision::heading(ball.angle);
        ball.advance(1.0, &paddles(), &mut rng());
        let after = collision::heading(ball.angle);
        assert!(after.y < 0.0, "vertical component should flip");
        assert!((after.x - before.x).abs() < 1e-4);
        assert!(!ball.replaced);
    }

    #[test]
    fn test_breach_right_awards_left() {
        let mut ball = Ball::serve(viewport(), &mut rng());
        ball.angle = 90.0;
        // Clear of the right paddle's vertical window so it cannot save
        ball.pos = Vec2::new(492.0, 100.0);
        let scored = ball.advance(1.0, &paddles(), &mut rng());
        assert_eq!(scored, Some(Side::Left));
        assert!(ball.replaced);
    }

    #[test]
    fn test_breach_left_awards_right() {
        let mut ball = Ball::serve(viewport(), &mut rng());
        ball.angle = -90.0;
        ball.pos = Vec2::new(-492.0, 100.0);
        let scored = ball.advance(1.0, &paddles(), &mut rng());
        assert_eq!(scored, Some(Side::Right));
        assert!(ball.replaced);
    }

    #[test]
    fn test_replaced_ball_is_inert() {
        let mut ball = Ball::serve(viewport(), &mut rng());
        ball.replaced = true;
        let pos = ball.pos;
        assert_eq!(ball.advance(1.0, &paddles(), &mut rng()), None);
        assert_eq!(ball.pos, pos);
    }

    #[test]
    fn test_paddle_rebound_redirects_away() {
        let mut ball = Ball::serve(viewport(), &mut rng());
        // Heading right, dead on the right paddle's anchor
        ball.angle = 90.0;
        ball.pos = Vec2::new(460.0, 0.0);
        let scored = ball.advance(1.0, &paddles(), &mut rng());
        assert_eq!(scored, None);
        assert!(ball.angle < 0.0, "rebound off the right paddle must head left");
        assert!((ANGLE_MIN..ANGLE_MAX).contains(&ball.angle.abs()));
    }

    #[test]
    fn test_sync_dimensions_rescales_exactly() {
        let mut ball = Ball::serve(viewport(), &mut rng());
        ball.sync_dimensions(Viewport::new(1920.0, 1080.0));
        assert_eq!(ball.speed, BALL_SPEED * 1.92);
        assert_eq!(ball.radius, BALL_RADIUS * 1.92);
    }

    #[test]
    fn test_determinism_same_seed_same_trajectory() {
        let mut a = Ball::serve(viewport(), &mut Pcg32::seed_from_u64(99));
        let mut b = Ball::serve(viewport(), &mut Pcg32::seed_from_u64(99));
        assert_eq!(a.angle, b.angle);
        let mut rng_a = Pcg32::seed_from_u64(1);
        let mut rng_b = Pcg32::seed_from_u64(1);
        let paddles = paddles();
        for _ in 0..300 {
            let sa = a.advance(1.0, &paddles, &mut rng_a);
            let sb = b.advance(1.0, &paddles, &mut rng_b);
            assert_eq!(sa, sb);
            assert_eq!(a.pos, b.pos);
        }
    }
}
