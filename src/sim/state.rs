//! Game state and core simulation types
//!
//! Coordinates are logical pixels with the origin at the screen center and
//! Y pointing up; [`crate::to_device`] converts to device space for drawing.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball::Ball;
use crate::consts::*;
use crate::input::{self, KeyCode};

/// Viewport dimensions in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Scale factor applied to all size/speed constants so gameplay feel is
    /// resolution-independent
    #[inline]
    pub fn ratio(&self) -> f32 {
        self.width / LOGICAL_WIDTH
    }
}

/// Which half of the court a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Index into the `[Paddle; 2]` array (left first)
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Current movement intent of a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    Up,
    Down,
    #[default]
    Idle,
}

/// A player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub side: Side,
    /// Vertical offset of the paddle center from the screen center
    pub y_offset: f32,
    pub intent: Intent,
    pub score: u32,
    /// (up, down) key codes this paddle answers to
    pub buttons: (KeyCode, KeyCode),
    /// Ratio-scaled movement speed per tick
    pub speed: f32,
    /// Ratio-scaled body width
    pub width: f32,
    /// Ratio-scaled body height
    pub height: f32,
    viewport: Viewport,
}

impl Paddle {
    pub fn new(viewport: Viewport, side: Side, buttons: (KeyCode, KeyCode)) -> Self {
        let ratio = viewport.ratio();
        Self {
            side,
            y_offset: 0.0,
            intent: Intent::Idle,
            score: 0,
            buttons,
            speed: PADDLE_SPEED * ratio,
            width: PADDLE_WIDTH * ratio,
            height: PADDLE_HEIGHT * ratio,
            viewport,
        }
    }

    /// Recompute ratio-scaled constants after a viewport change. The offset
    /// is left alone; the next `advance` clamps it if it is now out of
    /// bounds.
    pub fn resync(&mut self, viewport: Viewport) {
        let ratio = viewport.ratio();
        self.viewport = viewport;
        self.speed = PADDLE_SPEED * ratio;
        self.width = PADDLE_WIDTH * ratio;
        self.height = PADDLE_HEIGHT * ratio;
    }

    pub fn set_intent(&mut self, intent: Intent) {
        self.intent = intent;
    }

    pub fn clear_intent(&mut self) {
        self.intent = Intent::Idle;
    }

    /// Set intent if the key is one of this paddle's bound buttons
    pub fn process_key_down(&mut self, key: KeyCode) {
        if key == self.buttons.0 {
            self.set_intent(Intent::Up);
        } else if key == self.buttons.1 {
            self.set_intent(Intent::Down);
        }
    }

    /// Clear intent on release of either bound button
    pub fn process_key_up(&mut self, key: KeyCode) {
        if key == self.buttons.0 || key == self.buttons.1 {
            self.clear_intent();
        }
    }

    /// Largest |y_offset| that keeps the whole paddle on screen
    #[inline]
    pub fn offset_bound(&self) -> f32 {
        (self.viewport.height / 2.0 - self.height / 2.0).max(0.0)
    }

    /// Advance one tick. `tick_scale` compensates for variable frame timing
    /// (nominal rate over observed rate).
    pub fn advance(&mut self, tick_scale: f32) {
        match self.intent {
            Intent::Up => self.y_offset += self.speed * tick_scale,
            Intent::Down => self.y_offset -= self.speed * tick_scale,
            Intent::Idle => {}
        }
        let bound = self.offset_bound();
        self.y_offset = self.y_offset.clamp(-bound, bound);
    }

    /// Fixed horizontal position of the paddle center, offset from the
    /// screen edge by a scaled margin and negated for the left side
    #[inline]
    pub fn anchor_x(&self) -> f32 {
        let x = self.viewport.width / 2.0 - PADDLE_MARGIN * self.viewport.ratio();
        match self.side {
            Side::Left => -x,
            Side::Right => x,
        }
    }
}

/// Complete match state. Owns both paddles, the current ball and the RNG;
/// the sole authority for replacing the ball and crediting points.
#[derive(Debug, Clone)]
pub struct GameState {
    pub viewport: Viewport,
    /// Left paddle first, then right
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub rng: Pcg32,
    pub seed: u64,
    pub time_ticks: u64,
}

impl GameState {
    /// Create a fresh match with default key bindings and a served ball
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let paddles = [
            Paddle::new(viewport, Side::Left, input::LEFT_BUTTONS),
            Paddle::new(viewport, Side::Right, input::RIGHT_BUTTONS),
        ];
        let ball = Ball::serve(viewport, &mut rng);
        Self {
            viewport,
            paddles,
            ball,
            rng,
            seed,
            time_ticks: 0,
        }
    }

    /// Switch to a new viewport, resyncing both paddles and the ball in the
    /// same tick boundary so collision geometry stays consistent
    pub fn resync(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for paddle in &mut self.paddles {
            paddle.resync(viewport);
        }
        self.ball.sync_dimensions(viewport);
        log::info!(
            "viewport resynced to {}x{} (ratio {:.3})",
            viewport.width,
            viewport.height,
            viewport.ratio()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_paddle(side: Side) -> Paddle {
        let buttons = match side {
            Side::Left => input::LEFT_BUTTONS,
            Side::Right => input::RIGHT_BUTTONS,
        };
        Paddle::new(Viewport::new(1000.0, 562.0), side, buttons)
    }

    #[test]
    fn test_ratio_scaling() {
        let paddle = test_paddle(Side::Left);
        assert_eq!(paddle.speed, PADDLE_SPEED);
        assert_eq!(paddle.width, PADDLE_WIDTH);
        assert_eq!(paddle.height, PADDLE_HEIGHT);

        let mut half = test_paddle(Side::Left);
        half.resync(Viewport::new(500.0, 281.0));
        assert_eq!(half.speed, PADDLE_SPEED * 0.5);
        assert_eq!(half.height, PADDLE_HEIGHT * 0.5);
    }

    #[test]
    fn test_idle_paddle_does_not_move() {
        let mut paddle = test_paddle(Side::Left);
        paddle.y_offset = 42.0;
        for _ in 0..100 {
            paddle.advance(1.0);
        }
        assert_eq!(paddle.y_offset, 42.0);
    }

    #[test]
    fn test_key_dispatch_filters_on_bindings() {
        let mut paddle = test_paddle(Side::Left);
        paddle.process_key_down(input::RIGHT_UP);
        assert_eq!(paddle.intent, Intent::Idle);

        paddle.process_key_down(input::LEFT_UP);
        assert_eq!(paddle.intent, Intent::Up);
        // Idempotent
        paddle.process_key_down(input::LEFT_UP);
        assert_eq!(paddle.intent, Intent::Up);

        // Release of the other bound key still clears
        paddle.process_key_up(input::LEFT_DOWN);
        assert_eq!(paddle.intent, Intent::Idle);
    }

    #[test]
    fn test_anchor_x_positions() {
        let left = test_paddle(Side::Left);
        let right = test_paddle(Side::Right);
        assert_eq!(left.anchor_x(), -465.0);
        assert_eq!(right.anchor_x(), 465.0);
    }

    #[test]
    fn test_resync_does_not_rescale_offset() {
        let mut paddle = test_paddle(Side::Left);
        paddle.y_offset = 200.0;
        paddle.resync(Viewport::new(500.0, 281.0));
        assert_eq!(paddle.y_offset, 200.0);
        // Next advance clamps to the shrunk bound
        paddle.advance(1.0);
        assert_eq!(paddle.y_offset, paddle.offset_bound());
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_bounds(
            intents in proptest::collection::vec(0u8..3, 1..200),
            tick_scale in 0.1f32..4.0,
        ) {
            let mut paddle = test_paddle(Side::Right);
            let bound = paddle.offset_bound();
            for raw in intents {
                paddle.set_intent(match raw {
                    0 => Intent::Up,
                    1 => Intent::Down,
                    _ => Intent::Idle,
                });
                paddle.advance(tick_scale);
                prop_assert!(paddle.y_offset.abs() <= bound);
            }
        }
    }
}
