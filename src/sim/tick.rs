//! Per-tick simulation driver
//!
//! One call advances the whole match by a tick: dispatch this tick's key
//! events, move the paddles, move the ball, credit points, and swap in a
//! fresh ball after a score.

use super::ball::Ball;
use super::state::GameState;
use crate::input::KeyCode;

/// Input events collected for a single tick. Key codes arrive pre-mapped
/// from the keyboard and the button bridge alike; unrecognized codes are
/// simply ignored by both paddles.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub key_downs: Vec<KeyCode>,
    pub key_ups: Vec<KeyCode>,
}

/// Advance the match by one tick. `tick_scale` is the nominal rate over the
/// observed rate, keeping motion speed independent of actual frame timing.
pub fn tick(state: &mut GameState, input: &TickInput, tick_scale: f32) {
    state.time_ticks += 1;

    for &key in &input.key_downs {
        for paddle in &mut state.paddles {
            paddle.process_key_down(key);
        }
    }
    for &key in &input.key_ups {
        for paddle in &mut state.paddles {
            paddle.process_key_up(key);
        }
    }

    for paddle in &mut state.paddles {
        paddle.advance(tick_scale);
    }

    if let Some(side) = state.ball.advance(tick_scale, &state.paddles, &mut state.rng) {
        let paddle = &mut state.paddles[side.index()];
        paddle.score += 1;
        log::info!("{} scores, now at {}", side.as_str(), paddle.score);
    }

    // A scored ball is terminal; replace it before anything reads it again
    if state.ball.replaced {
        state.ball = Ball::serve(state.viewport, &mut state.rng);
        log::debug!("ball replaced, serving at angle {:.1}", state.ball.angle);
    }
}
