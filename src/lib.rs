//! Pi Pong - fullscreen two-player Pong with optional GPIO paddle buttons
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddles, ball, collisions, scoring)
//! - `input`: Key codes and button press/release events
//! - `buttons`: Channel bridge for physical-button callbacks
//! - `render`: Terminal frame composition and presentation
//! - `settings`: Persisted preferences

pub mod buttons;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use crate::sim::state::Viewport;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (ticks per second)
    pub const TICK_RATE: f32 = 60.0;
    /// Observed frame rate substituted when the real one is zero/undefined,
    /// so the tick scale never blows up at startup
    pub const TICK_RATE_FLOOR: f32 = 30.0;

    /// Logical width that maps to a resolution ratio of 1.0
    pub const LOGICAL_WIDTH: f32 = 1000.0;

    /// Paddle base constants (scaled by the viewport ratio)
    pub const PADDLE_SPEED: f32 = 6.0;
    pub const PADDLE_WIDTH: f32 = 5.0;
    pub const PADDLE_HEIGHT: f32 = 30.0;
    /// Distance of the paddle anchor from the screen edge
    pub const PADDLE_MARGIN: f32 = 35.0;

    /// Ball base constants (scaled by the viewport ratio)
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_RADIUS: f32 = 7.0;
    /// Sub-steps per tick for ball movement; more sub-steps mean finer
    /// collision resolution at the cost of extra checks
    pub const BALL_ACCURACY: u32 = 30;

    /// Serve/rebound angle magnitude range in degrees. Never near-horizontal,
    /// so rallies cannot degenerate into endless side-to-side volleys.
    pub const ANGLE_MIN: f32 = 20.0;
    pub const ANGLE_MAX: f32 = 160.0;
}

/// Convert a centered, Y-up logical coordinate to a top-left-origin,
/// Y-down device coordinate.
#[inline]
pub fn to_device(x: f32, y: f32, viewport: Viewport) -> (f32, f32) {
    (x + viewport.width / 2.0, viewport.height / 2.0 - y)
}
