//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only (tick scale compensates for frame jitter)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use collision::{WallHit, heading, mirror_angle, paddle_overlap, wall_collision};
pub use state::{GameState, Intent, Paddle, Side, Viewport};
pub use tick::{TickInput, tick};
