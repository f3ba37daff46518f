//! Collision predicates and the wall reflection law
//!
//! Everything here is pure: positions and dimensions in, verdicts out. The
//! ball's update loop decides what to do with them.

use glam::Vec2;

use super::state::{Paddle, Viewport};

/// Which kind of wall the ball is touching, if any. A vertical wall (left or
/// right edge) means a breach and a point; a horizontal wall (top or bottom)
/// means a bounce. Vertical takes precedence when both apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallHit {
    Vertical,
    Horizontal,
    None,
}

/// Test the ball envelope against the viewport borders.
///
/// The boundary arithmetic is inclusive: a ball at exactly
/// `height/2 - radius` already counts as touching.
pub fn wall_collision(pos: Vec2, radius: f32, viewport: Viewport) -> WallHit {
    if pos.x.abs() >= viewport.width / 2.0 - radius {
        WallHit::Vertical
    } else if pos.y.abs() >= viewport.height / 2.0 - radius {
        WallHit::Horizontal
    } else {
        WallHit::None
    }
}

/// Test the ball against a paddle's hit box. The vertical window is padded
/// by the paddle width so the rounded end caps are covered.
pub fn paddle_overlap(pos: Vec2, radius: f32, paddle: &Paddle) -> bool {
    (pos.y - paddle.y_offset).abs() <= (paddle.height + paddle.width + radius) / 2.0
        && (pos.x - paddle.anchor_x()).abs() <= (paddle.width + radius) / 2.0
}

/// Reflect a travel angle off a horizontal wall: the vertical motion
/// component flips sign, the horizontal one is preserved.
///
/// Angles are degrees, 0 = toward +Y, decomposed as `(sin a, cos a)`; the
/// transform `-(a + 90) - 90` is a mirror about the horizontal axis in that
/// convention. The result is normalized to (-180, 180].
pub fn mirror_angle(angle: f32) -> f32 {
    let mirrored = -(angle + 90.0) - 90.0;
    let wrapped = (mirrored + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Unit direction vector for a travel angle in degrees
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    let radians = angle.to_radians();
    Vec2::new(radians.sin(), radians.cos())
}
