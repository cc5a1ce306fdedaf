//! Static test course for the sandbox driver.
//!
//! A flat floor at y = 0 and a tall wall along the left side of a lane running toward +Z.
//! The actor spawns at the origin facing +Z.

use movement::LevelCollider;

/// Inner face of the left wall (x).
pub const WALL_FACE_X: f32 = -1.5;

pub fn course() -> Vec<LevelCollider> {
    vec![
        LevelCollider::ground(0, 0.0),
        LevelCollider::block(1, [WALL_FACE_X - 0.5, 4.0, 100.0], [0.5, 4.0, 200.0]),
    ]
}
