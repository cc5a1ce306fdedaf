/*!
Collision queries the simulator depends on.

The simulator never touches geometry directly. Everything it needs to know about the world
goes through [`CollisionProbe`]:

- grounded:  is there ground within a small reach below the feet?
- wall:      is there a wall within a reach along a horizontal direction, and its normal?
- headroom:  is the space above the actor clear (stand-up check)?
- motion:    collision-corrected displacement (defaults to "no collision resolution").

Any spatial-query backend satisfies it. `level` + `rapier` provide one built on an
in-memory Rapier query world for static level geometry.

"No contact" is a normal answer, never an error: an actor suspended over a pit simply gets
`false`/`None` every tick.
*/

pub mod level;
pub mod rapier;

use nalgebra::Vector3;

pub use level::{LevelCollider, LevelShape, LevelWorld};
pub use rapier::RapierProbe;

/// Capsule placement handed to every probe query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose {
    /// Capsule center in world space.
    pub position: Vector3<f32>,
    /// Total capsule height, caps included.
    pub height: f32,
    pub radius: f32,
}

impl BodyPose {
    /// Y coordinate of the lowest point of the capsule.
    #[inline]
    pub fn feet_y(&self) -> f32 {
        self.position.y - self.height * 0.5
    }

    /// Y coordinate of the highest point of the capsule.
    #[inline]
    pub fn head_y(&self) -> f32 {
        self.position.y + self.height * 0.5
    }

    /// Half-length of the cylinder section of a Y-aligned capsule with this height/radius.
    #[inline]
    pub fn capsule_half_height(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }
}

/// A wall hit from [`CollisionProbe::detect_wall`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallContact {
    /// Surface normal pointing away from the wall, toward the actor.
    pub normal: Vector3<f32>,
}

pub trait CollisionProbe {
    /// True if ground lies within `vertical_offset` below the feet.
    fn is_grounded(&self, pose: &BodyPose, vertical_offset: f32) -> bool;

    /// Looks for a wall within `radius` of the center along `direction`.
    fn detect_wall(
        &self,
        pose: &BodyPose,
        direction: Vector3<f32>,
        radius: f32,
    ) -> Option<WallContact>;

    /// True if nothing blocks the space up to `distance` above the center.
    fn is_clear_above(&self, _pose: &BodyPose, _distance: f32) -> bool {
        true
    }

    /// Returns the part of `desired` the actor can actually travel this tick.
    fn resolve_motion(&self, _pose: &BodyPose, desired: Vector3<f32>, _dt: f32) -> Vector3<f32> {
        desired
    }
}

impl<T: CollisionProbe + ?Sized> CollisionProbe for &T {
    #[inline]
    fn is_grounded(&self, pose: &BodyPose, vertical_offset: f32) -> bool {
        (**self).is_grounded(pose, vertical_offset)
    }

    #[inline]
    fn detect_wall(
        &self,
        pose: &BodyPose,
        direction: Vector3<f32>,
        radius: f32,
    ) -> Option<WallContact> {
        (**self).detect_wall(pose, direction, radius)
    }

    #[inline]
    fn is_clear_above(&self, pose: &BodyPose, distance: f32) -> bool {
        (**self).is_clear_above(pose, distance)
    }

    #[inline]
    fn resolve_motion(&self, pose: &BodyPose, desired: Vector3<f32>, dt: f32) -> Vector3<f32> {
        (**self).resolve_motion(pose, desired, dt)
    }
}

/// Probe that never reports contact and never resolves collisions.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenSpace;

impl CollisionProbe for OpenSpace {
    fn is_grounded(&self, _pose: &BodyPose, _vertical_offset: f32) -> bool {
        false
    }

    fn detect_wall(
        &self,
        _pose: &BodyPose,
        _direction: Vector3<f32>,
        _radius: f32,
    ) -> Option<WallContact> {
        None
    }
}
