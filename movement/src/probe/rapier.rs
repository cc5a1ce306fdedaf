//! [`CollisionProbe`] backed by a Rapier [`LevelWorld`].
//!
//! - Ground: a ring of downward rays under the feet (center plus four at
//!   `GROUND_RING_FRACTION * radius`), approximating a sphere check at the feet.
//! - Walls: one horizontal ray from the center; only near-horizontal normals count.
//! - Headroom: one upward ray from the center.
//! - Motion: Rapier's `KinematicCharacterController` sweep-and-slide with a Y capsule.
//!
//! Core vectors are converted by component at this boundary, so the simulator's `nalgebra`
//! types never have to match Rapier's re-export.

use nalgebra::Vector3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::na::{Translation3, UnitQuaternion, point};
use rapier3d::prelude::*;

use super::{BodyPose, CollisionProbe, LevelCollider, LevelWorld, WallContact};
use crate::constants::{DIST_EPS, GROUND_RING_FRACTION, MAX_WALL_NORMAL_Y, PROBE_SKIN};

pub struct RapierProbe {
    world: LevelWorld,
    controller: KinematicCharacterController,
}

impl RapierProbe {
    pub fn new(level: Vec<LevelCollider>) -> Self {
        Self::with_world(LevelWorld::build(level))
    }

    pub fn with_world(world: LevelWorld) -> Self {
        let controller = KinematicCharacterController {
            autostep: Some(CharacterAutostep {
                include_dynamic_bodies: false,
                max_height: CharacterLength::Relative(0.25),
                ..CharacterAutostep::default()
            }),
            offset: CharacterLength::Relative(0.01),
            // Grounding is decided by `is_grounded`, not by the controller snapping down.
            snap_to_ground: None,
            ..KinematicCharacterController::default()
        };

        Self { world, controller }
    }

    pub fn world(&self) -> &LevelWorld {
        &self.world
    }

    /// Distance to the first hit along `dir` within `max_dist`, with its normal.
    fn cast(
        &self,
        origin: [f32; 3],
        dir: Vector3<f32>,
        max_dist: f32,
    ) -> Option<(f32, Vector3<f32>)> {
        let pipeline = self.world.query_pipeline(QueryFilter::only_fixed());
        let ray = Ray::new(
            point![origin[0], origin[1], origin[2]],
            vector![dir.x, dir.y, dir.z],
        );

        pipeline
            .cast_ray_and_get_normal(&ray, max_dist.max(0.0), true)
            .map(|(_handle, hit)| {
                (
                    hit.time_of_impact,
                    Vector3::new(hit.normal.x, hit.normal.y, hit.normal.z),
                )
            })
    }
}

impl CollisionProbe for RapierProbe {
    fn is_grounded(&self, pose: &BodyPose, vertical_offset: f32) -> bool {
        // Start slightly above the feet to avoid starting inside the floor we rest on.
        let origin_y = pose.feet_y() + PROBE_SKIN;
        let reach = vertical_offset.max(0.0) + PROBE_SKIN;
        let ring = pose.radius * GROUND_RING_FRACTION;
        let p = pose.position;

        [
            (0.0, 0.0),
            (ring, 0.0),
            (-ring, 0.0),
            (0.0, ring),
            (0.0, -ring),
        ]
        .into_iter()
        .any(|(dx, dz)| {
            self.cast([p.x + dx, origin_y, p.z + dz], -Vector3::y(), reach)
                .is_some()
        })
    }

    fn detect_wall(
        &self,
        pose: &BodyPose,
        direction: Vector3<f32>,
        radius: f32,
    ) -> Option<WallContact> {
        let dir = Vector3::new(direction.x, 0.0, direction.z).try_normalize(DIST_EPS)?;
        let p = pose.position;

        let (_toi, normal) = self.cast([p.x, p.y, p.z], dir, radius)?;
        if normal.y.abs() > MAX_WALL_NORMAL_Y {
            return None;
        }

        // Rays report the normal of the surface they hit, which faces back at the actor.
        let normal = if normal.dot(&dir) > 0.0 { -normal } else { normal };
        Some(WallContact { normal })
    }

    fn is_clear_above(&self, pose: &BodyPose, distance: f32) -> bool {
        let p = pose.position;
        self.cast([p.x, p.y, p.z], Vector3::y(), distance).is_none()
    }

    fn resolve_motion(&self, pose: &BodyPose, desired: Vector3<f32>, dt: f32) -> Vector3<f32> {
        if desired.norm_squared() <= DIST_EPS * DIST_EPS {
            return desired;
        }

        let pipeline = self.world.query_pipeline(QueryFilter::only_fixed());
        let p = pose.position;
        let iso = Isometry::from_parts(Translation3::new(p.x, p.y, p.z), UnitQuaternion::identity());

        let corrected = self.controller.move_shape(
            dt,
            &pipeline,
            &Capsule::new_y(pose.capsule_half_height(), pose.radius),
            &iso,
            vector![desired.x, desired.y, desired.z],
            |_| {},
        );

        Vector3::new(
            corrected.translation.x,
            corrected.translation.y,
            corrected.translation.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Floor slab with its top at y = 0, a wall whose inner face is at x = -0.6 and a low
    /// ceiling over the +Z half starting at y = 1.5.
    fn corridor() -> RapierProbe {
        RapierProbe::new(vec![
            LevelCollider::block(1, [0.0, -0.5, 0.0], [50.0, 0.5, 50.0]),
            LevelCollider::block(2, [-1.1, 2.0, 0.0], [0.5, 3.0, 50.0]),
            LevelCollider::block(3, [0.0, 1.75, 20.0], [0.5, 0.25, 5.0]),
        ])
    }

    fn standing_at(x: f32, y: f32, z: f32) -> BodyPose {
        BodyPose {
            position: Vector3::new(x, y, z),
            height: 2.0,
            radius: 0.5,
        }
    }

    #[test]
    fn resting_on_the_floor_is_grounded() {
        let probe = corridor();
        assert!(probe.is_grounded(&standing_at(0.0, 1.01, 0.0), 0.1));
    }

    #[test]
    fn high_above_the_floor_is_not_grounded() {
        let probe = corridor();
        assert!(!probe.is_grounded(&standing_at(0.0, 3.0, 0.0), 0.1));
    }

    #[test]
    fn wall_on_the_left_reports_an_outward_normal() {
        let probe = corridor();
        let contact = probe
            .detect_wall(&standing_at(0.0, 1.5, 0.0), -Vector3::x(), 0.75)
            .expect("wall within reach");
        assert!((contact.normal - Vector3::x()).norm() < 1.0e-3);

        assert!(
            probe
                .detect_wall(&standing_at(0.0, 1.5, 0.0), Vector3::x(), 0.75)
                .is_none()
        );
    }

    #[test]
    fn floor_is_never_reported_as_a_wall() {
        let probe = corridor();
        assert!(
            probe
                .detect_wall(&standing_at(5.0, 1.0, 0.0), -Vector3::y(), 5.0)
                .is_none()
        );
    }

    #[test]
    fn headroom_detects_the_low_ceiling() {
        let probe = corridor();
        assert!(probe.is_clear_above(&standing_at(0.0, 0.5, 0.0), 2.0));
        assert!(!probe.is_clear_above(&standing_at(0.0, 0.5, 20.0), 2.0));
    }

    #[test]
    fn falling_motion_stops_at_the_floor() {
        let probe = corridor();
        let pose = standing_at(0.0, 1.5, 0.0);
        let moved = probe.resolve_motion(&pose, Vector3::new(0.0, -2.0, 0.0), 1.0 / 60.0);
        assert!(moved.y > -0.55, "sank into the floor: {moved:?}");
        assert!(moved.y < -0.3, "did not fall: {moved:?}");
    }

    #[test]
    fn free_motion_passes_through_unchanged() {
        let probe = corridor();
        let pose = standing_at(5.0, 1.5, 0.0);
        let desired = Vector3::new(0.1, 0.0, 0.2);
        let moved = probe.resolve_motion(&pose, desired, 1.0 / 60.0);
        assert!((moved - desired).norm() < 1.0e-3, "{moved:?}");
    }
}
