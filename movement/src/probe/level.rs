//! Rapier query world for static level geometry.
//!
//! The level is a list of immutable colliders. It is built once into the Rapier sets and
//! broad/narrow phases needed for scene queries and the kinematic character controller;
//! nothing is ever stepped dynamically.
//!
//! Conventions
//! - Units are meters.
//! - Colliders are inserted sorted by `id`, so the same input always builds the same world.
//! - For planes the normal is derived from the pose: `normal = rotation * +Y`.

use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::prelude::*;

#[derive(Clone, Debug)]
pub struct LevelCollider {
    pub id: u32,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    pub shape: LevelShape,
}

#[derive(Clone, Debug)]
pub enum LevelShape {
    /// Infinite half-space, offset along its pose-derived normal.
    Plane { offset_along_normal: f32 },
    /// Oriented box with the given half-extents.
    Cuboid { half_extents: Vector<f32> },
}

impl LevelCollider {
    /// Horizontal ground plane at height `y`.
    pub fn ground(id: u32, y: f32) -> Self {
        Self {
            id,
            translation: vector![0.0, y, 0.0],
            rotation: UnitQuaternion::identity(),
            shape: LevelShape::Plane {
                offset_along_normal: 0.0,
            },
        }
    }

    /// Axis-aligned box centered at `center` (floors, walls, ceilings, ledges).
    pub fn block(id: u32, center: [f32; 3], half_extents: [f32; 3]) -> Self {
        Self {
            id,
            translation: vector![center[0], center[1], center[2]],
            rotation: UnitQuaternion::identity(),
            shape: LevelShape::Cuboid {
                half_extents: vector![half_extents[0], half_extents[1], half_extents[2]],
            },
        }
    }
}

/// In-memory Rapier structures for queries against a static level.
pub struct LevelWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl LevelWorld {
    pub fn build(mut defs: Vec<LevelCollider>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.into_iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
            let rb_handle = bodies.insert(RigidBodyBuilder::fixed().pose(iso).build());
            colliders.insert_with_parent(collider_from_def(&def), rb_handle, &mut bodies);
        }

        // Collision detection only (no dynamics): fills the broad-phase BVH and the
        // narrow-phase so scene queries see every collider.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        log::debug!("built level world with {} colliders", colliders.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Borrowed pipeline for scene queries and the character controller.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

/// The pose lives on the parent rigid-body, so colliders get an identity local transform.
fn collider_from_def(def: &LevelCollider) -> Collider {
    match &def.shape {
        LevelShape::Plane {
            offset_along_normal,
        } => {
            // Local +Y turns into `rotation * +Y` through the parent pose.
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::y_axis())))
                .translation(Vector::y() * *offset_along_normal)
                .build()
        }

        LevelShape::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_collider_gets_its_own_fixed_body() {
        let world = LevelWorld::build(vec![
            LevelCollider::block(7, [0.0, 2.0, 0.0], [1.0, 1.0, 1.0]),
            LevelCollider::ground(3, 0.0),
        ]);
        assert_eq!(world.colliders.len(), 2);
        assert_eq!(world.bodies.len(), 2);
        assert!(world.bodies.iter().all(|(_, body)| body.is_fixed()));
    }

    #[test]
    fn ground_plane_is_hit_from_above() {
        let world = LevelWorld::build(vec![LevelCollider::ground(0, 1.0)]);
        let pipeline = world.query_pipeline(QueryFilter::only_fixed());
        let ray = Ray::new(point![0.0, 3.0, 0.0], vector![0.0, -1.0, 0.0]);

        let (_, hit) = pipeline
            .cast_ray_and_get_normal(&ray, 10.0, true)
            .expect("plane below the ray");
        assert!((hit.time_of_impact - 2.0).abs() < 1.0e-4);
        assert!(hit.normal.y > 0.99);
    }
}
