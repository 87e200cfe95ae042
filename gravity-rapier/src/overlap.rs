//! Zone registration bootstrap query.
//!
//! When a zone is registered into a world that already has bodies inside its
//! volume, no enter events will ever fire for them; the resolver needs the
//! initial membership handed to it. This walks the collider set with a pairwise
//! intersection test, which is exact and needs no query pipeline state. Zone
//! registration is rare compared to ticks, so the linear scan is acceptable.

use std::collections::HashSet;

use rapier3d::parry::query::intersection_test;
use rapier3d::prelude::*;

use crate::volume::ZoneVolumeDef;

/// Rigid bodies with at least one non-sensor collider intersecting the volume.
///
/// Each body appears once, however many of its colliders overlap. Sensor
/// colliders (other zones, triggers) never count as occupants. Unsupported
/// shape pairs are treated as non-intersecting.
pub fn bodies_inside(
    volume: &ZoneVolumeDef,
    bodies: &RigidBodySet,
    colliders: &ColliderSet,
) -> Vec<RigidBodyHandle> {
    let pose = volume.pose();
    let shape = volume.shape();

    let mut seen = HashSet::new();
    let mut inside = Vec::new();
    for (_, collider) in colliders.iter() {
        if collider.is_sensor() {
            continue;
        }
        let Some(parent) = collider.parent() else {
            continue;
        };
        if !bodies.contains(parent) || !seen.insert(parent) {
            continue;
        }
        let hit = intersection_test(&pose, &*shape, collider.position(), collider.shape())
            .unwrap_or(false);
        if hit {
            inside.push(parent);
        } else {
            // Another collider of the same body may still intersect.
            seen.remove(&parent);
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::ZoneShapeDef;
    use rapier3d::na::UnitQuaternion;

    fn ball_body(
        bodies: &mut RigidBodySet,
        colliders: &mut ColliderSet,
        position: Vector<f32>,
    ) -> RigidBodyHandle {
        let rb = bodies.insert(RigidBodyBuilder::dynamic().translation(position).build());
        colliders.insert_with_parent(ColliderBuilder::ball(0.5).build(), rb, bodies);
        rb
    }

    fn zone_at_origin() -> ZoneVolumeDef {
        ZoneVolumeDef {
            translation: Vector::zeros(),
            rotation: UnitQuaternion::identity(),
            shape: ZoneShapeDef::Cuboid {
                half_extents: Vector::new(5.0, 5.0, 5.0),
            },
        }
    }

    #[test]
    fn only_bodies_inside_the_volume_are_returned() {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let inside = ball_body(&mut bodies, &mut colliders, Vector::new(1.0, 2.0, -1.0));
        let outside = ball_body(&mut bodies, &mut colliders, Vector::new(100.0, 0.0, 0.0));

        let found = bodies_inside(&zone_at_origin(), &bodies, &colliders);

        assert_eq!(found, vec![inside]);
        assert!(!found.contains(&outside));
    }

    #[test]
    fn a_body_with_many_overlapping_colliders_is_returned_once() {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let rb = ball_body(&mut bodies, &mut colliders, Vector::new(0.0, 0.0, 0.0));
        colliders.insert_with_parent(
            ColliderBuilder::ball(0.5)
                .translation(Vector::new(0.0, 1.0, 0.0))
                .build(),
            rb,
            &mut bodies,
        );

        let found = bodies_inside(&zone_at_origin(), &bodies, &colliders);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn sensor_colliders_are_not_occupants() {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let rb = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::zeros())
                .build(),
        );
        colliders.insert_with_parent(
            ColliderBuilder::ball(0.5).sensor(true).build(),
            rb,
            &mut bodies,
        );

        let found = bodies_inside(&zone_at_origin(), &bodies, &colliders);
        assert!(found.is_empty());
    }

    #[test]
    fn a_straddling_body_counts_as_inside() {
        // Center outside the cuboid but the ball pokes through the face.
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let rb = ball_body(&mut bodies, &mut colliders, Vector::new(5.3, 0.0, 0.0));

        let found = bodies_inside(&zone_at_origin(), &bodies, &colliders);
        assert_eq!(found, vec![rb]);
    }
}
