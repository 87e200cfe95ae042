//! Zone volume definitions and their Rapier shapes.
//!
//! A zone volume is a sensor region, never a solid: the shape is only ever
//! used for intersection tests, so the supported set stays small. Units are
//! meters, poses are world-space.

use rapier3d::na::UnitQuaternion;
use rapier3d::prelude::*;

/// Canonical definition of a zone's sensor volume.
#[derive(Clone, Debug)]
pub struct ZoneVolumeDef {
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Volume shape parameters.
    pub shape: ZoneShapeDef,
}

/// Supported zone volume shapes.
#[derive(Clone, Debug)]
pub enum ZoneShapeDef {
    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

impl ZoneVolumeDef {
    /// World-space pose of the volume.
    pub fn pose(&self) -> Isometry<f32> {
        Isometry::from_parts(self.translation.into(), self.rotation)
    }

    /// The volume's shape, shareable with Rapier queries.
    pub fn shape(&self) -> SharedShape {
        match &self.shape {
            ZoneShapeDef::Cuboid { half_extents } => {
                SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ZoneShapeDef::Sphere { radius } => SharedShape::ball(*radius),
            ZoneShapeDef::CapsuleY {
                radius,
                half_height,
            } => SharedShape::capsule_y(*half_height, *radius),
            ZoneShapeDef::CylinderY {
                radius,
                half_height,
            } => SharedShape::cylinder(*half_height, *radius),
        }
    }

    /// Builds the sensor collider for this volume (no parent transform; the
    /// pose is baked into the collider itself).
    pub fn sensor_collider(&self) -> Collider {
        ColliderBuilder::new(self.shape())
            .position(self.pose())
            .sensor(true)
            .build()
    }
}
