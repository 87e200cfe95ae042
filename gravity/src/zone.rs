//! Gravity zone data and its field/damping queries.
//!
//! A zone is a spatial volume (volume/overlap detection itself is owned by the
//! host) with a priority, a gravity field sampled by world position, damping
//! sampled by world position, and a list of exclusion tags. Only the highest
//! priority zones overlapping a body contribute to its gravity; damping is
//! resolved separately (see `resolver`).

use std::collections::HashSet;
use std::fmt;

use crate::Vec3;
use crate::settings::{
    DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING, DEFAULT_ZONE_PRIORITY,
    MIN_POINT_SOURCE_DISTANCE,
};

/// Field query of a zone: world position in, acceleration vector out (m/s^2).
///
/// Variants are a closed set rather than a trait object tree: the constant and
/// point-source profiles cover the common cases, and `Custom` is the escape
/// hatch for host-defined fields.
pub enum GravityField {
    /// The same acceleration everywhere inside the zone.
    Constant { vector: Vec3 },

    /// Inverse-square profile toward a center: `|a| = surface_accel * (R/d)^2`.
    ///
    /// `radius` is the distance at which the field equals `surface_accel`.
    /// Query distance is clamped below by [`MIN_POINT_SOURCE_DISTANCE`] so the
    /// field stays finite arbitrarily close to the center.
    PointSource {
        center: Vec3,
        surface_accel: f32,
        radius: f32,
    },

    /// Host-defined field function.
    ///
    /// A non-finite return contributes nothing for that query rather than
    /// poisoning the net vector (the closure cannot be validated up front).
    Custom(Box<dyn Fn(Vec3) -> Vec3 + Send + Sync>),
}

impl fmt::Debug for GravityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GravityField::Constant { vector } => f.debug_struct("Constant").field("vector", vector).finish(),
            GravityField::PointSource {
                center,
                surface_accel,
                radius,
            } => f
                .debug_struct("PointSource")
                .field("center", center)
                .field("surface_accel", surface_accel)
                .field("radius", radius)
                .finish(),
            GravityField::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Damping query of a zone: world position in, `(linear, angular)` out.
pub enum ZoneDamping {
    Constant { linear: f32, angular: f32 },
    Custom(Box<dyn Fn(Vec3) -> (f32, f32) + Send + Sync>),
}

impl fmt::Debug for ZoneDamping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneDamping::Constant { linear, angular } => f
                .debug_struct("Constant")
                .field("linear", linear)
                .field("angular", angular)
                .finish(),
            ZoneDamping::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A gravity-defining region of the world.
///
/// The volume itself (and overlap detection against it) belongs to the host;
/// the resolver only sees enter/leave notifications keyed by zone id.
#[derive(Debug)]
pub struct GravityZone {
    /// Zones with lower priority than the highest one overlapping a body are
    /// fully ignored for gravity (not blended in).
    pub priority: i32,
    /// Bodies carrying any of these tags never enter this zone.
    pub exclusion_tags: HashSet<String>,
    field: GravityField,
    damping: ZoneDamping,
}

impl GravityZone {
    /// Build a zone, rejecting non-finite field parameters.
    ///
    /// Returns `None` when a constant vector or point-source parameter is not
    /// finite; feeding NaN into the per-tick blend would silently corrupt
    /// every body the zone touches.
    pub fn new(priority: i32, field: GravityField, damping: ZoneDamping) -> Option<Self> {
        let field_ok = match &field {
            GravityField::Constant { vector } => vector.iter().all(|c| c.is_finite()),
            GravityField::PointSource {
                center,
                surface_accel,
                radius,
            } => {
                center.iter().all(|c| c.is_finite())
                    && surface_accel.is_finite()
                    && radius.is_finite()
                    && *radius > 0.0
            }
            GravityField::Custom(_) => true,
        };
        let damping_ok = match &damping {
            ZoneDamping::Constant { linear, angular } => linear.is_finite() && angular.is_finite(),
            ZoneDamping::Custom(_) => true,
        };
        if !(field_ok && damping_ok) {
            return None;
        }

        Some(Self {
            priority,
            exclusion_tags: HashSet::new(),
            field,
            damping,
        })
    }

    /// Adds exclusion tags to the zone (builder-style).
    pub fn with_exclusion_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Gravity acceleration at a world position (m/s^2).
    pub fn field_at(&self, position: Vec3) -> Vec3 {
        let v = match &self.field {
            GravityField::Constant { vector } => *vector,
            GravityField::PointSource {
                center,
                surface_accel,
                radius,
            } => {
                let offset = center - position;
                let dist = offset.norm().max(MIN_POINT_SOURCE_DISTANCE);
                let dir = offset / dist;
                dir * (surface_accel * (radius * radius) / (dist * dist))
            }
            GravityField::Custom(f) => f(position),
        };
        // Custom closures are the only path that can still produce non-finite
        // values here; they contribute nothing for this query.
        if v.iter().all(|c| c.is_finite()) { v } else { Vec3::zeros() }
    }

    /// Linear damping at a world position. Never negative.
    pub fn linear_damping_at(&self, position: Vec3) -> f32 {
        let d = match &self.damping {
            ZoneDamping::Constant { linear, .. } => *linear,
            ZoneDamping::Custom(f) => f(position).0,
        };
        if d.is_finite() { d.max(0.0) } else { 0.0 }
    }

    /// Angular damping at a world position. Never negative.
    pub fn angular_damping_at(&self, position: Vec3) -> f32 {
        let d = match &self.damping {
            ZoneDamping::Constant { angular, .. } => *angular,
            ZoneDamping::Custom(f) => f(position).1,
        };
        if d.is_finite() { d.max(0.0) } else { 0.0 }
    }

    /// True when any of `tags` appears in the zone's exclusion list.
    pub fn excludes_any<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        tags.into_iter().any(|t| self.exclusion_tags.contains(t))
    }
}

impl Default for GravityZone {
    /// Priority 0, constant straight-down field at baseline magnitude, and
    /// the stock damping pair.
    fn default() -> Self {
        Self {
            priority: DEFAULT_ZONE_PRIORITY,
            exclusion_tags: HashSet::new(),
            field: GravityField::Constant {
                vector: Vec3::new(0.0, -crate::settings::BASELINE_GRAVITY_MPS2, 0.0),
            },
            damping: ZoneDamping::Constant {
                linear: DEFAULT_LINEAR_DAMPING,
                angular: DEFAULT_ANGULAR_DAMPING,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_field_ignores_position() {
        let zone = GravityZone::new(
            0,
            GravityField::Constant {
                vector: Vec3::new(0.0, -9.8, 0.0),
            },
            ZoneDamping::Constant { linear: 0.0, angular: 0.0 },
        )
        .unwrap();

        assert_eq!(zone.field_at(Vec3::zeros()), Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(
            zone.field_at(Vec3::new(100.0, -3.0, 7.0)),
            Vec3::new(0.0, -9.8, 0.0)
        );
    }

    #[test]
    fn point_source_points_at_center_with_inverse_square_falloff() {
        let zone = GravityZone::new(
            0,
            GravityField::PointSource {
                center: Vec3::zeros(),
                surface_accel: 10.0,
                radius: 5.0,
            },
            ZoneDamping::Constant { linear: 0.0, angular: 0.0 },
        )
        .unwrap();

        // On the reference radius the magnitude equals surface_accel.
        let at_surface = zone.field_at(Vec3::new(5.0, 0.0, 0.0));
        assert!((at_surface.norm() - 10.0).abs() < 1.0e-5);
        assert!(at_surface.x < 0.0, "field must point toward the center");

        // Twice the radius: quarter the magnitude.
        let farther = zone.field_at(Vec3::new(10.0, 0.0, 0.0));
        assert!((farther.norm() - 2.5).abs() < 1.0e-5);
    }

    #[test]
    fn point_source_is_finite_at_the_center() {
        let zone = GravityZone::new(
            0,
            GravityField::PointSource {
                center: Vec3::zeros(),
                surface_accel: 10.0,
                radius: 5.0,
            },
            ZoneDamping::Constant { linear: 0.0, angular: 0.0 },
        )
        .unwrap();

        let at_center = zone.field_at(Vec3::zeros());
        assert!(at_center.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn non_finite_parameters_are_rejected_at_construction() {
        assert!(
            GravityZone::new(
                0,
                GravityField::Constant {
                    vector: Vec3::new(0.0, f32::NAN, 0.0)
                },
                ZoneDamping::Constant { linear: 0.0, angular: 0.0 },
            )
            .is_none()
        );
        assert!(
            GravityZone::new(
                0,
                GravityField::PointSource {
                    center: Vec3::zeros(),
                    surface_accel: f32::INFINITY,
                    radius: 1.0,
                },
                ZoneDamping::Constant { linear: 0.0, angular: 0.0 },
            )
            .is_none()
        );
    }

    #[test]
    fn custom_field_returning_nan_contributes_nothing() {
        let zone = GravityZone::new(
            0,
            GravityField::Custom(Box::new(|_| Vec3::new(f32::NAN, 0.0, 0.0))),
            ZoneDamping::Constant { linear: 0.0, angular: 0.0 },
        )
        .unwrap();

        assert_eq!(zone.field_at(Vec3::zeros()), Vec3::zeros());
    }

    #[test]
    fn damping_is_clamped_non_negative() {
        let zone = GravityZone::new(
            0,
            GravityField::Constant { vector: Vec3::zeros() },
            ZoneDamping::Custom(Box::new(|_| (-1.0, f32::NAN))),
        )
        .unwrap();

        assert_eq!(zone.linear_damping_at(Vec3::zeros()), 0.0);
        assert_eq!(zone.angular_damping_at(Vec3::zeros()), 0.0);
    }

    #[test]
    fn exclusion_tags_match_exactly() {
        let zone = GravityZone::default().with_exclusion_tags(["no_grav", "ghost"]);
        assert!(zone.excludes_any(["ghost"]));
        assert!(!zone.excludes_any(["solid", "player"]));
        assert!(!zone.excludes_any([]));
    }
}
