//! Translation of per-tick net gravity into physics-sink calls.
//!
//! The resolver produces a [`ResolvedGravity`] per body per tick; this module
//! decides which sink operations that result turns into. The body-kind
//! branching is a closed set with one handler each:
//!
//! - ragdolled character: continuous force per sub-body, damping per sub-body
//! - kinematic character: gravity scale + direction on the controller,
//!   damping on the primitive root
//! - generic dynamic body: one impulse per tick, damping on the root
//!
//! All failure modes are local and silent: a body with no physics
//! representation, no resolvable mass, or engine-default gravity still active
//! simply contributes nothing this tick.

use nalgebra::Unit;

use crate::handle::BodyHandle;
use crate::settings::{BASELINE_GRAVITY_MPS2, MAG_EPS_SQ, MIN_MASS_KG};
use crate::{Dir3, Vec3};

/// Net gravity and damping for one body for one tick.
///
/// Ephemeral: recomputed every tick, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedGravity {
    /// Net acceleration, direction times magnitude (m/s^2).
    pub vector: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl ResolvedGravity {
    /// The zero-gravity result for bodies overlapping no zones.
    pub fn zero() -> Self {
        Self {
            vector: Vec3::zeros(),
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Normalized direction, or `None` when the vector is near zero.
    pub fn direction(&self) -> Option<Dir3> {
        Unit::try_new(self.vector, MAG_EPS_SQ.sqrt())
    }
}

/// Index of a sub-body (e.g. one bone body of a ragdoll) under a root body.
pub type SubBodyIndex = u32;

/// Closed classification of how a body's physics is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Character whose mesh is currently physics-simulated; gravity is a
    /// continuous force on each sub-body.
    RagdollCharacter,
    /// Character driven by a kinematic movement controller; gravity is a
    /// scale + direction handed to the controller.
    KinematicCharacter,
    /// Generic physically simulated body; gravity is a per-tick impulse.
    Dynamic,
}

/// Host physics operations consumed by [`apply_resolved`].
///
/// `sub` is `None` for the root/primitive of a body and `Some(i)` for the
/// i-th sub-body of a ragdoll.
pub trait PhysicsSink {
    /// Kind of the body, or `None` when it has no physics representation
    /// (such a body is silently excluded from force application).
    fn body_kind(&self, body: BodyHandle) -> Option<BodyKind>;

    /// True while the engine's own default gravity still acts on this body.
    /// Such bodies are skipped entirely; this system only overrides gravity
    /// for bodies that opted out of the default.
    fn uses_default_gravity(&self, body: BodyHandle) -> bool;

    /// Sub-bodies of a ragdolled character; empty for other kinds.
    fn sub_bodies(&self, body: BodyHandle) -> Vec<SubBodyIndex>;

    /// Mass in kg, or `None` when not resolvable.
    fn mass(&self, body: BodyHandle, sub: Option<SubBodyIndex>) -> Option<f32>;

    /// Engine mass scale multiplier (1.0 when the engine has no such notion).
    fn mass_scale(&self, body: BodyHandle, sub: Option<SubBodyIndex>) -> f32;

    /// The body's current up axis in world space; used as the direction
    /// fallback when the net vector is near zero.
    fn up_axis(&self, body: BodyHandle) -> Dir3;

    fn apply_force(&mut self, body: BodyHandle, sub: Option<SubBodyIndex>, force: Vec3);
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);
    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32);
    fn set_gravity_direction(&mut self, body: BodyHandle, direction: Dir3);
    fn set_linear_damping(&mut self, body: BodyHandle, sub: Option<SubBodyIndex>, damping: f32);
    fn set_angular_damping(&mut self, body: BodyHandle, sub: Option<SubBodyIndex>, damping: f32);
}

/// Applies one body's resolved gravity to the physics sink.
///
/// Continuous force for ragdolls matches continuous gravity semantics; the
/// generic branch uses a one-shot impulse instead, matching a per-tick
/// simulation cadence.
pub fn apply_resolved<S: PhysicsSink>(sink: &mut S, body: BodyHandle, resolved: &ResolvedGravity) {
    let Some(kind) = sink.body_kind(body) else {
        return;
    };

    match kind {
        BodyKind::RagdollCharacter => {
            for sub in sink.sub_bodies(body) {
                let Some(mass) = sink.mass(body, Some(sub)) else {
                    continue;
                };
                let scale = sink.mass_scale(body, Some(sub));
                sink.apply_force(body, Some(sub), resolved.vector * mass * scale);
                sink.set_linear_damping(body, Some(sub), resolved.linear_damping);
                sink.set_angular_damping(body, Some(sub), resolved.angular_damping);
            }
        }

        BodyKind::KinematicCharacter => {
            sink.set_gravity_scale(body, resolved.vector.norm() / BASELINE_GRAVITY_MPS2);
            // Near-zero net gravity has no meaningful direction; fall back to
            // the character's inverted up axis instead of handing the
            // controller an undefined direction.
            let direction = resolved
                .direction()
                .unwrap_or_else(|| Unit::new_unchecked(-sink.up_axis(body).into_inner()));
            sink.set_gravity_direction(body, direction);
            sink.set_linear_damping(body, None, resolved.linear_damping);
            sink.set_angular_damping(body, None, resolved.angular_damping);
        }

        BodyKind::Dynamic => {
            if sink.uses_default_gravity(body) {
                return;
            }
            match sink.mass(body, None) {
                Some(mass) if mass > MIN_MASS_KG && resolved.vector.norm_squared() > MAG_EPS_SQ => {
                    let scale = sink.mass_scale(body, None);
                    sink.apply_impulse(body, resolved.vector * mass * scale);
                }
                _ => {}
            }
            sink.set_linear_damping(body, None, resolved.linear_damping);
            sink.set_angular_damping(body, None, resolved.angular_damping);
        }
    }
}
