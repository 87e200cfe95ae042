//! `PhysicsSink` over a Rapier rigid-body set.
//!
//! The core crate addresses bodies by engine-agnostic handles; the binding
//! table maps each handle to its Rapier representation. A ragdoll binds to a
//! list of bone bodies, a kinematic character to an optional primitive root
//! (the capsule the controller moves), and a generic dynamic body to its one
//! rigid body.
//!
//! Kinematic characters have no rigid body to push: their gravity scale and
//! direction are stored on the binding, where the host's movement controller
//! reads them each step. Forces added to ragdoll bones accumulate until the
//! host's physics step resets them.

use std::collections::HashMap;

use rapier3d::prelude::*;

use gravity::{BodyHandle, BodyKind, Dir3, PhysicsSink, SubBodyIndex, Vec3};

/// How a body handle maps onto Rapier objects.
#[derive(Clone, Debug)]
pub enum BindingKind {
    /// Physics-simulated character mesh: one rigid body per bone.
    Ragdoll { bones: Vec<RigidBodyHandle> },
    /// Kinematically controlled character. `root` is the collision primitive
    /// that receives damping; gravity itself goes to the stored scale and
    /// direction.
    Kinematic {
        root: Option<RigidBodyHandle>,
        up_axis: Dir3,
    },
    /// Generic dynamic body.
    Dynamic { root: RigidBodyHandle },
}

#[derive(Clone, Debug)]
struct Binding {
    kind: BindingKind,
    // Kinematic controller outputs, written by the sink, read by the host's
    // movement controller. Scale is relative to baseline gravity.
    gravity_scale: f32,
    gravity_dir: Dir3,
}

/// Handle-to-rapier bindings for every body the gravity system can touch.
#[derive(Default, Debug)]
pub struct BindingTable {
    map: HashMap<BodyHandle, Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, body: BodyHandle, kind: BindingKind) {
        let replaced = self
            .map
            .insert(
                body,
                Binding {
                    kind,
                    gravity_scale: 1.0,
                    gravity_dir: gravity::world_down(),
                },
            )
            .is_some();
        if replaced {
            log::debug!("rebound body {body:#x}");
        }
    }

    pub fn unbind(&mut self, body: BodyHandle) {
        self.map.remove(&body);
    }

    /// Gravity scale and direction last resolved for a kinematic character.
    /// `None` for unbound or non-kinematic bodies.
    pub fn kinematic_gravity(&self, body: BodyHandle) -> Option<(f32, Dir3)> {
        let binding = self.map.get(&body)?;
        match binding.kind {
            BindingKind::Kinematic { .. } => Some((binding.gravity_scale, binding.gravity_dir)),
            _ => None,
        }
    }

    /// A sink view over this table and a rigid-body set, for one application
    /// pass.
    pub fn sink<'a>(&'a mut self, bodies: &'a mut RigidBodySet) -> RapierSink<'a> {
        RapierSink {
            bindings: self,
            bodies,
        }
    }

    /// The rigid body targeted by `(body, sub)`, if any.
    fn resolve(&self, body: BodyHandle, sub: Option<SubBodyIndex>) -> Option<RigidBodyHandle> {
        let binding = self.map.get(&body)?;
        match (&binding.kind, sub) {
            (BindingKind::Ragdoll { bones }, Some(i)) => bones.get(i as usize).copied(),
            (BindingKind::Ragdoll { .. }, None) => None,
            (BindingKind::Kinematic { root, .. }, None) => *root,
            (BindingKind::Dynamic { root }, None) => Some(*root),
            (_, Some(_)) => None,
        }
    }
}

/// Borrowed view implementing [`PhysicsSink`] against Rapier.
pub struct RapierSink<'a> {
    bindings: &'a mut BindingTable,
    bodies: &'a mut RigidBodySet,
}

impl PhysicsSink for RapierSink<'_> {
    fn body_kind(&self, body: BodyHandle) -> Option<BodyKind> {
        self.bindings.map.get(&body).map(|b| match b.kind {
            BindingKind::Ragdoll { .. } => BodyKind::RagdollCharacter,
            BindingKind::Kinematic { .. } => BodyKind::KinematicCharacter,
            BindingKind::Dynamic { .. } => BodyKind::Dynamic,
        })
    }

    fn uses_default_gravity(&self, body: BodyHandle) -> bool {
        // A body that opted out of engine gravity carries gravity scale zero.
        self.bindings
            .resolve(body, None)
            .and_then(|rb| self.bodies.get(rb))
            .is_some_and(|rb| rb.gravity_scale() != 0.0)
    }

    fn sub_bodies(&self, body: BodyHandle) -> Vec<SubBodyIndex> {
        match self.bindings.map.get(&body).map(|b| &b.kind) {
            Some(BindingKind::Ragdoll { bones }) => (0..bones.len() as u32).collect(),
            _ => Vec::new(),
        }
    }

    fn mass(&self, body: BodyHandle, sub: Option<SubBodyIndex>) -> Option<f32> {
        let rb = self.bindings.resolve(body, sub)?;
        let mass = self.bodies.get(rb)?.mass();
        (mass > 0.0).then_some(mass)
    }

    fn mass_scale(&self, _body: BodyHandle, _sub: Option<SubBodyIndex>) -> f32 {
        // Rapier has no per-body mass scale notion.
        1.0
    }

    fn up_axis(&self, body: BodyHandle) -> Dir3 {
        match self.bindings.map.get(&body).map(|b| &b.kind) {
            Some(BindingKind::Kinematic { up_axis, .. }) => *up_axis,
            _ => nalgebra::Vector3::y_axis(),
        }
    }

    fn apply_force(&mut self, body: BodyHandle, sub: Option<SubBodyIndex>, force: Vec3) {
        if let Some(rb) = self
            .bindings
            .resolve(body, sub)
            .and_then(|h| self.bodies.get_mut(h))
        {
            rb.add_force(force, true);
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        if let Some(rb) = self
            .bindings
            .resolve(body, None)
            .and_then(|h| self.bodies.get_mut(h))
        {
            rb.apply_impulse(impulse, true);
        }
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) {
        if let Some(binding) = self.bindings.map.get_mut(&body) {
            binding.gravity_scale = scale;
        }
    }

    fn set_gravity_direction(&mut self, body: BodyHandle, direction: Dir3) {
        if let Some(binding) = self.bindings.map.get_mut(&body) {
            binding.gravity_dir = direction;
        }
    }

    fn set_linear_damping(&mut self, body: BodyHandle, sub: Option<SubBodyIndex>, damping: f32) {
        if let Some(rb) = self
            .bindings
            .resolve(body, sub)
            .and_then(|h| self.bodies.get_mut(h))
        {
            rb.set_linear_damping(damping);
        }
    }

    fn set_angular_damping(&mut self, body: BodyHandle, sub: Option<SubBodyIndex>, damping: f32) {
        if let Some(rb) = self
            .bindings
            .resolve(body, sub)
            .and_then(|h| self.bodies.get_mut(h))
        {
            rb.set_angular_damping(damping);
        }
    }
}
