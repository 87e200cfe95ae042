/*!
Per-zone gravity for a 3D simulated world.

Movable bodies inside one or more gravity zones receive a single net gravity
vector (and damping pair) each tick instead of a global constant down-vector.
The crate is engine-agnostic: it computes vectors and rotations and hands them
to the host's physics and camera layers through small traits. The code is
split for clarity:

- settings: tuning constants and unit conventions
- handle:   generation-checked body handles and zone ids
- zone:     zone data and field/damping queries
- index:    body -> zone membership bookkeeping
- resolver: per-tick reduction of overlapping zones to one net result
- apply:    translation of net results into physics-sink calls
- view:     gravity-relative view reorientation for a controlled body
*/

pub mod apply;
pub mod handle;
pub mod index;
pub mod resolver;
pub mod settings;
pub mod view;
pub mod zone;

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Dir3 = na::UnitVector3<f32>;

// Re-export commonly used types and functions.
pub use apply::{BodyKind, PhysicsSink, ResolvedGravity, SubBodyIndex, apply_resolved};
pub use handle::{BodyHandle, ZoneId, handle_generation, handle_index, pack_handle};
pub use index::OverlapIndex;
pub use resolver::{BodyState, GravityResolver};
pub use view::{LookInput, ViewParams, ViewReorienter, to_gravity_relative, to_world_space, world_down};
pub use zone::{GravityField, GravityZone, ZoneDamping};
