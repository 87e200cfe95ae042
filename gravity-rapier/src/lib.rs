/*!
Rapier bindings for the `gravity` zone engine.

The core crate is physics-engine agnostic: it consumes overlap notifications
and emits sink calls through the `PhysicsSink` trait. This crate supplies the
Rapier side of both seams:

- `volume`: zone volume definitions and their Rapier shapes.
- `overlap`: the spatial query used to bootstrap membership when a zone is
  registered into an already-populated world.
- `sink`: a `PhysicsSink` over a `RigidBodySet` plus a binding table mapping
  engine-agnostic body handles to rigid bodies.

Live enter/leave events are intentionally not produced here. They come from
the host's own contact/intersection event loop, which already knows which
colliders are zone sensors.
*/

pub mod overlap;
pub mod sink;
pub mod volume;

pub use overlap::bodies_inside;
pub use sink::{BindingKind, BindingTable, RapierSink};
pub use volume::{ZoneShapeDef, ZoneVolumeDef};
