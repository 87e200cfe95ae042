//! Gravity-relative view orientation.
//!
//! When gravity stops pointing straight down, "look up" and "turn left" stop
//! meaning anything in world space. The reorienter keeps the player's view
//! coherent by tracking a smoothed gravity direction and expressing all look
//! input in the frame where that direction is down:
//!
//! 1. Smooth the tracked direction toward the live gravity direction while
//!    airborne (held frozen while grounded, so a walking character never has
//!    its camera dragged by a field it is standing against).
//! 2. Accumulate pitch input independently, clamped to a fixed cone.
//! 3. When the tracked direction changed this frame, rotate the current view
//!    by the shortest arc between old and new down, then slerp toward the
//!    composed target so the world appears to tilt rather than snap.
//! 4. Extract yaw in the gravity-relative frame, add yaw input, and rebuild
//!    the view as yaw-then-pitch about the relative axes.
//!
//! The frame conversions at the bottom are pure and exact inverses of each
//! other; everything stateful lives in [`ViewReorienter`].

use nalgebra::Unit;

use crate::settings::{DEFAULT_SMOOTHING_WINDOW_S, MAX_PITCH_RAD};
use crate::{Dir3, Quat, Vec3};

/// Canonical down direction of the world frame, `(0, -1, 0)`.
#[inline]
pub fn world_down() -> Dir3 {
    Unit::new_unchecked(Vec3::new(0.0, -1.0, 0.0))
}

/// One frame of look input, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookInput {
    pub pitch_delta: f32,
    pub yaw_delta: f32,
}

/// Tuning for the reorienter.
#[derive(Debug, Clone, Copy)]
pub struct ViewParams {
    /// Pitch accumulator clamp, symmetric about level (radians).
    pub max_pitch: f32,
    /// Time for the tracked direction to close most of the gap to the live
    /// gravity direction while airborne (seconds). Larger is lazier.
    pub smoothing_window: f32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            max_pitch: MAX_PITCH_RAD,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW_S,
        }
    }
}

/// Per-player view state machine.
///
/// Owns the smoothed gravity direction and the independent pitch accumulator;
/// the view rotation itself stays host-owned and is passed through
/// [`ViewReorienter::update`] each frame.
#[derive(Debug, Clone)]
pub struct ViewReorienter {
    params: ViewParams,
    pitch: f32,
    last_gravity: Dir3,
}

impl Default for ViewReorienter {
    fn default() -> Self {
        Self::new(ViewParams::default())
    }
}

impl ViewReorienter {
    pub fn new(params: ViewParams) -> Self {
        Self {
            params,
            pitch: 0.0,
            last_gravity: world_down(),
        }
    }

    /// The gravity direction the view is currently oriented against.
    pub fn gravity_direction(&self) -> Dir3 {
        self.last_gravity
    }

    /// Accumulated pitch in radians, clamped to `[-max_pitch, max_pitch]`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Advances the view by one frame.
    ///
    /// `view` is the current world-space view rotation, `gravity_dir` the live
    /// (unsmoothed) gravity direction for this body, `falling` whether the
    /// body is airborne. Returns the new world-space view rotation.
    ///
    /// Notes:
    /// - The tracked direction only moves while falling. A grounded character
    ///   keeps the frame it landed with until it leaves the ground again.
    /// - Pitch input is consumed every frame regardless of smoothing state.
    pub fn update(
        &mut self,
        view: Quat,
        input: LookInput,
        dt: f32,
        falling: bool,
        gravity_dir: Dir3,
    ) -> Quat {
        let mut view = view;
        let previous = self.last_gravity;

        // Step 1: smooth the tracked direction toward the live one.
        if falling {
            let alpha = (dt / self.params.smoothing_window).clamp(0.0, 1.0);
            let blended = self
                .last_gravity
                .into_inner()
                .lerp(&gravity_dir.into_inner(), alpha);
            // Lerping two unit vectors can only hit zero length when they are
            // antipodal at alpha 0.5; keep the old direction for that frame.
            if let Some(dir) = Unit::try_new(blended, 1.0e-6) {
                self.last_gravity = dir;
            }
        }

        // Step 2: pitch accumulates independently of the view rotation.
        self.pitch = (self.pitch + input.pitch_delta).clamp(-self.params.max_pitch, self.params.max_pitch);

        // Step 3: tilt the view when the tracked direction moved this frame.
        // The slerp keeps only part of the tilt each frame; the remainder is
        // picked up on later frames as smoothing keeps feeding new directions.
        if self.last_gravity.into_inner() != previous.into_inner() {
            let arc = shortest_arc(previous, self.last_gravity);
            let target = arc * view;
            view = view.slerp(&target, dt.clamp(0.0, 1.0));
        }

        // Step 4: rebuild the view from gravity-relative yaw and pitch.
        let relative = to_gravity_relative(view, self.last_gravity);
        let forward = relative * Vec3::new(0.0, 0.0, -1.0);
        let yaw = (-forward.x).atan2(-forward.z) + input.yaw_delta;

        let leveled = Quat::from_axis_angle(&Vec3::y_axis(), yaw)
            * Quat::from_axis_angle(&Vec3::x_axis(), self.pitch);
        to_world_space(leveled, self.last_gravity)
    }
}

/// Rotation carrying `from` onto `to` with the smallest angle.
///
/// For the antipodal case (where the axis is ambiguous) a half turn about an
/// axis orthogonal to `from` is used.
fn shortest_arc(from: Dir3, to: Dir3) -> Quat {
    match Quat::rotation_between_axis(&from, &to) {
        Some(q) => q,
        None => {
            let axis = orthogonal_to(from);
            Quat::from_axis_angle(&axis, std::f32::consts::PI)
        }
    }
}

/// Any unit vector orthogonal to `dir`.
fn orthogonal_to(dir: Dir3) -> Dir3 {
    let v = dir.into_inner();
    let candidate = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let ortho = v.cross(&candidate);
    Unit::try_new(ortho, 1.0e-6).unwrap_or_else(|| Unit::new_unchecked(Vec3::z()))
}

/// Rotates a world-space rotation into the frame where `gravity_dir` is down.
///
/// Identity pass-through when `gravity_dir` already equals the canonical down
/// (exact comparison; the common single-zone case pays nothing).
pub fn to_gravity_relative(rotation: Quat, gravity_dir: Dir3) -> Quat {
    if gravity_dir.into_inner() == world_down().into_inner() {
        return rotation;
    }
    shortest_arc(gravity_dir, world_down()) * rotation
}

/// Inverse of [`to_gravity_relative`] for the same `gravity_dir`.
pub fn to_world_space(rotation: Quat, gravity_dir: Dir3) -> Quat {
    if gravity_dir.into_inner() == world_down().into_inner() {
        return rotation;
    }
    shortest_arc(world_down(), gravity_dir) * rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn dir(x: f32, y: f32, z: f32) -> Dir3 {
        Unit::new_normalize(Vec3::new(x, y, z))
    }

    #[test]
    fn frame_conversions_are_exact_inverses() {
        let rotations = [
            Quat::identity(),
            Quat::from_axis_angle(&Vec3::y_axis(), 1.2),
            Quat::from_axis_angle(&Vec3::x_axis(), -0.7)
                * Quat::from_axis_angle(&Vec3::z_axis(), 0.3),
        ];
        let directions = [
            world_down(),
            dir(1.0, 0.0, 0.0),
            dir(0.0, 1.0, 0.0),
            dir(-0.3, -0.5, 0.8),
        ];
        for q in &rotations {
            for d in &directions {
                let round_trip = to_world_space(to_gravity_relative(*q, *d), *d);
                assert!(
                    q.angle_to(&round_trip) < 1.0e-5,
                    "round trip drifted for {d:?}"
                );
            }
        }
    }

    #[test]
    fn canonical_down_is_a_bitwise_passthrough() {
        let q = Quat::from_axis_angle(&Vec3::y_axis(), 0.4);
        assert_eq!(to_gravity_relative(q, world_down()), q);
        assert_eq!(to_world_space(q, world_down()), q);
    }

    #[test]
    fn relative_frame_makes_gravity_point_down() {
        // Rotating the gravity direction into the relative frame must yield
        // canonical down, for any direction.
        for d in [dir(1.0, 0.0, 0.0), dir(0.2, 0.9, -0.4), dir(0.0, 1.0, 0.0)] {
            let arc = shortest_arc(d, world_down());
            let mapped = arc * d.into_inner();
            assert!((mapped - world_down().into_inner()).norm() < 1.0e-5);
        }
    }

    #[test]
    fn shortest_arc_handles_the_antipodal_case() {
        let up = dir(0.0, 1.0, 0.0);
        let arc = shortest_arc(world_down(), up);
        let mapped = arc * world_down().into_inner();
        assert!((mapped - up.into_inner()).norm() < 1.0e-5);
    }

    #[test]
    fn pitch_saturates_at_the_clamp() {
        let mut reorienter = ViewReorienter::default();
        let input = LookInput {
            pitch_delta: 5.0_f32.to_radians(),
            yaw_delta: 0.0,
        };
        let mut view = Quat::identity();
        for _ in 0..1000 {
            view = reorienter.update(view, input, 1.0 / 60.0, false, world_down());
        }
        assert!((reorienter.pitch() - MAX_PITCH_RAD).abs() < 1.0e-6);

        // And symmetrically downward.
        let input = LookInput {
            pitch_delta: -5.0_f32.to_radians(),
            yaw_delta: 0.0,
        };
        for _ in 0..1000 {
            view = reorienter.update(view, input, 1.0 / 60.0, false, world_down());
        }
        assert!((reorienter.pitch() + MAX_PITCH_RAD).abs() < 1.0e-6);
    }

    #[test]
    fn grounded_view_ignores_gravity_changes() {
        let mut reorienter = ViewReorienter::default();
        let sideways = dir(1.0, 0.0, 0.0);
        let view = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_4);

        let out = reorienter.update(view, LookInput::default(), 1.0 / 60.0, false, sideways);

        assert_eq!(reorienter.gravity_direction(), world_down());
        assert!(view.angle_to(&out) < 1.0e-5);
    }

    #[test]
    fn airborne_direction_converges_onto_the_live_gravity() {
        let mut reorienter = ViewReorienter::default();
        let target = dir(1.0, 0.0, 0.0);
        let mut view = Quat::identity();
        for _ in 0..300 {
            view = reorienter.update(view, LookInput::default(), 1.0 / 60.0, true, target);
        }
        let tracked = reorienter.gravity_direction();
        assert!(tracked.dot(&target) > 0.999, "tracked {tracked:?}");
    }

    #[test]
    fn yaw_is_preserved_through_reorientation() {
        // Start looking 90 degrees left under canonical gravity, fall into a
        // sideways field, and let the view settle. The yaw in the new
        // gravity-relative frame must still be 90 degrees left.
        let mut reorienter = ViewReorienter::default();
        let sideways = dir(1.0, 0.0, 0.0);
        let mut view = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        for _ in 0..600 {
            view = reorienter.update(view, LookInput::default(), 1.0 / 60.0, true, sideways);
        }

        let relative = to_gravity_relative(view, reorienter.gravity_direction());
        let forward = relative * Vec3::new(0.0, 0.0, -1.0);
        let yaw = (-forward.x).atan2(-forward.z);
        assert!((yaw - FRAC_PI_2).abs() < 1.0e-2, "yaw drifted to {yaw}");
    }

    #[test]
    fn yaw_input_turns_about_the_gravity_axis() {
        let mut reorienter = ViewReorienter::default();
        let input = LookInput {
            pitch_delta: 0.0,
            yaw_delta: FRAC_PI_2,
        };
        let view = reorienter.update(Quat::identity(), input, 1.0 / 60.0, false, world_down());

        let forward = view * Vec3::new(0.0, 0.0, -1.0);
        // Quarter turn left from -Z is -X.
        assert!((forward - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-4);
    }

    #[test]
    fn half_turn_of_yaw_faces_backwards() {
        let mut reorienter = ViewReorienter::default();
        let input = LookInput {
            pitch_delta: 0.0,
            yaw_delta: PI,
        };
        let view = reorienter.update(Quat::identity(), input, 1.0 / 60.0, false, world_down());

        let forward = view * Vec3::new(0.0, 0.0, -1.0);
        assert!((forward - Vec3::new(0.0, 0.0, 1.0)).norm() < 1.0e-4);
    }
}
