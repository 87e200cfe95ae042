/*!
Gravity-zone settings and tolerances.

These constants centralize the parameters used by zone defaults, the resolver,
force application, and view reorientation. Keeping them together makes tuning
easier and keeps unit conventions in one place.

Notes
- Distances are in meters, time in seconds, accelerations in m/s^2.
- The world is Y-up: canonical down is -Y.
- Favor practical world-space tolerances over machine epsilon.
*/

/// Baseline gravity magnitude in meters per second squared (positive value).
///
/// Kinematic character controllers receive gravity as a scale relative to
/// this baseline plus a direction, so `|net| == BASELINE_GRAVITY_MPS2` maps
/// to a gravity scale of exactly 1.0.
pub const BASELINE_GRAVITY_MPS2: f32 = 9.8;

/// Default priority for newly built zones.
pub const DEFAULT_ZONE_PRIORITY: i32 = 0;

/// Default linear damping applied by a zone to physics bodies inside it.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.05;

/// Default angular damping applied by a zone to physics bodies inside it.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.1;

/// Squared magnitude below which a vector is treated as zero (m^2/s^4).
///
/// Used for the near-zero direction guard when normalizing a net gravity
/// vector; falling back to a body-relative axis beats propagating NaN.
pub const MAG_EPS_SQ: f32 = 1.0e-12;

/// Smallest mass considered resolvable for impulse application (kg).
/// Bodies lighter than this are silently excluded from force application.
pub const MIN_MASS_KG: f32 = 1.0e-4;

/// Minimum query distance from a point-source zone's center (meters).
/// Clamps the inverse-square profile so the field stays finite near the center.
pub const MIN_POINT_SOURCE_DISTANCE: f32 = 0.1;

/// Maximum accumulated look pitch in radians (60 degrees).
/// At or beyond 90 degrees the gravity-relative frame can gimbal lock.
pub const MAX_PITCH_RAD: f32 = std::f32::consts::FRAC_PI_3;

/// Seconds over which a gravity-direction change blends into the view while
/// airborne. The per-frame interpolation factor is `dt / window`, a fixed
/// fractional step per unit time, so a smaller window converges faster.
pub const DEFAULT_SMOOTHING_WINDOW_S: f32 = 0.1;
