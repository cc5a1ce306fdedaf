/*!
Simulator-wide tolerances and thresholds.

Tunable gameplay values live in [`crate::MovementConfig`]; the constants here are fixed
properties of the integration itself.

Notes
- Distances are in meters, time in seconds.
*/

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Remaining time below which a height transition is considered complete (seconds).
///
/// Accumulated `dt` sums rarely land exactly on the configured duration in `f32`.
pub const TIME_EPS: f32 = 1.0e-5;

/// Ground friction escalation only kicks in this far above the base speed (m/s).
pub const FRICTION_ESCALATION_MARGIN: f32 = 1.0;

/// A probe hit whose normal has a larger |y| than this is a floor or ceiling, not a wall.
pub const MAX_WALL_NORMAL_Y: f32 = 0.5;

/// Ray origins are lifted off the capsule surface by this much so they never start inside
/// the geometry the capsule is resting on (meters).
pub const PROBE_SKIN: f32 = 0.02;

/// Fraction of the capsule radius used for the outer ring of ground rays.
pub const GROUND_RING_FRACTION: f32 = 0.7;
