use std::fmt;

use nalgebra::Vector3;

use crate::MovementConfig;

/// Locomotion mode, recomputed from the collision probe every tick.
///
/// `Grounded` overrides both wall modes whenever the ground probe succeeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementMode {
    #[default]
    Grounded,
    Airborne,
    OnWallLeft,
    OnWallRight,
}

impl MovementMode {
    #[inline]
    pub fn is_grounded(self) -> bool {
        self == MovementMode::Grounded
    }

    #[inline]
    pub fn is_on_wall(self) -> bool {
        self.wall_side().is_some()
    }

    /// Anything that is not grounded, walls included.
    #[inline]
    pub fn is_airborne(self) -> bool {
        !self.is_grounded()
    }

    #[inline]
    pub fn wall_side(self) -> Option<WallSide> {
        match self {
            MovementMode::OnWallLeft => Some(WallSide::Left),
            MovementMode::OnWallRight => Some(WallSide::Right),
            _ => None,
        }
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovementMode::Grounded => "Grounded",
            MovementMode::Airborne => "Airborne",
            MovementMode::OnWallLeft => "OnWallLeft",
            MovementMode::OnWallRight => "OnWallRight",
        };
        f.write_str(name)
    }
}

/// Which side of the actor a wall was found on, relative to its facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    #[inline]
    pub fn opposite(self) -> WallSide {
        match self {
            WallSide::Left => WallSide::Right,
            WallSide::Right => WallSide::Left,
        }
    }

    #[inline]
    pub fn mode(self) -> MovementMode {
        match self {
            WallSide::Left => MovementMode::OnWallLeft,
            WallSide::Right => MovementMode::OnWallRight,
        }
    }
}

/// Per-frame intent from the external driver.
///
/// `jump_pressed` and `crouch_pressed` are edge-triggered: set them only on the frame the
/// button went down. `yaw` is the facing supplied by the camera (radians about +Y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub move_x: f32,
    pub move_z: f32,
    pub jump_pressed: bool,
    pub crouch_pressed: bool,
    pub sprint_held: bool,
    pub yaw: f32,
}

impl TickInput {
    /// Axes clamped to [-1, 1]; NaN axes collapse to 0.
    #[inline]
    pub fn clamped_axes(&self) -> (f32, f32) {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        (clamp(self.move_x), clamp(self.move_z))
    }
}

/// Mutable movement data owned by [`crate::MovementSimulator`].
///
/// A copy of this struct is the per-tick snapshot handed back to the driver.
///
/// Invariants
/// - `horizontal_speed >= base_speed` after friction while grounded.
/// - `left_input_multiplier` and `right_input_multiplier` stay in [0, 1] and are both `1.0`
///   when no lockout is active.
/// - `current_height` only changes through a height transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementState {
    /// Capsule center in world space.
    pub position: Vector3<f32>,
    /// Measured displacement over the last tick divided by its `dt`.
    pub velocity: Vector3<f32>,
    pub vertical_velocity: f32,
    pub horizontal_speed: f32,
    /// Floor that friction decays toward; lowered while crouching.
    pub base_speed: f32,
    pub yaw: f32,

    pub mode: MovementMode,
    /// Outward normal of the wall currently in contact, if any.
    pub wall_normal: Option<Vector3<f32>>,

    pub is_crouching: bool,
    pub current_height: f32,
    pub standing_height: f32,
    pub crouch_height: f32,

    pub is_sprinting: bool,
    pub is_moving: bool,

    pub bunny_hop_timer: f32,
    pub can_bunny_hop: bool,
    pub wall_jump_timer: f32,

    pub left_input_multiplier: f32,
    pub right_input_multiplier: f32,
    /// Side whose input is still being restored after a wall jump.
    pub lockout_side: Option<WallSide>,

    /// Horizontal launch direction of the last wall jump while its force is still decaying.
    pub wall_jump_direction: Option<Vector3<f32>>,
    /// Remaining outward force; restored to `wall_jump_force` once the decay window ends.
    pub wall_jump_force: f32,

    /// Current ground friction rate, including any escalation.
    pub ground_friction: f32,
}

impl MovementState {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            position: config.spawn_point(),
            velocity: Vector3::zeros(),
            vertical_velocity: 0.0,
            horizontal_speed: config.base_speed,
            base_speed: config.base_speed,
            yaw: 0.0,

            mode: MovementMode::Grounded,
            wall_normal: None,

            is_crouching: false,
            current_height: config.standing_height,
            standing_height: config.standing_height,
            crouch_height: config.crouch_height,

            is_sprinting: false,
            is_moving: false,

            bunny_hop_timer: 0.0,
            can_bunny_hop: false,
            wall_jump_timer: 0.0,

            left_input_multiplier: 1.0,
            right_input_multiplier: 1.0,
            lockout_side: None,

            wall_jump_direction: None,
            wall_jump_force: config.wall_jump_force,

            ground_friction: config.ground_friction,
        }
    }

    #[inline]
    pub fn input_multiplier(&self, side: WallSide) -> f32 {
        match side {
            WallSide::Left => self.left_input_multiplier,
            WallSide::Right => self.right_input_multiplier,
        }
    }

    #[inline]
    pub(crate) fn set_input_multiplier(&mut self, side: WallSide, value: f32) {
        let value = value.clamp(0.0, 1.0);
        match side {
            WallSide::Left => self.left_input_multiplier = value,
            WallSide::Right => self.right_input_multiplier = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_starts_grounded_at_spawn_with_no_lockout() {
        let config = MovementConfig::default();
        let state = MovementState::new(&config);

        assert_eq!(state.mode, MovementMode::Grounded);
        assert_eq!(state.position, config.spawn_point());
        assert_eq!(state.horizontal_speed, config.base_speed);
        assert_eq!(state.left_input_multiplier, 1.0);
        assert_eq!(state.right_input_multiplier, 1.0);
        assert_eq!(state.current_height, config.standing_height);
        assert!(state.lockout_side.is_none());
    }

    #[test]
    fn wall_modes_map_to_sides() {
        assert_eq!(MovementMode::OnWallLeft.wall_side(), Some(WallSide::Left));
        assert_eq!(MovementMode::OnWallRight.wall_side(), Some(WallSide::Right));
        assert_eq!(MovementMode::Grounded.wall_side(), None);
        assert!(MovementMode::OnWallLeft.is_airborne());
        assert!(!MovementMode::Grounded.is_airborne());
        assert_eq!(WallSide::Right.mode(), MovementMode::OnWallRight);
    }

    #[test]
    fn input_multipliers_are_clamped_on_write() {
        let mut state = MovementState::new(&MovementConfig::default());
        state.set_input_multiplier(WallSide::Left, -0.5);
        state.set_input_multiplier(WallSide::Right, 1.5);
        assert_eq!(state.input_multiplier(WallSide::Left), 0.0);
        assert_eq!(state.input_multiplier(WallSide::Right), 1.0);
    }

    #[test]
    fn axes_are_clamped() {
        let input = TickInput {
            move_x: 3.0,
            move_z: f32::NAN,
            ..TickInput::default()
        };
        assert_eq!(input.clamped_axes(), (1.0, 0.0));
    }
}
