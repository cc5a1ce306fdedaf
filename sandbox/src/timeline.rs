//! Scripted input timeline replayed by the sandbox.
//!
//! Every phase produces one [`TickInput`] per frame from the latest state snapshot, so
//! edge-triggered intents (jump, crouch) can be timed on landings and wall contact the way a
//! player would press them.

use movement::{CollisionProbe, MovementSimulator, MovementState, TickInput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Sprint straight ahead.
    Run,
    /// Jump on every landing while running.
    BunnyHop,
    /// Strafe into the left wall, jump, then jump again off the wall.
    WallJump,
    /// Crouch, walk, then stand back up.
    CrouchWalk,
    /// Teleport back to the spawn point and idle.
    Reset,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Run,
        Phase::BunnyHop,
        Phase::WallJump,
        Phase::CrouchWalk,
        Phase::Reset,
    ];

    /// Phase length in seconds.
    pub fn duration(self) -> f32 {
        match self {
            Phase::Run => 1.5,
            Phase::BunnyHop => 3.0,
            Phase::WallJump => 2.5,
            Phase::CrouchWalk => 2.0,
            Phase::Reset => 0.5,
        }
    }

    fn input(self, state: &MovementState, frame: u32, frames: u32) -> TickInput {
        let run = TickInput {
            move_z: 1.0,
            ..TickInput::default()
        };

        match self {
            Phase::Run => TickInput {
                sprint_held: true,
                ..run
            },
            Phase::BunnyHop => TickInput {
                jump_pressed: state.mode.is_grounded(),
                ..run
            },
            Phase::WallJump => {
                let on_wall = state.mode.is_on_wall();
                TickInput {
                    move_x: if on_wall { 0.0 } else { -1.0 },
                    jump_pressed: state.mode.is_grounded() || on_wall,
                    ..run
                }
            }
            Phase::CrouchWalk => TickInput {
                crouch_pressed: frame == 0 || frame == frames / 2,
                ..run
            },
            Phase::Reset => TickInput::default(),
        }
    }
}

/// Outcome of one phase, logged by the driver.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub frames: u32,
    pub peak_speed: f32,
    pub jumps: u32,
    pub wall_contacts: u32,
    pub end: MovementState,
}

/// Replays `phase` at a fixed `dt`.
pub fn play<P: CollisionProbe>(
    sim: &mut MovementSimulator<P>,
    phase: Phase,
    dt: f32,
) -> PhaseSummary {
    let frames = (phase.duration() / dt).round().max(1.0) as u32;

    if phase == Phase::Reset {
        sim.reset();
    }

    let mut peak_speed = sim.state().horizontal_speed;
    let mut jumps = 0;
    let mut wall_contacts = 0;

    for frame in 0..frames {
        let before = *sim.state();
        let input = phase.input(&before, frame, frames);
        let after = sim.tick(input, dt);

        if input.jump_pressed && after.vertical_velocity > before.vertical_velocity.max(0.0) {
            jumps += 1;
        }
        if after.mode.is_on_wall() && !before.mode.is_on_wall() {
            wall_contacts += 1;
        }
        peak_speed = peak_speed.max(after.horizontal_speed);
    }

    PhaseSummary {
        phase,
        frames,
        peak_speed,
        jumps,
        wall_contacts,
        end: *sim.state(),
    }
}

#[cfg(test)]
mod tests {
    use movement::{MovementConfig, MovementMode, RapierProbe};

    use super::*;
    use crate::level;

    fn course_sim() -> MovementSimulator<RapierProbe> {
        MovementSimulator::new(
            MovementConfig::default(),
            RapierProbe::new(level::course()),
        )
        .unwrap()
    }

    #[test]
    fn run_moves_forward_on_the_floor() {
        let mut sim = course_sim();
        let summary = play(&mut sim, Phase::Run, 1.0 / 60.0);

        assert_eq!(summary.frames, 90);
        assert!(summary.end.position.z > 5.0, "{:?}", summary.end.position);
        assert_eq!(summary.end.mode, MovementMode::Grounded);
    }

    #[test]
    fn wall_jump_phase_reaches_the_wall_and_kicks_off_it() {
        let mut sim = course_sim();
        let summary = play(&mut sim, Phase::WallJump, 1.0 / 60.0);

        assert!(summary.wall_contacts >= 1, "{summary:?}");
        // The take-off from the floor plus at least one jump off the wall.
        assert!(summary.jumps >= 2, "{summary:?}");
        // Never through the wall.
        assert!(summary.end.position.x > level::WALL_FACE_X, "{summary:?}");
    }

    #[test]
    fn bunny_hop_phase_jumps_on_every_landing() {
        let mut sim = course_sim();
        let summary = play(&mut sim, Phase::BunnyHop, 1.0 / 60.0);

        assert!(summary.jumps >= 2, "{summary:?}");
        assert!(summary.peak_speed <= sim.config().max_speed);
        assert!(summary.end.position.z > 5.0, "{summary:?}");
    }

    #[test]
    fn crouch_walk_phase_ends_standing_at_full_height() {
        let mut sim = course_sim();
        let summary = play(&mut sim, Phase::CrouchWalk, 1.0 / 60.0);

        assert!(!summary.end.is_crouching);
        assert_eq!(summary.end.current_height, sim.config().standing_height);
        assert_eq!(summary.end.base_speed, sim.config().base_speed);
        assert_eq!(summary.end.mode, MovementMode::Grounded);
    }

    #[test]
    fn reset_phase_returns_to_spawn() {
        let mut sim = course_sim();
        play(&mut sim, Phase::Run, 1.0 / 60.0);
        let summary = play(&mut sim, Phase::Reset, 1.0 / 60.0);

        let spawn = sim.config().spawn_point();
        assert!((summary.end.position - spawn).norm() < 0.1);
        assert_eq!(summary.end.horizontal_speed, summary.end.base_speed);
    }
}
