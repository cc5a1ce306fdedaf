//! Jump intents: ground jumps, wall jumps and the bunny-hop speed chain.

use nalgebra::Vector3;

use crate::{
    MovementMode, MovementSimulator, WallSide,
    probe::CollisionProbe,
    utils::{forward_from_yaw, right_from_yaw, rotate_planar_toward},
};

impl<P: CollisionProbe> MovementSimulator<P> {
    /// Wall contact always allows a jump; otherwise ground must be within
    /// `jump_height_offset` below the feet.
    pub fn can_jump(&self) -> bool {
        self.state.mode.is_on_wall()
            || self
                .probe
                .is_grounded(&self.pose(), self.config.jump_height_offset)
    }

    /// Performs a wall jump or a ground jump. Returns `false` (and changes nothing) when
    /// no jump is possible.
    pub fn jump(&mut self) -> bool {
        if let Some(side) = self.state.mode.wall_side() {
            self.wall_jump(side);
            return true;
        }
        if !self.can_jump() {
            return false;
        }
        self.ground_jump();
        true
    }

    fn ground_jump(&mut self) {
        let multiplier = self.config.bunny_hop_multiplier;
        self.apply_bunny_hop(multiplier);

        let s = &mut self.state;
        s.vertical_velocity = self.config.launch_speed(self.config.jump_height);
        s.bunny_hop_timer = 0.0;
        s.can_bunny_hop = true;
        s.mode = MovementMode::Airborne;

        log::debug!(
            "jump: vy={:.2} speed={:.2}",
            s.vertical_velocity,
            s.horizontal_speed
        );
    }

    fn wall_jump(&mut self, side: WallSide) {
        let up = Vector3::y();
        let normal = self.state.wall_normal.unwrap_or_else(|| match side {
            // Without a recorded normal, push straight away from the wall side.
            WallSide::Left => right_from_yaw(self.state.yaw),
            WallSide::Right => -right_from_yaw(self.state.yaw),
        });
        let fallback = match side {
            WallSide::Left => normal.cross(&up),
            WallSide::Right => up.cross(&normal),
        };
        let direction = rotate_planar_toward(
            normal,
            forward_from_yaw(self.state.yaw),
            fallback,
            self.config.wall_jump_angle.to_radians(),
        );

        let multiplier = self.config.wall_jump_bunny_hop_multiplier;
        self.apply_bunny_hop(multiplier);

        let cfg = &self.config;
        let s = &mut self.state;
        s.vertical_velocity = cfg.launch_speed(cfg.wall_jump_height);
        s.set_input_multiplier(side, 0.0);
        s.set_input_multiplier(side.opposite(), 1.0);
        s.lockout_side = Some(side);
        s.can_bunny_hop = true;

        s.wall_jump_timer = 0.0;
        s.wall_jump_force = cfg.wall_jump_force;
        s.wall_jump_direction = Some(direction);

        s.mode = MovementMode::Airborne;
        s.wall_normal = None;

        log::debug!(
            "wall jump off {side:?} wall: dir={direction:?} vy={:.2} speed={:.2}",
            s.vertical_velocity,
            s.horizontal_speed
        );
    }

    /// Chains speed when the previous jump is still within its grace period and the actor
    /// is moving. Never exceeds `max_speed`.
    fn apply_bunny_hop(&mut self, multiplier: f32) {
        let s = &mut self.state;
        if s.can_bunny_hop && s.is_moving {
            s.horizontal_speed = (s.horizontal_speed * multiplier).min(self.config.max_speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use crate::probe::{OpenSpace, scripted::ScriptedProbe};
    use crate::{MovementConfig, MovementMode, MovementSimulator, TickInput, WallSide};

    fn on_left_wall(probe: &ScriptedProbe) -> MovementSimulator<&ScriptedProbe> {
        probe.wall_normal.set(Some(Vector3::x()));
        let mut sim = MovementSimulator::new(MovementConfig::default(), probe).unwrap();
        sim.tick(
            TickInput {
                move_z: 1.0,
                ..TickInput::default()
            },
            0.05,
        );
        assert_eq!(sim.state().mode, MovementMode::OnWallLeft);
        sim
    }

    #[test]
    fn wall_jump_from_the_left_wall() {
        let probe = ScriptedProbe::default();
        let mut sim = on_left_wall(&probe);
        sim.state.wall_jump_timer = 2.0;

        assert!(sim.jump());

        let s = sim.state();
        assert!((s.vertical_velocity - 4.429).abs() < 1.0e-3, "{}", s.vertical_velocity);
        assert_eq!(s.left_input_multiplier, 0.0);
        assert_eq!(s.right_input_multiplier, 1.0);
        assert_eq!(s.wall_jump_timer, 0.0);
        assert_eq!(s.lockout_side, Some(WallSide::Left));
        assert_eq!(s.mode, MovementMode::Airborne);
        assert_eq!(s.wall_jump_force, sim.config().wall_jump_force);

        // Away from the wall (+X) and 45 degrees toward the facing (+Z).
        let dir = s.wall_jump_direction.unwrap();
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert!((dir - Vector3::new(half, 0.0, half)).norm() < 1.0e-5, "{dir:?}");
    }

    #[test]
    fn lockout_restores_linearly_and_lands_on_one() {
        let probe = ScriptedProbe::default();
        let mut sim = on_left_wall(&probe);
        probe.wall_normal.set(None);
        sim.jump();

        let mut last = 0.0;
        for _ in 0..6 {
            let snap = sim.tick(TickInput::default(), 0.05);
            assert!(snap.left_input_multiplier >= last);
            assert!((0.0..=1.0).contains(&snap.left_input_multiplier));
            assert_eq!(snap.right_input_multiplier, 1.0);
            last = snap.left_input_multiplier;
        }

        // 6 * 0.05 = wall_jump_disable_directional_control_duration.
        assert_eq!(sim.state().left_input_multiplier, 1.0);
        assert_eq!(sim.state().lockout_side, None);
    }

    #[test]
    fn locked_side_input_is_ignored() {
        let probe = ScriptedProbe::default();
        let mut sim = on_left_wall(&probe);
        probe.wall_normal.set(None);
        sim.jump();

        // Cancel the outward push to isolate strafing.
        sim.state.wall_jump_direction = None;
        let start = sim.state().position;
        sim.tick(
            TickInput {
                move_x: -1.0,
                ..TickInput::default()
            },
            0.01,
        );
        let moved_left = start.x - sim.state().position.x;
        let allowed = sim.state().horizontal_speed * 0.01 * (0.01 / 0.3);
        assert!(moved_left <= allowed + 1.0e-6, "moved {moved_left}");
    }

    #[test]
    fn residual_force_pushes_away_from_the_wall_and_decays() {
        let probe = ScriptedProbe::default();
        let mut sim = on_left_wall(&probe);
        probe.wall_normal.set(None);
        sim.jump();

        let x0 = sim.state().position.x;
        let snap = sim.tick(TickInput::default(), 0.1);
        assert!(snap.position.x > x0);
        assert!((snap.wall_jump_force - 6.4).abs() < 1.0e-4);

        for _ in 0..5 {
            sim.tick(TickInput::default(), 0.1);
        }
        // Window over: direction dropped, force restored for the next jump.
        assert_eq!(sim.state().wall_jump_direction, None);
        assert_eq!(sim.state().wall_jump_force, sim.config().wall_jump_force);
    }

    #[test]
    fn ground_jump_launches_and_leaves_the_ground() {
        let probe = ScriptedProbe::grounded();
        let mut sim = MovementSimulator::new(MovementConfig::default(), &probe).unwrap();

        let snap = sim.tick(
            TickInput {
                jump_pressed: true,
                ..TickInput::default()
            },
            0.01,
        );
        let launch = (2.0f32 * 9.81).sqrt();
        assert!((snap.vertical_velocity - launch).abs() < 1.0e-4);
        assert!(snap.position.y > 1.0);
        assert_eq!(snap.mode, MovementMode::Airborne);
        assert!(snap.can_bunny_hop);
        assert_eq!(snap.bunny_hop_timer, 0.0);

        // The floor is still in reach on the next tick; rising keeps the actor airborne.
        let snap = sim.tick(TickInput::default(), 0.01);
        assert_eq!(snap.mode, MovementMode::Airborne);
        assert!(snap.vertical_velocity > 0.0);
    }

    #[test]
    fn jump_without_ground_or_wall_is_a_no_op() {
        let mut sim = MovementSimulator::new(MovementConfig::default(), OpenSpace).unwrap();
        sim.tick(TickInput::default(), 0.1);
        let before = *sim.state();

        assert!(!sim.can_jump());
        assert!(!sim.jump());
        assert_eq!(*sim.state(), before);
    }

    #[test]
    fn chained_bunny_hops_compound_up_to_the_cap() {
        let config = MovementConfig {
            bunny_hop_multiplier: 1.5,
            ..MovementConfig::default()
        };
        let probe = ScriptedProbe::grounded();
        let mut sim = MovementSimulator::new(config, &probe).unwrap();

        let run = TickInput {
            move_z: 1.0,
            ..TickInput::default()
        };
        let hop = TickInput {
            jump_pressed: true,
            ..run
        };

        sim.tick(run, 0.01);
        // First jump only arms the chain.
        let first = sim.tick(hop, 0.01).horizontal_speed;
        assert!(first < 6.0 + 1.0e-4);

        let mut last = first;
        let mut speeds = Vec::new();
        for _ in 0..4 {
            // Land and hop again well inside the grace period.
            sim.state.vertical_velocity = 0.0;
            sim.tick(run, 0.01);
            let speed = sim.tick(hop, 0.01).horizontal_speed;
            assert!(speed <= sim.config().max_speed);
            speeds.push(speed);
            assert!(speed >= last);
            last = speed;
        }
        assert!(speeds[0] > first * 1.4);
        assert_eq!(*speeds.last().unwrap(), sim.config().max_speed);
    }

    #[test]
    fn expired_grace_period_does_not_chain() {
        let probe = ScriptedProbe::grounded();
        let mut sim = MovementSimulator::new(MovementConfig::default(), &probe).unwrap();
        sim.state.is_moving = true;
        sim.state.can_bunny_hop = true;
        sim.state.bunny_hop_timer = 0.15;

        // Timer passes the 0.2 s grace period on this tick.
        sim.tick(TickInput::default(), 0.1);
        assert!(!sim.state().can_bunny_hop);

        sim.state.is_moving = true;
        assert!(sim.jump());
        assert_eq!(sim.state().horizontal_speed, 6.0);
    }

    #[test]
    fn standing_still_does_not_chain() {
        let probe = ScriptedProbe::grounded();
        let mut sim = MovementSimulator::new(MovementConfig::default(), &probe).unwrap();
        sim.state.can_bunny_hop = true;
        sim.state.is_moving = false;

        assert!(sim.jump());
        assert_eq!(sim.state().horizontal_speed, 6.0);
    }
}
