use nalgebra::Vector3;

use crate::{
    ConfigError, HeightTransition, MovementConfig, MovementMode, MovementState, TickInput,
    WallSide,
    constants::{FRICTION_ESCALATION_MARGIN, TIME_EPS},
    probe::{BodyPose, CollisionProbe},
    telemetry::{Telemetry, TelemetrySink},
    utils::{forward_from_yaw, lerp, right_from_yaw, to_planar},
};

/// First-person movement simulator for a single capsule actor.
///
/// Owns the [`MovementState`], the active crouch/stand [`HeightTransition`] and the
/// collaborators injected at construction (collision probe, optional telemetry sink).
///
/// The external driver calls [`MovementSimulator::tick`] once per frame.
pub struct MovementSimulator<P> {
    pub(crate) config: MovementConfig,
    pub(crate) probe: P,
    pub(crate) state: MovementState,
    pub(crate) height_transition: Option<HeightTransition>,
    /// Set by `reset`: the stored mode predates the teleport and must not drive gravity
    /// until the probe has been consulted again.
    pub(crate) mode_stale: bool,
    sink: Option<Box<dyn TelemetrySink>>,
    telemetry_enabled: bool,
}

impl<P: CollisionProbe> MovementSimulator<P> {
    /// Validates `config` and builds the initial state at the spawn point.
    pub fn new(config: MovementConfig, probe: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = MovementState::new(&config);

        log::info!(
            "movement simulator ready: base_speed={} max_speed={} spawn={:?}",
            config.base_speed,
            config.max_speed,
            config.spawn_point
        );

        Ok(Self {
            config,
            probe,
            state,
            height_transition: None,
            mode_stale: false,
            sink: None,
            telemetry_enabled: true,
        })
    }

    pub fn with_telemetry(mut self, sink: impl TelemetrySink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Pauses or resumes telemetry pushes without dropping the sink.
    pub fn set_telemetry_enabled(&mut self, enabled: bool) {
        self.telemetry_enabled = enabled;
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry_enabled
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn height_transition(&self) -> Option<&HeightTransition> {
        self.height_transition.as_ref()
    }

    /// Current capsule placement as seen by the probe.
    pub fn pose(&self) -> BodyPose {
        BodyPose {
            position: self.state.position,
            height: self.state.current_height,
            radius: self.config.radius,
        }
    }

    /// Advances the simulation by one frame and returns a snapshot of the state.
    ///
    /// Step order is part of the contract:
    /// 0. crouch request, then advance the height transition
    /// 1. timers and wall-jump lockout restore
    /// 2. ground/air friction
    /// 3. wall-jump residual force
    /// 4. gravity
    /// 5. ground/wall detection
    /// 6. horizontal move, then the jump request
    /// 7. vertical integration
    /// 8. moving flag and measured velocity
    ///
    /// `dt` must be positive; the driver is trusted to provide that.
    pub fn tick(&mut self, input: TickInput, dt: f32) -> MovementState {
        let start = self.state.position;
        self.state.yaw = input.yaw;
        self.state.is_sprinting = input.sprint_held;

        if input.crouch_pressed {
            self.crouch();
        }
        self.advance_height(dt);

        self.update_timers(dt);
        self.apply_friction(dt);
        self.apply_wall_jump_force(dt);
        self.apply_gravity(dt);
        self.detect_surroundings();
        self.move_horizontal(&input, dt);
        if input.jump_pressed {
            self.jump();
        }
        self.integrate_vertical(dt);
        self.update_moving(start, dt);

        self.publish_telemetry();
        self.state
    }

    /// Teleports to the spawn point and clears momentum.
    ///
    /// Collision resolution is bypassed for the teleport. Crouch state and wall-jump
    /// lockouts are left untouched. Wall contact is dropped and the mode is re-derived from
    /// the probe on the next tick.
    pub fn reset(&mut self) {
        let s = &mut self.state;
        s.position = self.config.spawn_point();
        s.horizontal_speed = s.base_speed;
        s.vertical_velocity = 0.0;
        s.velocity = Vector3::zeros();
        s.mode = MovementMode::Airborne;
        s.wall_normal = None;
        self.mode_stale = true;

        log::info!("reset to spawn {:?}", self.config.spawn_point);
    }

    /// Moves by `desired` after collision resolution; returns the travelled displacement.
    pub(crate) fn displace(&mut self, desired: Vector3<f32>, dt: f32) -> Vector3<f32> {
        let moved = self.probe.resolve_motion(&self.pose(), desired, dt);
        self.state.position += moved;
        moved
    }

    fn update_timers(&mut self, dt: f32) {
        let cfg = &self.config;
        let s = &mut self.state;

        s.bunny_hop_timer += dt;
        s.wall_jump_timer += dt;

        if s.bunny_hop_timer > cfg.bunny_hop_grace_period {
            s.can_bunny_hop = false;
        }

        if let Some(side) = s.lockout_side {
            let lockout = cfg.wall_jump_disable_directional_control_duration;
            let restored = if lockout - s.wall_jump_timer <= TIME_EPS {
                1.0
            } else {
                s.wall_jump_timer / lockout
            };
            s.set_input_multiplier(side, restored);
            if s.input_multiplier(side) >= 1.0 {
                s.lockout_side = None;
            }
        }

        if s.wall_jump_timer > cfg.wall_jump_apply_force_duration {
            s.wall_jump_direction = None;
            s.wall_jump_force = cfg.wall_jump_force;
        }
    }

    fn apply_friction(&mut self, dt: f32) {
        let cfg = &self.config;
        let s = &mut self.state;

        if s.mode.is_grounded() {
            if s.horizontal_speed >= s.base_speed + FRICTION_ESCALATION_MARGIN {
                s.ground_friction *= cfg.ground_friction_multiplier;
            } else {
                s.ground_friction = cfg.ground_friction;
            }
            s.horizontal_speed = (s.horizontal_speed - s.ground_friction * dt).max(s.base_speed);
        } else {
            s.ground_friction = cfg.ground_friction;
            s.horizontal_speed = lerp(s.horizontal_speed, s.base_speed, cfg.air_friction * dt);
        }
    }

    fn apply_wall_jump_force(&mut self, dt: f32) {
        let Some(direction) = self.state.wall_jump_direction else {
            return;
        };
        let duration = self.config.wall_jump_apply_force_duration;
        if self.state.wall_jump_timer >= duration {
            return;
        }

        let decay = self.config.wall_jump_force / duration * dt;
        self.state.wall_jump_force = (self.state.wall_jump_force - decay).max(0.0);

        let push = direction * self.state.wall_jump_force * dt;
        self.displace(push, dt);
    }

    fn apply_gravity(&mut self, dt: f32) {
        if self.mode_stale || self.state.mode.is_grounded() {
            return;
        }

        let s = &mut self.state;
        let sliding = s.vertical_velocity <= 0.0 && s.mode.is_on_wall() && s.is_moving;
        let gravity = if sliding {
            self.config.wall_jump_gravity_on_wall
        } else {
            self.config.gravity
        };
        s.vertical_velocity += gravity * dt;
    }

    /// Derives the mode from the probe. Ground always wins over walls.
    fn detect_surroundings(&mut self) {
        let previous = self.state.mode;
        let pose = self.pose();

        // An ascending actor has left the ground even while the probe still reaches it.
        let grounded = self.state.vertical_velocity <= 0.0
            && self.probe.is_grounded(&pose, self.config.ground_offset);

        if grounded {
            let s = &mut self.state;
            s.mode = MovementMode::Grounded;
            s.wall_normal = None;
            s.vertical_velocity = 0.0;
            // Friction ran under the previous mode; a landing tick still owes the floor.
            s.horizontal_speed = s.horizontal_speed.max(s.base_speed);
        } else {
            let wall = if self.is_retreating() {
                None
            } else {
                self.find_wall(&pose)
            };
            match wall {
                Some((side, normal)) => {
                    self.state.mode = side.mode();
                    self.state.wall_normal = Some(normal);
                }
                None => {
                    self.state.mode = MovementMode::Airborne;
                    self.state.wall_normal = None;
                }
            }
        }

        self.mode_stale = false;
        if previous != self.state.mode {
            log::debug!("mode {previous} -> {}", self.state.mode);
        }
    }

    fn is_retreating(&self) -> bool {
        forward_from_yaw(self.state.yaw).dot(&to_planar(&self.state.velocity)) < 0.0
    }

    /// Left first, then right.
    fn find_wall(&self, pose: &BodyPose) -> Option<(WallSide, Vector3<f32>)> {
        let right = right_from_yaw(self.state.yaw);
        let radius = self.config.wall_detection_radius;

        [(WallSide::Left, -right), (WallSide::Right, right)]
            .into_iter()
            .find_map(|(side, dir)| {
                self.probe
                    .detect_wall(pose, dir, radius)
                    .map(|contact| (side, contact.normal))
            })
    }

    fn move_horizontal(&mut self, input: &TickInput, dt: f32) {
        let s = &self.state;
        let (x, z) = input.clamped_axes();
        let x = x.clamp(-s.left_input_multiplier, s.right_input_multiplier);

        let mut mv = right_from_yaw(s.yaw) * x + forward_from_yaw(s.yaw) * z;
        let magnitude = mv.norm();
        if magnitude > 1.0 {
            mv /= magnitude;
        }
        if s.mode.is_airborne() {
            mv *= self.config.air_control_multiplier;
        }
        if s.is_sprinting {
            mv *= self.config.sprint_multiplier;
        }

        let desired = mv * s.horizontal_speed * dt;
        self.displace(desired, dt);
    }

    fn integrate_vertical(&mut self, dt: f32) {
        let dy = self.state.vertical_velocity * dt;
        if dy != 0.0 {
            self.displace(Vector3::new(0.0, dy, 0.0), dt);
        }
    }

    fn update_moving(&mut self, start: Vector3<f32>, dt: f32) {
        let s = &mut self.state;
        let delta = s.position - start;
        s.is_moving = to_planar(&delta).norm() > self.config.moving_epsilon;
        s.velocity = if dt > 0.0 {
            delta / dt
        } else {
            Vector3::zeros()
        };
    }

    fn publish_telemetry(&mut self) {
        if !self.telemetry_enabled {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.publish(&Telemetry::from_state(&self.state));
        }
    }
}
