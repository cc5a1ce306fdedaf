//! Crouch toggling and the height transition that goes with it.
//!
//! Base speed is always recomputed from the configured value, so any number of crouch/stand
//! cycles leaves it exactly where it started.

use crate::{HeightTransition, MovementSimulator, probe::CollisionProbe};

impl<P: CollisionProbe> MovementSimulator<P> {
    /// Toggles between crouching and standing. Returns `false` when standing up is blocked
    /// by geometry above the actor.
    pub fn crouch(&mut self) -> bool {
        let crouching = !self.state.is_crouching;

        if !crouching {
            // Room for the full standing capsule, measured from the current center.
            let needed = self.state.standing_height - self.state.current_height * 0.5;
            if !self.probe.is_clear_above(&self.pose(), needed) {
                log::debug!("stand up blocked: need {needed:.2} m of headroom");
                return false;
            }
        }

        self.state.is_crouching = crouching;
        let target = if crouching {
            self.state.crouch_height
        } else {
            self.state.standing_height
        };
        self.start_height_transition(target);

        // Current speed is left alone; friction settles it onto the new floor.
        let base = self.canonical_base_speed();
        self.state.base_speed = base;

        log::debug!(
            "{} (base speed {base:.2})",
            if crouching { "crouch" } else { "stand" }
        );
        true
    }

    pub(crate) fn canonical_base_speed(&self) -> f32 {
        if self.state.is_crouching {
            self.config.base_speed * self.config.crouch_speed_multiplier
        } else {
            self.config.base_speed
        }
    }

    /// Replaces any active transition with one from the current height to `target`.
    fn start_height_transition(&mut self, target: f32) {
        if let Some(active) = self.height_transition.take() {
            log::trace!("height transition to {:.2} cancelled", active.target());
        }
        self.height_transition = Some(HeightTransition::new(
            self.state.current_height,
            target,
            self.config.crouch_transition_duration,
        ));
    }

    /// Advances the active transition, keeping the feet where they are.
    pub(crate) fn advance_height(&mut self, dt: f32) {
        let Some(transition) = self.height_transition.as_mut() else {
            return;
        };

        let step = transition.step(dt);
        self.state.current_height = step.height;
        self.state.position.y += step.center_offset;

        if step.finished {
            self.height_transition = None;
        }
    }
}
