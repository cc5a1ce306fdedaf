//! Crouch/stand height interpolation.
//!
//! [`HeightTransition`] is a resumable step function: the simulator owns at most one, advances
//! it once per tick with the tick's `dt`, and drops it when it finishes. Requesting a new
//! transition replaces the active one, so the last request wins.

use crate::constants::TIME_EPS;
use crate::utils::lerp;

/// Output of one [`HeightTransition::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightStep {
    /// Collision height after this step.
    pub height: f32,
    /// Vertical position change that keeps the feet planted: half the height change.
    pub center_offset: f32,
    pub finished: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightTransition {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    previous: f32,
}

impl HeightTransition {
    /// `duration` must be positive; the config validation guarantees that for crouching.
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            previous: from,
        }
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.duration - self.elapsed <= TIME_EPS
    }

    /// Advances by `dt` and returns the new height plus the center offset for this step.
    ///
    /// Lands exactly on the target height on the step that reaches `duration`.
    pub fn step(&mut self, dt: f32) -> HeightStep {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);

        let height = if self.is_finished() {
            self.elapsed = self.duration;
            self.to
        } else {
            lerp(self.from, self.to, self.elapsed / self.duration)
        };

        let center_offset = (height - self.previous) * 0.5;
        self.previous = height;

        HeightStep {
            height,
            center_offset,
            finished: self.is_finished(),
        }
    }
}
