//! Debug telemetry pushed to an external observer once per tick.
//!
//! The simulator never reads telemetry back; it rebuilds the map from its state and hands it
//! to the installed [`TelemetrySink`].

use std::collections::BTreeMap;

use nalgebra::Vector3;

use crate::MovementState;

/// Ordered label → display value map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Telemetry {
    entries: BTreeMap<&'static str, String>,
}

impl Telemetry {
    pub fn from_state(state: &MovementState) -> Self {
        let mut t = Self::default();
        t.set_scalar("speed", state.horizontal_speed);
        t.set_vector("velocity", &state.velocity);
        t.set_scalar("vertical_velocity", state.vertical_velocity);
        t.set_scalar("bunny_hop_timer", state.bunny_hop_timer);
        t.set_scalar("wall_jump_timer", state.wall_jump_timer);
        t.set("mode", state.mode.to_string());
        t.set_scalar("left_input_multiplier", state.left_input_multiplier);
        t.set_scalar("right_input_multiplier", state.right_input_multiplier);
        t.set_scalar("height", state.current_height);
        t.set("crouching", state.is_crouching.to_string());
        t.set("sprinting", state.is_sprinting.to_string());
        t
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set(&mut self, label: &'static str, value: String) {
        self.entries.insert(label, value);
    }

    fn set_scalar(&mut self, label: &'static str, value: f32) {
        self.set(label, format!("{value:.2}"));
    }

    fn set_vector(&mut self, label: &'static str, v: &Vector3<f32>) {
        self.set(label, format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z));
    }
}

/// Receives the telemetry map every tick.
pub trait TelemetrySink {
    fn publish(&mut self, telemetry: &Telemetry);
}

/// Writes every entry at `trace` level through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn publish(&mut self, telemetry: &Telemetry) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let line = telemetry
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        log::trace!("{line}");
    }
}

impl<F: FnMut(&Telemetry)> TelemetrySink for F {
    fn publish(&mut self, telemetry: &Telemetry) {
        self(telemetry)
    }
}
