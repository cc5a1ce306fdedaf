pub mod config;
pub mod constants;
pub mod crouch;
pub mod height;
pub mod jump;
pub mod probe;
pub mod simulator;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use config::{ConfigError, MovementConfig};
pub use height::{HeightStep, HeightTransition};
pub use probe::{
    BodyPose, CollisionProbe, LevelCollider, LevelShape, LevelWorld, OpenSpace, RapierProbe,
    WallContact,
};
pub use simulator::MovementSimulator;
pub use state::{MovementMode, MovementState, TickInput, WallSide};
pub use telemetry::{LogTelemetry, Telemetry, TelemetrySink};
pub use utils::{forward_from_yaw, right_from_yaw};
