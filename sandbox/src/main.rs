//! Headless driver for the movement simulator.
//!
//! Usage:
//!   sandbox                                # default tuning, 60 Hz
//!   sandbox --config movement.toml         # override any subset of the tuning
//!   sandbox --dt 0.008 --telemetry-every 30
//!
//! Set `RUST_LOG=debug` to see mode changes and jumps, `RUST_LOG=trace` for per-tick telemetry.

mod level;
mod timeline;

use std::path::PathBuf;

use anyhow::{Context, ensure};
use clap::Parser;
use movement::{LogTelemetry, MovementConfig, MovementSimulator, RapierProbe, Telemetry};

use timeline::Phase;

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Replay a scripted input timeline through the movement simulator")]
struct Args {
    /// TOML file overriding movement tuning values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Log the telemetry map at info level every N ticks (0 keeps it at trace level)
    #[arg(long, default_value_t = 0)]
    telemetry_every: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be a positive number of seconds, got {}",
        args.dt
    );

    let config = match &args.config {
        Some(path) => MovementConfig::load(path)
            .with_context(|| format!("loading movement config from {}", path.display()))?,
        None => MovementConfig::default(),
    };

    let probe = RapierProbe::new(level::course());
    log::info!(
        "course ready: {} colliders, wall face at x = {}",
        probe.world().colliders.len(),
        level::WALL_FACE_X
    );

    let sim = MovementSimulator::new(config, probe).context("invalid movement config")?;
    let mut sim = match args.telemetry_every {
        0 => sim.with_telemetry(LogTelemetry),
        every => {
            let mut n = 0u32;
            sim.with_telemetry(move |t: &Telemetry| {
                if n % every == 0 {
                    let line = t
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join(" ");
                    log::info!("tick {n}: {line}");
                }
                n = n.wrapping_add(1);
            })
        }
    };

    for phase in Phase::ALL {
        let s = timeline::play(&mut sim, phase, args.dt);
        log::info!(
            "{:?}: {} frames, peak speed {:.2}, {} jumps, {} wall contacts, ended {} at ({:.2}, {:.2}, {:.2}) height {:.2}",
            s.phase,
            s.frames,
            s.peak_speed,
            s.jumps,
            s.wall_contacts,
            s.end.mode,
            s.end.position.x,
            s.end.position.y,
            s.end.position.z,
            s.end.current_height,
        );
    }

    Ok(())
}
