//! Sculpt Sandbox - Headless Simulation Driver
//!
//! Runs one full knock-out / dismantle / rebuild cycle without a window,
//! reloads the resulting export as a snapshot, and prints the export JSON to
//! stdout.
//!
//! Run with: `cargo run --bin sculpt_sandbox -- [shape.json] [target.json]`
//!
//! - `shape.json`: initial sculpture (default: generated pyramid)
//! - `target.json`: rebuild target (default: generated tower)
//! - `RUST_LOG=info` (or `debug`) shows lifecycle logging

use std::path::Path;
use std::process::ExitCode;

use glam::Vec3;
use voxel_sculpt_engine::game::shape_io::{self, ShapeFileError};
use voxel_sculpt_engine::{
    FixedStepper, Rgb, ShapeVoxel, SimState, SimulationConfig, SimulationEvent, VoxelSimulation,
};

/// Simulated host frame length (slightly irregular to exercise the stepper).
const HOST_FRAME_S: [f32; 3] = [0.016, 0.017, 0.018];
/// Seconds the scatter is left to settle before rebuilding.
const SCATTER_SECONDS: f32 = 2.5;
/// Give up on a rebuild after this many seconds.
const REBUILD_TIMEOUT_S: f32 = 30.0;

/// Host loop stand-in: feeds irregular frames through the fixed stepper.
struct Driver {
    sim: VoxelSimulation,
    stepper: FixedStepper,
    frame: usize,
}

impl Driver {
    fn new(config: SimulationConfig) -> Self {
        let stepper = FixedStepper::new(
            config.reference_hz,
            config.max_frame_dt,
            config.max_steps_per_frame,
        );
        Self {
            sim: VoxelSimulation::new(config),
            stepper,
            frame: 0,
        }
    }

    /// Advance one host frame; returns its length in seconds.
    fn tick(&mut self) -> f32 {
        let dt = HOST_FRAME_S[self.frame % HOST_FRAME_S.len()];
        self.frame += 1;
        let sim = &mut self.sim;
        self.stepper.advance(dt, |step| sim.step(step));
        self.log_events();
        dt
    }

    fn run_for(&mut self, seconds: f32) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            elapsed += self.tick();
        }
    }

    fn run_until_stable(&mut self) -> bool {
        let mut elapsed = 0.0;
        while self.sim.state() != SimState::Stable {
            if elapsed > REBUILD_TIMEOUT_S {
                return false;
            }
            elapsed += self.tick();
        }
        true
    }

    fn log_events(&mut self) {
        for event in self.sim.drain_events() {
            match event {
                SimulationEvent::StateChanged(state) => log::info!("state -> {state}"),
                SimulationEvent::CountChanged(count) => log::info!("population -> {count}"),
                SimulationEvent::Collapsed { count } => log::info!("{count} voxels collapsed"),
                SimulationEvent::RebuildPlanned {
                    matched,
                    rubble,
                    unassigned,
                } => log::info!(
                    "plan: {matched} matched / {rubble} rubble / {unassigned} unassigned"
                ),
            }
        }
    }
}

fn load_or(
    path: Option<&str>,
    fallback: impl FnOnce() -> Vec<ShapeVoxel>,
) -> Result<Vec<ShapeVoxel>, ShapeFileError> {
    match path {
        Some(p) => shape_io::load_shape_file(Path::new(p)),
        None => Ok(fallback()),
    }
}

/// Largest per-slot distance between two populations of equal size.
fn max_deviation(a: &VoxelSimulation, b: &VoxelSimulation) -> f32 {
    a.particles()
        .iter()
        .zip(b.particles())
        .map(|(p, q)| p.position().distance(q.position()))
        .fold(0.0, f32::max)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = SimulationConfig::default();
    let floor = config.grid.floor_y;
    let palette = [
        Rgb::from_packed(0xd9_4f_30),
        Rgb::from_packed(0xe8_a3_3d),
        Rgb::from_packed(0x5c_8d_c9),
        Rgb::from_packed(0x3f_b0_7a),
    ];

    let shape = load_or(args.first().map(String::as_str), || {
        shape_io::pyramid(5, floor, &palette)
    });
    let target = load_or(args.get(1).map(String::as_str), || {
        shape_io::tower(5, 5, 6, floor, palette[2])
    });
    let (shape, target) = match (shape, target) {
        (Ok(shape), Ok(target)) => (shape, target),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("failed to load shape: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut driver = Driver::new(config.clone());
    driver.sim.load_shape(&shape);
    driver.log_events();

    // Knock the voxel nearest the camera ray out of the base.
    let eye = Vec3::new(0.0, floor, -40.0);
    if let Some(pick) = driver.sim.pick(eye, Vec3::Z, 100.0) {
        driver.sim.knock_out(pick.slot);
        driver.log_events();
    }
    driver.run_for(1.0);
    log::info!("after knock-out: {:?}", driver.sim.stats());

    driver.sim.dismantle();
    driver.run_for(SCATTER_SECONDS);
    log::info!("after scatter: {:?}", driver.sim.stats());

    driver.sim.rebuild(&target);
    driver.log_events();
    let finished = driver.run_until_stable();
    log::info!("after rebuild: {:?}", driver.sim.stats());

    if !finished {
        eprintln!("rebuild did not finish within {REBUILD_TIMEOUT_S} s");
        return ExitCode::FAILURE;
    }

    let json = match shape_io::export_json(driver.sim.particles()) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("export failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match shape_io::parse_snapshot_json(&json) {
        Ok(snapshot) => {
            let mut reloaded = VoxelSimulation::new(config);
            reloaded.load_snapshot(&snapshot);
            log::info!(
                "snapshot reload deviation: {:.4}",
                max_deviation(&driver.sim, &reloaded)
            );
        }
        Err(e) => log::warn!("snapshot reload failed: {e}"),
    }

    println!("{json}");
    ExitCode::SUCCESS
}
