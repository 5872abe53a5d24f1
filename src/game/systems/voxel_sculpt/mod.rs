//! Voxel sculpture simulation
//!
//! [`VoxelSimulation`] owns the particle store and the per-cycle rebuild plan
//! and is their only writer. Hosts drive it with [`VoxelSimulation::step`] and
//! the command surface (`load_shape`, `knock_out`, `dismantle`, `rebuild`).
//!
//! Commands that are invalid in the current state are ignored and return
//! `false`; simulation data never produces an error.

pub mod connectivity;
pub mod integrator;
pub mod rebuild;
pub mod render_bridge;
pub mod stepper;
pub mod store;
pub mod types;

use glam::Vec3;

use self::connectivity::{IntegrityReport, analyze_support};
use self::integrator::{sample_kick, step_falling, step_rebuild};
use self::rebuild::plan_rebuild;
use self::render_bridge::build_instances;
use self::store::VoxelStore;
use crate::game::config::SimulationConfig;
use crate::game::noise::ScatterNoise;
use crate::physics::ray_cube_intersect;
use crate::render::VoxelInstance;
use crate::world::GridConfig;

pub use self::rebuild::RebuildPlan;
pub use self::stepper::FixedStepper;
pub use self::types::{
    Particle, PlacedVoxel, RebuildAssignment, Rgb, ShapeVoxel, SimState, SimulationEvent,
    SimulationStats, VoxelPick,
};

/// Lifecycle callbacks for the host. Both methods default to no-ops.
pub trait SimulationObserver {
    fn on_state_change(&mut self, _state: SimState) {}
    fn on_count_change(&mut self, _count: usize) {}
}

pub struct VoxelSimulation {
    config: SimulationConfig,
    store: VoxelStore,
    state: SimState,
    assignments: Vec<RebuildAssignment>,
    clock_ms: f64,
    rebuild_started_ms: f64,
    noise: ScatterNoise,
    events: Vec<SimulationEvent>,
    observer: Option<Box<dyn SimulationObserver>>,
    instances: Vec<VoxelInstance>,
}

impl Default for VoxelSimulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl VoxelSimulation {
    pub fn new(config: SimulationConfig) -> Self {
        let noise = ScatterNoise::new(config.noise_seed);
        Self {
            config,
            store: VoxelStore::new(),
            state: SimState::Stable,
            assignments: Vec::new(),
            clock_ms: 0.0,
            rebuild_started_ms: 0.0,
            noise,
            events: Vec::new(),
            observer: None,
            instances: Vec::new(),
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observer = Some(observer);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridConfig {
        &self.config.grid
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    pub fn particle(&self, slot: usize) -> Option<&Particle> {
        self.store.get(slot)
    }

    /// Current rebuild plan; empty outside a rebuild.
    pub fn assignments(&self) -> &[RebuildAssignment] {
        &self.assignments
    }

    /// Milliseconds since the current rebuild began (0 outside a rebuild).
    pub fn rebuild_elapsed_ms(&self) -> f32 {
        if self.state == SimState::Rebuilding {
            (self.clock_ms - self.rebuild_started_ms) as f32
        } else {
            0.0
        }
    }

    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the whole population with `shape`, at rest.
    ///
    /// Discards any rebuild plan and returns the controller to `Stable`.
    pub fn load_shape(&mut self, shape: &[ShapeVoxel]) {
        self.store.load_shape(
            shape,
            &self.config.grid,
            self.config.color_jitter,
            &mut self.noise,
        );
        log::info!("loaded shape with {} voxels", shape.len());
        self.finish_load();
    }

    /// Replace the whole population with exported poses, at rest.
    ///
    /// Positions are kept as given (no lattice snap) and colors are not
    /// jittered, so an export reloads into the same resting configuration.
    pub fn load_snapshot(&mut self, voxels: &[PlacedVoxel]) {
        self.store.load_placed(voxels);
        log::info!("loaded snapshot with {} voxels", voxels.len());
        self.finish_load();
    }

    fn finish_load(&mut self) {
        self.assignments.clear();
        self.transition(SimState::Stable);
        let count = self.store.len();
        self.events.push(SimulationEvent::CountChanged(count));
        if let Some(observer) = self.observer.as_mut() {
            observer.on_count_change(count);
        }
    }

    /// Punch one resting particle loose and re-check support for the rest.
    ///
    /// Only valid while `Stable`; out-of-range or already falling slots are ignored.
    pub fn knock_out(&mut self, slot: usize) -> bool {
        if self.state != SimState::Stable {
            return false;
        }
        let kick = self.config.knock_kick;
        let (velocity, angular) = sample_kick(&mut self.noise, &kick);
        let Some(particle) = self.store.get_mut(slot) else {
            return false;
        };
        if particle.is_falling {
            return false;
        }
        particle.start_falling(velocity, angular);
        log::debug!("knocked out voxel {slot}");

        let report = self.run_integrity_pass();
        self.events.push(SimulationEvent::Collapsed {
            count: 1 + report.unsupported.len(),
        });
        true
    }

    /// Run one structural integrity pass over the resting particles.
    ///
    /// Supported particles are marked grounded; unsupported ones start falling
    /// with a small kick. Callers wanting a full cascade re-invoke this.
    pub fn run_integrity_pass(&mut self) -> IntegrityReport {
        let report = analyze_support(
            self.store.particles(),
            &self.config.grid,
            self.config.anchor_tolerance,
        );
        let kick = self.config.support_kick;
        let particles = self.store.particles_mut();
        for &slot in &report.supported {
            particles[slot].grounded = true;
        }
        for &slot in &report.unsupported {
            let (velocity, angular) = sample_kick(&mut self.noise, &kick);
            particles[slot].start_falling(velocity, angular);
        }
        if !report.unsupported.is_empty() {
            log::debug!(
                "integrity pass: {} supported, {} lost support",
                report.supported.len(),
                report.unsupported.len()
            );
        }
        report
    }

    /// Scatter the whole sculpture. Only valid while `Stable`.
    pub fn dismantle(&mut self) -> bool {
        if self.state != SimState::Stable {
            return false;
        }
        let kick = self.config.scatter_kick;
        for particle in self.store.particles_mut() {
            let (velocity, angular) = sample_kick(&mut self.noise, &kick);
            particle.start_falling(velocity, angular);
        }
        self.assignments.clear();
        self.events.push(SimulationEvent::Collapsed {
            count: self.store.len(),
        });
        self.transition(SimState::Dismantling);
        true
    }

    /// Reassign the current particles onto `targets` and start reassembly.
    ///
    /// Valid while `Dismantling`, or while `Rebuilding` (the in-flight plan is
    /// replaced and the delay clock restarts). Ignored while `Stable`.
    pub fn rebuild(&mut self, targets: &[ShapeVoxel]) -> bool {
        if self.state == SimState::Stable {
            return false;
        }
        let plan = plan_rebuild(self.store.particles(), targets, &self.config);
        let particles = self.store.particles_mut();
        for (particle, assignment) in particles.iter_mut().zip(&plan.assignments) {
            if !assignment.is_rubble() {
                particle.grounded = false;
            }
        }
        log::info!(
            "rebuild planned: {} matched, {} rubble, {} targets unassigned",
            plan.matched,
            plan.rubble,
            plan.unassigned
        );
        self.events.push(SimulationEvent::RebuildPlanned {
            matched: plan.matched,
            rubble: plan.rubble,
            unassigned: plan.unassigned,
        });

        self.assignments = plan.assignments;
        self.rebuild_started_ms = self.clock_ms;
        self.transition(SimState::Rebuilding);
        true
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock_ms += dt as f64 * 1000.0;
        let k = self.config.step_scale(dt);

        match self.state {
            SimState::Rebuilding => {
                let elapsed_ms = (self.clock_ms - self.rebuild_started_ms) as f32;
                let pending = step_rebuild(
                    self.store.particles_mut(),
                    &mut self.assignments,
                    elapsed_ms,
                    &self.config,
                    k,
                );
                if pending == 0 {
                    self.assignments.clear();
                    self.transition(SimState::Stable);
                }
            }
            SimState::Stable | SimState::Dismantling => {
                let summary = step_falling(self.store.particles_mut(), &self.config, k);
                if summary.rested > 0 {
                    log::trace!("{} voxels came to rest", summary.rested);
                }
            }
        }
    }

    pub fn stats(&self) -> SimulationStats {
        let particles = self.store.particles();
        SimulationStats {
            state: self.state,
            total: particles.len(),
            falling: particles.iter().filter(|p| p.is_falling).count(),
            grounded: particles.iter().filter(|p| p.grounded).count(),
            rubble: self.assignments.iter().filter(|a| a.is_rubble()).count(),
            converging: self.assignments.iter().filter(|a| a.is_pending()).count(),
        }
    }

    /// Nearest particle whose cube the ray enters within `max_dist`.
    pub fn pick(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<VoxelPick> {
        let dir = dir.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let half = self.config.grid.half_extent * self.config.grid.grid_size;
        self.store
            .particles()
            .iter()
            .enumerate()
            .filter_map(|(slot, p)| {
                let hit = ray_cube_intersect(origin, dir, p.position(), half)?;
                (hit.distance <= max_dist).then_some(VoxelPick {
                    slot,
                    distance: hit.distance,
                    world_pos: hit.position,
                    normal: hit.normal,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Per-slot instance records for the rendering adapter.
    pub fn render_instances(&mut self) -> &[VoxelInstance] {
        build_instances(self.store.particles(), &self.assignments, &mut self.instances);
        &self.instances
    }

    fn transition(&mut self, next: SimState) {
        if self.state == next {
            return;
        }
        log::info!("simulation state {} -> {}", self.state, next);
        self.state = next;
        self.events.push(SimulationEvent::StateChanged(next));
        if let Some(observer) = self.observer.as_mut() {
            observer.on_state_change(next);
        }
    }
}
