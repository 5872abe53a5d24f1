//! Simulation Tests - Integrity, Bounce, Rebuild, and Shape I/O
//!
//! Drives [`VoxelSimulation`] through its public command surface the way a
//! host would: load a shape, knock voxels out, scatter, rebuild, export.

use std::collections::HashSet;

use glam::{IVec3, Vec3};
use voxel_sculpt_engine::game::shape_io::{
    self, export_json, parse_shape_json, parse_snapshot_json,
};
use voxel_sculpt_engine::physics::{BounceParams, FloorContact, VoxelBody};
use voxel_sculpt_engine::{
    FixedStepper, Rgb, ShapeVoxel, SimState, SimulationConfig, SimulationEvent, VoxelSimulation,
};

const FLOOR: f32 = -12.0;
const STEP: f32 = 1.0 / 60.0;

fn exact_config() -> SimulationConfig {
    SimulationConfig {
        color_jitter: 0.0,
        ..SimulationConfig::with_floor(FLOOR)
    }
}

fn sim_with(shape: &[ShapeVoxel]) -> VoxelSimulation {
    let mut sim = VoxelSimulation::new(exact_config());
    sim.load_shape(shape);
    sim
}

fn run_steps(sim: &mut VoxelSimulation, steps: usize) {
    for _ in 0..steps {
        sim.step(STEP);
    }
}

fn run_until_stable(sim: &mut VoxelSimulation, max_steps: usize) -> usize {
    for taken in 0..max_steps {
        if sim.state() == SimState::Stable {
            return taken;
        }
        sim.step(STEP);
    }
    panic!("simulation still {} after {max_steps} steps", sim.state());
}

fn lattice_cells(sim: &VoxelSimulation) -> HashSet<IVec3> {
    sim.particles()
        .iter()
        .map(|p| p.position().round().as_ivec3())
        .collect()
}

// ============================================================================
// Structural Integrity
// ============================================================================

#[test]
fn test_knockout_scenario_four_voxels() {
    let shape = [
        ShapeVoxel::new(0, -12, 0, Rgb::from_packed(0xff0000)),
        ShapeVoxel::new(1, -12, 0, Rgb::from_packed(0x00ff00)),
        ShapeVoxel::new(0, -11, 0, Rgb::from_packed(0x0000ff)),
        ShapeVoxel::new(5, -11, 0, Rgb::from_packed(0xffff00)),
    ];
    let mut sim = sim_with(&shape);
    sim.drain_events();

    assert!(sim.knock_out(0));

    let p = sim.particles();
    assert!(p[0].is_falling, "knocked voxel falls");
    assert!(p[2].is_falling, "voxel above the knocked one loses support");
    assert!(p[3].is_falling, "isolated voxel off the floor falls");
    assert!(!p[1].is_falling, "floor voxel stays put");
    assert!(p[1].grounded, "floor voxel stays grounded");

    let events = sim.drain_events();
    assert!(events.contains(&SimulationEvent::Collapsed { count: 3 }));
    assert_eq!(sim.state(), SimState::Stable);
}

#[test]
fn test_two_voxel_tower_collapses_when_base_removed() {
    let shape = [
        ShapeVoxel::new(0, -12, 0, Rgb::NEUTRAL_GRAY),
        ShapeVoxel::new(0, -11, 0, Rgb::NEUTRAL_GRAY),
    ];
    let mut sim = sim_with(&shape);

    assert!(sim.knock_out(0));
    assert!(sim.particles()[1].is_falling);
    assert!(!sim.particles()[1].grounded);
}

#[test]
fn test_knockout_keeps_adjacent_floor_neighbor_grounded() {
    let shape = [
        ShapeVoxel::new(0, -12, 0, Rgb::NEUTRAL_GRAY),
        ShapeVoxel::new(1, -12, 0, Rgb::NEUTRAL_GRAY),
        ShapeVoxel::new(1, -11, 0, Rgb::NEUTRAL_GRAY),
    ];
    let mut sim = sim_with(&shape);

    assert!(sim.knock_out(0));
    let p = sim.particles();
    assert!(p[1].grounded && !p[1].is_falling);
    assert!(p[2].grounded && !p[2].is_falling, "supported through its floor neighbor");
}

#[test]
fn test_knockout_of_falling_or_missing_slot_is_ignored() {
    let mut sim = sim_with(&[ShapeVoxel::new(0, -12, 0, Rgb::NEUTRAL_GRAY)]);

    assert!(!sim.knock_out(7));
    assert!(sim.knock_out(0));
    assert!(!sim.knock_out(0));
}

// ============================================================================
// Floor Collision
// ============================================================================

#[test]
fn test_floor_bounce_reflects_and_attenuates() {
    let contact = SimulationConfig::with_floor(FLOOR).grid.contact_height();
    let mut body = VoxelBody::at(Vec3::new(0.0, contact + 0.05, 0.0));
    body.velocity = Vec3::new(0.2, -0.3, -0.1);

    body.integrate_free_fall(0.0, 1.0);
    let contact_kind = body.resolve_floor(contact, &BounceParams::default());

    assert_eq!(contact_kind, FloorContact::Bounced);
    assert_eq!(body.position.y, contact);
    assert!((body.velocity.y - 0.3 * 0.42).abs() < 1e-6);
    assert!((body.velocity.x - 0.2 * 0.75).abs() < 1e-6);
    assert!((body.velocity.z + 0.1 * 0.75).abs() < 1e-6);
}

#[test]
fn test_slow_impact_comes_to_rest() {
    let contact = SimulationConfig::with_floor(FLOOR).grid.contact_height();
    let mut body = VoxelBody::at(Vec3::new(0.0, contact + 0.01, 0.0));
    body.velocity = Vec3::new(0.01, -0.05, 0.0);
    body.angular_velocity = Vec3::splat(0.3);

    body.integrate_free_fall(0.0, 1.0);
    let contact_kind = body.resolve_floor(contact, &BounceParams::default());

    assert_eq!(contact_kind, FloorContact::Rested);
    assert!(body.is_still());
}

#[test]
fn test_scattered_voxels_never_sink_below_floor() {
    let mut sim = sim_with(&shape_io::pyramid(4, FLOOR, &[Rgb::NEUTRAL_GRAY]));
    let contact = sim.grid().contact_height();

    assert!(sim.dismantle());
    for _ in 0..600 {
        sim.step(STEP);
        for p in sim.particles() {
            assert!(p.position().y >= contact - 1e-4, "voxel at {} sank", p.position());
        }
    }
    // Rest detection never re-grounds.
    assert!(sim.particles().iter().all(|p| p.is_falling && !p.grounded));
}

// ============================================================================
// State Machine
// ============================================================================

#[test]
fn test_commands_respect_state() {
    let tower = shape_io::tower(2, 2, 2, FLOOR, Rgb::NEUTRAL_GRAY);
    let mut sim = sim_with(&tower);

    assert!(!sim.rebuild(&tower), "rebuild needs a dismantled sculpture");
    assert!(sim.dismantle());
    assert!(!sim.dismantle());
    assert!(!sim.knock_out(0));
    assert!(sim.rebuild(&tower));
    assert_eq!(sim.state(), SimState::Rebuilding);
    assert!(!sim.dismantle());
    assert!(sim.rebuild(&tower), "a second rebuild replaces the plan");

    sim.load_shape(&tower);
    assert_eq!(sim.state(), SimState::Stable);
    assert!(sim.assignments().is_empty());
}

#[test]
fn test_full_cycle_rebuilds_target_exactly() {
    let palette = [Rgb::from_packed(0xd94f30), Rgb::from_packed(0x5c8dc9)];
    let source = shape_io::pyramid(3, FLOOR, &palette);
    let target = shape_io::tower(2, 2, 4, FLOOR, palette[1]);
    let mut sim = sim_with(&source);

    sim.dismantle();
    run_steps(&mut sim, 120);
    assert!(sim.rebuild(&target));

    let stats = sim.stats();
    assert_eq!(stats.state, SimState::Rebuilding);
    assert_eq!(stats.converging, target.len());
    assert_eq!(stats.rubble, source.len() - target.len());

    run_until_stable(&mut sim, 2_000);

    let cells = lattice_cells(&sim);
    for voxel in &target {
        assert!(cells.contains(&voxel.position), "missing {}", voxel.position);
    }
    let placed: Vec<_> = sim
        .particles()
        .iter()
        .filter(|p| target.iter().any(|t| t.world_position(1.0) == p.position()))
        .collect();
    assert_eq!(placed.len(), target.len());
    assert!(placed.iter().all(|p| p.grounded && !p.is_falling));
    // Only the middle layer shares the target color; all of it was used.
    let exact = placed.iter().filter(|p| p.color == palette[1]).count();
    assert_eq!(exact, 9, "same-color voxels chosen first");
}

#[test]
fn test_rebuild_with_more_targets_than_voxels() {
    let source = shape_io::tower(1, 1, 2, FLOOR, Rgb::NEUTRAL_GRAY);
    let target = shape_io::tower(2, 2, 2, FLOOR, Rgb::NEUTRAL_GRAY);
    let mut sim = sim_with(&source);
    sim.dismantle();
    sim.drain_events();

    sim.rebuild(&target);
    assert!(sim.drain_events().contains(&SimulationEvent::RebuildPlanned {
        matched: 2,
        rubble: 0,
        unassigned: 6,
    }));
    run_until_stable(&mut sim, 2_000);
    assert_eq!(sim.len(), 2, "rebuild never adds voxels");
}

#[test]
fn test_higher_targets_wait_longer() {
    let source = shape_io::tower(1, 1, 6, FLOOR, Rgb::NEUTRAL_GRAY);
    let mut sim = sim_with(&source);
    sim.dismantle();
    sim.rebuild(&source);

    let mut delays: Vec<(f32, f32)> = sim
        .assignments()
        .iter()
        .filter_map(|a| match a {
            voxel_sculpt_engine::RebuildAssignment::Target {
                position, delay_ms, ..
            } => Some((position.y, *delay_ms)),
            voxel_sculpt_engine::RebuildAssignment::Rubble => None,
        })
        .collect();
    delays.sort_by(|a, b| a.0.total_cmp(&b.0));

    assert_eq!(delays.len(), 6);
    assert_eq!(delays[0].1, 0.0);
    assert!(delays.windows(2).all(|w| w[0].1 <= w[1].1));
}

// ============================================================================
// Determinism and Fixed Stepping
// ============================================================================

#[test]
fn test_same_seed_same_trajectory() {
    let shape = shape_io::sphere(2, FLOOR, &[Rgb::from_packed(0x3fb07a), Rgb::NEUTRAL_GRAY]);
    let target = shape_io::tower(3, 3, 3, FLOOR, Rgb::from_packed(0x3fb07a));

    let run = || {
        let mut sim = VoxelSimulation::new(SimulationConfig::with_floor(FLOOR));
        sim.load_shape(&shape);
        sim.knock_out(0);
        sim.dismantle();
        run_steps(&mut sim, 90);
        sim.rebuild(&target);
        run_steps(&mut sim, 30);
        sim.particles().to_vec()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_fixed_stepper_drives_simulation() {
    let config = exact_config();
    let mut stepper = FixedStepper::new(config.reference_hz, 0.25, 8);
    let mut sim = VoxelSimulation::new(config);
    sim.load_shape(&shape_io::tower(1, 1, 3, FLOOR, Rgb::NEUTRAL_GRAY));
    sim.dismantle();

    let mut steps = 0;
    steps += stepper.advance(0.04, |dt| sim.step(dt));
    steps += stepper.advance(0.04, |dt| sim.step(dt));
    assert_eq!(steps, 4);

    // A long hitch is capped rather than replayed in full.
    assert_eq!(stepper.advance(1.0, |dt| sim.step(dt)), 8);
}

#[test]
fn test_zero_and_invalid_dt_do_not_move_voxels() {
    let mut sim = sim_with(&shape_io::tower(1, 1, 3, FLOOR, Rgb::NEUTRAL_GRAY));
    sim.dismantle();
    let before = sim.particles().to_vec();

    sim.step(0.0);
    sim.step(-1.0);
    sim.step(f32::NAN);

    assert_eq!(sim.particles(), before.as_slice());
}

// ============================================================================
// Shape I/O
// ============================================================================

#[test]
fn test_export_reload_round_trip() {
    let shape = vec![
        ShapeVoxel::new(0, -12, 0, Rgb::from_hex("#d94f30").unwrap()),
        ShapeVoxel::new(1, -12, 0, Rgb::from_hex("#5c8dc9").unwrap()),
        ShapeVoxel::new(0, -11, 2, Rgb::from_hex("#3fb07a").unwrap()),
    ];
    let sim = sim_with(&shape);

    let json = export_json(sim.particles()).unwrap();
    let reloaded = parse_shape_json(&json).unwrap();

    assert_eq!(reloaded, shape);
}

#[test]
fn test_snapshot_reload_keeps_rubble_where_it_rests() {
    let source: Vec<_> = (0..6)
        .map(|i| ShapeVoxel::new(i, -12, 0, Rgb::from_packed(0x204080 + i as u32 * 0x10)))
        .collect();
    let target = [
        ShapeVoxel::new(0, -12, 0, Rgb::from_packed(0x204080)),
        ShapeVoxel::new(0, -11, 0, Rgb::from_packed(0x204090)),
    ];
    let mut sim = sim_with(&source);
    sim.dismantle();
    run_steps(&mut sim, 600);
    sim.rebuild(&target);
    run_until_stable(&mut sim, 2_000);

    let off_lattice = sim
        .particles()
        .iter()
        .any(|p| p.position() != p.position().round());
    assert!(off_lattice, "rubble should rest between lattice cells");

    let json = export_json(sim.particles()).unwrap();
    let snapshot = parse_snapshot_json(&json).unwrap();
    let mut reloaded = VoxelSimulation::new(exact_config());
    reloaded.load_snapshot(&snapshot);

    assert_eq!(reloaded.len(), sim.len());
    for (before, after) in sim.particles().iter().zip(reloaded.particles()) {
        let d = (before.position() - after.position()).abs().max_element();
        assert!(d <= 0.005 + 1e-4, "{} reloaded at {}", before.position(), after.position());
        assert_eq!(before.color, after.color);
        assert!(after.grounded && !after.is_falling);
    }
}

#[test]
fn test_loose_records_load_with_defaults() {
    let json = r##"[
        {"x": "3", "y": -12.4, "z": 1, "color": "#ff0000"},
        {"x": 1, "y": -12, "c": [0, 255, 0]},
        {"x": null, "y": "top", "z": 2, "color": "not a color"}
    ]"##;
    let shape = parse_shape_json(json).unwrap();

    assert_eq!(shape.len(), 3);
    assert_eq!(shape[0].position, IVec3::new(3, -12, 1));
    assert_eq!(shape[0].color, Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(shape[1].position, IVec3::new(1, -12, 0));
    assert_eq!(shape[1].color, Rgb::new(0.0, 1.0, 0.0));
    assert_eq!(shape[2].position, IVec3::new(0, 0, 2));
    assert_eq!(shape[2].color, Rgb::NEUTRAL_GRAY);

    let mut sim = VoxelSimulation::new(exact_config());
    sim.load_shape(&shape);
    assert_eq!(sim.len(), 3);
}

#[test]
fn test_non_list_shape_rejected() {
    assert!(parse_shape_json(r#"{"x": 1}"#).is_err());
    assert!(parse_shape_json("not json").is_err());
}

// ============================================================================
// Picking and Render Instances
// ============================================================================

#[test]
fn test_pick_returns_nearest_voxel() {
    let mut sim = sim_with(&[
        ShapeVoxel::new(0, -12, 3, Rgb::NEUTRAL_GRAY),
        ShapeVoxel::new(0, -12, 0, Rgb::NEUTRAL_GRAY),
    ]);

    let hit = sim
        .pick(Vec3::new(0.0, -12.0, -10.0), Vec3::Z, 50.0)
        .expect("ray should hit");
    assert_eq!(hit.slot, 1);
    assert!((hit.distance - 9.5).abs() < 1e-4);
    assert_eq!(hit.normal, Vec3::NEG_Z);

    assert!(sim.pick(Vec3::new(0.0, -12.0, -10.0), Vec3::Z, 5.0).is_none());

    let instances = sim.render_instances();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[1].position, [0.0, -12.0, 0.0]);
}
