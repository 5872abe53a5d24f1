use super::types::{Particle, PlacedVoxel, ShapeVoxel};
use crate::game::noise::ScatterNoise;
use crate::world::GridConfig;

/// Authoritative per-particle state. Slot index is particle identity; the
/// population only changes through [`VoxelStore::load_shape`] and
/// [`VoxelStore::load_placed`].
#[derive(Debug, Default, Clone)]
pub struct VoxelStore {
    particles: Vec<Particle>,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every particle with one resting particle per shape voxel.
    ///
    /// `color_jitter` is the maximum lightness offset drawn from `noise`
    /// per particle; zero keeps colors exact.
    pub fn load_shape(
        &mut self,
        shape: &[ShapeVoxel],
        grid: &GridConfig,
        color_jitter: f32,
        noise: &mut ScatterNoise,
    ) {
        self.particles.clear();
        self.particles.reserve(shape.len());
        for voxel in shape {
            let color = if color_jitter > 0.0 {
                voxel.color.offset_lightness(noise.next_signed() * color_jitter)
            } else {
                voxel.color.clamped()
            };
            self.particles
                .push(Particle::resting(voxel.world_position(grid.grid_size), color));
        }
    }

    /// Replace every particle with one resting particle per snapshot pose.
    /// Colors are taken as given; no jitter is applied.
    pub fn load_placed(&mut self, voxels: &[PlacedVoxel]) {
        self.particles.clear();
        self.particles.extend(
            voxels
                .iter()
                .map(|v| Particle::resting(v.position, v.color.clamped())),
        );
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut Particle> {
        self.particles.get_mut(slot)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
