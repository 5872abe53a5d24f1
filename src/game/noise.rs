//! Deterministic noise
//!
//! Counter-based hash noise used for scatter kicks and color jitter. The same
//! seed always replays the same sequence, which keeps collapses reproducible
//! in tests and recordings.

use glam::Vec3;

/// Integer avalanche hash (lowbias32).
#[inline]
pub fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Hash two integers to a float in [0, 1).
#[inline]
pub fn hash_2d(a: u32, b: u32) -> f32 {
    let h = hash_u32(a ^ hash_u32(b.wrapping_add(0x9e37_79b9)));
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Sequential noise stream.
#[derive(Debug, Clone)]
pub struct ScatterNoise {
    seed: u32,
    counter: u32,
}

impl ScatterNoise {
    pub fn new(seed: u32) -> Self {
        Self { seed, counter: 0 }
    }

    /// Next value in [0, 1).
    pub fn next_unit(&mut self) -> f32 {
        let v = hash_2d(self.seed, self.counter);
        self.counter = self.counter.wrapping_add(1);
        v
    }

    /// Next value in [-1, 1).
    pub fn next_signed(&mut self) -> f32 {
        self.next_unit() * 2.0 - 1.0
    }

    /// Next value in [min, max).
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_unit()
    }

    /// Vector with each component in [-scale, scale).
    pub fn signed_vec3(&mut self, scale: Vec3) -> Vec3 {
        Vec3::new(
            self.next_signed() * scale.x,
            self.next_signed() * scale.y,
            self.next_signed() * scale.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_replays() {
        let mut a = ScatterNoise::new(7);
        let mut b = ScatterNoise::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn test_unit_range() {
        let mut n = ScatterNoise::new(1);
        for _ in 0..1000 {
            let v = n.next_unit();
            assert!((0.0..1.0).contains(&v));
            let s = n.next_signed();
            assert!((-1.0..1.0).contains(&s));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = ScatterNoise::new(1);
        let mut b = ScatterNoise::new(2);
        let same = (0..16).filter(|_| a.next_unit() == b.next_unit()).count();
        assert!(same < 16);
    }
}
