use glam::Vec3;
use rand::Rng;

/// `count` points evenly spaced on a circle of `radius` in the z = 0 plane,
/// starting on the +x axis and going counter-clockwise.
pub fn spawn_positions(radius: f32, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
            Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
        })
        .collect()
}

/// Read-only spawn position set with a cyclic cursor.
#[derive(Clone, Debug)]
pub struct SpawnRing {
    positions: Vec<Vec3>,
    cursor: usize,
    jitter: f32,
}

impl SpawnRing {
    pub fn new(radius: f32, count: usize, jitter: f32) -> Self {
        Self {
            positions: spawn_positions(radius, count),
            cursor: 0,
            jitter,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Next base position, optionally offset by up to ±`jitter` per axis.
    pub fn next_position(&mut self, rng: &mut impl Rng) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        let base = self.positions[self.cursor];
        self.cursor = (self.cursor + 1) % self.positions.len();
        if self.jitter > 0.0 {
            let j = self.jitter;
            base + Vec3::new(
                rng.gen_range(-j..=j),
                rng.gen_range(-j..=j),
                rng.gen_range(-j..=j),
            )
        } else {
            base
        }
    }
}
