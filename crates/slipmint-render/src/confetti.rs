//! Seeded Confetti
//!
//! Deterministic decorative particles for the banner band. Every particle
//! is derived from `(seed, index)` alone, so repeated renders reproduce the
//! same layout and a longer run extends a shorter one without reshuffling.

use slipmint_core::Rect;

const LCG_A: u32 = 1103515245; // glibc multiplier
const LCG_C: u32 = 12345;

/// Linear congruential generator seeded per particle index.
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    /// Rng for one particle. The index is multiplied and folded into the
    /// seed so neighbouring indices land far apart in the sequence.
    pub fn for_index(seed: u32, index: u32) -> Self {
        let mut state = seed
            .wrapping_add(index.wrapping_mul(LCG_A))
            .wrapping_add(LCG_C);
        state ^= state >> 16;
        state = state.wrapping_mul(LCG_A).wrapping_add(LCG_C);
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = LCG_A.wrapping_mul(self.state).wrapping_add(LCG_C);
        self.state
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniform index in `[0, max)`.
    pub fn next_index(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Quad,
    Disc,
}

/// One confetti piece, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Radians, applied to quads only.
    pub rotation: f32,
    pub opacity: f32,
    pub color_index: usize,
    pub shape: ParticleShape,
}

/// Particles scattered over `region`. Particle `i` depends only on
/// `(seed, i)`, never on `count`, so different counts agree on their
/// common prefix.
pub fn confetti(seed: u32, count: u32, region: Rect, palette_len: usize) -> Vec<Particle> {
    (0..count)
        .map(|index| particle(seed, index, region, palette_len))
        .collect()
}

fn particle(seed: u32, index: u32, region: Rect, palette_len: usize) -> Particle {
    let mut rng = ParticleRng::for_index(seed, index);
    let x = region.x + rng.next_f32() * region.w;
    let y = region.y + rng.next_f32() * region.h;
    let size = rng.range(6.0, 18.0);
    let rotation = rng.range(0.0, std::f32::consts::PI);
    let opacity = rng.range(0.55, 1.0);
    let color_index = rng.next_index(palette_len);
    let shape = if index % 3 == 0 {
        ParticleShape::Disc
    } else {
        ParticleShape::Quad
    };
    Particle {
        x,
        y,
        size,
        rotation,
        opacity,
        color_index,
        shape,
    }
}
