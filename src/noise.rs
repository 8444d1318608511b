//! Seeded 2D gradient noise, the single-octave kernel under the fractal
//! combiner.
//!
//! Classic permutation-table Perlin noise: eight unit gradients picked by
//! a hashed lattice corner, quintic fade between corners. The table is
//! shuffled from the seed, so reseeding reshuffles gradients without
//! changing the frequency content of the signal. Output is deterministic
//! for a given (seed, x, y) and bounded to [-1, 1].

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

/// Unit gradients at 45-degree increments.
const GRADIENTS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (0.0, 1.0),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (-1.0, 0.0),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (0.0, -1.0),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// splitmix64 step; drives the table shuffle only.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Quintic fade 6t^5 - 15t^4 + 10t^3, zero first and second derivative
/// at the lattice lines.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Single-octave coherent noise over the infinite 2D plane.
pub struct NoiseKernel {
    perm: [u8; 256],
}

impl NoiseKernel {
    /// Build the kernel for a seed. Fisher-Yates over the identity table,
    /// randomness from a splitmix64 stream seeded directly by `seed`.
    pub fn new(seed: u32) -> Self {
        let mut perm = [0u8; 256];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = i as u8;
        }
        let mut state = seed as u64;
        for i in (1..256).rev() {
            let j = (splitmix64(&mut state) % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }
        Self { perm }
    }

    /// Hash a lattice corner to a gradient index. Wraps at 256, the
    /// classic Perlin period; i64 keeps the wrap correct for the whole
    /// coordinate range the domain transform can produce.
    fn corner_hash(&self, x: i64, y: i64) -> u8 {
        let xi = (x & 255) as usize;
        let yi = (y & 255) as usize;
        self.perm[(self.perm[xi] as usize + yi) & 255]
    }

    fn grad(hash: u8, dx: f64, dy: f64) -> f64 {
        let (gx, gy) = GRADIENTS[(hash & 7) as usize];
        gx * dx + gy * dy
    }

    /// Sample the noise at a continuous position.
    ///
    /// Returns a value in [-1, 1]: 2D unit-gradient Perlin is bounded by
    /// +-sqrt(2)/2, and the result is scaled by sqrt(2) to fill the range.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = x0 as i64;
        let yi = y0 as i64;

        let dx = x - x0;
        let dy = y - y0;
        let u = fade(dx);
        let v = fade(dy);

        let n00 = Self::grad(self.corner_hash(xi, yi), dx, dy);
        let n10 = Self::grad(self.corner_hash(xi + 1, yi), dx - 1.0, dy);
        let n01 = Self::grad(self.corner_hash(xi, yi + 1), dx, dy - 1.0);
        let n11 = Self::grad(self.corner_hash(xi + 1, yi + 1), dx - 1.0, dy - 1.0);

        let nx0 = lerp(n00, n10, u);
        let nx1 = lerp(n01, n11, u);
        lerp(nx0, nx1, v) * SQRT_2
    }
}
