//! Multi-octave fractal combination of the noise kernel.
//!
//! Standard fractal Brownian motion plus the ridged and billowy
//! variants, all driven by the same amplitude schedule: octave i samples
//! at frequency lacunarity^i with amplitude frequency^(-H). Persistence
//! is derived from H rather than being a second free knob, matching the
//! usual fBm formulation. The sum is left unnormalized; callers rescale
//! through the domain transform's vcomp/voffset.

use crate::noise::NoiseKernel;
use crate::params::{FractalParams, NoiseType, ParamError};

/// Combines octaves of kernel output according to a [`FractalParams`].
pub struct FractalCombiner {
    kernel: NoiseKernel,
    noise_type: NoiseType,
    octaves: u32,
    h: f64,
    lacunarity: f64,
    offset: f64,
}

impl FractalCombiner {
    /// Build a combiner, validating the parameters at ingestion.
    pub fn new(params: &FractalParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            kernel: NoiseKernel::new(params.seed),
            noise_type: params.noise_type,
            octaves: params.octaves,
            h: params.h as f64,
            lacunarity: params.lacunarity as f64,
            offset: params.offset as f64,
        })
    }

    /// Amplitude of octave i, `(lacunarity^i)^(-H)`. The schedule depends
    /// only on i, so octave counts produce deterministic prefixes of the
    /// same series.
    pub fn octave_amplitude(&self, octave: u32) -> f64 {
        self.lacunarity.powi(octave as i32).powf(-self.h)
    }

    /// Per-octave shaping of a signed kernel sample.
    fn shape(&self, sample: f64) -> f64 {
        match self.noise_type {
            NoiseType::Standard => sample,
            // Musgrave-style ridge fold: the square discards the sign of
            // the folded base, so every term is non-negative.
            NoiseType::Ridged => {
                let folded = self.offset - sample.abs();
                folded * folded
            }
            NoiseType::Billowy => 2.0 * sample.abs() - 1.0,
        }
    }

    /// Evaluate the unnormalized fractal sum at a continuous position.
    pub fn combine(&self, x: f64, y: f64) -> f64 {
        let mut frequency = 1.0_f64;
        let mut sum = 0.0_f64;
        for _ in 0..self.octaves {
            let amplitude = frequency.powf(-self.h);
            let sample = self.kernel.evaluate(x * frequency, y * frequency);
            sum += amplitude * self.shape(sample);
            frequency *= self.lacunarity;
        }
        sum
    }
}
