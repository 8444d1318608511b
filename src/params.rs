//! Parameter definitions with documented ranges and semantics.
//!
//! All terrain tunables live here as plain value types. The hosting
//! application (or the demo binary) builds one immutable
//! [`ParameterSnapshot`] per frame and passes it into the core; the core
//! never reaches back into caller state. Validation happens once, at
//! snapshot ingestion, so UI-level clamping stays a caller decision.

use thiserror::Error;

/// Octave slider range exposed to the UI.
pub const MIN_OCTAVES: u32 = 1;
pub const MAX_OCTAVES: u32 = 24;

/// Errors raised when a snapshot fails validation at ingestion.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("octave count must be in {MIN_OCTAVES}..={MAX_OCTAVES}, got {0}")]
    OctavesOutOfRange(u32),

    #[error("lacunarity must be positive and finite, got {0}")]
    InvalidLacunarity(f32),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    #[error("grid resolution must be at least 1")]
    ZeroResolution,
}

fn require_finite(name: &'static str, value: f32) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NonFinite { name, value })
    }
}

/// Per-octave combination policy for the fractal sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseType {
    /// Classic signed fBm: accumulate the raw noise sample.
    Standard,
    /// Sharp ridge crests: accumulate `(offset - |sample|)^2`.
    Ridged,
    /// Rounded mounds: accumulate `2*|sample| - 1`.
    Billowy,
}

/// Fractal synthesis parameters (the "Harmonic Options" panel).
#[derive(Debug, Clone, PartialEq)]
pub struct FractalParams {
    /// Seed for the gradient permutation table. Same seed, same field.
    pub seed: u32,

    /// Per-octave combination policy.
    pub noise_type: NoiseType,

    /// Persistence exponent: amplitude_i = frequency_i^(-H).
    /// UI range 0.01..2.0; H = 0 means equal-weight octaves.
    pub h: f32,

    /// Frequency multiplier between successive octaves.
    /// UI range 0.8..3.0; 1.0 is a legal degenerate (octaves stop adding
    /// detail and stack the same sample).
    pub lacunarity: f32,

    /// Number of noise layers, 1..=24. Octave k's contribution is
    /// independent of how many octaves follow it.
    pub octaves: u32,

    /// Ridged fold offset (where the absolute-value fold sits).
    /// UI range -10.0..10.0; unused by Standard and Billowy.
    pub offset: f32,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            seed: 42,
            noise_type: NoiseType::Standard,
            h: 1.0,
            lacunarity: 2.0,
            octaves: 8,
            offset: 1.0,
        }
    }
}

impl FractalParams {
    /// Validate ingestion-level invariants. Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(MIN_OCTAVES..=MAX_OCTAVES).contains(&self.octaves) {
            return Err(ParamError::OctavesOutOfRange(self.octaves));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(ParamError::InvalidLacunarity(self.lacunarity));
        }
        require_finite("H", self.h)?;
        require_finite("offset", self.offset)?;
        Ok(())
    }
}

/// Window transform applied around the fractal sum (the "Terrain
/// Options" panel): pans and scales the sampled patch of the infinite
/// noise plane, then rescales the resulting heights.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainTransform {
    /// Horizontal pan of the sampled window (driven per frame by an
    /// external pan speed, so it usually drifts every tick).
    pub dx: f32,
    pub dy: f32,

    /// Horizontal compression: side length of the sampled window in
    /// noise-domain units. Larger values pack more features into the grid.
    pub hcomp: f32,

    /// Vertical compression: multiplier on the raw fractal sum.
    pub vcomp: f32,

    /// Vertical offset: added after `vcomp`.
    pub voffset: f32,
}

impl Default for DomainTransform {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            hcomp: 2.0, // a couple of base-frequency features across the grid
            vcomp: 0.5,
            voffset: 0.0,
        }
    }
}

impl DomainTransform {
    pub fn validate(&self) -> Result<(), ParamError> {
        require_finite("dx", self.dx)?;
        require_finite("dy", self.dy)?;
        require_finite("hcomp", self.hcomp)?;
        require_finite("vcomp", self.vcomp)?;
        require_finite("voffset", self.voffset)?;
        Ok(())
    }
}

/// Everything the core needs for one frame, captured as a value.
///
/// Equality is what drives the regeneration policy: the field is only
/// recomputed when the current snapshot differs from the last one used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSnapshot {
    pub fractal: FractalParams,
    pub transform: DomainTransform,
}

impl ParameterSnapshot {
    pub fn validate(&self) -> Result<(), ParamError> {
        self.fractal.validate()?;
        self.transform.validate()?;
        Ok(())
    }
}
