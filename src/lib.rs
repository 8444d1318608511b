//! Terrafield - procedural fractal terrain height-field synthesis.
//!
//! Layered gradient noise (standard, ridged or billowy fBm) materialized
//! into a fixed-resolution grid that regenerates only when its parameters
//! actually change. The grid is samplable as a displacement field by an
//! external rendering stage.

pub mod field;
pub mod fractal;
pub mod noise;
pub mod params;

pub use field::HeightField;
pub use fractal::FractalCombiner;
pub use noise::NoiseKernel;
pub use params::{DomainTransform, FractalParams, NoiseType, ParamError, ParameterSnapshot};
