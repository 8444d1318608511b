//! Command-line argument parsing for the headless demo.

use clap::Parser;

use terrafield::params::{DomainTransform, FractalParams, NoiseType, ParameterSnapshot};

/// Command line arguments. Mirrors the interactive UI's controls.
#[derive(Parser, Debug)]
#[command(name = "terrafield")]
#[command(about = "Fractal terrain height-field generator", long_about = None)]
pub struct Args {
    /// Noise seed
    #[arg(long, default_value_t = 42)]
    pub seed: u32,

    /// Fractal type: fbm, ridged, billowy
    #[arg(long, value_name = "TYPE", default_value = "fbm")]
    pub noise_type: String,

    /// Persistence exponent H (amplitude = frequency^-H)
    #[arg(long, value_name = "H", default_value_t = 1.0)]
    pub h: f32,

    /// Frequency multiplier between octaves
    #[arg(long, default_value_t = 2.0)]
    pub lacunarity: f32,

    /// Number of noise octaves (1-24)
    #[arg(long, default_value_t = 8)]
    pub octaves: u32,

    /// Ridged fold offset
    #[arg(long, default_value_t = 1.0)]
    pub offset: f32,

    /// Horizontal pan of the sampled window
    #[arg(long, default_value_t = 0.0)]
    pub dx: f32,
    #[arg(long, default_value_t = 0.0)]
    pub dy: f32,

    /// Horizontal compression (window size in noise-domain units)
    #[arg(long, default_value_t = 2.0)]
    pub hcomp: f32,

    /// Vertical compression (height multiplier)
    #[arg(long, default_value_t = 0.5)]
    pub vcomp: f32,

    /// Vertical offset (added after vcomp)
    #[arg(long, default_value_t = 0.0)]
    pub voffset: f32,

    /// Grid resolution (cells per side)
    #[arg(long, default_value_t = 512)]
    pub resolution: usize,

    /// Pan speed (domain units per second, applied to dx and dy)
    #[arg(long, value_name = "UNITS_PER_SEC", default_value_t = 0.0)]
    pub pan_speed: f32,

    /// Number of 60 Hz frames to simulate before exporting
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Output PNG path
    #[arg(long, default_value = "heightfield.png")]
    pub output: String,
}

impl Args {
    /// Parse the fractal type from its UI label.
    pub fn parse_noise_type(&self) -> NoiseType {
        match self.noise_type.to_lowercase().as_str() {
            "fbm" | "standard" => NoiseType::Standard,
            "ridged" => NoiseType::Ridged,
            "billowy" => NoiseType::Billowy,
            other => {
                eprintln!("Warning: Unknown fractal type '{}', using fbm", other);
                NoiseType::Standard
            }
        }
    }

    /// Build the initial per-frame snapshot from the arguments.
    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            fractal: FractalParams {
                seed: self.seed,
                noise_type: self.parse_noise_type(),
                h: self.h,
                lacunarity: self.lacunarity,
                octaves: self.octaves,
                offset: self.offset,
            },
            transform: DomainTransform {
                dx: self.dx,
                dy: self.dy,
                hcomp: self.hcomp,
                vcomp: self.vcomp,
                voffset: self.voffset,
            },
        }
    }
}
