//! Terrafield - headless fractal terrain height-field generator
//!
//! Builds one parameter snapshot per simulated frame, lets the pan speed
//! drift the sampled window exactly like the interactive app does, and
//! writes the final field out as a grayscale PNG.

mod cli;

use clap::Parser;
use std::process;

use cli::Args;
use terrafield::field::HeightField;

/// Fixed frame step matching the interactive app's 60 Hz tick.
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut snapshot = args.snapshot();
    if let Err(e) = snapshot.validate() {
        eprintln!("invalid parameters: {e}");
        process::exit(1);
    }

    let mut field = match HeightField::new(args.resolution) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("invalid parameters: {e}");
            process::exit(1);
        }
    };

    for frame in 0..args.frames {
        // Pan drift: the external speed advances the window every tick,
        // same as the interactive app's per-frame hoffset update.
        snapshot.transform.dx += args.pan_speed * FRAME_DT;
        snapshot.transform.dy += args.pan_speed * FRAME_DT;

        match field.regenerate(&snapshot) {
            Ok(true) => log::debug!("frame {frame}: regenerated"),
            Ok(false) => log::debug!("frame {frame}: snapshot unchanged, skipped"),
            Err(e) => {
                eprintln!("invalid parameters: {e}");
                process::exit(1);
            }
        }
    }

    if let Err(e) = field.to_luma_image().save(&args.output) {
        eprintln!("failed to write {}: {e}", args.output);
        process::exit(1);
    }

    println!(
        "Wrote {}x{} height field to {}",
        field.resolution(),
        field.resolution(),
        args.output
    );
}
