// SPDX-License-Identifier: MIT OR Apache-2.0
//
// herbaria: straighten a photographed herbarium sheet from the command line.
//
// Loads one capture, runs the rectification pipeline, saves the result, and
// prints the human-readable status. Exits 0 whether the sheet was
// auto-straightened or handed back for manual cropping; rectification is
// best-effort by contract.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use herbaria_core::RectifyConfig;
use herbaria_core::human_errors::humanize_error;
use herbaria_vision::SheetRectifier;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Detects a photographed herbarium sheet's outline and warps it flat."
)]
struct Args {
    /// Input capture (JPEG, PNG, TIFF, ...)
    input: PathBuf,
    /// Where to write the straightened (or passed-through) image
    output: PathBuf,

    /// Width of the downscaled detection image in pixels
    #[arg(long, default_value_t = 500)]
    working_width: u32,
    /// Minimum sheet-candidate area in px² at working resolution
    #[arg(long, default_value_t = 5000.0)]
    min_area: f64,
    /// Polygon approximation tolerance as a fraction of contour perimeter
    #[arg(long, default_value_t = 0.02)]
    tolerance: f64,
    /// Canny low gradient-magnitude threshold
    #[arg(long, default_value_t = 75.0)]
    canny_low: f32,
    /// Canny high gradient-magnitude threshold
    #[arg(long, default_value_t = 200.0)]
    canny_high: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = RectifyConfig {
        working_width: args.working_width,
        min_quad_area: args.min_area,
        approx_tolerance: args.tolerance,
        canny_low: args.canny_low,
        canny_high: args.canny_high,
        ..Default::default()
    };

    let mut rectifier = SheetRectifier::new(config).map_err(|err| {
        let human = humanize_error(&err);
        anyhow::anyhow!("{} {}", human.message, human.suggestion)
    })?;

    let source = image::open(&args.input)
        .with_context(|| format!("could not read capture {}", args.input.display()))?;

    tracing::info!(
        input = %args.input.display(),
        width = source.width(),
        height = source.height(),
        "Capture loaded"
    );

    let result = rectifier.rectify(&source);
    println!("{}", result.status);

    // JPEG has no alpha channel; flatten the warped RGBA output for it.
    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let out_image = match ext.as_deref() {
        Some("jpg") | Some("jpeg") => image::DynamicImage::ImageRgb8(result.image.to_rgb8()),
        _ => result.image,
    };

    out_image
        .save(&args.output)
        .with_context(|| format!("could not save result to {}", args.output.display()))?;

    tracing::info!(
        output = %args.output.display(),
        width = out_image.width(),
        height = out_image.height(),
        "Result saved"
    );

    Ok(())
}
