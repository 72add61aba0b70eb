// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use clap::Args;

use silhouette_core::an::PipelineOptions;
use silhouette_core::constant;
use silhouette_core::error::SilhouetteError;
use silhouette_core::im::{ImageShape, Polygons, Segment};

use super::{MeasureConfig, configure_threads, fail, run_measure};

#[derive(Debug, Args)]
#[command(about = "Measure objects from polygon json files.")]
pub struct PolygonsArgs {
    #[arg(short = 'i', long, help = "Polygons file or directory of polygons.")]
    pub input: String,

    #[arg(
        short = 'o',
        long,
        help = "Output file (.csv, .txt, .tsv, .pq, .parquet, .json)."
    )]
    pub output: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(long, help = "Skip morphological closing of rasterized polygons.")]
    pub no_morphology: bool,

    #[arg(long, help = "Skip skeleton length measurement.")]
    pub no_skeleton: bool,

    #[arg(long, help = "Substring specifying polygon files (e.g. _polygons).")]
    pub substring: Option<String>,

    #[arg(long, help = "Image height used when a polygon file has no shape.")]
    pub height: Option<u32>,

    #[arg(long, help = "Image width used when a polygon file has no shape.")]
    pub width: Option<u32>,
}

/// Load polygons and resolve the image shape they were drawn on
fn load_polygons(
    path: &Path,
    fallback: Option<ImageShape>,
) -> Result<(ImageShape, Vec<Segment>), SilhouetteError> {
    let polygons = Polygons::open(path)?;

    let shape = polygons.shape().or(fallback).ok_or_else(|| {
        SilhouetteError::OtherError(
            "Polygons have no image shape. Provide --height and --width.".to_string(),
        )
    })?;

    Ok((shape, polygons.to_segments()))
}

pub fn measure_polygons(args: &PolygonsArgs) {
    let command = "measure::polygons";

    configure_threads(command, args.threads);

    let fallback = match (args.height, args.width) {
        (Some(height), Some(width)) => Some(
            ImageShape::new(height, width).unwrap_or_else(|_| {
                fail(command, "Height and width must be positive integers.")
            }),
        ),
        (None, None) => None,
        _ => fail(command, "Height and width must be provided together."),
    };

    let config = MeasureConfig {
        command,
        input: &args.input,
        output: args.output.as_deref(),
        substring: args.substring.to_owned(),
        verbose: args.verbose,
        options: PipelineOptions {
            morphology: !args.no_morphology,
            threads: args.threads,
            skeleton: !args.no_skeleton,
        },
    };

    run_measure(
        &config,
        constant::SUPPORTED_ARRAY_FORMATS.as_slice(),
        |path: &Path| load_polygons(path, fallback),
    );
}
