// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use clap::Args;

use silhouette_core::an::PipelineOptions;
use silhouette_core::constant;
use silhouette_core::im::Mask;

use super::{MeasureConfig, configure_threads, run_measure};

#[derive(Debug, Args)]
#[command(about = "Measure objects from binary or integer-labeled masks.")]
pub struct MasksArgs {
    #[arg(short = 'i', long, help = "Mask file or directory of masks.")]
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

    #[arg(long, help = "Skip morphological closing of masks.")]
    pub no_morphology: bool,

    #[arg(long, help = "Skip skeleton length measurement.")]
    pub no_skeleton: bool,

    #[arg(long, help = "Substring specifying mask files (e.g. _mask).")]
    pub substring: Option<String>,
}

pub fn measure_masks(args: &MasksArgs) {
    let command = "measure::masks";

    configure_threads(command, args.threads);

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
        constant::SUPPORTED_MASK_FORMATS.as_slice(),
        |path: &Path| Mask::open_segments(path),
    );
}
