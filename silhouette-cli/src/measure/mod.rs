// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args, Subcommand};
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use silhouette_core::an::{Pipeline, PipelineOptions, PipelineOutput};
use silhouette_core::constant;
use silhouette_core::error::SilhouetteError;
use silhouette_core::im::{ImageShape, Segment};
use silhouette_core::io;
use silhouette_core::ut;
use silhouette_core::ut::timer::Stopwatch;

mod masks;
mod polygons;

use masks::{MasksArgs, measure_masks};
use polygons::{PolygonsArgs, measure_polygons};

#[derive(Debug, Args)]
#[command(about = "Measure shape descriptors and attributes from segmented objects.")]
#[command(args_conflicts_with_subcommands = true)]
#[command(arg_required_else_help = true)]
#[command(flatten_help = true)]
pub struct MeasureArgs {
    #[command(subcommand)]
    command: Option<MeasureCommands>,
}

#[derive(Debug, Subcommand)]
enum MeasureCommands {
    Masks(MasksArgs),
    Polygons(PolygonsArgs),
}

pub fn measure(args: &MeasureArgs) {
    match &args.command {
        Some(MeasureCommands::Masks(masks)) => measure_masks(masks),
        Some(MeasureCommands::Polygons(polygons)) => measure_polygons(polygons),
        None => {}
    }
}

/// Settings shared by every measure command
pub(crate) struct MeasureConfig<'a> {
    pub command: &'a str,
    pub input: &'a str,
    pub output: Option<&'a str>,
    pub substring: Option<String>,
    pub verbose: bool,
    pub options: PipelineOptions,
}

pub(crate) fn fail(command: &str, message: &str) -> ! {
    eprintln!("[silhouette::{}] ERROR: {}", command, message);
    std::process::exit(1);
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

/// Check that an output path has a supported extension and an existing parent
pub(crate) fn validate_output(command: &str, output: &str) -> PathBuf {
    let output = PathBuf::from(output);

    match lowercase_extension(&output) {
        Some(ext) if constant::SUPPORTED_TABLE_FORMATS.contains(&ext.as_str()) => {}
        Some(_) => fail(
            command,
            &format!(
                "Invalid file extension. Must be one of: {:?}.",
                constant::SUPPORTED_TABLE_FORMATS
            ),
        ),
        None => fail(
            command,
            "Invalid output path. Output file must be a file with a valid extension.",
        ),
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fail(
                command,
                "Invalid file path. Parent directory of output file path does not exist.",
            );
        }
    }

    output
}

pub(crate) fn configure_threads(command: &str, threads: Option<usize>) {
    if let Some(threads) = threads {
        if threads < 1 {
            fail(
                command,
                "Threads must be set to a positive integer if provided.",
            );
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap_or_else(|err| fail(command, &err.to_string()));
    }
}

/// Write measured outputs, using the batch json layout for directory inputs
fn write_output(
    command: &str,
    batch: &[(String, PipelineOutput)],
    output: &Path,
    directory: bool,
) {
    let result = if lowercase_extension(output).as_deref() != Some("json") {
        io::records_table(batch).and_then(|mut df| io::write_table(&mut df, output))
    } else {
        match batch {
            [(_, single)] if !directory => io::write_image_json(single, output),
            _ => io::write_batch_json(batch, output),
        }
    };

    result.unwrap_or_else(|err| fail(command, &err.to_string()));
}

fn report_failures(command: &str, name: &str, output: &PipelineOutput) {
    for failure in output.failures.iter() {
        eprintln!(
            "[silhouette::{}] WARNING: {} segment {} failed. {}",
            command, name, failure.segment, failure.error
        );
    }
}

/// Measure every file in a directory, returning outputs in file order
fn measure_batch<F>(
    pipeline: &Pipeline,
    files: &[PathBuf],
    load: &F,
    verbose: bool,
) -> (Vec<(String, PipelineOutput)>, Vec<String>)
where
    F: Fn(&Path) -> Result<(ImageShape, Vec<Segment>), SilhouetteError> + Sync,
{
    let pb = ut::track::progress_bar(files.len(), "Measuring objects", verbose);

    let measured: Mutex<Vec<(usize, String, PipelineOutput)>> =
        Mutex::new(Vec::with_capacity(files.len()));
    let failure: Mutex<Vec<String>> = Mutex::new(Vec::new());

    (0..files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let name = ut::path::file_stem(&files[idx]);

            match load(&files[idx]) {
                Ok((shape, segments)) => {
                    let output = pipeline.run(&shape, &segments);
                    if let Ok(mut measured) = measured.lock() {
                        measured.push((idx, name, output));
                    }
                }
                Err(err) => {
                    if let Ok(mut failure) = failure.lock() {
                        failure.push(format!("{}\t{}", name, err));
                    }
                }
            }
        });

    let mut measured = measured
        .into_inner()
        .unwrap_or_else(|poison| poison.into_inner());
    let failure = failure
        .into_inner()
        .unwrap_or_else(|poison| poison.into_inner());

    measured.sort_by_key(|(idx, _, _)| *idx);

    let batch = measured
        .into_iter()
        .map(|(_, name, output)| (name, output))
        .collect();

    (batch, failure)
}

/// Measure a single file or a directory of files with a shared loader
pub(crate) fn run_measure<F>(config: &MeasureConfig, valid_ext: &[&str], load: F)
where
    F: Fn(&Path) -> Result<(ImageShape, Vec<Segment>), SilhouetteError> + Sync,
{
    let command = config.command;
    let input = Path::new(config.input);
    let output = config.output.map(|output| validate_output(command, output));

    let pipeline =
        Pipeline::new(config.options).unwrap_or_else(|err| fail(command, &err.to_string()));

    if input.is_dir() {
        let Some(output) = output else {
            fail(
                command,
                "If input is a directory, then an output file must be provided.",
            );
        };

        let files = ut::path::collect_file_paths(input, valid_ext, config.substring.to_owned())
            .unwrap_or_else(|err| fail(command, &err.to_string()));

        if files.is_empty() {
            fail(
                command,
                "No input files were detected. Please check your path and/or substring identifier.",
            );
        }

        ut::track::progress_log(
            &format!(
                "Detected {} input files.",
                ut::track::thousands_format(files.len())
            ),
            config.verbose,
        );

        let (batch, failure) = measure_batch(&pipeline, &files, &load, config.verbose);

        if config.verbose {
            println!()
        }

        for (name, output) in batch.iter() {
            report_failures(command, name, output);
        }

        for message in failure.iter() {
            eprintln!("[silhouette::{}] WARNING: {}", command, message);
        }

        write_output(command, &batch, &output, true);

        let objects: usize = batch.iter().map(|(_, output)| output.len()).sum();

        let message = if !failure.is_empty() {
            format!(
                "Complete. {} objects measured across {} files. {} files failed.",
                ut::track::thousands_format(objects),
                ut::track::thousands_format(batch.len()),
                ut::track::thousands_format(failure.len())
            )
        } else {
            format!(
                "Complete. {} objects measured across {} files.",
                ut::track::thousands_format(objects),
                ut::track::thousands_format(batch.len()),
            )
        };

        ut::track::progress_log(&message, config.verbose);
    } else {
        if !input.is_file() {
            fail(command, "The provided input file path does not exist.");
        }

        match lowercase_extension(input) {
            Some(ext) if valid_ext.contains(&ext.as_str()) => {}
            _ => fail(
                command,
                &format!("Invalid input extension. Must be one of: {:?}.", valid_ext),
            ),
        }

        let (shape, segments) = load(input).unwrap_or_else(|err| fail(command, &err.to_string()));

        // Logs move to stderr when records are written to stdout
        let log: fn(&str, bool) = if output.is_some() {
            ut::track::progress_log
        } else {
            ut::track::progress_elog
        };

        let mut stopwatch = Stopwatch::with_verbose(config.verbose);
        let result = pipeline.run_timed(&shape, &segments, &mut stopwatch);
        stopwatch.report_with(log, config.verbose);

        let name = ut::path::file_stem(input);
        report_failures(command, &name, &result);

        match output {
            Some(output) => write_output(command, &[(name, result)], &output, false),
            None => {
                let mut stdout = std::io::stdout().lock();
                io::write_lines(&mut stdout, &result.records)
                    .unwrap_or_else(|err| fail(command, &err.to_string()));
            }
        }
    }
}
