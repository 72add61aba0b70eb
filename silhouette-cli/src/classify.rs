// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use serde_json::{Map, Value};

use silhouette_core::an::{self, AttributeMap};
use silhouette_core::constant;
use silhouette_core::io;
use silhouette_core::ut;
use silhouette_core::ut::timer::Stopwatch;

use crate::measure::{fail, validate_output};

#[derive(Debug, Args)]
#[command(about = "Assign attributes to precomputed shape descriptors.")]
pub struct ClassifyArgs {
    #[arg(short = 'i', long, help = "Features json file.")]
    pub input: String,

    #[arg(
        short = 'o',
        long,
        help = "Output file (.csv, .txt, .tsv, .pq, .parquet, .json)."
    )]
    pub output: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

#[derive(Serialize)]
struct ClassifiedObject<'a> {
    id: usize,
    features: &'a Map<String, Value>,
    attributes: Vec<&'static str>,
    attribute_map: AttributeMap,
}

pub fn classify(args: &ClassifyArgs) {
    let command = "classify";

    let input = Path::new(&args.input);

    if !input.is_file() {
        fail(command, "The provided features file path does not exist.");
    }

    let is_json = input
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| constant::SUPPORTED_ARRAY_FORMATS.contains(&ext.to_lowercase().as_str()));

    if !is_json {
        fail(command, "Invalid features extension. Must be a .json file.");
    }

    let output: Option<PathBuf> = args
        .output
        .as_deref()
        .map(|output| validate_output(command, output));

    let features = io::read_features_json(input).unwrap_or_else(|err| fail(command, &err.to_string()));

    let log: fn(&str, bool) = if output.is_some() {
        ut::track::progress_log
    } else {
        ut::track::progress_elog
    };

    log(
        &format!(
            "Detected {} objects.",
            ut::track::thousands_format(features.len())
        ),
        args.verbose,
    );

    let mut stopwatch = Stopwatch::with_verbose(args.verbose);

    stopwatch.start("classify");
    let attributes: Vec<AttributeMap> = features.iter().map(|f| an::classify(f)).collect();
    stopwatch.stop("classify");

    stopwatch.report_with(log, args.verbose);

    let Some(output) = output else {
        let mut stdout = std::io::stdout().lock();
        for (id, attributes) in attributes.iter().enumerate() {
            io::write_attribute_lines(&mut stdout, id, attributes)
                .unwrap_or_else(|err| fail(command, &err.to_string()));
        }
        return;
    };

    let is_json_output = output
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let result = if is_json_output {
        let objects: Vec<ClassifiedObject> = features
            .iter()
            .zip(attributes.iter())
            .enumerate()
            .map(|(id, (features, attributes))| ClassifiedObject {
                id,
                features,
                attributes: attributes.active(),
                attribute_map: *attributes,
            })
            .collect();

        io::write_json(&objects, &output)
    } else {
        io::classified_table(&features, &attributes).and_then(|mut df| io::write_table(&mut df, &output))
    };

    result.unwrap_or_else(|err| fail(command, &err.to_string()));

    ut::track::progress_log(
        &format!(
            "Complete. {} objects classified.",
            ut::track::thousands_format(attributes.len())
        ),
        args.verbose,
    );
}
