// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use silhouette_cli::{classify, measure};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Measure(measure::MeasureArgs),
    Classify(classify::ClassifyArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Measure(measure_args)) => measure::measure(measure_args),
        Some(Commands::Classify(classify_args)) => classify::classify(classify_args),
        None => {}
    }
}
