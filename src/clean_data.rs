/*
cargo run --bin clean_data -- simulator/data/random-city-data/berlin_raw.geojson

cargo run --bin clean_data -- -v --pretty \
    --log-dir logs \
    simulator/data/random-city-data/berlin_raw.geojson
*/

use std::fs::{create_dir_all, File};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use feature_sampler::{run, OutputFormat, Progress, SampleError};

// Sample at most 500 features of a raw GeoJSON file into its "clean" sibling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    // Raw GeoJSON file; output goes next to it with "raw" -> "clean"
    input: Option<PathBuf>,

    // Indent the output JSON
    #[arg(long)]
    pretty: bool,

    // More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    // Also write a timestamped log file into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let Some(input) = args.input.as_deref() else {
        exit_err(SampleError::Usage.to_string());
    };

    if let Err(e) = init_logging(&args) {
        exit_err(format!("Cannot set up logging: {e:#}"));
    }

    let format = if args.pretty { OutputFormat::Pretty } else { OutputFormat::Compact };

    let result = run(input, format, |p| match p {
        Progress::Loaded { features } => println!("features before sample {features}"),
        Progress::Sampled { taken } => println!("taking {taken} samples"),
    });

    match result {
        Ok(report) => info!(
            "Kept {} of {} features in {}",
            report.taken,
            report.features_before,
            report.output.display()
        ),
        Err(e) => exit_err(e.to_string()),
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let config = ConfigBuilder::new().build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(dir) = &args.log_dir {
        create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("clean_data_{ts}.log"));
        let file = File::create(&log_path).with_context(|| format!("creating {}", log_path.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Info, config, file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn exit_err(msg: String) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}
