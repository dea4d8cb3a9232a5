//! Single Span Simulator CLI
//!
//! Propagates the reference C-band comb through one fiber span and prints
//! power and OSNR at transmitter, pre-fiber, post-fiber and receiver.
//!
//! Usage:
//!   span-sim                          # prompts for the fiber length
//!   span-sim --length-km 80 --json report.json
//!   span-sim --config span.json -v

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use optical_elements::{Fiber, InputSpectrumSource, Transceiver};
use span_report::{SpanConfig, SpanPipeline};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LENGTH_PROMPT: &str = "Introduce la longitud de la fibra en km: ";

#[derive(Error, Debug)]
enum CliError {
    #[error("Invalid fiber length {0:?}: expected a finite number in km")]
    InvalidLength(String),
    #[error("No fiber length supplied on stdin")]
    NoInput,
}

#[derive(Parser, Debug)]
#[command(
    name = "span-sim",
    about = "Power and OSNR through a single fiber span"
)]
struct Args {
    /// Fiber length in km; prompted for when absent
    #[arg(short, long)]
    length_km: Option<f64>,

    /// JSON file overriding simulation and fiber defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_length(input: &str) -> std::result::Result<f64, CliError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(length) if length.is_finite() => Ok(length),
        _ => Err(CliError::InvalidLength(trimmed.to_string())),
    }
}

fn prompt_length(input: &mut impl BufRead, output: &mut impl Write) -> Result<f64> {
    write!(output, "{}", LENGTH_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::NoInput.into());
    }
    Ok(parse_length(&line)?)
}

/// Load the optional config file and set the span length, converted to the
/// file's `length_units`.
fn build_config(path: Option<&Path>, length_km: f64) -> Result<SpanConfig> {
    let mut config = match path {
        Some(path) => SpanConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {:?}", path))?,
        None => SpanConfig::default(),
    };
    config.fiber.set_length_km(length_km);
    Ok(config)
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "span_sim=debug,span_report=debug,optical_elements=debug,warn"
    } else {
        "span_sim=info,span_report=info,optical_elements=info,warn"
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let length_km = match args.length_km {
        Some(length) => length,
        None => {
            let stdin = io::stdin();
            prompt_length(&mut stdin.lock(), &mut io::stdout())?
        }
    };
    let config = build_config(args.config.as_deref(), length_km)?;

    info!(
        "Span: {:.2} km, {} channels at {:.1} dBm",
        config.fiber.length_km(),
        config.simulation.num_channels(),
        config.simulation.tx_power_dbm
    );

    let fiber = Fiber::new("Fiber1", config.fiber.clone())?;
    let receiver = Transceiver::new("Receiver");
    let mut pipeline = SpanPipeline::new(InputSpectrumSource, fiber, receiver);

    let report = pipeline.run(&config.simulation)?;
    println!("{}", report);

    if let Some(path) = &args.json {
        info!("Writing JSON report to {:?}", path);
        let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &report)?;
    }

    Ok(())
}
