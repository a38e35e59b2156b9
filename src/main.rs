//! S12 Emulator - CLI Entry Point
//!
//! `s12-emu <memFile> [-o <baseName>] [-c <cycles>]`
//!
//! Loads the image, runs until HALT or the cycle cap, writes
//! `<baseName>_memOut` and `<baseName>_trace`, and prints a summary.

use clap::Parser;
use serde::Serialize;
use s12::driver::{self, EXIT_LOAD_FAILURE};
use s12::{CpuState, RunConfig, Simulator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "s12-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the S12 12-bit accumulator machine")]
struct Cli {
    /// Memory image to load (project binary or benchmark hex format)
    mem_file: String,
    /// Output base name (default: input file name without extension)
    #[arg(short, long)]
    output: Option<String>,
    /// Maximum number of cycles to execute (default: unbounded)
    #[arg(short, long)]
    cycles: Option<u64>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    cycles: u64,
    pc: String,
    acc: String,
    state: CpuState,
    config: &'a RunConfig,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = RunConfig::new(&cli.mem_file, cli.output, cli.cycles);

    let report = match driver::run(&config) {
        Ok(report) => report,
        Err(e) => {
            tracing::debug!("{}", e);
            eprintln!("Failed to read/parse memory file: {}", cli.mem_file);
            std::process::exit(EXIT_LOAD_FAILURE);
        }
    };

    for warning in report.warnings() {
        eprintln!("{}", warning);
    }

    if cli.json {
        let (pc, acc) = report.cpu.register_summary();
        let summary = Summary {
            cycles: report.cycles,
            pc,
            acc,
            state: report.cpu.state,
            config: report.config(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode summary: {}", e),
        }
    } else {
        println!("{}", report.summary());
    }

    if let Some(e) = &report.fault {
        eprintln!("Execution stopped: {}", e);
    }
    std::process::exit(report.exit_code());
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
