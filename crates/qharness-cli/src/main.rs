//! qharness command-line interface
//!
//! Runs the acceptance matrix, or single SAT and linear-system cases,
//! against the local simulators.
//!
//! ```text
//! qharness suite [--scenarios FILE] [--filter SUBSTR] [--export FILE]
//! qharness sat --input FILE [--iterations N | --incremental] [--mct-mode MODE]
//! qharness linear --matrix JSON --vector JSON [--negative-evals]
//! qharness scenarios
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{backends, linear, sat, scenarios, suite, version};

/// qharness - acceptance harness for Grover search and HHL
#[derive(Parser)]
#[command(name = "qharness")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario matrix and report verdicts
    Suite {
        /// YAML scenario file (default matrix if omitted)
        #[arg(short, long)]
        scenarios: Option<String>,

        /// Only run scenarios whose name contains this string
        #[arg(short, long)]
        filter: Option<String>,

        /// Output file for the JSON report
        #[arg(short, long)]
        export: Option<String>,
    },

    /// Run Grover search on one SAT instance
    Sat {
        /// DIMACS file with a ground-truth header
        #[arg(short, long, conflicts_with = "builtin")]
        input: Option<String>,

        /// Name of a shipped instance
        #[arg(long)]
        builtin: Option<String>,

        /// Fixed number of amplification rounds
        #[arg(long, conflicts_with = "incremental")]
        iterations: Option<u32>,

        /// Use the incremental schedule
        #[arg(long)]
        incremental: bool,

        /// MCT mode (basic, advanced, noancilla)
        #[arg(long, default_value = "basic")]
        mct_mode: String,

        /// Oracle optimization (off, espresso)
        #[arg(long, default_value = "off")]
        optimization: String,

        /// Backend to use (always 1000 shots)
        #[arg(short, long, default_value = "qasm_simulator")]
        backend: String,

        /// Seed of the incremental schedule
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Solve one linear system with HHL
    Linear {
        /// Matrix as JSON rows, e.g. [[1,0],[0,1]]
        #[arg(short, long)]
        matrix: String,

        /// Right-hand side as JSON, e.g. [1,1]
        #[arg(long)]
        vector: String,

        /// Clock register size
        #[arg(long, default_value = "3")]
        ancillae: u32,

        /// Handle negative eigenvalues
        #[arg(long)]
        negative_evals: bool,

        /// Reciprocal mode (lookup, long_division)
        #[arg(long, default_value = "lookup")]
        reciprocal: String,

        /// Reciprocal scale (0 derives it from the clock)
        #[arg(long)]
        scale: Option<f64>,

        /// Backend to use
        #[arg(short, long, default_value = "statevector_simulator")]
        backend: String,

        /// Number of shots on a sampling backend
        #[arg(short, long)]
        shots: Option<u32>,

        /// Sampling seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the default scenario matrix
    Scenarios,

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Suite {
            scenarios,
            filter,
            export,
        } => suite::execute(scenarios.as_deref(), filter.as_deref(), export.as_deref()),

        Commands::Sat {
            input,
            builtin,
            iterations,
            incremental,
            mct_mode,
            optimization,
            backend,
            seed,
        } => sat::execute(&sat::SatArgs {
            input,
            builtin,
            iterations,
            incremental,
            mct_mode,
            optimization,
            backend,
            seed,
        }),

        Commands::Linear {
            matrix,
            vector,
            ancillae,
            negative_evals,
            reciprocal,
            scale,
            backend,
            shots,
            seed,
        } => linear::execute(&linear::LinearArgs {
            matrix,
            vector,
            ancillae,
            negative_evals,
            reciprocal,
            scale,
            backend,
            shots,
            seed,
        }),

        Commands::Scenarios => scenarios::execute(),

        Commands::Backends => backends::execute(),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
