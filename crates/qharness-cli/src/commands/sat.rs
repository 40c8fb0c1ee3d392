//! SAT command implementation.
//!
//! `qharness sat --input <instance.cnf> [--iterations N | --incremental] [--mct-mode MODE]`

use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use qharness_algo::{Iterations, MctMode, OracleOptimization};
use qharness_eval::{AcceptanceRunner, BackendSelection, SatInstance, SearchConfig};

use super::common::print_evaluation;

/// Arguments of the sat command.
pub struct SatArgs {
    pub input: Option<String>,
    pub builtin: Option<String>,
    pub iterations: Option<u32>,
    pub incremental: bool,
    pub mct_mode: String,
    pub optimization: String,
    pub backend: String,
    pub seed: Option<u64>,
}

/// Execute the sat command.
pub fn execute(args: &SatArgs) -> Result<()> {
    let instance = match (&args.input, &args.builtin) {
        (Some(path), _) => SatInstance::from_file(Path::new(path))?,
        (None, Some(name)) => SatInstance::builtin(name)?,
        (None, None) => bail!("either --input or --builtin is required"),
    };

    let iterations = match (args.iterations, args.incremental) {
        (Some(k), false) => Iterations::Fixed(k),
        (None, true) => Iterations::Incremental,
        (None, false) => bail!("either --iterations or --incremental is required"),
        (Some(_), true) => bail!("--iterations and --incremental are exclusive"),
    };
    let mct_mode: MctMode = args.mct_mode.parse()?;
    let optimization: OracleOptimization = args.optimization.parse()?;

    let mut config = SearchConfig::new(iterations)
        .with_mct_mode(mct_mode)
        .with_optimization(optimization);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let backend = BackendSelection::new(&args.backend);

    println!(
        "{} {} on {} ({} rounds, {} MCT, optimization {})",
        style("Searching").cyan().bold(),
        instance.name(),
        backend.name,
        iterations,
        mct_mode,
        optimization
    );
    println!("  Ground truth:     {}", instance.ground_truth());
    println!();

    let evaluation = AcceptanceRunner::new().run_sat(&instance, config, &backend)?;
    print_evaluation(&evaluation);

    if !evaluation.verdict.is_pass() {
        bail!("search result contradicts the ground truth");
    }
    Ok(())
}
