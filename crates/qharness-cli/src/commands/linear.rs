//! Linear command implementation.
//!
//! `qharness linear --matrix '[[1,0],[0,1]]' --vector '[1,1]' [--negative-evals]`

use anyhow::{Context, Result, bail};
use console::style;

use qharness_algo::{EigsOptions, ReciprocalMode, ReciprocalOptions};
use qharness_eval::config::HHL_SAMPLING_SHOTS;
use qharness_eval::{AcceptanceRunner, BackendSelection, HhlConfig, LinearInstance};

use super::common::print_evaluation;

/// Arguments of the linear command.
pub struct LinearArgs {
    pub matrix: String,
    pub vector: String,
    pub ancillae: u32,
    pub negative_evals: bool,
    pub reciprocal: String,
    pub scale: Option<f64>,
    pub backend: String,
    pub shots: Option<u32>,
    pub seed: Option<u64>,
}

/// Execute the linear command.
pub fn execute(args: &LinearArgs) -> Result<()> {
    let rows: Vec<Vec<f64>> =
        serde_json::from_str(&args.matrix).context("--matrix must be a JSON array of rows")?;
    let vector: Vec<f64> =
        serde_json::from_str(&args.vector).context("--vector must be a JSON array")?;
    let instance = LinearInstance::from_real("cli", &rows, &vector)?;

    let mode: ReciprocalMode = args.reciprocal.parse()?;
    let mut reciprocal = ReciprocalOptions::default().with_mode(mode);
    if let Some(scale) = args.scale {
        reciprocal = reciprocal.with_scale(scale);
    }
    let config = HhlConfig::builder()
        .eigs(EigsOptions::default().with_num_ancillae(args.ancillae))
        .reciprocal(reciprocal)
        .negative_evals(args.negative_evals)
        .build()?;

    let mut backend = BackendSelection::new(&args.backend)
        .with_shots(args.shots.unwrap_or(HHL_SAMPLING_SHOTS));
    if let Some(seed) = args.seed {
        backend = backend.with_seed(seed);
    }

    println!(
        "{} {}x{} system on {} ({} clock qubits, {} reciprocal{})",
        style("Solving").cyan().bold(),
        rows.len(),
        rows.len(),
        backend.name,
        args.ancillae,
        mode,
        if args.negative_evals {
            ", negative eigenvalues"
        } else {
            ""
        }
    );
    println!();

    let evaluation = AcceptanceRunner::new().run_linear(&instance, config, &backend)?;
    print_evaluation(&evaluation);

    if !evaluation.verdict.is_pass() {
        bail!("solution fidelity is below the acceptance threshold");
    }
    Ok(())
}
