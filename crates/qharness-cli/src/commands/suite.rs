//! Suite command implementation.
//!
//! `qharness suite [--scenarios <file.yaml>] [--filter <substr>] [--export <report.json>]`

use std::path::Path;

use anyhow::{Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qharness_eval::export::{self, ExportConfig};
use qharness_eval::{AcceptanceRunner, Verdict, default_scenarios, load_scenarios_file};

use super::common::{case_line, print_summary};

/// Execute the suite command.
pub fn execute(scenarios: Option<&str>, filter: Option<&str>, output: Option<&str>) -> Result<()> {
    let mut cases = match scenarios {
        Some(path) => load_scenarios_file(Path::new(path))?,
        None => default_scenarios()?,
    };
    if let Some(pattern) = filter {
        cases.retain(|s| s.name.contains(pattern));
    }
    if cases.is_empty() {
        bail!("no scenarios to run");
    }

    info!(cases = cases.len(), "selected scenarios");

    let cli_args: Vec<String> = std::env::args().collect();
    let runner = AcceptanceRunner::new().with_cli_args(cli_args);

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?,
    );
    let report = runner.run_suite(&cases, |case| {
        progress.inc(1);
        progress.set_message(case.name.clone());
        if !matches!(case.verdict, Verdict::Pass) {
            progress.println(case_line(case));
        }
    });
    progress.finish_and_clear();

    let config = ExportConfig::default();
    if let Some(output_path) = output {
        export::to_file(&report, Path::new(output_path), &config)?;
        eprintln!(
            "{} Report written to {}",
            style("OK").green().bold(),
            output_path
        );
    } else {
        for case in &report.cases {
            println!("{}", case_line(case));
        }
    }

    print_summary(&report);

    if !report.is_success() {
        bail!(
            "{} of {} cases did not pass",
            report.summary.failed + report.summary.errors,
            report.summary.total
        );
    }
    Ok(())
}
