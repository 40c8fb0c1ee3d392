//! Scenarios command implementation.

use anyhow::Result;
use console::style;

use qharness_eval::{AlgorithmConfig, default_scenarios};

/// Execute the scenarios command.
pub fn execute() -> Result<()> {
    let scenarios = default_scenarios()?;
    println!(
        "{} Default scenario matrix ({} cases):\n",
        style("qharness").cyan().bold(),
        scenarios.len()
    );
    for scenario in &scenarios {
        let family = match scenario.algorithm {
            AlgorithmConfig::Search(_) => "grover",
            AlgorithmConfig::Hhl(_) => "hhl",
        };
        println!(
            "  {:6} {} {}",
            style(family).dim(),
            scenario.name,
            style(format!("[{} shots]", scenario.backend.run.shots)).dim()
        );
    }
    Ok(())
}
