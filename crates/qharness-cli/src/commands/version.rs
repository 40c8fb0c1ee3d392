//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - acceptance harness for Grover search and HHL",
        style("qharness").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qharness-hal          Backend abstraction");
    println!("  qharness-adapter-sim  Statevector and sampling simulators");
    println!("  qharness-algo         Reference Grover and HHL engines");
    println!("  qharness-eval         Ground truth, scenarios and verdicts");
    println!("  qharness-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
