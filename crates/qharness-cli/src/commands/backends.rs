//! Backends command implementation.

use anyhow::Result;
use console::style;

use qharness_adapter_sim::default_registry;
use qharness_hal::BackendConfig;

/// Execute the backends command.
pub fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("qharness").cyan().bold());

    let registry = default_registry();
    for name in registry.available_backends() {
        let backend = registry.create(&name, BackendConfig::new(&name))?;
        let caps = backend.capabilities();
        println!(
            "  {} {} {}",
            style("●").green(),
            style(&name).bold(),
            if caps.is_stochastic() {
                "(sampling)"
            } else {
                "(exact)"
            }
        );
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        println!("    Features: {}", caps.features.join(", "));
        println!();
    }

    Ok(())
}
