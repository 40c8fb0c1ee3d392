//! qharness local simulation backends
//!
//! Two backends over the same [`StatePreparation`](qharness_hal::StatePreparation)
//! contract:
//!
//! | Backend | Name | Output |
//! |---------|------|--------|
//! | [`StatevectorBackend`] | `statevector_simulator` | exact amplitudes |
//! | [`QasmBackend`] | `qasm_simulator` | sampled counts, optional per-shot memory |
//!
//! # Example
//!
//! ```ignore
//! use qharness_adapter_sim::default_registry;
//! use qharness_hal::{BackendConfig, RunConfig};
//!
//! let registry = default_registry();
//! let backend = registry.create("qasm_simulator", BackendConfig::new("qasm_simulator"))?;
//! let result = backend.execute(&program, &RunConfig::new(1000))?;
//! ```

mod jobs;
mod qasm;
mod sampler;
mod statevector;

pub use qasm::QasmBackend;
pub use statevector::StatevectorBackend;

use qharness_hal::BackendRegistry;

/// Default program width accepted by the local backends.
pub const DEFAULT_MAX_QUBITS: u32 = 32;

/// Sampling seed used when neither the run nor the backend sets one.
pub const DEFAULT_SEED: u64 = 42;

/// Registry with both local backends registered under their names.
pub fn default_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<StatevectorBackend>("statevector_simulator");
    registry.register::<QasmBackend>("qasm_simulator");
    registry
}
