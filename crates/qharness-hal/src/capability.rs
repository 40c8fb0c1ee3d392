//! Backend capability introspection.
//!
//! The harness only needs three facts about a backend: how wide a program
//! it accepts, how many shots it allows, and whether it returns the exact
//! state or samples from it. The last one decides which tolerance an
//! acceptance check uses.

use serde::{Deserialize, Serialize};

/// Hardware capabilities of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Maximum number of qubits (including ancillas) a program may use.
    pub num_qubits: u32,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// The backend returns the exact final state instead of samples.
    pub statevector: bool,
    /// Free-form feature tags.
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a deterministic state-vector simulator.
    pub fn statevector_simulator(num_qubits: u32) -> Self {
        Self {
            name: "statevector_simulator".into(),
            num_qubits,
            max_shots: 1,
            statevector: true,
            features: vec!["statevector".into()],
        }
    }

    /// Capabilities of a shot-sampling simulator.
    pub fn qasm_simulator(num_qubits: u32) -> Self {
        Self {
            name: "qasm_simulator".into(),
            num_qubits,
            max_shots: 100_000,
            statevector: false,
            features: vec!["counts".into(), "memory".into()],
        }
    }

    /// Check for a feature tag.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// True for backends whose results carry sampling noise.
    pub fn is_stochastic(&self) -> bool {
        !self.statevector
    }
}
