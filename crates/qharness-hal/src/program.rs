//! The unit of execution handed to a backend.
//!
//! Algorithm engines in this workspace do not emit gate lists. They hand
//! the backend the pre-measurement state of the registers that get
//! measured, together with an account of how many physical qubits the
//! full circuit (ancillas included) would occupy. Backends check that
//! account against their capabilities and then either return the state
//! as-is or sample from it.
//!
//! # Bit ordering
//!
//! Registers are laid out from the least significant bit upwards in the
//! order they are declared. Bitstrings are printed with qubit 0 as the
//! rightmost character.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Largest measured width accepted by [`StatePreparation::new`].
pub const MAX_MEASURED_QUBITS: u32 = 24;

/// A named, measured quantum register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Register name.
    pub name: String,
    /// Number of qubits.
    pub size: u32,
}

impl Register {
    /// Create a register.
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Qubit accounting for the circuit an engine stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CircuitResources {
    /// Total qubits, measured registers and ancillas together.
    pub num_qubits: u32,
    /// Ancilla qubits included in `num_qubits`.
    pub num_ancillae: u32,
}

impl CircuitResources {
    /// Create a resource account.
    pub fn new(num_qubits: u32, num_ancillae: u32) -> Self {
        Self {
            num_qubits,
            num_ancillae,
        }
    }
}

/// Pre-measurement state of the measured registers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatePreparation {
    name: String,
    registers: Vec<Register>,
    amplitudes: Vec<Complex64>,
    resources: CircuitResources,
}

impl StatePreparation {
    /// Create a state preparation.
    ///
    /// The amplitude vector must have length `2^w` where `w` is the total
    /// register width; it is normalized here. A zero vector is rejected.
    pub fn new(
        name: impl Into<String>,
        registers: Vec<Register>,
        amplitudes: Vec<Complex64>,
    ) -> HalResult<Self> {
        let width: u32 = registers.iter().map(|r| r.size).sum();
        if width == 0 {
            return Err(HalError::InvalidProgram("no measured qubits".into()));
        }
        if width > MAX_MEASURED_QUBITS {
            return Err(HalError::ProgramTooLarge(format!(
                "{width} measured qubits exceed the limit of {MAX_MEASURED_QUBITS}"
            )));
        }
        let expected = 1usize << width;
        if amplitudes.len() != expected {
            return Err(HalError::InvalidProgram(format!(
                "expected {expected} amplitudes for {width} qubits, got {}",
                amplitudes.len()
            )));
        }
        if amplitudes.iter().any(|a| !a.re.is_finite() || !a.im.is_finite()) {
            return Err(HalError::InvalidProgram("non-finite amplitude".into()));
        }

        let norm = amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        if norm < 1e-300 {
            return Err(HalError::InvalidProgram("zero state vector".into()));
        }
        let amplitudes = amplitudes.into_iter().map(|a| a / norm).collect();

        Ok(Self {
            name: name.into(),
            registers,
            amplitudes,
            resources: CircuitResources::new(width, 0),
        })
    }

    /// Attach the resource account of the full circuit.
    ///
    /// The account can never be narrower than the measured registers.
    #[must_use]
    pub fn with_resources(mut self, resources: CircuitResources) -> Self {
        let width = self.num_measured_qubits();
        self.resources = CircuitResources {
            num_qubits: resources.num_qubits.max(width),
            num_ancillae: resources.num_ancillae,
        };
        self
    }

    /// Program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Measured registers, least significant first.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Normalized amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Resource account of the full circuit.
    pub fn resources(&self) -> CircuitResources {
        self.resources
    }

    /// Total width of the measured registers.
    pub fn num_measured_qubits(&self) -> u32 {
        self.registers.iter().map(|r| r.size).sum()
    }

    /// Outcome probabilities, indexed by basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Format a basis-state index as a bitstring, qubit 0 rightmost.
    pub fn bitstring(&self, index: usize) -> String {
        format!(
            "{:0width$b}",
            index,
            width = self.num_measured_qubits() as usize
        )
    }

    /// Extract the value of one register from a basis-state index.
    pub fn register_value(&self, index: usize, register: usize) -> Option<usize> {
        let mut offset = 0u32;
        for (i, reg) in self.registers.iter().enumerate() {
            if i == register {
                let mask = (1usize << reg.size) - 1;
                return Some((index >> offset) & mask);
            }
            offset += reg.size;
        }
        None
    }
}
