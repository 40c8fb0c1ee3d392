//! qharness backend abstraction layer
//!
//! This crate defines the contract between the acceptance harness and the
//! backends it runs algorithms on.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for job submission and result retrieval
//! - [`Capabilities`] describing width, shot limits and determinism
//! - [`RunConfig`] carrying shots, credits, memory and seed
//! - [`StatePreparation`], the program handed to a backend
//! - Unified result handling via [`ExecutionResult`] and [`Counts`]
//!
//! # Available Backends
//!
//! | Backend | Crate | Deterministic |
//! |---------|-------|---------------|
//! | `statevector_simulator` | `qharness-adapter-sim` | yes |
//! | `qasm_simulator` | `qharness-adapter-sim` | no |
//!
//! # Example
//!
//! ```ignore
//! use qharness_hal::{Backend, Register, RunConfig, StatePreparation};
//! use qharness_adapter_sim::QasmBackend;
//! use num_complex::Complex64;
//!
//! let prep = StatePreparation::new(
//!     "plus",
//!     vec![Register::new("q", 1)],
//!     vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
//! )?;
//!
//! let backend = QasmBackend::new();
//! let result = backend.execute(&prep, &RunConfig::new(1000).with_seed(7))?;
//! println!("Results: {:?}", result.counts);
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod program;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, RunConfig, ValidationResult};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use program::{CircuitResources, MAX_MEASURED_QUBITS, Register, StatePreparation};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
