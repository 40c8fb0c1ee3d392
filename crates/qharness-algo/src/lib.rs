//! Reference quantum-algorithm engines for the qharness acceptance harness
//!
//! Both engines build the pre-measurement state of their measured
//! registers, hand it to a [`qharness_hal::Backend`], and post-process
//! what comes back.
//!
//! # Overview
//!
//! - [`grover`]: amplitude amplification over a [`LogicExpressionOracle`]
//!   built from DIMACS CNF, with a fixed or incremental round schedule
//! - [`hhl`]: linear-system solving by phase estimation ([`eigs`]) and a
//!   reciprocal rotation ([`reciprocal`]), read out from a statevector or
//!   by state [`tomography`]
//! - [`random_matrix`]: seeded Hermitian and diagonal test matrices
//!
//! # Example
//!
//! ```ignore
//! use qharness_algo::{Grover, Iterations, LogicExpressionOracle, OracleOptimization};
//! use qharness_adapter_sim::StatevectorBackend;
//! use qharness_hal::RunConfig;
//!
//! let oracle = LogicExpressionOracle::from_dimacs(
//!     "c solution: 1 2 0\np cnf 2 2\n1 0\n2 0\n",
//!     OracleOptimization::Off,
//! )?;
//! let result = Grover::new(oracle, Iterations::Fixed(1))
//!     .run(&StatevectorBackend::new(), &RunConfig::new(1000))?;
//! assert_eq!(result.top_measurement, "11");
//! ```

pub mod cnf;
pub mod eigs;
pub mod error;
pub mod evolution;
pub mod grover;
pub mod hamiltonian;
pub mod hhl;
pub mod linalg;
pub mod oracle;
pub mod random_matrix;
pub mod reciprocal;
pub mod tomography;

pub use cnf::Cnf;
pub use eigs::{EigsOptions, EigsQpe};
pub use error::{AlgoError, AlgoResult};
pub use evolution::ExpansionMode;
pub use grover::{Grover, GroverResult, Iterations};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
pub use hhl::{Hhl, HhlResult};
pub use linalg::{Matrix, Vector};
pub use oracle::{LogicExpressionOracle, MctMode, OracleOptimization};
pub use random_matrix::SpectrumSpec;
pub use reciprocal::{Reciprocal, ReciprocalMode, ReciprocalOptions};
