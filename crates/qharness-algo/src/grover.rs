//! Grover search over a logic-expression oracle.
//!
//! The search register starts in the uniform superposition. One round is
//! an oracle phase flip on the marked states followed by inversion about
//! the mean:
//!
//! ```text
//!   a_i  ←  -a_i            (i marked)
//!   a_i  ←  2·⟨a⟩ - a_i     (all i)
//! ```
//!
//! With `M` of `N` states marked and `sin θ = sqrt(M/N)`, after `k`
//! rounds the marked states hold probability `sin²((2k+1)θ)`.
//!
//! # Incremental search
//!
//! When the number of solutions is unknown, [`Iterations::Incremental`]
//! follows Boyer, Brassard, Høyer and Tapp: draw the round count uniformly
//! from `1..=m`, grow `m` by `λ = 6/5` after every miss, stop once `m`
//! reaches `sqrt(N)`.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_4;
use std::fmt;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use qharness_hal::{Backend, CircuitResources, Register, RunConfig, StatePreparation};

use crate::error::AlgoResult;
use crate::oracle::{LogicExpressionOracle, MctMode};

/// Growth factor of the incremental schedule.
pub const INCREMENTAL_GROWTH: f64 = 6.0 / 5.0;

/// Seed for the incremental round-count draws.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// How many amplification rounds to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Iterations {
    /// Exactly this many rounds.
    Fixed(u32),
    /// Randomized schedule with growing round counts.
    Incremental,
}

impl fmt::Display for Iterations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Iterations::Fixed(k) => write!(f, "{k}"),
            Iterations::Incremental => write!(f, "incremental"),
        }
    }
}

/// Outcome of a Grover search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroverResult {
    /// Most likely measured bitstring of the final run (variable 1 rightmost).
    pub top_measurement: String,
    /// Whether the top measurement satisfies the oracle.
    pub oracle_evaluation: bool,
    /// Top measurement as signed literals.
    pub assignment: Vec<i64>,
    /// Probability of the top measurement in the final run.
    pub top_probability: f64,
    /// Round counts tried, in order; one entry for a fixed schedule.
    pub rounds: Vec<u32>,
    /// Qubit account of the circuit.
    pub resources: CircuitResources,
    /// Outcome distribution of the final run.
    pub measurement: BTreeMap<String, f64>,
}

/// Grover search engine.
#[derive(Debug, Clone)]
pub struct Grover {
    oracle: LogicExpressionOracle,
    iterations: Iterations,
    mct_mode: MctMode,
    seed: u64,
}

impl Grover {
    /// Create a search with the given schedule and the basic MCT mode.
    pub fn new(oracle: LogicExpressionOracle, iterations: Iterations) -> Self {
        Self {
            oracle,
            iterations,
            mct_mode: MctMode::default(),
            seed: DEFAULT_SEED,
        }
    }

    /// Set the MCT decomposition mode.
    #[must_use]
    pub fn with_mct_mode(mut self, mode: MctMode) -> Self {
        self.mct_mode = mode;
        self
    }

    /// Set the seed of the incremental schedule.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The oracle.
    pub fn oracle(&self) -> &LogicExpressionOracle {
        &self.oracle
    }

    /// Qubit account under the configured MCT mode.
    pub fn resources(&self) -> CircuitResources {
        self.oracle.resources(self.mct_mode)
    }

    /// Amplitudes of the search register after `rounds` rounds.
    pub fn amplified_state(&self, rounds: u32) -> Vec<f64> {
        let n_states = 1usize << self.oracle.num_variables();
        let mut amps = vec![1.0 / (n_states as f64).sqrt(); n_states];

        for _ in 0..rounds {
            for (i, a) in amps.iter_mut().enumerate() {
                if self.oracle.is_marked(i) {
                    *a = -*a;
                }
            }
            let mean = amps.iter().sum::<f64>() / n_states as f64;
            for a in &mut amps {
                *a = 2.0 * mean - *a;
            }
        }
        amps
    }

    /// The program handed to the backend for one run.
    pub fn program(&self, rounds: u32) -> AlgoResult<StatePreparation> {
        let amplitudes = self
            .amplified_state(rounds)
            .into_iter()
            .map(|a| Complex64::new(a, 0.0))
            .collect();
        let prep = StatePreparation::new(
            format!("grover_{rounds}"),
            vec![Register::new("v", self.oracle.num_variables())],
            amplitudes,
        )?;
        Ok(prep.with_resources(self.resources()))
    }

    /// Run the search on a backend.
    #[instrument(skip(self, backend), fields(backend = backend.name(), iterations = %self.iterations, mct = %self.mct_mode))]
    pub fn run(&self, backend: &dyn Backend, config: &RunConfig) -> AlgoResult<GroverResult> {
        match self.iterations {
            Iterations::Fixed(k) => self.run_rounds(backend, config, k, vec![k]),
            Iterations::Incremental => self.run_incremental(backend, config),
        }
    }

    fn run_incremental(&self, backend: &dyn Backend, config: &RunConfig) -> AlgoResult<GroverResult> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let limit = ((1usize << self.oracle.num_variables()) as f64).sqrt();
        let mut m = 1.0_f64;
        let mut tried = Vec::new();
        let mut last = None;

        while m < limit {
            let k = rng.gen_range(1..=m.floor() as u32);
            tried.push(k);
            let result = self.run_rounds(backend, config, k, tried.clone())?;
            if result.oracle_evaluation {
                info!(rounds = ?tried, "incremental search found a solution");
                return Ok(result);
            }
            debug!(k, m, "incremental round missed");
            last = Some(result);
            m = (INCREMENTAL_GROWTH * m).min(limit);
        }

        match last {
            Some(result) => Ok(result),
            // Tiny search spaces never enter the loop; run one round.
            None => self.run_rounds(backend, config, 1, vec![1]),
        }
    }

    fn run_rounds(
        &self,
        backend: &dyn Backend,
        config: &RunConfig,
        rounds: u32,
        tried: Vec<u32>,
    ) -> AlgoResult<GroverResult> {
        let program = self.program(rounds)?;
        let result = backend.execute(&program, config)?;

        let measurement = result.distribution();
        let (top_measurement, top_probability) = result.most_likely().unwrap_or_default();
        let (oracle_evaluation, assignment) = self.oracle.evaluate_classically(&top_measurement);
        debug!(rounds, %top_measurement, top_probability, oracle_evaluation, "grover run");

        Ok(GroverResult {
            top_measurement,
            oracle_evaluation,
            assignment,
            top_probability,
            rounds: tried,
            resources: program.resources(),
            measurement,
        })
    }
}

/// Probability of measuring a marked state after `rounds` rounds.
pub fn success_probability(num_variables: u32, num_marked: usize, rounds: u32) -> f64 {
    let n = (1usize << num_variables) as f64;
    let theta = (num_marked as f64 / n).sqrt().asin();
    ((2.0 * f64::from(rounds) + 1.0) * theta).sin().powi(2)
}

/// Round count maximizing the success probability, `floor(π/4 · sqrt(N/M))`.
pub fn optimal_iterations(num_variables: u32, num_marked: usize) -> u32 {
    if num_marked == 0 {
        return 0;
    }
    let n = (1usize << num_variables) as f64;
    (FRAC_PI_4 * (n / num_marked as f64).sqrt()).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleOptimization;

    fn oracle(text: &str) -> LogicExpressionOracle {
        LogicExpressionOracle::from_dimacs(text, OracleOptimization::Off).unwrap()
    }

    #[test]
    fn test_amplified_state_matches_closed_form() {
        // x1 ∧ x2 ∧ x3: one marked state of eight.
        let g = Grover::new(oracle("p cnf 3 3\n1 0\n2 0\n3 0\n"), Iterations::Fixed(2));
        for rounds in 0..5 {
            let amps = g.amplified_state(rounds);
            let p = amps[0b111].powi(2);
            assert!((p - success_probability(3, 1, rounds)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_state_stays_normalized() {
        let g = Grover::new(oracle("p cnf 3 2\n1 2 0\n-3 0\n"), Iterations::Fixed(3));
        let norm: f64 = g.amplified_state(3).iter().map(|a| a * a).sum();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_optimal_iterations() {
        assert_eq!(optimal_iterations(2, 1), 1);
        assert_eq!(optimal_iterations(3, 1), 2);
        assert_eq!(optimal_iterations(4, 1), 3);
        assert_eq!(optimal_iterations(4, 0), 0);
    }

    #[test]
    fn test_program_carries_resources() {
        let g = Grover::new(oracle("p cnf 2 2\n1 0\n2 0\n"), Iterations::Fixed(1))
            .with_mct_mode(MctMode::NoAncilla);
        let prog = g.program(1).unwrap();
        assert_eq!(prog.num_measured_qubits(), 2);
        assert_eq!(prog.resources(), g.resources());
        assert_eq!(prog.resources().num_qubits, 2 + 2 + 1);
    }

    #[test]
    fn test_iterations_display() {
        assert_eq!(Iterations::Fixed(3).to_string(), "3");
        assert_eq!(Iterations::Incremental.to_string(), "incremental");
    }
}
