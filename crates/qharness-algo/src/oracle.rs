//! Logic-expression oracle over a CNF formula.
//!
//! The oracle marks satisfying assignments of the variable register. Its
//! gate-level synthesis is not modelled; what it exposes is the marking
//! itself, a classical check of a measured bitstring, and the qubit
//! account of the circuit it stands for under each multi-controlled
//! Toffoli (MCT) strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use qharness_hal::CircuitResources;

use crate::cnf::Cnf;
use crate::error::{AlgoError, AlgoResult};

/// Strategy for decomposing multi-controlled Toffoli gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MctMode {
    /// V-chain with `controls - 2` clean ancillas.
    #[default]
    Basic,
    /// Recursive split needing one ancilla above four controls.
    Advanced,
    /// Ancilla-free decomposition.
    NoAncilla,
}

impl MctMode {
    /// All modes, in a stable order.
    pub const ALL: [MctMode; 3] = [MctMode::Basic, MctMode::Advanced, MctMode::NoAncilla];

    /// Ancillas needed for an MCT gate with `controls` controls.
    pub fn ancillas(self, controls: usize) -> u32 {
        match self {
            MctMode::Basic => controls.saturating_sub(2) as u32,
            MctMode::Advanced => u32::from(controls > 4),
            MctMode::NoAncilla => 0,
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            MctMode::Basic => "basic",
            MctMode::Advanced => "advanced",
            MctMode::NoAncilla => "noancilla",
        }
    }
}

impl fmt::Display for MctMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MctMode {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(MctMode::Basic),
            "advanced" => Ok(MctMode::Advanced),
            "noancilla" => Ok(MctMode::NoAncilla),
            other => Err(AlgoError::InvalidParameter(format!("unknown MCT mode '{other}'"))),
        }
    }
}

/// Logic optimization applied to the expression before marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleOptimization {
    /// Use the expression as written.
    #[default]
    Off,
    /// Two-level minimization.
    Espresso,
}

impl OracleOptimization {
    /// Both levels, in a stable order.
    pub const ALL: [OracleOptimization; 2] = [OracleOptimization::Off, OracleOptimization::Espresso];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            OracleOptimization::Off => "off",
            OracleOptimization::Espresso => "espresso",
        }
    }
}

impl fmt::Display for OracleOptimization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OracleOptimization {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(OracleOptimization::Off),
            "espresso" => Ok(OracleOptimization::Espresso),
            other => Err(AlgoError::InvalidParameter(format!(
                "unknown oracle optimization '{other}'"
            ))),
        }
    }
}

/// Oracle marking the satisfying assignments of a CNF formula.
#[derive(Debug, Clone)]
pub struct LogicExpressionOracle {
    cnf: Cnf,
    optimization: OracleOptimization,
    marked: Vec<bool>,
}

impl LogicExpressionOracle {
    /// Build an oracle from DIMACS text.
    pub fn from_dimacs(text: &str, optimization: OracleOptimization) -> AlgoResult<Self> {
        Self::new(Cnf::parse(text)?, optimization)
    }

    /// Build an oracle from a parsed formula.
    pub fn new(cnf: Cnf, optimization: OracleOptimization) -> AlgoResult<Self> {
        if cnf.num_variables() == 0 {
            return Err(AlgoError::InvalidParameter(
                "expression has no variables".into(),
            ));
        }
        let cnf = match optimization {
            OracleOptimization::Off => cnf,
            OracleOptimization::Espresso => cnf.minimize(),
        };
        let marked = cnf.truth_table()?;
        debug!(
            variables = cnf.num_variables(),
            clauses = cnf.num_clauses(),
            marked = marked.iter().filter(|m| **m).count(),
            %optimization,
            "built logic expression oracle"
        );
        Ok(Self {
            cnf,
            optimization,
            marked,
        })
    }

    /// The formula after optimization.
    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Optimization level in effect.
    pub fn optimization(&self) -> OracleOptimization {
        self.optimization
    }

    /// Width of the variable register.
    pub fn num_variables(&self) -> u32 {
        self.cnf.num_variables()
    }

    /// True if the basis state `index` of the variable register is marked.
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Number of marked basis states.
    pub fn num_marked(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }

    /// Check a measured bitstring (variable 1 rightmost).
    ///
    /// Returns whether it satisfies the formula and the assignment as
    /// signed literals, `+i` for true and `-i` for false.
    pub fn evaluate_classically(&self, measurement: &str) -> (bool, Vec<i64>) {
        let n = self.num_variables() as usize;
        let bits: Vec<bool> = measurement.chars().rev().map(|c| c == '1').collect();
        let assignment: Vec<i64> = (0..n)
            .map(|i| {
                let var = i as i64 + 1;
                if bits.get(i).copied().unwrap_or(false) {
                    var
                } else {
                    -var
                }
            })
            .collect();
        let well_formed = measurement.len() == n && measurement.chars().all(|c| c == '0' || c == '1');
        (well_formed && self.cnf.evaluate(&bits), assignment)
    }

    /// Qubit account for the oracle plus diffusion under an MCT mode.
    ///
    /// Variables, one ancilla per clause when there is more than one
    /// clause, the output qubit, and the ancillas of the widest MCT gate.
    pub fn resources(&self, mode: MctMode) -> CircuitResources {
        let vars = self.num_variables();
        let clauses = self.cnf.num_clauses();
        let clause_ancillas = if clauses > 1 { clauses as u32 } else { 0 };

        let widest = [
            self.cnf.max_clause_width(),
            if clauses > 1 { clauses } else { 0 },
            (vars as usize).saturating_sub(1),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        let mct = mode.ancillas(widest);

        let ancillae = clause_ancillas + 1 + mct;
        CircuitResources::new(vars + ancillae, ancillae)
    }
}
