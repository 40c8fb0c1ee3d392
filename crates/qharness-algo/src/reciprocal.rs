//! Controlled rotation by the reciprocal of the estimated eigenvalue.
//!
//! For each clock value the flag qubit is rotated so that its `|1⟩`
//! amplitude is proportional to `1/λ̃`. The proportionality constant is
//! the [`Reciprocal::gain`]; the solver divides it back out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::eigs::{EigsQpe, signed_clock};
use crate::error::{AlgoError, AlgoResult};

/// How the reciprocal is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReciprocalMode {
    /// Exact arcsine rotation per clock value.
    #[default]
    Lookup,
    /// Fixed-point reciprocal, rotation angle linear in it.
    LongDivision,
}

impl fmt::Display for ReciprocalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReciprocalMode::Lookup => f.write_str("lookup"),
            ReciprocalMode::LongDivision => f.write_str("long_division"),
        }
    }
}

impl FromStr for ReciprocalMode {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lookup" => Ok(ReciprocalMode::Lookup),
            "long_division" => Ok(ReciprocalMode::LongDivision),
            other => Err(AlgoError::InvalidParameter(format!(
                "unknown reciprocal mode '{other}'"
            ))),
        }
    }
}

/// Options for the reciprocal stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciprocalOptions {
    /// Computation strategy.
    pub mode: ReciprocalMode,
    /// Read the clock as two's complement.
    pub negative_evals: bool,
    /// Rotation scale; 0 picks the mode's default.
    pub scale: f64,
    /// Fractional bits of the long-division result; defaults to the clock size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl Default for ReciprocalOptions {
    fn default() -> Self {
        Self {
            mode: ReciprocalMode::Lookup,
            negative_evals: false,
            scale: 0.0,
            precision: None,
        }
    }
}

impl ReciprocalOptions {
    /// Set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ReciprocalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable negative-eigenvalue mode.
    #[must_use]
    pub fn with_negative_evals(mut self, negative: bool) -> Self {
        self.negative_evals = negative;
        self
    }

    /// Set the rotation scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the long-division precision.
    #[must_use]
    pub fn with_precision(mut self, bits: u32) -> Self {
        self.precision = Some(bits);
        self
    }

    /// Check the options on their own.
    pub fn validate(&self) -> AlgoResult<()> {
        if !(self.scale.is_finite() && self.scale >= 0.0) {
            return Err(AlgoError::InvalidParameter(format!(
                "scale must be non-negative, got {}",
                self.scale
            )));
        }
        if let Some(p) = self.precision {
            if !(1..=32).contains(&p) {
                return Err(AlgoError::InvalidParameter(format!(
                    "precision must be in 1..=32, got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// Reciprocal rotation bound to one eigenvalue-estimation stage.
#[derive(Debug, Clone)]
pub struct Reciprocal {
    options: ReciprocalOptions,
    clock_qubits: u32,
    unit: f64,
}

impl Reciprocal {
    /// Bind the options to the clock of `eigs`.
    ///
    /// The clock is decoded with this stage's own negative flag.
    pub fn new(options: ReciprocalOptions, eigs: &EigsQpe) -> AlgoResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            clock_qubits: eigs.options().num_ancillae,
            unit: eigs.eigenvalue_unit(),
        })
    }

    /// The options in effect.
    pub fn options(&self) -> &ReciprocalOptions {
        &self.options
    }

    /// Scale actually used.
    pub fn effective_scale(&self) -> f64 {
        match self.options.mode {
            ReciprocalMode::Lookup if self.options.scale > 0.0 => self.options.scale,
            ReciprocalMode::Lookup => self.unit,
            ReciprocalMode::LongDivision if self.options.scale > 0.0 => self.options.scale,
            ReciprocalMode::LongDivision => 1.0,
        }
    }

    /// Fractional bits used by long division.
    pub fn precision(&self) -> u32 {
        self.options.precision.unwrap_or(self.clock_qubits)
    }

    /// Proportionality constant between rotation amplitude and `1/λ̃`.
    pub fn gain(&self) -> f64 {
        match self.options.mode {
            ReciprocalMode::Lookup => self.effective_scale(),
            ReciprocalMode::LongDivision => self.effective_scale() * self.unit,
        }
    }

    /// Amplitude of the flag's `|1⟩` branch for clock value `k`.
    pub fn amplitude(&self, k: usize) -> f64 {
        let s = signed_clock(k, self.clock_qubits, self.options.negative_evals);
        if s == 0 {
            return 0.0;
        }
        match self.options.mode {
            ReciprocalMode::Lookup => {
                let lambda = s as f64 * self.unit;
                (self.effective_scale() / lambda).clamp(-1.0, 1.0)
            }
            ReciprocalMode::LongDivision => {
                let p = self.precision();
                let one = 1u64 << p;
                let quotient = one / s.unsigned_abs();
                let angle = self.effective_scale() * quotient as f64 / one as f64;
                s.signum() as f64 * angle.sin()
            }
        }
    }

    /// Extra ancillas of the reciprocal circuit.
    pub fn extra_ancillae(&self) -> u32 {
        match self.options.mode {
            ReciprocalMode::Lookup => 0,
            ReciprocalMode::LongDivision => self.precision() + 1,
        }
    }
}
