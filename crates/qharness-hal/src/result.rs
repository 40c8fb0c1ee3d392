//! Execution results.

use std::collections::BTreeMap;

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Probabilities closer than this are treated as a tie.
const TIE_TOLERANCE: f64 = 1e-12;

/// Measurement counts keyed by bitstring (qubit 0 rightmost).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Observations of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total_shots(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (bitstring, count) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }

    /// Outcomes sorted by count descending, then bitstring ascending.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut v: Vec<_> = self.0.iter().collect();
        v.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    /// The most frequent outcome; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.sorted().first().map(|(k, v)| (*k, **v))
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut counts = Counts::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }
}

/// Result of executing one program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Sampled counts (empty for state-vector backends).
    pub counts: Counts,
    /// Shots executed.
    pub shots: u32,
    /// Width of the measured registers.
    pub num_qubits: u32,
    /// Exact final state, when the backend provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statevector: Option<Vec<Complex64>>,
    /// Per-shot outcomes, when memory was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Vec<String>>,
    /// Wall-clock execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Backend that produced the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl ExecutionResult {
    /// Create a result from counts.
    pub fn new(counts: Counts, shots: u32, num_qubits: u32) -> Self {
        Self {
            counts,
            shots,
            num_qubits,
            statevector: None,
            memory: None,
            execution_time_ms: None,
            backend: None,
        }
    }

    /// Attach the exact final state.
    #[must_use]
    pub fn with_statevector(mut self, statevector: Vec<Complex64>) -> Self {
        self.statevector = Some(statevector);
        self
    }

    /// Attach per-shot memory.
    #[must_use]
    pub fn with_memory(mut self, memory: Vec<String>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Attach the backend name.
    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Outcome distribution.
    ///
    /// Exact probabilities when a statevector is present, relative
    /// frequencies otherwise. Outcomes with zero weight are omitted.
    pub fn distribution(&self) -> BTreeMap<String, f64> {
        match &self.statevector {
            Some(sv) => sv
                .iter()
                .enumerate()
                .map(|(i, a)| (i, a.norm_sqr()))
                .filter(|(_, p)| *p > TIE_TOLERANCE)
                .map(|(i, p)| {
                    (
                        format!("{:0width$b}", i, width = self.num_qubits as usize),
                        p,
                    )
                })
                .collect(),
            None => {
                let total = self.counts.total_shots().max(1) as f64;
                self.counts
                    .iter()
                    .map(|(k, v)| (k.clone(), *v as f64 / total))
                    .collect()
            }
        }
    }

    /// The most likely outcome and its probability.
    ///
    /// Ties (within floating-point noise) go to the smallest bitstring, so
    /// the answer is reproducible for a deterministic backend.
    pub fn most_likely(&self) -> Option<(String, f64)> {
        let mut best: Option<(String, f64)> = None;
        // BTreeMap iterates in ascending bitstring order.
        for (k, p) in self.distribution() {
            match &best {
                Some((_, bp)) if p <= bp + TIE_TOLERANCE => {}
                _ => best = Some((k, p)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("01", 3);
        counts.insert("01", 2);
        counts.insert("10", 1);
        assert_eq!(counts.get("01"), 5);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total_shots(), 6);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent_tie_breaks_on_bitstring() {
        let counts: Counts = [("11".to_string(), 4), ("01".to_string(), 4)]
            .into_iter()
            .collect();
        let (k, v) = counts.most_frequent().unwrap();
        assert_eq!(k, "01");
        assert_eq!(v, 4);
    }

    #[test]
    fn test_distribution_from_statevector() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let result = ExecutionResult::new(Counts::new(), 1, 1).with_statevector(vec![
            Complex64::new(h, 0.0),
            Complex64::new(0.0, h),
        ]);
        let dist = result.distribution();
        assert!((dist["0"] - 0.5).abs() < 1e-12);
        assert!((dist["1"] - 0.5).abs() < 1e-12);
        // Uniform tie resolves to the smallest bitstring.
        assert_eq!(result.most_likely().unwrap().0, "0");
    }

    #[test]
    fn test_distribution_from_counts() {
        let counts: Counts = [("00".to_string(), 750), ("11".to_string(), 250)]
            .into_iter()
            .collect();
        let result = ExecutionResult::new(counts, 1000, 2);
        let (top, p) = result.most_likely().unwrap();
        assert_eq!(top, "00");
        assert!((p - 0.75).abs() < 1e-12);
    }
}
