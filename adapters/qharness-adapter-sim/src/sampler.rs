//! Measurement sampling from a probability vector.

use rand::Rng;

/// Cumulative distribution over basis states.
pub(crate) struct Sampler {
    cumulative: Vec<f64>,
}

impl Sampler {
    /// Build a sampler from (not necessarily normalized) probabilities.
    pub(crate) fn new(probabilities: &[f64]) -> Self {
        let mut acc = 0.0;
        let mut cumulative: Vec<f64> = probabilities
            .iter()
            .map(|p| {
                acc += p.max(0.0);
                acc
            })
            .collect();
        if acc > 0.0 {
            for c in &mut cumulative {
                *c /= acc;
            }
        }
        Self { cumulative }
    }

    /// Draw one basis-state index.
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();
        let idx = self.cumulative.partition_point(|&c| c <= r);
        // Rounding can leave the last cumulative entry just below 1.
        idx.min(self.cumulative.len().saturating_sub(1))
    }
}
