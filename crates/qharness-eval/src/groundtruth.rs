//! Ground truth from a SAT instance header.
//!
//! The first line of an instance file lists its satisfying assignments:
//!
//! ```text
//! c This instance has solutions: -1 -2 -3 0, 1 -2 3 0, 1 2 -3 0
//! ```
//!
//! Each assignment becomes a bitstring with variable 1 as the rightmost
//! character, matching how backends print measurement outcomes. A header
//! whose marker is followed by nothing means the instance is unsatisfiable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GroundTruthError;

const PLURAL_MARKER: &str = "solutions:";
const SINGULAR_MARKER: &str = "solution:";

/// Expected satisfying assignments of a SAT instance.
///
/// Stored as bitstrings; the single empty string is the "no satisfying
/// assignment" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruth {
    assignments: Vec<String>,
}

impl GroundTruth {
    /// Ground truth of an unsatisfiable instance.
    pub fn unsatisfiable() -> Self {
        Self {
            assignments: vec![String::new()],
        }
    }

    /// True if the instance has no satisfying assignment.
    pub fn is_unsatisfiable(&self) -> bool {
        self.assignments.len() == 1 && self.assignments[0].is_empty()
    }

    /// True if `bitstring` is one of the expected assignments.
    pub fn contains(&self, bitstring: &str) -> bool {
        !self.is_unsatisfiable() && self.assignments.iter().any(|a| a == bitstring)
    }

    /// Expected assignments in header order (the sentinel for none).
    pub fn assignments(&self) -> &[String] {
        &self.assignments
    }

    /// Number of expected solutions.
    pub fn num_solutions(&self) -> usize {
        if self.is_unsatisfiable() {
            0
        } else {
            self.assignments.len()
        }
    }
}

impl fmt::Display for GroundTruth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unsatisfiable() {
            f.write_str("unsatisfiable")
        } else {
            write!(f, "{{{}}}", self.assignments.join(", "))
        }
    }
}

/// Extract the ground truth from the first line of an instance file.
pub fn parse_ground_truth(text: &str) -> Result<GroundTruth, GroundTruthError> {
    let header = text.lines().next().unwrap_or_default();
    let marker = if header.contains(PLURAL_MARKER) {
        PLURAL_MARKER
    } else if header.contains(SINGULAR_MARKER) {
        SINGULAR_MARKER
    } else {
        return Err(GroundTruthError::MissingGroundTruth);
    };
    let listed = header
        .rsplit_once(marker)
        .map_or("", |(_, rest)| rest);

    let entries = listed
        .split(',')
        .map(parse_assignment)
        .collect::<Result<Vec<_>, _>>()?;

    let empty = entries.iter().filter(|e| e.is_empty()).count();
    if empty == entries.len() {
        return Ok(GroundTruth::unsatisfiable());
    }
    if empty > 0 {
        return Err(GroundTruthError::EmptyAssignment);
    }
    Ok(GroundTruth {
        assignments: entries,
    })
}

/// One comma-separated assignment to a bitstring.
fn parse_assignment(entry: &str) -> Result<String, GroundTruthError> {
    let mut literals = Vec::new();
    for token in entry.split_whitespace() {
        let lit: i64 = token.parse().map_err(|_| GroundTruthError::InvalidLiteral {
            token: token.to_string(),
        })?;
        if lit != 0 {
            literals.push(lit);
        }
    }
    literals.sort_by_key(|l| l.unsigned_abs());

    let contiguous = literals
        .iter()
        .enumerate()
        .all(|(i, l)| l.unsigned_abs() == i as u64 + 1);
    if !contiguous {
        return Err(GroundTruthError::NonContiguousAssignment {
            assignment: entry.trim().to_string(),
        });
    }

    Ok(literals
        .iter()
        .rev()
        .map(|l| if *l > 0 { '1' } else { '0' })
        .collect())
}
