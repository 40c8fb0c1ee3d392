//! DIMACS CNF parsing, evaluation and minimization.
//!
//! ```text
//! c comment lines start with 'c'
//! p cnf <variables> <clauses>
//! 1 -2 3 0
//! -1 2 0
//! ```
//!
//! Literals are signed variable indices starting at 1; `0` ends a clause
//! and a clause may span several lines. A line starting with `%` ends the
//! input.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AlgoError, AlgoResult};

/// Widest formula whose truth table is enumerated.
pub const MAX_VARIABLES: u32 = 24;

/// A formula in conjunctive normal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cnf {
    num_variables: u32,
    clauses: Vec<Vec<i64>>,
}

fn dimacs_err(line: usize, message: impl Into<String>) -> AlgoError {
    AlgoError::Dimacs {
        line,
        message: message.into(),
    }
}

impl Cnf {
    /// Create a formula from clauses over `num_variables` variables.
    pub fn new(num_variables: u32, clauses: Vec<Vec<i64>>) -> AlgoResult<Self> {
        for clause in &clauses {
            if let Some(&lit) = clause
                .iter()
                .find(|l| **l == 0 || l.unsigned_abs() > u64::from(num_variables))
            {
                return Err(AlgoError::InvalidParameter(format!(
                    "literal {lit} out of range for {num_variables} variables"
                )));
            }
        }
        Ok(Self {
            num_variables,
            clauses,
        })
    }

    /// Parse DIMACS text.
    pub fn parse(text: &str) -> AlgoResult<Self> {
        let mut header: Option<(u32, usize)> = None;
        let mut clauses = Vec::new();
        let mut current: Vec<i64> = Vec::new();
        let mut last_line = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if line.starts_with('%') {
                break;
            }
            if line.starts_with('p') {
                if header.is_some() {
                    return Err(dimacs_err(line_no, "duplicate problem line"));
                }
                header = Some(parse_problem_line(line, line_no)?);
                continue;
            }

            let Some((num_vars, _)) = header else {
                return Err(dimacs_err(line_no, "clause before problem line"));
            };
            for token in line.split_whitespace() {
                let lit: i64 = token
                    .parse()
                    .map_err(|_| dimacs_err(line_no, format!("invalid literal '{token}'")))?;
                if lit == 0 {
                    clauses.push(std::mem::take(&mut current));
                } else if lit.unsigned_abs() > u64::from(num_vars) {
                    return Err(dimacs_err(
                        line_no,
                        format!("literal {lit} out of range for {num_vars} variables"),
                    ));
                } else {
                    current.push(lit);
                }
            }
        }

        let Some((num_variables, num_clauses)) = header else {
            return Err(dimacs_err(last_line.max(1), "missing problem line"));
        };
        if !current.is_empty() {
            return Err(dimacs_err(last_line, "unterminated clause"));
        }
        if clauses.len() != num_clauses {
            return Err(dimacs_err(
                last_line,
                format!(
                    "problem line declares {num_clauses} clauses, found {}",
                    clauses.len()
                ),
            ));
        }

        debug!(num_variables, num_clauses, "parsed DIMACS formula");
        Ok(Self {
            num_variables,
            clauses,
        })
    }

    /// Number of declared variables.
    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    /// The clauses as signed literals.
    pub fn clauses(&self) -> &[Vec<i64>] {
        &self.clauses
    }

    /// Number of clauses.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Width of the widest clause.
    pub fn max_clause_width(&self) -> usize {
        self.clauses.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Evaluate under an assignment; `assignment[i]` is variable `i + 1`.
    ///
    /// Variables beyond the end of `assignment` count as false.
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                let value = assignment
                    .get(lit.unsigned_abs() as usize - 1)
                    .copied()
                    .unwrap_or(false);
                value == (lit > 0)
            })
        })
    }

    /// Evaluate under a basis-state index; bit `i` is variable `i + 1`.
    pub fn evaluate_index(&self, index: usize) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                let bit = (index >> (lit.unsigned_abs() - 1)) & 1 == 1;
                bit == (lit > 0)
            })
        })
    }

    /// Truth table over all `2^n` assignments, indexed by basis state.
    pub fn truth_table(&self) -> AlgoResult<Vec<bool>> {
        if self.num_variables > MAX_VARIABLES {
            return Err(AlgoError::TooLarge(format!(
                "{} variables exceed the enumeration limit of {MAX_VARIABLES}",
                self.num_variables
            )));
        }
        Ok((0..1usize << self.num_variables)
            .map(|i| self.evaluate_index(i))
            .collect())
    }

    /// Indices of all satisfying assignments.
    pub fn satisfying_assignments(&self) -> AlgoResult<Vec<usize>> {
        Ok(self
            .truth_table()?
            .into_iter()
            .enumerate()
            .filter_map(|(i, sat)| sat.then_some(i))
            .collect())
    }

    /// Two-level minimization preserving the truth table.
    ///
    /// Drops duplicate literals and tautological clauses, removes duplicate
    /// and subsumed clauses, and merges pairs that differ in the sign of a
    /// single literal, repeating until nothing changes.
    pub fn minimize(&self) -> Cnf {
        let mut set: BTreeSet<BTreeSet<i64>> = BTreeSet::new();
        for clause in &self.clauses {
            let lits: BTreeSet<i64> = clause.iter().copied().collect();
            if lits.iter().any(|l| lits.contains(&-l)) {
                continue;
            }
            set.insert(lits);
        }

        loop {
            let before = set.clone();
            if set.iter().any(BTreeSet::is_empty) {
                set = BTreeSet::from([BTreeSet::new()]);
                break;
            }
            set = remove_subsumed(set);
            set = merge_resolvable(set);
            if set == before {
                break;
            }
        }

        let clauses: Vec<Vec<i64>> = set
            .into_iter()
            .map(|c| {
                let mut v: Vec<i64> = c.into_iter().collect();
                v.sort_by_key(|l| (l.unsigned_abs(), *l < 0));
                v
            })
            .collect();

        debug!(
            before = self.clauses.len(),
            after = clauses.len(),
            "minimized CNF"
        );
        Cnf {
            num_variables: self.num_variables,
            clauses,
        }
    }

    /// Render as DIMACS text.
    pub fn to_dimacs(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_variables, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

fn parse_problem_line(line: &str, line_no: usize) -> AlgoResult<(u32, usize)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let vars = vars
                .parse()
                .map_err(|_| dimacs_err(line_no, format!("invalid variable count '{vars}'")))?;
            let clauses = clauses
                .parse()
                .map_err(|_| dimacs_err(line_no, format!("invalid clause count '{clauses}'")))?;
            Ok((vars, clauses))
        }
        _ => Err(dimacs_err(line_no, format!("malformed problem line '{line}'"))),
    }
}

/// Drop every clause that is a strict superset of another clause.
fn remove_subsumed(set: BTreeSet<BTreeSet<i64>>) -> BTreeSet<BTreeSet<i64>> {
    let clauses: Vec<_> = set.into_iter().collect();
    clauses
        .iter()
        .filter(|c| {
            !clauses
                .iter()
                .any(|d| d.len() < c.len() && d.is_subset(c))
        })
        .cloned()
        .collect()
}

/// Replace `(A ∨ x) ∧ (A ∨ ¬x)` with `A`.
fn merge_resolvable(set: BTreeSet<BTreeSet<i64>>) -> BTreeSet<BTreeSet<i64>> {
    let clauses: Vec<_> = set.iter().cloned().collect();
    for (i, c) in clauses.iter().enumerate() {
        for d in &clauses[i + 1..] {
            if c.len() != d.len() {
                continue;
            }
            let only_c: Vec<i64> = c.difference(d).copied().collect();
            let only_d: Vec<i64> = d.difference(c).copied().collect();
            if let ([x], [y]) = (only_c.as_slice(), only_d.as_slice()) {
                if *x == -*y {
                    let mut next = set.clone();
                    next.remove(c);
                    next.remove(d);
                    let mut merged = c.clone();
                    merged.remove(x);
                    next.insert(merged);
                    return next;
                }
            }
        }
    }
    set
}
