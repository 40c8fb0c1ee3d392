//! Property tests for ground-truth extraction.

use proptest::prelude::*;
use proptest::sample::subsequence;

use qharness_eval::parse_ground_truth;

/// Signed literals for an assignment, in a shuffled order.
fn literals(assignment: &[bool], order: &[usize]) -> Vec<i64> {
    order
        .iter()
        .map(|&i| {
            let var = i as i64 + 1;
            if assignment[i] { var } else { -var }
        })
        .collect()
}

fn shuffled(n: usize) -> impl Strategy<Value = Vec<usize>> {
    Just((0..n).collect::<Vec<_>>()).prop_shuffle()
}

fn assignment_and_order() -> impl Strategy<Value = (Vec<bool>, Vec<usize>)> {
    (1usize..10).prop_flat_map(|n| (prop::collection::vec(any::<bool>(), n), shuffled(n)))
}

proptest! {
    #[test]
    fn variable_one_is_rightmost((assignment, order) in assignment_and_order()) {
        let lits = literals(&assignment, &order);
        let entry: Vec<String> = lits.iter().map(i64::to_string).collect();
        let header = format!("c solution: {} 0\n", entry.join(" "));

        let gt = parse_ground_truth(&header).unwrap();
        let bits: Vec<char> = gt.assignments()[0].chars().collect();
        prop_assert_eq!(bits.len(), assignment.len());
        for (i, value) in assignment.iter().enumerate() {
            let bit = bits[bits.len() - 1 - i];
            prop_assert_eq!(bit == '1', *value);
        }
    }

    #[test]
    fn entries_keep_header_order(
        entries in prop::collection::vec(prop::collection::vec(any::<bool>(), 3), 1..6)
    ) {
        let order = [0, 1, 2];
        let listed: Vec<String> = entries
            .iter()
            .map(|a| {
                let lits: Vec<String> = literals(a, &order).iter().map(i64::to_string).collect();
                format!("{} 0", lits.join(" "))
            })
            .collect();
        let header = format!("c This instance has solutions: {}", listed.join(", "));

        let gt = parse_ground_truth(&header).unwrap();
        prop_assert_eq!(gt.assignments().len(), entries.len());
        for (parsed, a) in gt.assignments().iter().zip(&entries) {
            let expected: String = a.iter().rev().map(|&b| if b { '1' } else { '0' }).collect();
            prop_assert_eq!(parsed, &expected);
        }
    }

    #[test]
    fn skipped_variable_is_rejected(
        vars in subsequence((1i64..=8).collect::<Vec<_>>(), 1..8)
    ) {
        // Any proper subset of 1..=8 that is not a prefix leaves a gap.
        let is_prefix = vars.iter().enumerate().all(|(i, v)| *v == i as i64 + 1);
        prop_assume!(!is_prefix);
        let lits: Vec<String> = vars.iter().map(i64::to_string).collect();
        let header = format!("c solution: {} 0", lits.join(" "));
        prop_assert!(parse_ground_truth(&header).is_err());
    }
}
