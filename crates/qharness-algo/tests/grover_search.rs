//! Grover search across MCT modes, optimization levels and backends.

use qharness_adapter_sim::{QasmBackend, StatevectorBackend};
use qharness_algo::grover::success_probability;
use qharness_algo::{Grover, Iterations, LogicExpressionOracle, MctMode, OracleOptimization};
use qharness_hal::{Backend, RunConfig};

const THREE_SOLUTIONS: &str = "c solutions: -1 -2 -3 0, 1 -2 3 0, 1 2 -3 0
p cnf 3 5
-1 -2 -3 0
1 -2 3 0
1 2 -3 0
1 -2 -3 0
-1 2 3 0
";

const ONE_SOLUTION: &str = "c solution: 1 -2 0
p cnf 2 3
1 2 0
1 -2 0
-1 -2 0
";

const UNSATISFIABLE: &str = "c solution:
p cnf 3 8
1 2 3 0
1 2 -3 0
1 -2 3 0
1 -2 -3 0
-1 2 3 0
-1 2 -3 0
-1 -2 3 0
-1 -2 -3 0
";

fn backends() -> Vec<Box<dyn Backend>> {
    vec![Box::new(StatevectorBackend::new()), Box::new(QasmBackend::new())]
}

fn config() -> RunConfig {
    RunConfig::new(1000).with_max_credits(10).with_memory(false)
}

#[test]
fn test_three_solutions_every_configuration() {
    let expected = ["000", "101", "011"];
    for backend in backends() {
        for opt in OracleOptimization::ALL {
            for mode in MctMode::ALL {
                let oracle = LogicExpressionOracle::from_dimacs(THREE_SOLUTIONS, opt).unwrap();
                let result = Grover::new(oracle, Iterations::Fixed(3))
                    .with_mct_mode(mode)
                    .run(backend.as_ref(), &config())
                    .unwrap();
                assert!(result.oracle_evaluation, "{} {opt} {mode}", backend.name());
                assert!(expected.contains(&result.top_measurement.as_str()));
            }
        }
    }
}

#[test]
fn test_single_solution_one_round() {
    for backend in backends() {
        let oracle = LogicExpressionOracle::from_dimacs(ONE_SOLUTION, OracleOptimization::Off).unwrap();
        let result = Grover::new(oracle, Iterations::Fixed(1))
            .run(backend.as_ref(), &config())
            .unwrap();
        assert!(result.oracle_evaluation);
        assert_eq!(result.top_measurement, "01");
        assert_eq!(result.assignment, vec![1, -2]);
        assert!((result.top_probability - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_unsatisfiable_never_evaluates_true() {
    for backend in backends() {
        for opt in OracleOptimization::ALL {
            for mode in MctMode::ALL {
                let oracle = LogicExpressionOracle::from_dimacs(UNSATISFIABLE, opt).unwrap();
                assert_eq!(oracle.num_marked(), 0);
                let result = Grover::new(oracle, Iterations::Incremental)
                    .with_mct_mode(mode)
                    .run(backend.as_ref(), &config())
                    .unwrap();
                assert!(!result.oracle_evaluation);
                assert!(!result.rounds.is_empty());
            }
        }
    }
}

#[test]
fn test_incremental_finds_solution() {
    let oracle = LogicExpressionOracle::from_dimacs(ONE_SOLUTION, OracleOptimization::Off).unwrap();
    let result = Grover::new(oracle, Iterations::Incremental)
        .run(&StatevectorBackend::new(), &config())
        .unwrap();
    assert!(result.oracle_evaluation);
    assert_eq!(result.top_measurement, "01");
}

#[test]
fn test_incremental_schedule_is_seeded() {
    let run = |seed| {
        let oracle = LogicExpressionOracle::from_dimacs(UNSATISFIABLE, OracleOptimization::Off).unwrap();
        Grover::new(oracle, Iterations::Incremental)
            .with_seed(seed)
            .run(&StatevectorBackend::new(), &config())
            .unwrap()
            .rounds
    };
    assert_eq!(run(5), run(5));
    // Every draw stays within 1..=floor(sqrt(8)).
    assert!(run(5).iter().all(|k| (1..=2).contains(k)));
}

#[test]
fn test_mct_mode_changes_resources_only() {
    let oracle = LogicExpressionOracle::from_dimacs(THREE_SOLUTIONS, OracleOptimization::Off).unwrap();
    let backend = StatevectorBackend::new();
    let results: Vec<_> = MctMode::ALL
        .iter()
        .map(|mode| {
            Grover::new(oracle.clone(), Iterations::Fixed(3))
                .with_mct_mode(*mode)
                .run(&backend, &config())
                .unwrap()
        })
        .collect();
    for r in &results[1..] {
        assert_eq!(r.measurement, results[0].measurement);
    }
    assert!(results[0].resources.num_qubits > results[2].resources.num_qubits);
}

#[test]
fn test_statevector_probability_matches_closed_form() {
    let oracle = LogicExpressionOracle::from_dimacs(THREE_SOLUTIONS, OracleOptimization::Off).unwrap();
    let result = Grover::new(oracle, Iterations::Fixed(3))
        .run(&StatevectorBackend::new(), &config())
        .unwrap();
    let marked: f64 = ["000", "101", "011"]
        .iter()
        .map(|s| result.measurement.get(*s).copied().unwrap_or(0.0))
        .sum();
    assert!((marked - success_probability(3, 3, 3)).abs() < 1e-9);
}
