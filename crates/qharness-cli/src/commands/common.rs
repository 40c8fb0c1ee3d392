//! Output helpers shared by the commands.

use console::{StyledObject, style};

use qharness_eval::{CaseReport, Evaluation, SuiteReport, Verdict};

/// Colored verdict label.
pub fn verdict_label(verdict: &Verdict) -> StyledObject<&'static str> {
    let label = style(verdict.label()).bold();
    match verdict {
        Verdict::Pass => label.green(),
        Verdict::Fail { .. } | Verdict::Error { .. } => label.red(),
        Verdict::Skip { .. } => label.yellow(),
    }
}

/// One line per case.
pub fn case_line(case: &CaseReport) -> String {
    let detail = match &case.verdict {
        Verdict::Pass => String::new(),
        Verdict::Fail { reason } => format!(" {}", style(reason).dim()),
        Verdict::Error { message } => format!(" {}", style(message).dim()),
        Verdict::Skip { reason } => format!(" {}", style(reason).dim()),
    };
    format!(
        "  {:5} {} ({} ms){detail}",
        verdict_label(&case.verdict),
        case.name,
        case.duration_ms
    )
}

/// Print the details of a single run.
pub fn print_evaluation(evaluation: &Evaluation) {
    let result = &evaluation.result;
    println!("{}", style("Result").bold().underlined());
    if let Some(top) = &result.top_measurement {
        println!("  Top measurement:  {top}");
    }
    if let Some(valid) = result.oracle_evaluation {
        println!("  Oracle:           {valid}");
    }
    if !result.rounds.is_empty() {
        let rounds: Vec<String> = result.rounds.iter().map(u32::to_string).collect();
        println!("  Rounds:           {}", rounds.join(", "));
    }
    if let Some(solution) = &result.solution {
        let entries: Vec<String> = solution
            .iter()
            .map(|z| format!("{:.6}{:+.6}i", z.re, z.im))
            .collect();
        println!("  Solution:         [{}]", entries.join(", "));
    }
    if let (Some(fid), Some(tol)) = (result.fidelity, result.tolerance) {
        println!("  Fidelity:         {fid:.6} (needs {tol})");
    }
    println!("  Probability:      {:.6}", result.probability);
    println!(
        "  Qubits:           {} ({} ancillae)",
        result.resources.num_qubits, result.resources.num_ancillae
    );
    println!();
    println!("  Verdict:          {}", verdict_label(&evaluation.verdict));
    if let Verdict::Fail { reason } = &evaluation.verdict {
        println!("  Reason:           {reason}");
    }
}

/// Print the verdict counts.
pub fn print_summary(report: &SuiteReport) {
    let s = &report.summary;
    eprintln!();
    eprintln!("{}", style("Suite Summary").bold().underlined());
    eprintln!(
        "  {} passed, {} failed, {} errors, {} skipped ({} total)",
        style(s.passed).green(),
        style(s.failed).red(),
        style(s.errors).red(),
        style(s.skipped).yellow(),
        s.total
    );
}
