//! Version and invocation snapshot attached to every suite report.

use serde::{Deserialize, Serialize};

/// Schema version of the report format.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Information for reproducing a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproducibilityInfo {
    /// Harness version used.
    pub harness_version: String,
    /// Command line of the run.
    pub cli_args: Vec<String>,
    /// Schema version of the output format.
    pub schema_version: String,
    /// Names of the backends the runner could create.
    pub backends: Vec<String>,
}

impl ReproducibilityInfo {
    /// Capture the current context.
    pub fn capture(cli_args: &[String], backends: Vec<String>) -> Self {
        Self {
            harness_version: env!("CARGO_PKG_VERSION").to_string(),
            cli_args: cli_args.to_vec(),
            schema_version: SCHEMA_VERSION.into(),
            backends,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility_capture() {
        let args = vec!["qharness".into(), "suite".into(), "--filter".into(), "hhl".into()];
        let info = ReproducibilityInfo::capture(&args, vec!["qasm_simulator".into()]);

        assert!(!info.harness_version.is_empty());
        assert_eq!(info.cli_args.len(), 4);
        assert_eq!(info.schema_version, "0.1.0");
        assert_eq!(info.backends, ["qasm_simulator"]);
    }
}
