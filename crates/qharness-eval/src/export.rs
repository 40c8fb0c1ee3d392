//! JSON export of suite reports.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};
use crate::report::SuiteReport;

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Serialize a report to a JSON string.
pub fn to_json(report: &SuiteReport, config: &ExportConfig) -> HarnessResult<String> {
    if config.pretty {
        serde_json::to_string_pretty(report).map_err(HarnessError::from)
    } else {
        serde_json::to_string(report).map_err(HarnessError::from)
    }
}

/// Write a report to a JSON file.
pub fn to_file(report: &SuiteReport, path: &Path, config: &ExportConfig) -> HarnessResult<()> {
    let json = to_json(report, config)?;
    std::fs::write(path, json)
        .map_err(|e| HarnessError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CaseReport, Verdict};
    use crate::reproducibility::ReproducibilityInfo;

    #[test]
    fn test_compact_json_is_single_line() {
        let report = SuiteReport::new(
            vec![CaseReport::skipped("a", "not today")],
            ReproducibilityInfo::capture(&[], vec![]),
        );
        let json = to_json(&report, &ExportConfig { pretty: false }).unwrap();
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["skipped"], 1);
        assert_eq!(value["cases"][0]["verdict"]["status"], "skip");
        assert!(matches!(report.cases[0].verdict, Verdict::Skip { .. }));
    }
}
