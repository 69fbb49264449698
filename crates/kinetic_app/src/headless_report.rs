//! Report output model for headless scenario runs.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path};

/// Report status for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// The step that stopped a run, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    #[serde(rename = "failed_step_index")]
    pub step_index: usize,
    pub assertion: String,
    pub message: String,
}

impl StepFailure {
    pub fn new(step_index: usize, assertion: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step_index,
            assertion: assertion.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({}): {}", self.step_index, self.assertion, self.message)
    }
}

/// Machine-readable result of a headless run.
///
/// Failure fields are flattened into the top level and left out of passing
/// reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    pub status: ReportStatus,
    #[serde(flatten)]
    pub failure: Option<StepFailure>,
    pub steps_run: usize,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
}

impl HeadlessReport {
    pub fn passed(steps_run: usize, elapsed_frames: u64, elapsed_ms: u64) -> Self {
        Self {
            scenario: None,
            status: ReportStatus::Passed,
            failure: None,
            steps_run,
            elapsed_frames,
            elapsed_ms,
        }
    }

    /// The failing step counts as run.
    pub fn failed(failure: StepFailure, elapsed_frames: u64, elapsed_ms: u64) -> Self {
        Self {
            scenario: None,
            status: ReportStatus::Failed,
            steps_run: failure.step_index + 1,
            failure: Some(failure),
            elapsed_frames,
            elapsed_ms,
        }
    }

    pub fn with_scenario(self, scenario: Option<String>) -> Self {
        Self { scenario, ..self }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    pub fn failure(&self) -> Option<&StepFailure> {
        self.failure.as_ref()
    }

    /// Write pretty JSON to a path under the working directory.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let path = contained(path)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to_writer(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Write pretty JSON followed by a newline.
    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Reject paths that could land outside the working directory.
fn contained(path: &Path) -> Result<&Path> {
    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {
                bail!("report path {} must be relative", path.display())
            }
            Component::ParentDir => {
                bail!("report path {} must not contain '..'", path.display())
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_escaping_paths() {
        let report = HeadlessReport::passed(3, 10, 160);
        assert!(report.write_to_path(Path::new("/tmp/report.json")).is_err());
        assert!(report.write_to_path(Path::new("../report.json")).is_err());
        assert!(report.write_to_path(Path::new("out/../../report.json")).is_err());
        assert!(contained(Path::new("./out/report.json")).is_ok());
    }

    #[test]
    fn test_failed_report_serializes() {
        let failure = StepFailure::new(4, "assert_range", "drag-box: x = 200");
        let report = HeadlessReport::failed(failure.clone(), 30, 480)
            .with_scenario(Some("drag".to_string()));
        let mut out = Vec::new();
        report.write_to_writer(&mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["failed_step_index"], 4);
        assert_eq!(json["assertion"], "assert_range");

        let parsed: HeadlessReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.status, ReportStatus::Failed);
        assert_eq!(parsed.failure(), Some(&failure));
        assert_eq!(parsed.steps_run, 5);
        assert_eq!(parsed.scenario.as_deref(), Some("drag"));
        assert!(!parsed.is_passed());
        assert_eq!(failure.to_string(), "step 4 (assert_range): drag-box: x = 200");
    }

    #[test]
    fn test_passed_report_omits_failure_fields() {
        let report = HeadlessReport::passed(2, 5, 80);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "passed");
        assert!(json.get("failed_step_index").is_none());
        assert!(json.get("scenario").is_none());

        let parsed: HeadlessReport = serde_json::from_value(json).unwrap();
        assert!(parsed.failure().is_none());
    }
}
