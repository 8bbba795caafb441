//! Assessment report and reporting sinks

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::check::{CheckResult, Verdict};

/// Receives every verdict as soon as it is recorded
pub trait ReportSink {
    /// Called exactly once per check, in run order
    fn record(&mut self, result: &CheckResult);
}

impl ReportSink for Vec<CheckResult> {
    fn record(&mut self, result: &CheckResult) {
        self.push(result.clone());
    }
}

/// Sink that writes one log line per verdict
#[derive(Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn record(&mut self, result: &CheckResult) {
        match &result.verdict {
            Verdict::Pass => info!("{} passed ({} ms)", result.id, result.duration_ms),
            Verdict::Skip { reason } => info!("{} skipped: {}", result.id, reason),
            Verdict::Fail { detail } => warn!("{} failed: {}", result.id, detail),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Checks that passed
    pub passed: u32,
    /// Checks that failed
    pub failed: u32,
    /// Checks that were skipped
    pub skipped: u32,
    /// All checks
    pub total: u32,
}

/// Every verdict of one run, in run order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Assignment name
    pub assignment: String,

    /// Schema that was assessed
    pub schema: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub duration_ms: u64,

    /// Recorded results
    pub results: Vec<CheckResult>,
}

impl AssessmentReport {
    /// Create an empty report
    pub fn new(assignment: &str, schema: &str) -> Self {
        AssessmentReport {
            assignment: assignment.to_string(),
            schema: schema.to_string(),
            started_at: Utc::now(),
            duration_ms: 0,
            results: Vec::new(),
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for result in &self.results {
            summary.total += 1;
            match result.verdict {
                Verdict::Pass => summary.passed += 1,
                Verdict::Fail { .. } => summary.failed += 1,
                Verdict::Skip { .. } => summary.skipped += 1,
            }
        }
        summary
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(CheckResult::failed)
    }

    /// Look up a result by check id
    pub fn result(&self, id: &str) -> Option<&CheckResult> {
        self.results.iter().find(|result| result.id == id)
    }

    /// Check ids with their verdicts, without timing information
    pub fn verdicts(&self) -> Vec<(String, Verdict)> {
        self.results
            .iter()
            .map(|result| (result.id.clone(), result.verdict.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, verdict: Verdict) -> CheckResult {
        CheckResult {
            id: id.to_string(),
            description: String::new(),
            verdict,
            duration_ms: 3,
        }
    }

    #[test]
    fn test_summary() {
        let mut report = AssessmentReport::new("LibraryDB", "LibraryDB");
        report.results.push(result("a", Verdict::Pass));
        report.results.push(result("b", Verdict::Fail { detail: "x".into() }));
        report.results.push(result("c", Verdict::Skip { reason: "y".into() }));
        report.results.push(result("d", Verdict::Pass));

        let summary = report.summary();
        assert_eq!(summary, ReportSummary { passed: 2, failed: 1, skipped: 1, total: 4 });
        assert!(report.has_failures());
        assert!(report.result("b").unwrap().failed());
        assert!(report.result("z").is_none());
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<CheckResult> = Vec::new();
        sink.record(&result("first", Verdict::Pass));
        sink.record(&result("second", Verdict::Pass));
        let ids: Vec<&str> = sink.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
