//! Report formatters
//!
//! Text for people, JSON for tooling, JUnit XML for CI dashboards.

use assessment_core::engine::ReportSummary;
use assessment_core::{AssessmentReport, Verdict};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON document
    Json,
    /// JUnit XML
    Junit,
}

impl OutputFormat {
    /// Formatter for this format
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter { pretty: true }),
            OutputFormat::Junit => Box::new(JunitFormatter),
        }
    }
}

/// Renders an assessment report
pub trait OutputFormatter {
    /// Render `report` as a string
    fn format(&self, report: &AssessmentReport) -> String;
}

/// Human-readable formatter
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &AssessmentReport) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} assessment of schema {}\n",
            report.assignment, report.schema
        ));
        output.push_str(&format!(
            "Started: {}\n\n",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        for result in &report.results {
            let line = match &result.verdict {
                Verdict::Pass => format!("[PASS] {}: {}", result.id, result.description),
                Verdict::Fail { detail } => {
                    format!("[FAIL] {}: {}\n       {}", result.id, result.description, detail)
                }
                Verdict::Skip { reason } => format!("[SKIP] {}: {}", result.id, reason),
            };
            output.push_str(&line);
            output.push('\n');
        }

        let summary = report.summary();
        output.push_str(&format!(
            "\n{} passed, {} failed, {} skipped ({} checks, {:.1}s)",
            summary.passed,
            summary.failed,
            summary.skipped,
            summary.total,
            report.duration_ms as f64 / 1000.0
        ));
        output
    }
}

/// JSON formatter
pub struct JsonFormatter {
    /// Indent the document
    pub pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a AssessmentReport,
    summary: ReportSummary,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &AssessmentReport) -> String {
        let document = JsonReport {
            report,
            summary: report.summary(),
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        // Every field is a plain string, number or timestamp.
        rendered.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

/// JUnit XML formatter
pub struct JunitFormatter;

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &AssessmentReport) -> String {
        let summary = report.summary();
        let suite = escape_xml(&report.assignment);

        let mut output = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        output.push_str(&format!(
            "<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" skipped=\"{}\" time=\"{:.3}\" timestamp=\"{}\">\n",
            suite,
            summary.total,
            summary.failed,
            summary.skipped,
            report.duration_ms as f64 / 1000.0,
            report.started_at.format("%Y-%m-%dT%H:%M:%S")
        ));

        for result in &report.results {
            output.push_str(&format!(
                "  <testcase classname=\"{}\" name=\"{}\" time=\"{:.3}\"",
                suite,
                escape_xml(&result.id),
                result.duration_ms as f64 / 1000.0
            ));
            match &result.verdict {
                Verdict::Pass => output.push_str("/>\n"),
                Verdict::Fail { detail } => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "    <failure message=\"{}\">{}</failure>\n",
                        escape_xml(&result.description),
                        escape_xml(detail)
                    ));
                    output.push_str("  </testcase>\n");
                }
                Verdict::Skip { reason } => {
                    output.push_str(">\n");
                    output.push_str(&format!("    <skipped message=\"{}\"/>\n", escape_xml(reason)));
                    output.push_str("  </testcase>\n");
                }
            }
        }

        output.push_str("</testsuite>\n");
        output
    }
}
