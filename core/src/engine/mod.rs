//! Assessment engine
//!
//! Runs the ordered battery of checks described by an [`Assignment`] against a
//! [`DatabaseProbe`]. Every check produces exactly one [`CheckResult`]; an
//! error inside a check is converted to a verdict for that check only and the
//! run continues, so a partially broken submission still gets a complete
//! report card.

pub mod check;
pub mod checks;
pub mod report;

use std::time::Instant;

use log::{debug, info};

use crate::assignment::Assignment;
use crate::config::{AssessmentOptions, DeepCheckPolicy};
use crate::error::{AssessmentError, Result};
use crate::probe::DatabaseProbe;

pub use check::{CheckKind, CheckResult, PlannedCheck, Verdict};
pub use report::{AssessmentReport, LogSink, ReportSink, ReportSummary};

/// Runs an assignment's checks over one probe
pub struct AssessmentEngine<'a, P: DatabaseProbe + ?Sized> {
    /// Open connection to the graded database
    probe: &'a mut P,

    /// Expected state
    assignment: &'a Assignment,

    /// Run options
    options: &'a AssessmentOptions,
}

impl<'a, P: DatabaseProbe + ?Sized> AssessmentEngine<'a, P> {
    /// Create an engine for one run context
    pub fn new(probe: &'a mut P, assignment: &'a Assignment, options: &'a AssessmentOptions) -> Self {
        Self {
            probe,
            assignment,
            options,
        }
    }

    /// The checks of a run, in execution order
    pub fn plan(&self) -> Vec<PlannedCheck> {
        let mut plan = vec![
            planned(check::CONNECTIVITY, "database connection is open", CheckKind::Connectivity),
            planned(
                check::DATABASE_EXISTS,
                &format!("schema {} exists", self.assignment.schema.name),
                CheckKind::SchemaExists,
            ),
            planned(check::TABLES_EXIST, "all required tables exist", CheckKind::TablesExist),
            planned(check::SEED_DATA, "seed data matches expected rows", CheckKind::SeedData),
            planned(
                check::PROCEDURES_EXIST,
                "all required stored procedures exist",
                CheckKind::ProceduresExist,
            ),
        ];

        for proc in &self.assignment.procedures {
            let mut check = planned(
                &proc.execution_check_id(),
                &format!("{} executes without error", proc.name),
                CheckKind::Executes(proc.name.clone()),
            );
            check.skip_reason = self.optional_skip_reason(&proc.name);
            plan.push(check);
        }

        for proc in &self.assignment.procedures {
            let mut check = planned(
                &proc.content_check_id(),
                &format!("{} contains required SQL", proc.name),
                CheckKind::Content(proc.name.clone()),
            );
            check.skip_reason = self.optional_skip_reason(&proc.name);
            plan.push(check);
        }

        for (index, deep) in self.assignment.deep_checks.iter().enumerate() {
            let mut check = planned(
                &deep.id,
                &format!("{} returns expected values", deep.procedure),
                CheckKind::Deep(index),
            );
            check.skip_reason = if !self.options.deep_checks {
                Some("deep checks disabled".to_string())
            } else {
                self.optional_skip_reason(&deep.procedure)
            };
            plan.push(check);
        }

        for check in &mut plan {
            if check.skip_reason.is_none() && !self.options.is_selected(&check.id) {
                check.skip_reason = Some("not selected for this run".to_string());
            }
        }

        plan
    }

    fn optional_skip_reason(&self, procedure: &str) -> Option<String> {
        let optional = self
            .assignment
            .procedure(procedure)
            .map(|proc| !proc.required)
            .unwrap_or(false);
        if optional && !self.options.include_optional {
            Some(format!("{} is optional and not included", procedure))
        } else {
            None
        }
    }

    /// Run every planned check, handing each result to `sink` as it is
    /// recorded.
    ///
    /// Fails before any check runs when `only` or `exclude` names an unknown
    /// check, since a mistyped filter would otherwise skip everything.
    pub async fn run(&mut self, sink: &mut dyn ReportSink) -> Result<AssessmentReport> {
        self.options
            .validate_selection(&self.assignment.check_ids())?;

        let start = Instant::now();
        let mut report = AssessmentReport::new(&self.assignment.name, &self.assignment.schema.name);
        info!(
            "Assessing {} against schema {}",
            self.assignment.name, self.assignment.schema.name
        );

        for planned in self.plan() {
            let result = self.run_check(&planned).await;
            sink.record(&result);
            report.results.push(result);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        let summary = report.summary();
        info!(
            "Assessment finished: {} passed, {} failed, {} skipped",
            summary.passed, summary.failed, summary.skipped
        );
        Ok(report)
    }

    /// Evaluate one check inside its failure boundary
    pub async fn run_check(&mut self, planned: &PlannedCheck) -> CheckResult {
        if let Some(reason) = &planned.skip_reason {
            return CheckResult {
                id: planned.id.clone(),
                description: planned.description.clone(),
                verdict: Verdict::Skip {
                    reason: reason.clone(),
                },
                duration_ms: 0,
            };
        }

        debug!("Running check {}", planned.id);
        let start = Instant::now();
        let outcome = self.evaluate(&planned.kind).await;
        CheckResult {
            id: planned.id.clone(),
            description: planned.description.clone(),
            verdict: self.verdict_for(&planned.kind, outcome),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn verdict_for(&self, kind: &CheckKind, outcome: Result<()>) -> Verdict {
        match outcome {
            Ok(()) => Verdict::Pass,
            Err(err)
                if kind.is_deep()
                    && self.options.deep_check_policy == DeepCheckPolicy::Skip
                    && err.is_inapplicable() =>
            {
                Verdict::Skip {
                    reason: err.to_string(),
                }
            }
            Err(err) => Verdict::Fail {
                detail: err.to_string(),
            },
        }
    }

    async fn evaluate(&mut self, kind: &CheckKind) -> Result<()> {
        let schema = self.assignment.schema.name.as_str();
        match kind {
            CheckKind::Connectivity => checks::connectivity(self.probe).await,
            CheckKind::SchemaExists => checks::schema_exists(self.probe, schema).await,
            CheckKind::TablesExist => {
                checks::tables_exist(self.probe, schema, &self.assignment.tables).await
            }
            CheckKind::SeedData => {
                checks::seed_data(self.probe, schema, &self.assignment.tables).await
            }
            CheckKind::ProceduresExist => {
                let procedures = self
                    .assignment
                    .procedures_in_scope(self.options.include_optional);
                checks::procedures_exist(self.probe, schema, procedures).await
            }
            CheckKind::Executes(name) => {
                let proc = self.lookup_procedure(name)?;
                checks::executes(self.probe, schema, proc).await
            }
            CheckKind::Content(name) => {
                let proc = self.lookup_procedure(name)?;
                checks::content(self.probe, schema, proc).await
            }
            CheckKind::Deep(index) => {
                let deep = self.assignment.deep_checks.get(*index).ok_or_else(|| {
                    AssessmentError::Config(format!("no deep check at position {}", index))
                })?;
                let proc = self.lookup_procedure(&deep.procedure)?;
                checks::deep(self.probe, schema, deep, proc).await
            }
        }
    }

    fn lookup_procedure(&self, name: &str) -> Result<&'a crate::models::ExpectedProcedure> {
        let assignment: &'a Assignment = self.assignment;
        assignment
            .procedure(name)
            .ok_or_else(|| AssessmentError::Config(format!("unknown procedure {}", name)))
    }
}

fn planned(id: &str, description: &str, kind: CheckKind) -> PlannedCheck {
    PlannedCheck {
        id: id.to_string(),
        description: description.to_string(),
        kind,
        skip_reason: None,
    }
}
