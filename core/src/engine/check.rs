//! Check identities and verdicts

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection is open
pub const CONNECTIVITY: &str = "testDBConnection";
/// Target schema exists
pub const DATABASE_EXISTS: &str = "testDatabaseExists";
/// Every required table exists
pub const TABLES_EXIST: &str = "testTableExists";
/// Row counts and seed rows match
pub const SEED_DATA: &str = "testSeedDataExists";
/// Every required procedure exists
pub const PROCEDURES_EXIST: &str = "testProcedureExists";

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    /// Check passed
    Pass,

    /// Check failed
    Fail {
        /// Human-readable explanation
        detail: String,
    },

    /// Check did not apply to this run or this submission
    Skip {
        /// Why the check was skipped
        reason: String,
    },
}

impl Verdict {
    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail { .. } => "FAIL",
            Verdict::Skip { .. } => "SKIP",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail { detail } => write!(f, "FAIL: {}", detail),
            Verdict::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// Recorded outcome of one check. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check identifier
    pub id: String,

    /// What the check verifies
    pub description: String,

    /// Verdict
    pub verdict: Verdict,

    /// Time spent evaluating the check
    pub duration_ms: u64,
}

impl CheckResult {
    /// Whether the check passed
    pub fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    /// Whether the check failed
    pub fn failed(&self) -> bool {
        matches!(self.verdict, Verdict::Fail { .. })
    }

    /// Whether the check was skipped
    pub fn skipped(&self) -> bool {
        matches!(self.verdict, Verdict::Skip { .. })
    }
}

/// What a planned check evaluates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    /// Connection is open
    Connectivity,
    /// Schema exists
    SchemaExists,
    /// All tables exist
    TablesExist,
    /// Seed rows and counts
    SeedData,
    /// All procedures in scope exist
    ProceduresExist,
    /// One procedure executes cleanly
    Executes(String),
    /// One procedure's definition contains its required fragments
    Content(String),
    /// Value-level check, by index into the assignment's deep checks
    Deep(usize),
}

impl CheckKind {
    /// Whether errors from this check fall under the deep-check policy
    pub fn is_deep(&self) -> bool {
        matches!(self, CheckKind::Deep(_))
    }
}

/// A check in the run order, with an optional reason not to evaluate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCheck {
    /// Check identifier
    pub id: String,

    /// What the check verifies
    pub description: String,

    /// What to evaluate
    pub kind: CheckKind,

    /// Set when the check is reported as skipped without evaluation
    pub skip_reason: Option<String>,
}
