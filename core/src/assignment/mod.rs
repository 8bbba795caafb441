//! Assignment definitions
//!
//! An [`Assignment`] is the declarative description of a correct submission:
//! the schema, its tables and seed rows, the stored procedures with their
//! content rules, and the optional value-level checks. The engine is driven
//! entirely by this data.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::check;
use crate::error::{to_config_error, AssessmentError, Result};
use crate::models::{DeepCheck, ExpectedProcedure, ExpectedSchema, ExpectedTable};

mod library;

pub use library::library_db;

/// Expected state of a graded database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignment name, used in reports
    pub name: String,

    /// Target schema
    pub schema: ExpectedSchema,

    /// Required tables, in check order
    pub tables: Vec<ExpectedTable>,

    /// Required and optional procedures, in check order
    pub procedures: Vec<ExpectedProcedure>,

    /// Value-level checks of procedure output
    #[serde(default)]
    pub deep_checks: Vec<DeepCheck>,
}

impl Assignment {
    /// Parse an assignment from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let assignment: Assignment = serde_json::from_str(json)?;
        assignment.validate()?;
        Ok(assignment)
    }

    /// Load an assignment from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            to_config_error(format!("cannot read assignment {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Point the assignment at a differently named schema
    pub fn with_schema_name(mut self, name: &str) -> Self {
        self.schema.name = name.to_string();
        self
    }

    /// Procedures assessed in this run
    pub fn procedures_in_scope(&self, include_optional: bool) -> impl Iterator<Item = &ExpectedProcedure> {
        self.procedures
            .iter()
            .filter(move |proc| proc.required || include_optional)
    }

    /// Identifiers of every check a run reports, in run order
    pub fn check_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = [
            check::CONNECTIVITY,
            check::DATABASE_EXISTS,
            check::TABLES_EXIST,
            check::SEED_DATA,
            check::PROCEDURES_EXIST,
        ]
        .iter()
        .map(|id| id.to_string())
        .collect();
        ids.extend(self.procedures.iter().map(ExpectedProcedure::execution_check_id));
        ids.extend(self.procedures.iter().map(ExpectedProcedure::content_check_id));
        ids.extend(self.deep_checks.iter().map(|deep| deep.id.clone()));
        ids
    }

    /// Look up a procedure expectation by name
    pub fn procedure(&self, name: &str) -> Option<&ExpectedProcedure> {
        self.procedures.iter().find(|proc| proc.name == name)
    }

    /// Check internal consistency of the definition
    pub fn validate(&self) -> Result<()> {
        if self.schema.name.trim().is_empty() {
            return Err(AssessmentError::Config("schema name is empty".to_string()));
        }

        let mut tables = HashSet::new();
        for table in &self.tables {
            if !tables.insert(table.name.as_str()) {
                return Err(AssessmentError::Config(format!(
                    "table {} is listed twice",
                    table.name
                )));
            }
            if let Some(row) = table.rows.iter().find(|row| row.fields.is_empty()) {
                return Err(AssessmentError::Config(format!(
                    "table {} has a seed row without fields {}",
                    table.name, row
                )));
            }
        }

        let mut procedures = HashSet::new();
        for proc in &self.procedures {
            if !procedures.insert(proc.name.as_str()) {
                return Err(AssessmentError::Config(format!(
                    "procedure {} is listed twice",
                    proc.name
                )));
            }
        }

        let mut deep_ids = HashSet::new();
        for check in &self.deep_checks {
            if !deep_ids.insert(check.id.as_str()) {
                return Err(AssessmentError::Config(format!(
                    "deep check {} is listed twice",
                    check.id
                )));
            }
            if !procedures.contains(check.procedure.as_str()) {
                return Err(AssessmentError::Config(format!(
                    "deep check {} refers to unknown procedure {}",
                    check.id, check.procedure
                )));
            }
            if check.result_sets.is_empty() {
                return Err(AssessmentError::Config(format!(
                    "deep check {} expects no result sets",
                    check.id
                )));
            }
        }

        Ok(())
    }
}
