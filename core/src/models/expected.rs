//! Expected database state
//!
//! These types describe what a correct submission looks like. They are static
//! configuration: built once when an [`Assignment`](crate::Assignment) is
//! created and never mutated while checks run.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::SqlValue;
use crate::sql::quote_identifier;

/// The target schema (database) name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedSchema {
    /// Schema name
    pub name: String,
}

/// One expected column value inside a seed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedField {
    /// Column name (or result-set label)
    pub column: String,

    /// Expected value; `Null` asserts the column IS NULL
    pub value: SqlValue,
}

/// One seed record with exact field values, in column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRow {
    /// Expected fields
    pub fields: Vec<ExpectedField>,
}

impl ExpectedRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expected field
    pub fn with(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.fields.push(ExpectedField {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    /// Add a field that must be NULL
    pub fn with_null(self, column: &str) -> Self {
        self.with(column, SqlValue::Null)
    }
}

impl fmt::Display for ExpectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}={}", field.column, field.value))
            .collect();
        write!(f, "({})", fields.join(", "))
    }
}

/// A table the student must create, with its seed rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedTable {
    /// Table name
    pub name: String,

    /// Seed rows. When non-empty the table must contain exactly these rows;
    /// an empty list leaves the table's data unchecked.
    #[serde(default)]
    pub rows: Vec<ExpectedRow>,
}

impl ExpectedTable {
    /// Create a table expectation without seed rows
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Add a seed row
    pub fn with_row(mut self, row: ExpectedRow) -> Self {
        self.rows.push(row);
        self
    }
}

/// A stored procedure the student must implement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedProcedure {
    /// Routine name
    pub name: String,

    /// Fragments the definition text must contain (case-insensitive)
    #[serde(default)]
    pub required_fragments: Vec<String>,

    /// Optional procedures are only assessed when explicitly included
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ExpectedProcedure {
    /// Create a required procedure expectation
    pub fn new(name: &str, fragments: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            required_fragments: fragments.iter().map(|s| s.to_string()).collect(),
            required: true,
        }
    }

    /// Mark the procedure as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// `CALL` statement invoking the procedure inside `schema`
    pub fn call_syntax(&self, schema: &str) -> String {
        format!(
            "CALL {}.{}()",
            quote_identifier(schema),
            quote_identifier(&self.name)
        )
    }

    /// Identifier of the execution smoke test for this procedure
    pub fn execution_check_id(&self) -> String {
        format!("test_{}_Executes", self.name)
    }

    /// Identifier of the content check for this procedure
    pub fn content_check_id(&self) -> String {
        format!("test_{}_Content", self.name)
    }
}

/// Expected shape and values of one result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedResultSet {
    /// What the result set is supposed to contain
    pub description: String,

    /// Exact row count, when the check cares about it
    #[serde(default)]
    pub row_count: Option<usize>,

    /// Leading rows to compare field by field, by column label
    #[serde(default)]
    pub rows: Vec<ExpectedRow>,
}

impl ExpectedResultSet {
    /// Create a result set expectation
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Default::default()
        }
    }

    /// Require an exact row count
    pub fn with_row_count(mut self, count: usize) -> Self {
        self.row_count = Some(count);
        self
    }

    /// Require the next row to match
    pub fn with_row(mut self, row: ExpectedRow) -> Self {
        self.rows.push(row);
        self
    }
}

/// Value-level check of a procedure's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepCheck {
    /// Check identifier
    pub id: String,

    /// Procedure to invoke
    pub procedure: String,

    /// Expected result sets, in the order the procedure produces them
    pub result_sets: Vec<ExpectedResultSet>,
}

impl DeepCheck {
    /// Create a deep check
    pub fn new(id: &str, procedure: &str) -> Self {
        Self {
            id: id.to_string(),
            procedure: procedure.to_string(),
            result_sets: Vec::new(),
        }
    }

    /// Append the next expected result set
    pub fn then(mut self, result_set: ExpectedResultSet) -> Self {
        self.result_sets.push(result_set);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_ids_and_call() {
        let proc = ExpectedProcedure::new("sp_JoinReports", &["INNER JOIN"]);
        assert_eq!(proc.call_syntax("LibraryDB"), "CALL `LibraryDB`.`sp_JoinReports`()");
        assert_eq!(proc.execution_check_id(), "test_sp_JoinReports_Executes");
        assert_eq!(proc.content_check_id(), "test_sp_JoinReports_Content");
        assert!(proc.required);
        assert!(!proc.optional().required);
    }

    #[test]
    fn test_row_display() {
        let row = ExpectedRow::new()
            .with("MemberID", 2)
            .with_null("ReturnDate");
        assert_eq!(row.to_string(), "(MemberID=2, ReturnDate=NULL)");
    }

    #[test]
    fn test_procedure_defaults_to_required_when_deserialized() {
        let proc: ExpectedProcedure = serde_json::from_str(r#"{"name":"sp_X"}"#).unwrap();
        assert!(proc.required);
        assert!(proc.required_fragments.is_empty());
    }
}
