//! Procedure output
//!
//! A `CALL` can produce any interleaving of result sets and update counts.
//! The probe drains all of them, in order, into a [`ProcedureOutput`].

use serde::{Deserialize, Serialize};

use super::value::SqlValue;

/// Rows returned by one SELECT inside a procedure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Column labels, in select-list order
    pub columns: Vec<String>,

    /// Row values, positionally aligned with `columns`
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    /// Create a result set
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    /// Position of a column label. Labels compare case-insensitively, as
    /// MySQL column labels do.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(label))
    }

    /// Value at `row` for the column labelled `label`
    pub fn value(&self, row: usize, label: &str) -> Option<&SqlValue> {
        let index = self.column_index(label)?;
        self.rows.get(row).and_then(|values| values.get(index))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result set has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One output of a procedure call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputSet {
    /// A result set
    Rows(ResultSet),

    /// An update count (affected rows)
    UpdateCount(u64),
}

/// What a procedure call produced, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureOutput {
    /// Every drained output, in the order the server sent them
    pub sets: Vec<OutputSet>,
}

/// Summary of a completed procedure call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// At least one result set was produced
    ProducedResultSet,

    /// Only update counts were produced
    ProducedUpdateOnly,

    /// The call completed but produced nothing at all
    ProducedNothing,
}

impl ProcedureOutput {
    /// Create an output from drained sets
    pub fn new(sets: Vec<OutputSet>) -> Self {
        Self { sets }
    }

    /// Classify the call
    pub fn outcome(&self) -> ExecutionOutcome {
        if self.sets.iter().any(|set| matches!(set, OutputSet::Rows(_))) {
            ExecutionOutcome::ProducedResultSet
        } else if self.sets.is_empty() {
            ExecutionOutcome::ProducedNothing
        } else {
            ExecutionOutcome::ProducedUpdateOnly
        }
    }

    /// Result sets only, in order; update counts are skipped
    pub fn result_sets(&self) -> impl Iterator<Item = &ResultSet> {
        self.sets.iter().filter_map(|set| match set {
            OutputSet::Rows(rows) => Some(rows),
            OutputSet::UpdateCount(_) => None,
        })
    }
}
