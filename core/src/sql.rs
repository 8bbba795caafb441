//! SQL text helpers
//!
//! Identifiers come from assignment configuration and are quoted; values are
//! always bound as parameters, never spliced into SQL text.

use serde::{Deserialize, Serialize};

use crate::models::{ExpectedRow, SqlValue};

/// Quote a MySQL identifier with backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Schema-qualified, quoted table name
pub fn qualified_name(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(table))
}

/// Existence predicate over one table: every condition must hold on the same row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPredicate {
    /// Schema containing the table
    pub schema: String,

    /// Table to search
    pub table: String,

    /// Column conditions; a `Null` value means `IS NULL`
    pub conditions: Vec<(String, SqlValue)>,
}

impl RowPredicate {
    /// Build the predicate matching an expected seed row
    pub fn for_row(schema: &str, table: &str, row: &ExpectedRow) -> Self {
        Self {
            schema: schema.to_string(),
            table: table.to_string(),
            conditions: row
                .fields
                .iter()
                .map(|field| (field.column.clone(), field.value.clone()))
                .collect(),
        }
    }

    /// Render the existence query with `?` placeholders and the parameters to
    /// bind, in placeholder order.
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut params = Vec::new();

        for (column, value) in &self.conditions {
            if value.is_null() {
                clauses.push(format!("{} IS NULL", quote_identifier(column)));
            } else {
                clauses.push(format!("{} = ?", quote_identifier(column)));
                params.push(value.clone());
            }
        }

        let mut sql = format!("SELECT 1 FROM {}", qualified_name(&self.schema, &self.table));
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" LIMIT 1");

        (sql, params)
    }
}
