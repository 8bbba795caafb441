//! Database probe
//!
//! The probe is the only thing that talks to the database. It performs
//! read-only introspection (plus procedure invocation) and surfaces raw
//! errors; turning errors into verdicts is the engine's job.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ProcedureOutput;
use crate::sql::RowPredicate;

#[cfg(test)]
pub(crate) mod fake;

/// Read-only access to schema, table and routine metadata over one connection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseProbe: Send {
    /// Verify that the connection is open and the server answers
    async fn ping(&mut self) -> Result<()>;

    /// Whether a schema with exactly this name exists
    async fn schema_exists(&mut self, name: &str) -> Result<bool>;

    /// Whether the table `schema.name` exists
    async fn table_exists(&mut self, schema: &str, name: &str) -> Result<bool>;

    /// Total row count of a table; a missing table is an error
    async fn count_rows(&mut self, schema: &str, table: &str) -> Result<u64>;

    /// Whether at least one row satisfies the predicate. Values are bound as
    /// parameters.
    async fn row_exists(&mut self, predicate: &RowPredicate) -> Result<bool>;

    /// Whether a routine of type PROCEDURE named `name` exists in `schema`
    async fn procedure_exists(&mut self, schema: &str, name: &str) -> Result<bool>;

    /// Uppercased source text of a procedure, or an empty string when the
    /// procedure is not found
    async fn procedure_definition(&mut self, schema: &str, name: &str) -> Result<String>;

    /// Execute a `CALL` statement, draining every result set and update count
    async fn invoke_procedure(&mut self, call: &str) -> Result<ProcedureOutput>;

    /// Release the connection
    async fn close(&mut self) -> Result<()>;
}
