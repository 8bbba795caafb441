//! Data models
//!
//! Expected state, typed values and procedure output.

pub mod expected;
pub mod output;
pub mod value;

pub use expected::{
    DeepCheck, ExpectedField, ExpectedProcedure, ExpectedResultSet, ExpectedRow, ExpectedSchema,
    ExpectedTable,
};
pub use output::{ExecutionOutcome, OutputSet, ProcedureOutput, ResultSet};
pub use value::SqlValue;
