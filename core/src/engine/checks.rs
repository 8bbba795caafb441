//! Check evaluation
//!
//! Each function evaluates one check against the probe and returns `Ok(())`
//! for a pass or the error explaining the failure. None of them records
//! anything: the engine converts the returned `Result` into a verdict.

use log::debug;

use crate::error::{AssessmentError, Result};
use crate::models::{DeepCheck, ExecutionOutcome, ExpectedProcedure, ExpectedTable};
use crate::probe::DatabaseProbe;
use crate::sql::RowPredicate;

/// Connection is open and answering
pub async fn connectivity<P: DatabaseProbe + ?Sized>(probe: &mut P) -> Result<()> {
    probe.ping().await
}

/// Target schema exists
pub async fn schema_exists<P: DatabaseProbe + ?Sized>(probe: &mut P, schema: &str) -> Result<()> {
    if probe.schema_exists(schema).await? {
        Ok(())
    } else {
        Err(AssessmentError::SchemaMismatch(format!(
            "schema {} not found",
            schema
        )))
    }
}

/// Every table exists. Stops at the first missing table.
pub async fn tables_exist<P: DatabaseProbe + ?Sized>(
    probe: &mut P,
    schema: &str,
    tables: &[ExpectedTable],
) -> Result<()> {
    for table in tables {
        if !probe.table_exists(schema, &table.name).await? {
            return Err(AssessmentError::SchemaMismatch(format!(
                "table {}.{} not found",
                schema, table.name
            )));
        }
    }
    Ok(())
}

/// Exact row counts and a field-exact match of every seed row.
///
/// Every table is evaluated so that one broken table does not hide the state
/// of the others; a lost connection stops the check at once.
pub async fn seed_data<P: DatabaseProbe + ?Sized>(
    probe: &mut P,
    schema: &str,
    tables: &[ExpectedTable],
) -> Result<()> {
    let mut failures = Vec::new();
    for table in tables.iter().filter(|table| !table.rows.is_empty()) {
        match seed_table(probe, schema, table).await {
            Ok(()) => debug!("Seed rows of {} match", table.name),
            Err(err @ AssessmentError::Connectivity(_)) => return Err(err),
            Err(err) => failures.push(err),
        }
    }

    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(AssessmentError::DataMismatch(
            failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

async fn seed_table<P: DatabaseProbe + ?Sized>(
    probe: &mut P,
    schema: &str,
    table: &ExpectedTable,
) -> Result<()> {
    let count = probe.count_rows(schema, &table.name).await?;
    if count != table.rows.len() as u64 {
        return Err(AssessmentError::DataMismatch(format!(
            "{} has {} rows, expected {}",
            table.name,
            count,
            table.rows.len()
        )));
    }

    for row in &table.rows {
        let predicate = RowPredicate::for_row(schema, &table.name, row);
        if !probe.row_exists(&predicate).await? {
            return Err(AssessmentError::DataMismatch(format!(
                "no row in {} matching {}",
                table.name, row
            )));
        }
    }
    Ok(())
}

/// Every procedure exists. Stops at the first missing procedure.
pub async fn procedures_exist<'a, P, I>(probe: &mut P, schema: &str, procedures: I) -> Result<()>
where
    P: DatabaseProbe + ?Sized,
    I: IntoIterator<Item = &'a ExpectedProcedure>,
{
    for proc in procedures {
        if !probe.procedure_exists(schema, &proc.name).await? {
            return Err(AssessmentError::SchemaMismatch(format!(
                "procedure {} not found",
                proc.name
            )));
        }
    }
    Ok(())
}

/// The procedure runs to completion and produces some output
pub async fn executes<P: DatabaseProbe + ?Sized>(
    probe: &mut P,
    schema: &str,
    procedure: &ExpectedProcedure,
) -> Result<()> {
    let output = probe.invoke_procedure(&procedure.call_syntax(schema)).await?;
    match output.outcome() {
        ExecutionOutcome::ProducedResultSet | ExecutionOutcome::ProducedUpdateOnly => {
            debug!(
                "{} produced {} output set(s)",
                procedure.name,
                output.sets.len()
            );
            Ok(())
        }
        ExecutionOutcome::ProducedNothing => Err(AssessmentError::ProcedureExecution(format!(
            "{} produced neither result sets nor update counts",
            procedure.name
        ))),
    }
}

/// Uppercase and collapse whitespace runs to a single space
pub fn normalize_sql(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Fragments missing from a procedure definition
pub fn missing_fragments<'a>(definition: &str, fragments: &'a [String]) -> Vec<&'a str> {
    let definition = normalize_sql(definition);
    fragments
        .iter()
        .filter(|fragment| !definition.contains(&normalize_sql(fragment)))
        .map(String::as_str)
        .collect()
}

/// The definition text contains every required fragment
pub async fn content<P: DatabaseProbe + ?Sized>(
    probe: &mut P,
    schema: &str,
    procedure: &ExpectedProcedure,
) -> Result<()> {
    let definition = probe.procedure_definition(schema, &procedure.name).await?;
    if definition.trim().is_empty() {
        return Err(AssessmentError::SchemaMismatch(format!(
            "definition of {} not found",
            procedure.name
        )));
    }

    let missing = missing_fragments(&definition, &procedure.required_fragments);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AssessmentError::DataMismatch(format!(
            "{} does not contain {}",
            procedure.name,
            missing.join(", ")
        )))
    }
}

/// Exact values and row counts of every expected result set, in order
pub async fn deep<P: DatabaseProbe + ?Sized>(
    probe: &mut P,
    schema: &str,
    check: &DeepCheck,
    procedure: &ExpectedProcedure,
) -> Result<()> {
    let output = probe.invoke_procedure(&procedure.call_syntax(schema)).await?;
    let mut result_sets = output.result_sets();

    for (position, expected) in check.result_sets.iter().enumerate() {
        let actual = result_sets.next().ok_or_else(|| {
            AssessmentError::ShapeMismatch(format!(
                "{} returned {} result set(s), expected a result set for {}",
                procedure.name, position, expected.description
            ))
        })?;

        if let Some(count) = expected.row_count {
            if actual.len() != count {
                return Err(AssessmentError::DataMismatch(format!(
                    "{}: expected {} row(s), got {}",
                    expected.description,
                    count,
                    actual.len()
                )));
            }
        }

        for (index, row) in expected.rows.iter().enumerate() {
            if index >= actual.len() {
                return Err(AssessmentError::DataMismatch(format!(
                    "{}: expected at least {} row(s), got {}",
                    expected.description,
                    index + 1,
                    actual.len()
                )));
            }
            for field in &row.fields {
                let value = actual.value(index, &field.column).ok_or_else(|| {
                    AssessmentError::AliasMismatch(format!(
                        "{}: column {} not found in {:?}",
                        expected.description, field.column, actual.columns
                    ))
                })?;
                if !field.value.matches(value) {
                    return Err(AssessmentError::DataMismatch(format!(
                        "{}: row {} column {} is {}, expected {}",
                        expected.description,
                        index + 1,
                        field.column,
                        value,
                        field.value
                    )));
                }
            }
        }
    }
    Ok(())
}
