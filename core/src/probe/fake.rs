//! In-memory probe used by engine tests
//!
//! Models a student's database: schemas, tables with rows, and procedures with
//! a definition and a canned output.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::DatabaseProbe;
use crate::error::{AssessmentError, Result};
use crate::models::{OutputSet, ProcedureOutput, ResultSet, SqlValue};
use crate::sql::{qualified_name, quote_identifier, RowPredicate};

type Row = Vec<(String, SqlValue)>;

#[derive(Debug, Clone)]
pub(crate) struct FakeProcedure {
    pub definition: String,
    pub output: std::result::Result<ProcedureOutput, String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeDatabase {
    pub connected: bool,
    pub schemas: HashSet<String>,
    pub tables: HashMap<(String, String), Vec<Row>>,
    pub procedures: HashMap<(String, String), FakeProcedure>,
    pub calls: Vec<String>,
}

fn key(schema: &str, name: &str) -> (String, String) {
    (schema.to_string(), name.to_string())
}

fn row(fields: &[(&str, SqlValue)]) -> Row {
    fields
        .iter()
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect()
}

fn result_set(columns: &[&str], rows: Vec<Vec<SqlValue>>) -> OutputSet {
    OutputSet::Rows(ResultSet::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows,
    ))
}

/// MySQL always finishes a CALL with a status packet
fn call_status() -> OutputSet {
    OutputSet::UpdateCount(0)
}

impl FakeDatabase {
    /// A correct LibraryDB submission
    pub fn library_db() -> Self {
        let schema = "LibraryDB";
        let mut db = FakeDatabase {
            connected: true,
            ..Default::default()
        };
        db.schemas.insert(schema.to_string());

        db.tables.insert(
            key(schema, "Members"),
            vec![
                row(&[
                    ("MemberID", SqlValue::Int(1)),
                    ("FullName", SqlValue::text("Alice Johnson")),
                    ("Email", SqlValue::text("alice@example.com")),
                    ("JoinDate", SqlValue::date(2023, 1, 10)),
                ]),
                row(&[
                    ("MemberID", SqlValue::Int(2)),
                    ("FullName", SqlValue::text("Bob Smith")),
                    ("Email", SqlValue::text("bob@example.com")),
                    ("JoinDate", SqlValue::date(2023, 2, 15)),
                ]),
            ],
        );
        db.tables.insert(
            key(schema, "Books"),
            vec![
                row(&[
                    ("BookID", SqlValue::Int(1)),
                    ("Title", SqlValue::text("The Great Gatsby")),
                    ("Author", SqlValue::text("F. Scott Fitzgerald")),
                    ("Genre", SqlValue::text("Fiction")),
                    ("PublishedYear", SqlValue::Int(1925)),
                ]),
                row(&[
                    ("BookID", SqlValue::Int(2)),
                    ("Title", SqlValue::text("Clean Code")),
                    ("Author", SqlValue::text("Robert C. Martin")),
                    ("Genre", SqlValue::text("Programming")),
                    ("PublishedYear", SqlValue::Int(2008)),
                ]),
            ],
        );
        db.tables.insert(
            key(schema, "BorrowTransactions"),
            vec![
                row(&[
                    ("TransactionID", SqlValue::Int(1)),
                    ("MemberID", SqlValue::Int(1)),
                    ("BookID", SqlValue::Int(1)),
                    ("BorrowDate", SqlValue::date(2023, 3, 1)),
                    ("ReturnDate", SqlValue::date(2023, 3, 15)),
                ]),
                row(&[
                    ("TransactionID", SqlValue::Int(2)),
                    ("MemberID", SqlValue::Int(2)),
                    ("BookID", SqlValue::Int(2)),
                    ("BorrowDate", SqlValue::date(2023, 3, 5)),
                    ("ReturnDate", SqlValue::Null),
                ]),
            ],
        );

        db.add_procedure(
            "sp_AggregateStats",
            "BEGIN SELECT COUNT(*) AS TotalBooks, (SELECT MAX(JoinDate) FROM Members) AS MostRecentJoinDate, \
             MIN(PublishedYear) AS OldestPublishedYear FROM Books; END",
            vec![
                result_set(
                    &["TotalBooks", "MostRecentJoinDate", "OldestPublishedYear"],
                    vec![vec![SqlValue::Int(2), SqlValue::date(2023, 2, 15), SqlValue::Int(1925)]],
                ),
                call_status(),
            ],
        );
        db.add_procedure(
            "sp_StringOperations",
            "BEGIN SELECT UPPER(FullName), CONCAT(FullName, ' <', Email, '>'), SUBSTRING(Email, 1, 5) FROM Members; END",
            vec![
                result_set(
                    &["UpperName", "Contact", "Prefix"],
                    vec![
                        vec![
                            SqlValue::text("ALICE JOHNSON"),
                            SqlValue::text("Alice Johnson <alice@example.com>"),
                            SqlValue::text("alice"),
                        ],
                        vec![
                            SqlValue::text("BOB SMITH"),
                            SqlValue::text("Bob Smith <bob@example.com>"),
                            SqlValue::text("bob@e"),
                        ],
                    ],
                ),
                call_status(),
            ],
        );
        db.add_procedure(
            "sp_JoinReports",
            "BEGIN SELECT * FROM BorrowTransactions t INNER JOIN Members m ON t.MemberID = m.MemberID; \
             SELECT * FROM Members m LEFT JOIN BorrowTransactions t ON t.MemberID = m.MemberID; \
             SELECT * FROM BorrowTransactions t RIGHT JOIN Books b ON t.BookID = b.BookID; END",
            vec![
                result_set(&["FullName", "Title"], vec![vec![SqlValue::text("Alice Johnson"), SqlValue::text("The Great Gatsby")]]),
                result_set(&["FullName", "TransactionID"], vec![vec![SqlValue::text("Bob Smith"), SqlValue::Int(2)]]),
                result_set(&["Title", "TransactionID"], vec![vec![SqlValue::text("Clean Code"), SqlValue::Int(2)]]),
                call_status(),
            ],
        );
        db.add_procedure(
            "sp_OperatorExamples",
            "BEGIN SELECT FullName, Email FROM Members WHERE Email LIKE '%example.com'; \
             SELECT Title FROM Books WHERE Genre IN ('Fiction', 'Programming') AND PublishedYear > 2000; END",
            vec![
                result_set(
                    &["FullName", "Email"],
                    vec![
                        vec![SqlValue::text("Alice Johnson"), SqlValue::text("alice@example.com")],
                        vec![SqlValue::text("Bob Smith"), SqlValue::text("bob@example.com")],
                    ],
                ),
                result_set(&["Title"], vec![vec![SqlValue::text("Clean Code")]]),
                call_status(),
            ],
        );
        db.add_procedure(
            "sp_FormattedDates",
            "BEGIN SELECT FullName, DATE_FORMAT(JoinDate, '%d/%m/%Y') AS Joined FROM Members; END",
            vec![
                result_set(
                    &["FullName", "Joined"],
                    vec![
                        vec![SqlValue::text("Alice Johnson"), SqlValue::text("10/01/2023")],
                        vec![SqlValue::text("Bob Smith"), SqlValue::text("15/02/2023")],
                    ],
                ),
                call_status(),
            ],
        );
        db.add_procedure(
            "sp_WildcardExamples",
            "BEGIN SELECT Title FROM Books WHERE Title LIKE 'The%'; SELECT Title FROM Books WHERE Title LIKE '_l%'; END",
            vec![
                result_set(&["Title"], vec![vec![SqlValue::text("The Great Gatsby")]]),
                result_set(&["Title"], vec![vec![SqlValue::text("Clean Code")]]),
                call_status(),
            ],
        );
        db.add_procedure(
            "sp_ClauseExamples",
            "BEGIN SELECT Genre, COUNT(*) AS Total FROM Books WHERE PublishedYear > 1900 \
             GROUP BY Genre HAVING COUNT(*) >= 1 ORDER BY Genre; END",
            vec![
                result_set(
                    &["Genre", "Total"],
                    vec![
                        vec![SqlValue::text("Fiction"), SqlValue::Int(1)],
                        vec![SqlValue::text("Programming"), SqlValue::Int(1)],
                    ],
                ),
                call_status(),
            ],
        );
        db.add_procedure(
            "sp_RunAllReports",
            "BEGIN CALL sp_AggregateStats(); CALL sp_StringOperations(); CALL sp_JoinReports(); \
             CALL sp_OperatorExamples(); CALL sp_FormattedDates(); CALL sp_WildcardExamples(); \
             CALL sp_ClauseExamples(); END",
            vec![result_set(&["TotalBooks"], vec![vec![SqlValue::Int(2)]]), call_status()],
        );

        db
    }

    pub fn add_procedure(&mut self, name: &str, definition: &str, sets: Vec<OutputSet>) {
        self.procedures.insert(
            key("LibraryDB", name),
            FakeProcedure {
                definition: definition.to_string(),
                output: Ok(ProcedureOutput::new(sets)),
            },
        );
    }

    pub fn drop_table(&mut self, name: &str) {
        self.tables.remove(&key("LibraryDB", name));
    }

    pub fn drop_procedure(&mut self, name: &str) {
        self.procedures.remove(&key("LibraryDB", name));
    }

    pub fn procedure_mut(&mut self, name: &str) -> &mut FakeProcedure {
        self.procedures
            .get_mut(&key("LibraryDB", name))
            .expect("procedure present in fake database")
    }

    pub fn table_mut(&mut self, name: &str) -> &mut Vec<Row> {
        self.tables
            .get_mut(&key("LibraryDB", name))
            .expect("table present in fake database")
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(AssessmentError::Connectivity("not connected".to_string()))
        }
    }

    fn table(&self, schema: &str, table: &str) -> Result<&Vec<Row>> {
        self.tables.get(&key(schema, table)).ok_or_else(|| {
            AssessmentError::Query(format!(
                "Table {} doesn't exist",
                qualified_name(schema, table)
            ))
        })
    }
}

#[async_trait]
impl DatabaseProbe for FakeDatabase {
    async fn ping(&mut self) -> Result<()> {
        self.ensure_connected()
    }

    async fn schema_exists(&mut self, name: &str) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.schemas.contains(name))
    }

    async fn table_exists(&mut self, schema: &str, name: &str) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.tables.contains_key(&key(schema, name)))
    }

    async fn count_rows(&mut self, schema: &str, table: &str) -> Result<u64> {
        self.ensure_connected()?;
        Ok(self.table(schema, table)?.len() as u64)
    }

    async fn row_exists(&mut self, predicate: &RowPredicate) -> Result<bool> {
        self.ensure_connected()?;
        let rows = self.table(&predicate.schema, &predicate.table)?;
        Ok(rows.iter().any(|row| {
            predicate.conditions.iter().all(|(column, expected)| {
                row.iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, actual)| expected.matches(actual))
                    .unwrap_or(false)
            })
        }))
    }

    async fn procedure_exists(&mut self, schema: &str, name: &str) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.procedures.contains_key(&key(schema, name)))
    }

    async fn procedure_definition(&mut self, schema: &str, name: &str) -> Result<String> {
        self.ensure_connected()?;
        Ok(self
            .procedures
            .get(&key(schema, name))
            .map(|proc| proc.definition.to_uppercase())
            .unwrap_or_default())
    }

    async fn invoke_procedure(&mut self, call: &str) -> Result<ProcedureOutput> {
        self.ensure_connected()?;
        self.calls.push(call.to_string());
        let found = self.procedures.iter().find(|((schema, name), _)| {
            call == format!("CALL {}.{}()", quote_identifier(schema), quote_identifier(name))
        });
        match found {
            Some((_, proc)) => proc.output.clone().map_err(AssessmentError::ProcedureExecution),
            None => Err(AssessmentError::ProcedureExecution(format!(
                "PROCEDURE {} does not exist",
                call
            ))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }
}
