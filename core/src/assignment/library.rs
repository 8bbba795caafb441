//! The LibraryDB coursework assignment

use super::Assignment;
use crate::models::{
    DeepCheck, ExpectedProcedure, ExpectedResultSet, ExpectedRow, ExpectedSchema, ExpectedTable,
    SqlValue,
};

/// Procedures that `sp_RunAllReports` must call
const REPORT_PROCEDURES: [&str; 7] = [
    "sp_AggregateStats",
    "sp_StringOperations",
    "sp_JoinReports",
    "sp_OperatorExamples",
    "sp_FormattedDates",
    "sp_WildcardExamples",
    "sp_ClauseExamples",
];

/// Build the LibraryDB assignment
pub fn library_db() -> Assignment {
    let members = ExpectedTable::new("Members")
        .with_row(
            ExpectedRow::new()
                .with("FullName", "Alice Johnson")
                .with("Email", "alice@example.com")
                .with("JoinDate", SqlValue::date(2023, 1, 10)),
        )
        .with_row(
            ExpectedRow::new()
                .with("FullName", "Bob Smith")
                .with("Email", "bob@example.com")
                .with("JoinDate", SqlValue::date(2023, 2, 15)),
        );

    let books = ExpectedTable::new("Books")
        .with_row(
            ExpectedRow::new()
                .with("Title", "The Great Gatsby")
                .with("Author", "F. Scott Fitzgerald")
                .with("Genre", "Fiction")
                .with("PublishedYear", 1925),
        )
        .with_row(
            ExpectedRow::new()
                .with("Title", "Clean Code")
                .with("Author", "Robert C. Martin")
                .with("Genre", "Programming")
                .with("PublishedYear", 2008),
        );

    let transactions = ExpectedTable::new("BorrowTransactions")
        .with_row(
            ExpectedRow::new()
                .with("MemberID", 1)
                .with("BookID", 1)
                .with("BorrowDate", SqlValue::date(2023, 3, 1))
                .with("ReturnDate", SqlValue::date(2023, 3, 15)),
        )
        .with_row(
            ExpectedRow::new()
                .with("MemberID", 2)
                .with("BookID", 2)
                .with("BorrowDate", SqlValue::date(2023, 3, 5))
                .with_null("ReturnDate"),
        );

    // Procedure names only, so `CALL LibraryDB.sp_X()` and `CALL sp_X()` both count
    let mut run_all_calls = vec!["CALL"];
    run_all_calls.extend_from_slice(&REPORT_PROCEDURES);

    let procedures = vec![
        ExpectedProcedure::new("sp_AggregateStats", &["COUNT", "MAX", "MIN"]),
        ExpectedProcedure::new("sp_StringOperations", &["CONCAT", "UPPER", "SUBSTRING"]),
        ExpectedProcedure::new("sp_JoinReports", &["INNER JOIN", "LEFT JOIN", "RIGHT JOIN"]),
        ExpectedProcedure::new("sp_OperatorExamples", &["LIKE", "AND", ">"]),
        ExpectedProcedure::new("sp_FormattedDates", &["DATE_FORMAT"]),
        ExpectedProcedure::new("sp_WildcardExamples", &["LIKE", "%", "_"]),
        ExpectedProcedure::new("sp_ClauseExamples", &["WHERE", "GROUP BY", "HAVING", "ORDER BY"]),
        ExpectedProcedure::new("sp_RunAllReports", &run_all_calls).optional(),
    ];

    let deep_checks = vec![
        DeepCheck::new("testAggregateStatsValues", "sp_AggregateStats").then(
            ExpectedResultSet::new("book count, latest join date and oldest publication year")
                .with_row(
                    ExpectedRow::new()
                        .with("TotalBooks", 2)
                        .with("MostRecentJoinDate", SqlValue::date(2023, 2, 15))
                        .with("OldestPublishedYear", 1925),
                ),
        ),
        DeepCheck::new("testOperatorExamplesValues", "sp_OperatorExamples")
            .then(
                ExpectedResultSet::new("members with an email ending in example.com")
                    .with_row_count(2),
            )
            .then(
                ExpectedResultSet::new("Fiction or Programming books published after 2000")
                    .with_row_count(1)
                    .with_row(ExpectedRow::new().with("Title", "Clean Code")),
            ),
        DeepCheck::new("testWildcardExamplesValues", "sp_WildcardExamples")
            .then(
                ExpectedResultSet::new("titles starting with 'The'")
                    .with_row_count(1)
                    .with_row(ExpectedRow::new().with("Title", "The Great Gatsby")),
            )
            .then(
                ExpectedResultSet::new("titles whose second character is 'l'")
                    .with_row_count(1)
                    .with_row(ExpectedRow::new().with("Title", "Clean Code")),
            ),
    ];

    Assignment {
        name: "LibraryDB".to_string(),
        schema: ExpectedSchema {
            name: "LibraryDB".to_string(),
        },
        tables: vec![members, books, transactions],
        procedures,
        deep_checks,
    }
}
