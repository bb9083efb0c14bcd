//! Mock query execution and result filtering.

use crate::app::{CellValue, NodeKind, ObjectNode, QueryResult, Row};
use crate::db::{self, Database};
use crate::error::Error;
use chrono::{Days, NaiveDate};
use std::time::Instant;

/// Number of rows the mock service returns.
pub const SAMPLE_ROW_COUNT: usize = 1000;

/// Columns of the sample result set.
pub const SAMPLE_COLUMNS: &[&str] = &["id", "username", "email", "created_at"];

const SAMPLE_EPOCH: Option<NaiveDate> = NaiveDate::from_ymd_opt(2024, 1, 1);

/// Hand `sql` to the execution service and collect its results.
///
/// The statement text is passed through untouched; the mock service
/// answers every non-blank statement with the same generated user table.
pub async fn execute_query(sql: &str) -> QueryResult {
    if sql.trim().is_empty() {
        return QueryResult::failed(Error::EmptyQuery.to_string());
    }
    let start = Instant::now();
    tracing::info!(bytes = sql.len(), lines = sql.lines().count(), "executing query");

    tokio::task::yield_now().await;
    let rows = generate_rows(SAMPLE_ROW_COUNT);

    let elapsed_ms = start.elapsed().as_millis();
    tracing::debug!(rows = rows.len(), elapsed_ms = elapsed_ms as u64, "query finished");
    QueryResult::new(
        SAMPLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
        elapsed_ms,
    )
}

/// Generate `count` sample user rows.
pub fn generate_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let n = i + 1;
            vec![
                CellValue::Integer(n as i64),
                CellValue::Text(format!("user_{}", n)),
                CellValue::Text(format!("user{}@example.com", n)),
                CellValue::Text(sample_date(i as u64)),
            ]
        })
        .collect()
}

fn sample_date(offset: u64) -> String {
    SAMPLE_EPOCH
        .and_then(|d| d.checked_add_days(Days::new(offset)))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Whether any field of `row` contains `needle`, ignoring case.
///
/// An empty needle matches every row.
pub fn row_matches(row: &[CellValue], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    row.iter()
        .any(|value| value.to_string().to_lowercase().contains(&needle))
}

/// Indices of the rows of `result` that match `needle`.
pub fn filter_rows(result: &QueryResult, needle: &str) -> Vec<usize> {
    result
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, needle))
        .map(|(i, _)| i)
        .collect()
}

/// Build the object browser tree from the sample catalog.
pub fn fetch_object_tree() -> Vec<ObjectNode> {
    db::sample_databases().iter().map(database_node).collect()
}

fn database_node(database: &Database) -> ObjectNode {
    ObjectNode {
        name: database.name.clone(),
        kind: NodeKind::Database,
        depth: 0,
        expanded: true,
        children: database
            .tables
            .iter()
            .map(|table| ObjectNode {
                name: table.name.clone(),
                kind: NodeKind::Table,
                depth: 1,
                expanded: false,
                children: table
                    .columns
                    .iter()
                    .map(|column| ObjectNode {
                        name: column.clone(),
                        kind: NodeKind::Column,
                        depth: 2,
                        expanded: false,
                        children: Vec::new(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_rows() {
        let rows = generate_rows(3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], CellValue::Integer(1));
        assert_eq!(rows[2][1], CellValue::Text("user_3".to_string()));
        assert_eq!(rows[2][2], CellValue::Text("user3@example.com".to_string()));
        assert_eq!(rows[2][3], CellValue::Text("2024-01-03".to_string()));
    }

    #[test]
    fn test_sample_date_rolls_over_months() {
        assert_eq!(sample_date(31), "2024-02-01");
        assert_eq!(sample_date(59), "2024-02-29");
    }

    #[test]
    fn test_row_matches_case_insensitive() {
        let row = generate_rows(1).remove(0);
        assert!(row_matches(&row, "USER_1"));
        assert!(row_matches(&row, "example.COM"));
        assert!(row_matches(&row, "2024-01"));
        assert!(row_matches(&row, ""));
        assert!(!row_matches(&row, "jane"));
    }

    #[test]
    fn test_row_matches_numbers_as_text() {
        let row = generate_rows(42).remove(41);
        assert!(row_matches(&row, "42"));
    }

    #[test]
    fn test_filter_rows() {
        let result = QueryResult::new(
            SAMPLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            generate_rows(20),
            0,
        );
        assert_eq!(filter_rows(&result, "user_1").len(), 11);
        assert_eq!(filter_rows(&result, "").len(), 20);
        assert!(filter_rows(&result, "nobody").is_empty());
    }

    #[test]
    fn test_fetch_object_tree() {
        let tree = fetch_object_tree();
        assert_eq!(tree.len(), 2);
        assert!(tree[0].expanded);
        assert_eq!(tree[0].children[0].name, "users");
        assert!(!tree[0].children[0].expanded);
        assert_eq!(tree[0].children[0].children[2].kind, NodeKind::Column);
    }
}
