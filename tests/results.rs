//! Mock execution, filtering and export, end to end.

use querypad::Error;
use querypad::app::{App, AppConfig, EXPORT_FILE_NAME};
use querypad::db::query::{SAMPLE_COLUMNS, SAMPLE_ROW_COUNT, execute_query, filter_rows};

#[tokio::test]
async fn test_execute_query_returns_sample_table() {
    let result = execute_query("SELECT * FROM users").await;
    assert!(result.error.is_none());
    assert_eq!(result.columns, SAMPLE_COLUMNS);
    assert_eq!(result.row_count, SAMPLE_ROW_COUNT);
    assert_eq!(result.rows.len(), SAMPLE_ROW_COUNT);
    assert_eq!(result.rows[0][1].to_string(), "user_1");
    assert_eq!(result.rows[0][2].to_string(), "user1@example.com");
    assert_eq!(result.rows[0][3].to_string(), "2024-01-01");
}

#[tokio::test]
async fn test_execute_blank_query_fails() {
    let result = execute_query("  \n\t").await;
    assert_eq!(result.error.as_deref(), Some("Query is empty"));
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_blank_editor_is_handed_off_and_reported() {
    let mut app = App::new(AppConfig::default());
    app.set_editor_text("   ");
    let sql = app.highlighter.execute_request().to_string();
    assert_eq!(sql, "   ");

    app.finish_query(execute_query(&sql).await);
    assert_eq!(app.result.error.as_deref(), Some("Query is empty"));
    assert_eq!(app.breadcrumb()[3], "Query #2");
}

#[tokio::test]
async fn test_filter_over_executed_rows() {
    let result = execute_query("SELECT 1").await;
    // user_99 and user_990 through user_999
    assert_eq!(filter_rows(&result, "USER_99").len(), 11);
    assert_eq!(filter_rows(&result, "").len(), SAMPLE_ROW_COUNT);
    assert!(filter_rows(&result, "no such value").is_empty());
}

#[tokio::test]
async fn test_export_writes_filtered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(AppConfig {
        export_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    });
    app.finish_query(execute_query("SELECT * FROM users").await);
    for c in "user_1000".chars() {
        app.push_filter_char(c);
    }

    let path = app.export_results().unwrap();
    assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));

    let csv = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "id,username,email,created_at");
    assert!(lines[1].starts_with("1000,user_1000,user1000@example.com,"));
}

#[test]
fn test_export_without_results_fails() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::new(AppConfig {
        export_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    });
    assert!(matches!(app.export_results(), Err(Error::NoResults)));
    assert!(!dir.path().join(EXPORT_FILE_NAME).exists());
}
