//! Application state machine for the TUI.

use crate::connection::ConnectionForm;
use crate::db::{self, Connection, ConnectionStatus};
use crate::error::{Error, Result};
use crate::highlight::{CommentPolicy, Highlighter, Viewport};
use crate::output;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

/// Schema shown in the breadcrumb; the sample catalog has only one.
pub const DEFAULT_SCHEMA: &str = "public";

/// File name used by the results export.
pub const EXPORT_FILE_NAME: &str = "results.csv";

/// Which pane currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    /// The SQL editor pane.
    Editor,
    /// The results table pane.
    Results,
    /// The object browser sidebar.
    Sidebar,
}

/// What an object browser node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A database.
    Database,
    /// A table.
    Table,
    /// A column of a table.
    Column,
}

/// A node in the object browser tree.
#[derive(Debug, Clone)]
pub struct ObjectNode {
    /// Display label.
    pub name: String,
    /// What the node stands for.
    pub kind: NodeKind,
    /// Depth in the tree (0 = database, 1 = table, 2 = column).
    pub depth: u8,
    /// Whether this node is expanded.
    pub expanded: bool,
    /// Children.
    pub children: Vec<ObjectNode>,
}

/// A visible row of the flattened object tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode<'a> {
    /// Depth in the tree.
    pub depth: u8,
    /// Display label.
    pub name: &'a str,
    /// What the node stands for.
    pub kind: NodeKind,
    /// Whether the node is expanded.
    pub expanded: bool,
    /// Whether the node has children to expand.
    pub has_children: bool,
}

/// A single field of a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Integer value.
    Integer(i64),
    /// Text value.
    Text(String),
    /// SQL NULL.
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Null => write!(f, "NULL"),
        }
    }
}

/// One result row, in column order.
pub type Row = Vec<CellValue>;

/// Query result data ready for display.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column headers.
    pub columns: Vec<String>,
    /// Row data.
    pub rows: Vec<Row>,
    /// Row count reported by the service.
    pub row_count: usize,
    /// How long the query took, in milliseconds.
    pub elapsed_ms: u128,
    /// Optional error message.
    pub error: Option<String>,
}

impl QueryResult {
    /// Build a successful result.
    pub fn new(columns: Vec<String>, rows: Vec<Row>, elapsed_ms: u128) -> Self {
        Self {
            row_count: rows.len(),
            columns,
            rows,
            elapsed_ms,
            error: None,
        }
    }

    /// Build a failed result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Startup options for [`App`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name of the connection to activate, if it exists.
    pub connection: Option<String>,
    /// Comment recognition policy for the highlighter.
    pub comment_policy: CommentPolicy,
    /// Directory that receives exported results.
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection: None,
            comment_policy: CommentPolicy::default(),
            export_dir: PathBuf::from("."),
        }
    }
}

/// The main application state.
pub struct App {
    /// Which pane has focus.
    pub focus: FocusPane,
    /// Whether the sidebar is visible.
    pub sidebar_visible: bool,
    /// The live, editable text layer. It is never drawn directly.
    pub editor: tui_textarea::TextArea<'static>,
    /// Highlight output and scroll state of the editor.
    pub highlighter: Highlighter,
    /// Size of the editor text area at the last draw.
    pub editor_viewport: Viewport,
    /// Current query results.
    pub result: QueryResult,
    /// Indices of the rows passing the filter.
    pub visible_rows: Vec<usize>,
    /// Case-insensitive row filter.
    pub result_filter: String,
    /// Whether keystrokes go to the filter input.
    pub filter_editing: bool,
    /// Scroll offset in the results table (rows).
    pub result_scroll: usize,
    /// Horizontal scroll offset in the results table (columns).
    pub result_col_scroll: usize,
    /// Saved connections.
    pub connections: Vec<Connection>,
    /// Index of the active connection.
    pub active_connection: usize,
    /// Object browser tree.
    pub objects: Vec<ObjectNode>,
    /// Selected row of the flattened object tree.
    pub sidebar_selected: usize,
    /// Table picked in the object browser, shown in the breadcrumb.
    pub selected_table: Option<String>,
    /// Number of the query tab shown in the breadcrumb.
    pub query_number: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Whether a query is currently running.
    pub query_running: bool,
    /// Show help overlay.
    pub show_help: bool,
    /// Open new-connection dialog, if any.
    pub dialog: Option<ConnectionForm>,
    /// One-line feedback shown in the status bar.
    pub status_message: Option<String>,
    /// Directory that receives exported results.
    pub export_dir: PathBuf,
}

impl App {
    /// Create a new App with default state.
    pub fn new(config: AppConfig) -> Self {
        let connections = db::sample_connections();
        let active_connection = config
            .connection
            .as_deref()
            .and_then(|name| connections.iter().position(|c| c.name == name))
            .unwrap_or(0);

        Self {
            focus: FocusPane::Editor,
            sidebar_visible: true,
            editor: new_editor(Vec::new()),
            highlighter: Highlighter::new(config.comment_policy),
            editor_viewport: Viewport::default(),
            result: QueryResult::default(),
            visible_rows: Vec::new(),
            result_filter: String::new(),
            filter_editing: false,
            result_scroll: 0,
            result_col_scroll: 0,
            connections,
            active_connection,
            objects: db::query::fetch_object_tree(),
            sidebar_selected: 0,
            selected_table: None,
            query_number: 1,
            should_quit: false,
            query_running: false,
            show_help: false,
            dialog: None,
            status_message: None,
            export_dir: config.export_dir,
        }
    }

    /// Cycle focus to the next pane.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Editor => FocusPane::Results,
            FocusPane::Results => {
                if self.sidebar_visible {
                    FocusPane::Sidebar
                } else {
                    FocusPane::Editor
                }
            }
            FocusPane::Sidebar => FocusPane::Editor,
        };
    }

    /// Toggle sidebar visibility.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        if !self.sidebar_visible && self.focus == FocusPane::Sidebar {
            self.focus = FocusPane::Editor;
        }
    }

    /// Get the current editor content as a string.
    pub fn get_editor_text(&self) -> String {
        self.editor.lines().join("\n")
    }

    /// Replace the editor content.
    pub fn set_editor_text(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(|l| l.to_string()).collect();
        self.editor = new_editor(lines);
        self.on_editor_changed();
    }

    /// Clear the editor.
    pub fn clear_editor(&mut self) {
        self.editor = new_editor(Vec::new());
        self.on_editor_changed();
    }

    /// Re-highlight after an edit and keep the cursor in view.
    pub fn on_editor_changed(&mut self) {
        let text = self.get_editor_text();
        if self.highlighter.set_text(&text) {
            tracing::debug!(bytes = text.len(), "editor changed");
        }
        self.follow_editor_cursor();
    }

    /// Scroll the live layer so the cursor stays visible.
    pub fn follow_editor_cursor(&mut self) {
        let (row, col) = self.editor_cursor_display();
        self.highlighter.follow_cursor(row, col, self.editor_viewport);
    }

    /// Cursor position as (line, display column).
    pub fn editor_cursor_display(&self) -> (usize, usize) {
        let (row, col) = self.editor.cursor();
        let col = self
            .editor
            .lines()
            .get(row)
            .map(|line| display_width_prefix(line, col))
            .unwrap_or(0);
        (row, col)
    }

    /// Scroll the editor with the mouse wheel.
    pub fn scroll_editor(&mut self, delta: isize) {
        self.highlighter.scroll_live_by(delta);
    }

    /// Install a new result and reset the grid.
    pub fn set_result(&mut self, result: QueryResult) {
        self.result = result;
        self.result_scroll = 0;
        self.result_col_scroll = 0;
        self.refresh_filter();
    }

    /// Record a completed execution.
    pub fn finish_query(&mut self, result: QueryResult) {
        self.set_result(result);
        self.query_running = false;
        self.query_number += 1;
    }

    /// Recompute which rows pass the filter.
    pub fn refresh_filter(&mut self) {
        self.visible_rows = db::query::filter_rows(&self.result, &self.result_filter);
        if self.result_scroll >= self.visible_rows.len() {
            self.result_scroll = self.visible_rows.len().saturating_sub(1);
        }
    }

    /// Append a character to the filter.
    pub fn push_filter_char(&mut self, c: char) {
        self.result_filter.push(c);
        self.refresh_filter();
    }

    /// Remove the last filter character.
    pub fn pop_filter_char(&mut self) {
        self.result_filter.pop();
        self.refresh_filter();
    }

    /// Clear the filter and leave filter input.
    pub fn clear_filter(&mut self) {
        self.result_filter.clear();
        self.filter_editing = false;
        self.refresh_filter();
    }

    /// Scroll results down.
    pub fn scroll_results_down(&mut self) {
        if self.result_scroll + 1 < self.visible_rows.len() {
            self.result_scroll += 1;
        }
    }

    /// Scroll results up.
    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Scroll results right (horizontal).
    pub fn scroll_results_right(&mut self) {
        let col_count = self.result.columns.len();
        if col_count > 0 && self.result_col_scroll + 1 < col_count {
            self.result_col_scroll += 1;
        }
    }

    /// Scroll results left (horizontal).
    pub fn scroll_results_left(&mut self) {
        self.result_col_scroll = self.result_col_scroll.saturating_sub(1);
    }

    /// Write the filtered rows as CSV into the export directory.
    pub fn export_results(&self) -> Result<PathBuf> {
        if self.result.is_empty() {
            return Err(Error::NoResults);
        }
        let path = self.export_dir.join(EXPORT_FILE_NAME);
        export_csv(&path, &self.result, &self.visible_rows)?;
        tracing::info!(path = %path.display(), rows = self.visible_rows.len(), "exported results");
        Ok(path)
    }

    /// The active connection.
    pub fn active(&self) -> Option<&Connection> {
        self.connections.get(self.active_connection)
    }

    /// Switch to the next saved connection.
    pub fn next_connection(&mut self) {
        if !self.connections.is_empty() {
            self.active_connection = (self.active_connection + 1) % self.connections.len();
            tracing::info!(
                connection = self.connections[self.active_connection].name.as_str(),
                "switched connection"
            );
        }
    }

    /// Open the new-connection dialog.
    pub fn open_dialog(&mut self) {
        self.dialog = Some(ConnectionForm::default());
    }

    /// Close the dialog without saving.
    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    /// Validate the dialog and save the connection on success.
    pub fn submit_dialog(&mut self) {
        let Some(form) = self.dialog.as_mut() else {
            return;
        };
        match form.submit() {
            Ok(connection) => {
                self.status_message = Some(format!("Added connection {}", connection.name));
                self.connections.push(connection);
                self.dialog = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "connection form rejected");
            }
        }
    }

    /// Breadcrumb trail: connection, schema, table, query tab.
    pub fn breadcrumb(&self) -> Vec<String> {
        vec![
            self.active()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "-".to_string()),
            DEFAULT_SCHEMA.to_string(),
            self.selected_table.clone().unwrap_or_else(|| "-".to_string()),
            format!("Query #{}", self.query_number),
        ]
    }

    /// Move the sidebar selection down.
    pub fn scroll_sidebar_down(&mut self) {
        if self.sidebar_selected + 1 < flatten_tree(&self.objects).len() {
            self.sidebar_selected += 1;
        }
    }

    /// Move the sidebar selection up.
    pub fn scroll_sidebar_up(&mut self) {
        self.sidebar_selected = self.sidebar_selected.saturating_sub(1);
    }

    /// Toggle expand/collapse on the selected sidebar node.
    pub fn toggle_sidebar_node(&mut self) {
        if let Some(node) = get_flat_node_mut(&mut self.objects, self.sidebar_selected) {
            node.expanded = !node.expanded;
            if node.kind == NodeKind::Table {
                self.selected_table = Some(node.name.clone());
            }
        }
    }
}

/// Whether the connection is open.
pub fn is_connected(connection: &Connection) -> bool {
    connection.status == ConnectionStatus::Connected
}

fn new_editor(lines: Vec<String>) -> tui_textarea::TextArea<'static> {
    let mut editor = if lines.is_empty() {
        tui_textarea::TextArea::default()
    } else {
        tui_textarea::TextArea::new(lines)
    };
    editor.set_placeholder_text("Your SQL goes here...");
    editor
}

/// Display width of the first `chars` characters of `line`.
pub fn display_width_prefix(line: &str, chars: usize) -> usize {
    let end = line
        .char_indices()
        .nth(chars)
        .map_or(line.len(), |(i, _)| i);
    line[..end].width()
}

fn export_csv(path: &Path, result: &QueryResult, rows: &[usize]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    output::write_csv(&mut writer, result, rows)
}

/// Get a mutable reference to the node at the given flat index in the tree.
fn get_flat_node_mut(nodes: &mut [ObjectNode], target: usize) -> Option<&mut ObjectNode> {
    let mut idx = 0;
    get_flat_node_mut_inner(nodes, target, &mut idx)
}

fn get_flat_node_mut_inner<'a>(
    nodes: &'a mut [ObjectNode],
    target: usize,
    idx: &mut usize,
) -> Option<&'a mut ObjectNode> {
    for node in nodes.iter_mut() {
        if *idx == target {
            return Some(node);
        }
        *idx += 1;
        if node.expanded
            && let Some(found) = get_flat_node_mut_inner(&mut node.children, target, idx)
        {
            return Some(found);
        }
    }
    None
}

/// Flatten the visible part of the object tree for display.
pub fn flatten_tree(nodes: &[ObjectNode]) -> Vec<FlatNode<'_>> {
    let mut out = Vec::new();
    flatten_tree_inner(nodes, &mut out);
    out
}

fn flatten_tree_inner<'a>(nodes: &'a [ObjectNode], out: &mut Vec<FlatNode<'a>>) {
    for node in nodes {
        out.push(FlatNode {
            depth: node.depth,
            name: &node.name,
            kind: node.kind,
            expanded: node.expanded,
            has_children: !node.children.is_empty(),
        });
        if node.expanded {
            flatten_tree_inner(&node.children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(AppConfig::default())
    }

    #[test]
    fn test_cycle_focus() {
        let mut app = app();
        app.cycle_focus();
        assert_eq!(app.focus, FocusPane::Results);
        app.cycle_focus();
        assert_eq!(app.focus, FocusPane::Sidebar);
        app.toggle_sidebar();
        assert_eq!(app.focus, FocusPane::Editor);
        app.cycle_focus();
        app.cycle_focus();
        assert_eq!(app.focus, FocusPane::Editor);
    }

    #[test]
    fn test_set_editor_text_highlights() {
        let mut app = app();
        app.set_editor_text("SELECT *\nFROM users");
        assert_eq!(app.highlighter.line_count(), 2);
        assert_eq!(app.highlighter.text(), "SELECT *\nFROM users");
        app.clear_editor();
        assert_eq!(app.highlighter.line_count(), 0);
    }

    #[test]
    fn test_filter_narrows_rows() {
        let mut app = app();
        app.set_result(QueryResult::new(
            vec!["id".to_string(), "username".to_string()],
            db::query::generate_rows(30),
            5,
        ));
        assert_eq!(app.visible_rows.len(), 30);
        for c in "USER_2".chars() {
            app.push_filter_char(c);
        }
        assert_eq!(app.visible_rows.len(), 11);
        app.pop_filter_char();
        assert_eq!(app.visible_rows.len(), 30);
        app.clear_filter();
        assert!(app.result_filter.is_empty());
    }

    #[test]
    fn test_filter_clamps_scroll() {
        let mut app = app();
        app.set_result(QueryResult::new(
            vec!["id".to_string()],
            db::query::generate_rows(50),
            0,
        ));
        for _ in 0..40 {
            app.scroll_results_down();
        }
        assert_eq!(app.result_scroll, 40);
        for c in "user_3".chars() {
            app.push_filter_char(c);
        }
        assert_eq!(app.result_scroll, app.visible_rows.len() - 1);
    }

    #[test]
    fn test_breadcrumb_and_sidebar_selection() {
        let mut app = app();
        assert_eq!(
            app.breadcrumb(),
            vec!["Production DB", "public", "-", "Query #1"]
        );
        // row 0 = ecommerce_db, row 1 = users
        app.scroll_sidebar_down();
        app.toggle_sidebar_node();
        assert_eq!(app.selected_table.as_deref(), Some("users"));
        assert_eq!(flatten_tree(&app.objects)[2].name, "id");
        app.finish_query(QueryResult::default());
        assert_eq!(app.breadcrumb()[3], "Query #2");
    }

    #[test]
    fn test_initial_connection_by_name() {
        let app = App::new(AppConfig {
            connection: Some("Development DB".to_string()),
            ..AppConfig::default()
        });
        assert_eq!(app.active_connection, 1);
        assert!(!is_connected(app.active().unwrap()));
    }

    #[test]
    fn test_next_connection_wraps() {
        let mut app = app();
        app.next_connection();
        assert_eq!(app.active_connection, 1);
        app.next_connection();
        assert_eq!(app.active_connection, 0);
    }

    #[test]
    fn test_dialog_submit_adds_connection() {
        use crate::connection::Field;
        let mut app = app();
        app.open_dialog();
        app.submit_dialog();
        assert!(app.dialog.as_ref().is_some_and(|f| !f.errors.is_empty()));

        let form = app.dialog.as_mut().unwrap();
        form.set(Field::Name, "Local");
        form.set(Field::Database, "dev");
        form.set(Field::Username, "me");
        form.set(Field::Password, "pw");
        app.submit_dialog();
        assert!(app.dialog.is_none());
        assert_eq!(app.connections.len(), 3);
        assert_eq!(app.connections[2].status, ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_export_without_results() {
        let app = app();
        assert!(matches!(app.export_results(), Err(Error::NoResults)));
    }

    #[test]
    fn test_display_width_prefix() {
        assert_eq!(display_width_prefix("abc", 2), 2);
        assert_eq!(display_width_prefix("日本語", 2), 4);
        assert_eq!(display_width_prefix("ab", 10), 2);
    }
}
