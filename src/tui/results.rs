//! Results table pane with scrolling and filtering.

use querypad::app::{App, FocusPane};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use unicode_width::UnicodeWidthStr;

/// Widest a column is allowed to grow, in cells.
const MAX_COLUMN_WIDTH: usize = 40;

/// Footer line, e.g. "Showing 12 of 1000 rows".
pub fn footer_text(app: &App) -> String {
    format!(
        "Showing {} of {} rows",
        app.visible_rows.len(),
        app.result.row_count
    )
}

/// Draw the results pane.
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == FocusPane::Results;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let result = &app.result;

    // Title with execution time and row count
    let title = if let Some(ref err) = result.error {
        format!(" Results — Error: {} ", err)
    } else if result.is_empty() {
        " Results ".to_string()
    } else {
        format!(
            " Results — ⏱ {}ms • {} rows ",
            result.elapsed_ms, result.row_count
        )
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);

    if result.is_empty() {
        // No results yet
        let msg = if let Some(ref err) = result.error {
            err.clone()
        } else if app.query_running {
            "Running query...".to_string()
        } else {
            "No results. Press Ctrl+Enter to run a query.".to_string()
        };
        let paragraph = Paragraph::new(msg)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let filter_label = if app.filter_editing {
        format!(" Filter: {}▏ ", app.result_filter)
    } else if !app.result_filter.is_empty() {
        format!(" Filter: {} ", app.result_filter)
    } else {
        " / to filter • e to export ".to_string()
    };
    block = block
        .title_bottom(Line::from(format!(" {} ", footer_text(app))))
        .title_bottom(Line::from(filter_label).right_aligned());

    let columns: Vec<&String> = result.columns.iter().skip(app.result_col_scroll).collect();

    // Build header
    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|c| Cell::from(c.as_str()).style(Style::default().fg(Color::Cyan).bold()))
        .collect();
    let header = Row::new(header_cells).height(1);

    // Build rows with scroll offset
    let visible: Vec<Vec<String>> = app
        .visible_rows
        .iter()
        .skip(app.result_scroll)
        .take(area.height as usize)
        .filter_map(|i| result.rows.get(*i))
        .map(|row| {
            row.iter()
                .skip(app.result_col_scroll)
                .map(|v| v.to_string())
                .collect()
        })
        .collect();
    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            let row = Row::new(cells.iter().map(|v| Cell::from(v.as_str())));
            if i % 2 == 1 {
                row.style(Style::default().bg(Color::Rgb(36, 36, 52)))
            } else {
                row
            }
        })
        .collect();

    // Column widths: auto-size based on content
    let widths: Vec<Constraint> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let max_data = visible
                .iter()
                .map(|r| r.get(i).map(|s| s.width()).unwrap_or(0))
                .max()
                .unwrap_or(0);
            let w = col.width().max(max_data).min(MAX_COLUMN_WIDTH) as u16 + 2;
            Constraint::Length(w)
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::Rgb(49, 50, 68)));

    // The first drawn row is the scroll position; highlight it when focused
    let mut state = TableState::default().with_selected(focused.then_some(0));
    frame.render_stateful_widget(table, area, &mut state);
}
