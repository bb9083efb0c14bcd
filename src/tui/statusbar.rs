//! Bottom status line: active connection on the left, run state on the right.

use querypad::app::{self, App, DEFAULT_SCHEMA};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const BAR_BG: Color = Color::Rgb(49, 50, 68);

/// Text for the right-hand side, most urgent first.
fn activity(app: &App) -> String {
    if app.query_running {
        return " ⏳ Running... ".to_string();
    }
    if let Some(msg) = &app.status_message {
        return format!(" {} ", msg);
    }
    if app.result.is_empty() {
        return String::new();
    }
    format!(
        " {} of {} rows │ {}ms ",
        app.visible_rows.len(),
        app.result.row_count,
        app.result.elapsed_ms
    )
}

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = match app.active() {
        Some(conn) => {
            let badge = if app::is_connected(conn) {
                Span::styled(" ● ", Style::default().fg(Color::Green))
            } else {
                Span::styled(" ○ ", Style::default().fg(Color::Red))
            };
            vec![
                badge,
                Span::raw(format!("{} ({})", conn.name, conn.status)),
                Span::styled(format!(" │ {}", DEFAULT_SCHEMA), Style::default().fg(Color::Gray)),
            ]
        }
        None => vec![Span::raw(" no connection")],
    };

    let right = activity(app);
    let used: usize = spans.iter().map(|s| s.content.width()).sum::<usize>() + right.width();
    spans.push(Span::raw(" ".repeat((area.width as usize).saturating_sub(used))));
    spans.push(Span::raw(right));

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::White).bg(BAR_BG));
    frame.render_widget(bar, area);
}
