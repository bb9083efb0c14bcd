//! "Connect to Database" dialog.

use super::ui::centered_rect;
use querypad::connection::{ConnectionForm, Field};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Draw the new-connection form over `area`.
pub fn draw(frame: &mut Frame, form: &ConnectionForm, area: Rect) {
    let popup = centered_rect(60, 80, area);
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Enter your database details to establish a new connection.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for field in Field::ALL {
        let focused = field == form.focus;
        let value = match field {
            Field::Password => "•".repeat(form.value(field).chars().count()),
            _ => form.value(field).to_string(),
        };
        let label_style = if focused {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", field.label()), label_style),
            Span::styled(
                format!("{}{}", value, cursor),
                Style::default().bg(Color::Rgb(49, 50, 68)),
            ),
        ]));
        if let Some(err) = form.error_for(field) {
            lines.push(Line::from(Span::styled(
                format!("          {}", err.message),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: Connect │ Tab: Next field │ Esc: Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Connect to Database ")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 46)))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}
