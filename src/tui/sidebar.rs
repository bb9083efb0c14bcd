//! Connections list and object browser sidebar pane.

use querypad::app::{self, App, FocusPane, NodeKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Draw the sidebar: connections first, then the database tree.
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == FocusPane::Sidebar;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Objects ")
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let heading = Style::default().fg(Color::DarkGray).bold();
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Connections", heading))];

    for (i, conn) in app.connections.iter().enumerate() {
        let marker = if i == app.active_connection { "▸ " } else { "  " };
        let badge = if app::is_connected(conn) {
            Span::styled(" ●", Style::default().fg(Color::Green))
        } else {
            Span::styled(" ○", Style::default().fg(Color::Red))
        };
        let name_style = if i == app.active_connection {
            Style::default().fg(Color::White).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(conn.name.as_str(), name_style),
            badge,
        ]));
    }
    lines.push(Line::from(Span::styled(
        "  + Add connection",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Databases", heading)));

    let tree_start = lines.len();
    for (i, node) in app::flatten_tree(&app.objects).iter().enumerate() {
        let indent = "  ".repeat(node.depth as usize);
        let icon = if node.has_children {
            if node.expanded { "▾ " } else { "▸ " }
        } else {
            "· "
        };
        let style = if i == app.sidebar_selected && focused {
            Style::default().fg(Color::Cyan).bg(Color::Rgb(49, 50, 68))
        } else {
            match node.kind {
                NodeKind::Database => Style::default().fg(Color::Yellow),
                NodeKind::Table => Style::default().fg(Color::Green),
                NodeKind::Column => Style::default().fg(Color::White),
            }
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}{}", indent, icon, node.name),
            style,
        )));
    }

    // Keep the selected node on screen
    let selected_line = tree_start + app.sidebar_selected;
    let offset = (selected_line + 1).saturating_sub(inner.height as usize);

    let paragraph = Paragraph::new(lines).scroll((offset as u16, 0));
    frame.render_widget(paragraph, inner);
}
