//! SQL query editor pane with syntax highlighting.
//!
//! The tui-textarea widget owns editing and the cursor but is never
//! rendered. What the user sees is an overlay built from highlight spans,
//! scrolled to the position mirrored from the live layer.

use querypad::app::{App, FocusPane};
use querypad::highlight::Category;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Style used for a highlight category.
pub fn category_style(category: Category) -> Style {
    let style = Style::default();
    match category {
        Category::Comment => style.fg(Color::DarkGray).italic(),
        Category::String => style.fg(Color::LightBlue),
        Category::Number => style.fg(Color::LightGreen),
        Category::QueryKeyword => style.fg(Color::LightBlue).bold(),
        Category::ModificationKeyword => style.fg(Color::LightGreen).bold(),
        Category::DefinitionKeyword => style.fg(Color::LightMagenta).bold(),
        Category::OperatorKeyword => style.fg(Color::Yellow).bold(),
        Category::TransactionKeyword => style.fg(Color::LightRed).bold(),
        Category::Plain => style,
    }
}

/// Width of the line-number gutter, including its right margin.
pub fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).to_string().len().max(2);
    digits as u16 + 1
}

/// Area of the text overlay inside an editor pane.
pub fn text_area(pane: Rect, line_count: usize) -> Rect {
    let inner = pane_block(false).inner(pane);
    let gutter = gutter_width(line_count).min(inner.width);
    Rect {
        x: inner.x + gutter,
        width: inner.width - gutter,
        ..inner
    }
}

fn pane_block(focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(" SQL ")
        .title_bottom(Line::from(" ▶ Ctrl+Enter ").right_aligned())
        .border_style(border_style)
}

/// Draw the SQL editor pane.
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == FocusPane::Editor;
    let block = pane_block(focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let hl = &app.highlighter;
    let scroll = hl.scroll().overlay();
    let line_count = hl.line_count().max(1);
    let gutter = gutter_width(line_count).min(inner.width);
    let gutter_area = Rect {
        width: gutter,
        ..inner
    };
    let text = text_area(area, hl.line_count());

    // Gutter follows the overlay vertically only; a collapsed pane has none
    if gutter > 0 {
        let digits = gutter as usize - 1;
        let numbers: Vec<Line> = (1..=line_count)
            .map(|n| Line::from(format!("{:>digits$} ", n)))
            .collect();
        let gutter_widget = Paragraph::new(numbers)
            .style(Style::default().fg(Color::DarkGray))
            .scroll((clamp_u16(scroll.top), 0));
        frame.render_widget(gutter_widget, gutter_area);
    }

    if hl.line_count() == 0 {
        let placeholder =
            Paragraph::new("Your SQL goes here...").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, text);
    } else {
        let lines: Vec<Line> = hl
            .lines()
            .into_iter()
            .map(|line| {
                Line::from(
                    line.segments
                        .into_iter()
                        .map(|(category, text)| Span::styled(text, category_style(category)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        let overlay = Paragraph::new(lines).scroll((clamp_u16(scroll.top), clamp_u16(scroll.left)));
        frame.render_widget(overlay, text);
    }

    if focused && app.dialog.is_none() {
        let (row, col) = app.editor_cursor_display();
        if row >= scroll.top && col >= scroll.left {
            let x = text.x as usize + (col - scroll.left);
            let y = text.y as usize + (row - scroll.top);
            if x < text.right() as usize && y < text.bottom() as usize {
                frame.set_cursor_position(Position::new(x as u16, y as u16));
            }
        }
    }
}

fn clamp_u16(n: usize) -> u16 {
    n.min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gutter_width() {
        assert_eq!(gutter_width(0), 3);
        assert_eq!(gutter_width(9), 3);
        assert_eq!(gutter_width(120), 4);
    }

    #[test]
    fn test_text_area_excludes_border_and_gutter() {
        let pane = Rect::new(10, 5, 40, 12);
        let text = text_area(pane, 5);
        assert_eq!(text, Rect::new(14, 6, 35, 10));
    }

    #[test]
    fn test_category_style() {
        assert_eq!(category_style(Category::Plain), Style::default());
        assert!(
            category_style(Category::QueryKeyword)
                .add_modifier
                .contains(Modifier::BOLD)
        );
        assert!(
            category_style(Category::Comment)
                .add_modifier
                .contains(Modifier::ITALIC)
        );
    }
}
