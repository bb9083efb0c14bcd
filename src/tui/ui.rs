//! Main UI layout and rendering.

use querypad::app::App;
use querypad::highlight::{Category, CommentPolicy, Viewport};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::{dialog, editor, results, sidebar, statusbar};

/// Width of the sidebar column.
const SIDEBAR_WIDTH: u16 = 28;

/// Split the screen into title bar, content, status bar and key bindings.
fn main_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(5),    // content
            Constraint::Length(1), // status bar
            Constraint::Length(1), // key bindings
        ])
        .split(area)
}

/// Split the content area into optional sidebar and the editor/results column.
fn content_chunks(content: Rect, app: &App) -> (Option<Rect>, Rect) {
    if app.sidebar_visible {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(SIDEBAR_WIDTH), // sidebar
                Constraint::Min(30),               // editor + results
            ])
            .split(content);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, content)
    }
}

/// Split the editor/results column vertically.
fn editor_results_chunks(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // editor
            Constraint::Percentage(55), // results
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Area of the editor pane, border included.
fn editor_pane_area(area: Rect, app: &App) -> Rect {
    let (_, column) = content_chunks(main_chunks(area)[1], app);
    editor_results_chunks(column).0
}

/// Area where the editor text (right of the gutter) is drawn.
pub fn editor_text_area(area: Rect, app: &App) -> Rect {
    editor::text_area(editor_pane_area(area, app), app.highlighter.line_count())
}

/// Size of the editor text area, as seen by the live layer.
pub fn editor_viewport(area: Rect, app: &App) -> Viewport {
    let text = editor_text_area(area, app);
    Viewport {
        height: text.height as usize,
        width: text.width as usize,
    }
}

/// Draw the entire TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let chunks = main_chunks(size);

    // Title bar with breadcrumb
    let title = Paragraph::new(format!(" querypad │ {}", app.breadcrumb().join(" › ")))
        .style(Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 46)));
    frame.render_widget(title, chunks[0]);

    // Content area: sidebar | (editor / results)
    let (sidebar_area, column) = content_chunks(chunks[1], app);
    if let Some(sidebar_area) = sidebar_area {
        sidebar::draw(frame, app, sidebar_area);
    }
    let (editor_area, results_area) = editor_results_chunks(column);
    editor::draw(frame, app, editor_area);
    results::draw(frame, app, results_area);

    // Status bar
    statusbar::draw(frame, app, chunks[2]);

    // Key bindings bar
    let keys_text = if app.filter_editing {
        " Type to filter │ Enter: Keep │ Esc: Clear"
    } else {
        " Ctrl+Enter/F5: Run │ Tab: Switch Pane │ Ctrl+K: Connection │ Ctrl+N: New │ Ctrl+Q: Quit │ F1: Help"
    };
    let keys = Paragraph::new(keys_text).style(
        Style::default()
            .fg(Color::DarkGray)
            .bg(Color::Rgb(30, 30, 46)),
    );
    frame.render_widget(keys, chunks[3]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(frame, app, size);
    }

    // New connection dialog
    if let Some(ref form) = app.dialog {
        dialog::draw(frame, form, size);
    }
}

/// Categories listed in the help legend, in catalog priority order.
const LEGEND: [Category; 8] = [
    Category::QueryKeyword,
    Category::ModificationKeyword,
    Category::DefinitionKeyword,
    Category::OperatorKeyword,
    Category::TransactionKeyword,
    Category::String,
    Category::Number,
    Category::Comment,
];

/// Legend lines: one per category, keyword classes followed by their keywords.
fn legend_lines(app: &App) -> Vec<Line<'static>> {
    let catalog = app.highlighter.catalog();
    LEGEND
        .iter()
        .map(|category| {
            let mut spans = vec![
                Span::raw("  "),
                Span::styled(category.label(), editor::category_style(*category)),
            ];
            if category.is_keyword() {
                spans.push(Span::styled(
                    format!("  {}", catalog.keywords(*category).join(", ")),
                    Style::default().fg(Color::Gray),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let help_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, help_area);

    let bindings = [
        "Ctrl+Enter / F5    Execute query",
        "Tab                Cycle focus (Editor → Results → Sidebar)",
        "Ctrl+D             Toggle sidebar",
        "Ctrl+K             Switch connection",
        "Ctrl+N             New connection",
        "Ctrl+L             Clear editor",
        "Ctrl+Q             Quit",
        "F1                 Toggle this help",
        "",
        "Results pane:",
        "  ↑/↓/←/→          Scroll results",
        "  /                Filter rows",
        "  Esc              Clear filter",
        "  e                Export CSV",
        "",
        "Sidebar:",
        "  ↑/↓              Navigate",
        "  Enter            Expand/collapse",
    ];

    let mut lines: Vec<Line> = vec![Line::from(" querypad — Key Bindings".bold()), Line::from("")];
    lines.extend(bindings.iter().map(|b| Line::from(format!("  {}", b))));
    lines.push(Line::from(""));
    let comments = match app.highlighter.policy() {
        CommentPolicy::Anywhere => "-- starts a comment anywhere outside a string",
        CommentPolicy::LineStart => "-- starts a comment only at the start of a line",
    };
    lines.push(Line::from(format!("  Highlighting ({}):", comments)));
    lines.extend(legend_lines(app));
    lines.push(Line::from(""));
    lines.push(Line::from("  Press F1 to close"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 46)))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, help_area);
}

/// Create a centered rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use querypad::app::AppConfig;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_editor_text_area_inside_editor_pane() {
        let mut app = App::new(AppConfig::default());
        let area = Rect::new(0, 0, 120, 40);
        let pane = editor_pane_area(area, &app);
        let text = editor_text_area(area, &app);
        assert!(text.x > pane.x && text.y > pane.y);
        assert!(text.right() < pane.right() && text.bottom() < pane.bottom());

        app.toggle_sidebar();
        assert!(editor_text_area(area, &app).x < text.x);
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_legend_lists_catalog_keywords() {
        let app = App::new(AppConfig::default());
        let lines: Vec<String> = legend_lines(&app).iter().map(line_text).collect();
        assert_eq!(lines.len(), LEGEND.len());
        assert!(lines[0].starts_with("  query  SELECT, FROM"));
        assert!(lines[0].contains("GROUP BY"));
        assert!(lines[4].contains("ISOLATION LEVEL"));
        assert_eq!(lines[5], "  string");
    }

    #[test]
    fn test_help_shows_comment_policy() {
        let mut app = App::new(AppConfig {
            comment_policy: CommentPolicy::LineStart,
            ..AppConfig::default()
        });
        app.show_help = true;
        let mut terminal = Terminal::new(TestBackend::new(200, 60)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("only at the start of a line"));
    }

    #[test]
    fn test_draw_survives_tiny_terminal() {
        let mut app = App::new(AppConfig::default());
        app.set_editor_text("SELECT 1");
        for (width, height) in [(1, 20), (20, 1)] {
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            terminal.draw(|frame| draw(frame, &app)).unwrap();
        }

        app.show_help = true;
        app.open_dialog();
        let mut terminal = Terminal::new(TestBackend::new(1, 20)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
    }

    #[test]
    fn test_draw_renders_breadcrumb_and_code() {
        let mut app = App::new(AppConfig::default());
        app.set_editor_text("SELECT * FROM users LIMIT 10;");
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("Production DB › public › - › Query #1"));
        assert!(screen.contains("SELECT * FROM users LIMIT 10;"));
        assert!(screen.contains("ecommerce_db"));
    }
}
