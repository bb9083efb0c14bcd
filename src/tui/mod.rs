//! TUI setup, teardown, and main event loop.

pub mod dialog;
pub mod editor;
pub mod results;
pub mod sidebar;
pub mod statusbar;
pub mod ui;

use crate::Args;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use querypad::app::{App, FocusPane};
use querypad::db;
use ratatui::prelude::*;
use std::io;

/// Lines scrolled per mouse wheel notch.
const WHEEL_LINES: isize = 3;

/// Run the TUI application.
pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize app state
    let mut app = App::new(args.app_config());
    tracing::info!(
        connection = app.active().map(|c| c.name.as_str()).unwrap_or("-"),
        "starting TUI"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// The main TUI event loop.
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Keep the live layer's notion of the viewport in step with the layout
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        app.editor_viewport = ui::editor_viewport(area, app);

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a timeout so we can do async work
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if handle_key(key, app).await? {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse(mouse, app, area),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Mouse wheel over the editor scrolls the live layer; the overlay follows.
fn handle_mouse(mouse: MouseEvent, app: &mut App, area: Rect) {
    let editor = ui::editor_text_area(area, app);
    if !editor.contains(Position::new(mouse.column, mouse.row)) {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_editor(WHEEL_LINES),
        MouseEventKind::ScrollUp => app.scroll_editor(-WHEEL_LINES),
        _ => {}
    }
}

/// Handle a key event. Returns true if the app should exit.
async fn handle_key(key: KeyEvent, app: &mut App) -> Result<bool, Box<dyn std::error::Error>> {
    // Ctrl+Q: quit, from anywhere
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('q') {
        return Ok(true);
    }

    // The dialog swallows every other key while open
    if app.dialog.is_some() {
        handle_dialog_key(key, app);
        return Ok(false);
    }

    // Filter input swallows printable keys
    if app.focus == FocusPane::Results && app.filter_editing {
        handle_filter_key(key, app);
        return Ok(false);
    }

    // Global keys
    match (key.modifiers, key.code) {
        // F1: toggle help
        (_, KeyCode::F(1)) => {
            app.show_help = !app.show_help;
            return Ok(false);
        }
        // Tab: cycle focus
        (KeyModifiers::NONE, KeyCode::Tab) => {
            app.cycle_focus();
            return Ok(false);
        }
        // Ctrl+D: toggle sidebar
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => {
            app.toggle_sidebar();
            return Ok(false);
        }
        // Ctrl+L: clear editor
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => {
            app.clear_editor();
            return Ok(false);
        }
        // Ctrl+K: switch connection
        (KeyModifiers::CONTROL, KeyCode::Char('k')) => {
            app.next_connection();
            return Ok(false);
        }
        // Ctrl+N: new connection
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
            app.open_dialog();
            return Ok(false);
        }
        // Ctrl+Enter or F5: execute query
        (KeyModifiers::CONTROL, KeyCode::Enter) | (_, KeyCode::F(5)) => {
            let sql = app.highlighter.execute_request().to_string();
            app.query_running = true;
            let result = db::query::execute_query(&sql).await;
            app.finish_query(result);
            return Ok(false);
        }
        _ => {}
    }

    // Pane-specific keys
    match app.focus {
        FocusPane::Editor => {
            // Let tui-textarea handle input
            if app.editor.input(key) {
                app.on_editor_changed();
            } else {
                app.follow_editor_cursor();
            }
        }
        FocusPane::Results => match key.code {
            KeyCode::Up => app.scroll_results_up(),
            KeyCode::Down => app.scroll_results_down(),
            KeyCode::Left => app.scroll_results_left(),
            KeyCode::Right => app.scroll_results_right(),
            KeyCode::Char('/') => app.filter_editing = true,
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Char('e') => {
                app.status_message = Some(match app.export_results() {
                    Ok(path) => format!("Exported to {}", path.display()),
                    Err(e) => e.to_string(),
                });
            }
            _ => {}
        },
        FocusPane::Sidebar => match key.code {
            KeyCode::Up => app.scroll_sidebar_up(),
            KeyCode::Down => app.scroll_sidebar_down(),
            KeyCode::Enter => app.toggle_sidebar_node(),
            _ => {}
        },
    }

    Ok(false)
}

/// Keys while the results filter is being typed.
fn handle_filter_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Enter => app.filter_editing = false,
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_filter_char(c)
        }
        _ => {}
    }
}

/// Keys while the new-connection dialog is open.
fn handle_dialog_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.cancel_dialog(),
        KeyCode::Enter => app.submit_dialog(),
        _ => {
            let Some(form) = app.dialog.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    form.insert_char(c)
                }
                _ => {}
            }
        }
    }
}
