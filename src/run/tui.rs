use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};

use crate::db::Database;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &Database) -> Result<()> {
    let mut app = App::new(chrono::Local::now().date_naive());
    app.refresh(db)?;
    info!(range = %app.range, "starting tui");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab bar, status bar, command bar, borders and table header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db),
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Transactions)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Cards)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Budgets)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            switch_screen(app, db, screens[(idx + 1) % screens.len()])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Char('H') => commands::handle_command("prev-month", app, db),
        KeyCode::Char('L') => commands::handle_command("next-month", app, db),
        KeyCode::Char('D') if app.screen == Screen::Transactions => {
            commands::handle_command("delete-txn", app, db);
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, db: &Database) {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, db);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                confirm(action, app, db)?;
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

/// Storage failures become a status message; the row list is reloaded
/// either way so it reflects what is actually stored.
fn confirm(action: PendingAction, app: &mut App, db: &Database) -> Result<()> {
    match action {
        PendingAction::DeleteTransaction { id, description } => {
            match db.delete_transaction(id) {
                Ok(()) => {
                    info!(id, "transaction deleted");
                    app.set_status(format!("Deleted: {description}"));
                }
                Err(e) if e.is_not_found() => {
                    app.set_status(format!("Already gone: {description}"));
                }
                Err(e) => {
                    warn!(id, error = %e, "delete failed");
                    app.set_status(format!("Error: {e}"));
                }
            }
            app.refresh(db)?;
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    app.refresh(db)?;
    app.set_status(screen.to_string());
    Ok(())
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Transactions => scroll_down(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Cards => scroll_down(
            &mut app.card_index,
            &mut app.card_scroll,
            app.card_spend.transactions.len(),
            page,
        ),
        Screen::Budgets => scroll_down(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budgets.len(),
            page,
        ),
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::Cards => scroll_up(&mut app.card_index, &mut app.card_scroll),
        Screen::Budgets => scroll_up(&mut app.budget_index, &mut app.budget_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll)
        }
        Screen::Cards => scroll_to_top(&mut app.card_index, &mut app.card_scroll),
        Screen::Budgets => scroll_to_top(&mut app.budget_index, &mut app.budget_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Transactions => scroll_to_bottom(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Cards => scroll_to_bottom(
            &mut app.card_index,
            &mut app.card_scroll,
            app.card_spend.transactions.len(),
            page,
        ),
        Screen::Budgets => scroll_to_bottom(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budgets.len(),
            page,
        ),
        Screen::Dashboard => {}
    }
}
