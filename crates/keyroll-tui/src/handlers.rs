//! Keyboard event handling.

use crate::app::{App, AppState, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C quits from any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quit;
        return true;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Editing => handle_editing_key(app, key),
        InputMode::SelectType => handle_select_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::ConfirmDelete => handle_confirm_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            true
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            false
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            false
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.move_left();
            false
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            app.move_right();
            false
        }
        KeyCode::Enter => {
            app.activate();
            false
        }
        KeyCode::Char('a') => {
            app.add_row();
            false
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.request_delete();
            false
        }
        KeyCode::Char('v') => {
            app.toggle_secret();
            false
        }
        KeyCode::Char('/') => {
            app.start_search();
            false
        }
        KeyCode::Esc => {
            if !app.search_query.is_empty() {
                app.clear_search();
            }
            app.status = None;
            false
        }
        _ => false,
    }
}

fn handle_editing_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter | KeyCode::Tab => app.blur(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => app.edit_pop(),
        KeyCode::Char(c) => app.edit_push(c),
        _ => {}
    }
    false
}

fn handle_select_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.type_choice_up(),
        KeyCode::Down | KeyCode::Char('j') => app.type_choice_down(),
        KeyCode::Enter => app.choose_type(),
        KeyCode::Esc => app.cancel_edit(),
        _ => {}
    }
    false
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => app.accept_search(),
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.refilter();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.refilter();
        }
        _ => {}
    }
    false
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        _ => app.cancel_delete(),
    }
    false
}
