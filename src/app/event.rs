use super::mode::Mode;
use super::state::AppState;
use crate::storage::KeyValueStore;
use crate::ui::components::help::HELP_TOTAL_LINES;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

pub fn handle_key_event<S: KeyValueStore>(key: KeyEvent, state: &mut AppState<S>) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return Ok(());
    }

    if state.show_help {
        handle_help_key(key, state);
        return Ok(());
    }

    match state.mode {
        Mode::Navigate => handle_navigate_mode(key, state),
        Mode::Edit => handle_edit_mode(key, state),
        Mode::PickCategory => handle_picker_mode(key, state),
        Mode::Search => handle_search_mode(key, state),
        Mode::DoneList => handle_done_list_mode(key, state),
    }
    Ok(())
}

pub fn handle_mouse_event<S: KeyValueStore>(mouse: MouseEvent, state: &mut AppState<S>) -> Result<()> {
    if state.show_help {
        let max_scroll = max_help_scroll(state);
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            }
            MouseEventKind::ScrollDown => {
                state.help_scroll = state.help_scroll.saturating_add(3).min(max_scroll);
            }
            _ => {}
        }
        return Ok(());
    }

    match (state.mode, mouse.kind) {
        (Mode::Navigate, MouseEventKind::ScrollUp) => state.move_cursor_up(),
        (Mode::Navigate, MouseEventKind::ScrollDown) => state.move_cursor_down(),
        (Mode::DoneList, MouseEventKind::ScrollUp) => state.done_up(),
        (Mode::DoneList, MouseEventKind::ScrollDown) => state.done_down(),
        _ => {}
    }
    Ok(())
}

fn max_help_scroll<S: KeyValueStore>(state: &AppState<S>) -> u16 {
    // Help popup is 80% of terminal height, minus 2 for borders
    let popup_height = (state.terminal_height * 80) / 100;
    let inner_height = popup_height.saturating_sub(2);
    HELP_TOTAL_LINES.saturating_sub(inner_height)
}

fn handle_help_key<S: KeyValueStore>(key: KeyEvent, state: &mut AppState<S>) {
    let max_scroll = max_help_scroll(state);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.help_scroll < max_scroll {
                state.help_scroll = state.help_scroll.saturating_add(1);
            }
        }
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
            state.show_help = false;
            state.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_navigate_mode<S: KeyValueStore>(key: KeyEvent, state: &mut AppState<S>) {
    match key.code {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Esc => {
            if !state.search.is_empty() {
                state.clear_search();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => state.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_cursor_down(),
        KeyCode::Char('g') | KeyCode::Home => state.move_cursor_top(),
        KeyCode::Char('G') | KeyCode::End => state.move_cursor_bottom(),
        KeyCode::Char('a') | KeyCode::Char('n') | KeyCode::Char('o') => state.begin_add(),
        KeyCode::Char('i') | KeyCode::Char('e') | KeyCode::Enter => state.begin_edit(),
        KeyCode::Char('x') | KeyCode::Char(' ') => state.complete_selected(),
        KeyCode::Char('d') | KeyCode::Delete => state.delete_selected(),
        KeyCode::Char('/') => state.start_search(),
        KeyCode::Char('L') => state.open_done_list(),
        KeyCode::Char('R') => {
            state.reload_from_storage();
            state.set_status_message("Reloaded".to_string());
        }
        KeyCode::Char('?') => {
            state.show_help = true;
            state.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_edit_mode<S: KeyValueStore>(key: KeyEvent, state: &mut AppState<S>) {
    let word = key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => state.cancel_editor(),
        KeyCode::Enter => state.save_editor(),
        KeyCode::Tab => state.open_picker(),
        _ => {
            let Some(session) = state.editor.as_mut() else {
                state.mode = Mode::Navigate;
                return;
            };
            let input = &mut session.input;
            match key.code {
                KeyCode::Backspace => input.backspace(),
                KeyCode::Delete => input.delete(),
                KeyCode::Left if word => input.word_left(),
                KeyCode::Right if word => input.word_right(),
                KeyCode::Left => input.left(),
                KeyCode::Right => input.right(),
                KeyCode::Home => input.home(),
                KeyCode::End => input.end(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
                _ => {}
            }
        }
    }
}

fn handle_picker_mode<S: KeyValueStore>(key: KeyEvent, state: &mut AppState<S>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.picker_up(),
        KeyCode::Down | KeyCode::Char('j') => state.picker_down(),
        KeyCode::Enter => state.confirm_picker(),
        KeyCode::Esc | KeyCode::Tab => state.cancel_picker(),
        _ => {}
    }
}

fn handle_search_mode<S: KeyValueStore>(key: KeyEvent, state: &mut AppState<S>) {
    let word = key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => state.clear_search(),
        KeyCode::Enter => state.finish_search(),
        KeyCode::Up => state.move_cursor_up(),
        KeyCode::Down => state.move_cursor_down(),
        KeyCode::Backspace => {
            state.search.backspace();
            state.search_changed();
        }
        KeyCode::Delete => {
            state.search.delete();
            state.search_changed();
        }
        KeyCode::Left if word => state.search.word_left(),
        KeyCode::Right if word => state.search.word_right(),
        KeyCode::Left => state.search.left(),
        KeyCode::Right => state.search.right(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.search.insert(c);
            state.search_changed();
        }
        _ => {}
    }
}

fn handle_done_list_mode<S: KeyValueStore>(key: KeyEvent, state: &mut AppState<S>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.done_up(),
        KeyCode::Down | KeyCode::Char('j') => state.done_down(),
        KeyCode::Char('g') | KeyCode::Home => {
            if !state.service.completed().is_empty() {
                state.done_state.select(Some(0));
            }
        }
        KeyCode::Char('G') | KeyCode::End => {
            let count = state.service.completed().len();
            state.done_state.select(count.checked_sub(1));
        }
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('L') => state.close_done_list(),
        _ => {}
    }
}
