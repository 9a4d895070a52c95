pub mod done_list;
pub mod help;
pub mod input_line;
pub mod picker;
pub mod status_bar;
pub mod todo_list;

use crate::app::mode::Mode;
use crate::app::AppState;
use crate::storage::KeyValueStore;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub fn render<S: KeyValueStore>(f: &mut Frame, state: &mut AppState<S>) {
    state.terminal_height = f.area().height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // List
            Constraint::Length(1), // Input line
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    if state.mode == Mode::DoneList {
        done_list::render(f, state, chunks[0]);
    } else {
        todo_list::render(f, state, chunks[0]);
    }

    input_line::render(f, state, chunks[1]);
    status_bar::render(f, state, chunks[2]);

    if state.picker.is_some() {
        picker::render(f, state);
    }

    if state.show_help {
        help::render(f, state);
    }
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
