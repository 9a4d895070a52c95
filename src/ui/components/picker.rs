use crate::app::AppState;
use crate::storage::KeyValueStore;
use ratatui::{
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use super::centered_rect;

pub fn render<S: KeyValueStore>(f: &mut Frame, state: &AppState<S>) {
    let Some(picker) = &state.picker else {
        return;
    };

    let items: Vec<ListItem> = picker
        .categories
        .iter()
        .map(|c| ListItem::new(Line::from(format!(" {c} "))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Select a category ")
                .title_bottom(Line::from(" Enter pick • Esc back ").centered())
                .style(Style::default().bg(state.theme.background)),
        )
        .style(Style::default().fg(state.theme.foreground))
        .highlight_style(
            Style::default()
                .fg(state.theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let area = centered_rect(40, 50, f.area());
    let mut list_state = ListState::default().with_selected(Some(picker.selected));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut list_state);
}
