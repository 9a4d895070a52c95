use crate::app::AppState;
use crate::storage::KeyValueStore;
use crate::todo::CompletedRecord;
use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Second line under each finished item.
pub fn record_details(record: &CompletedRecord) -> String {
    let finished = record.completed_at.with_timezone(&Local);
    format!(
        "Category: {} • Finished: {}",
        record.category,
        finished.format("%Y-%m-%d %H:%M")
    )
}

pub fn render<S: KeyValueStore>(f: &mut Frame, state: &mut AppState<S>, area: Rect) {
    let records = state.service.completed().records();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Done List ({}) ", records.len()))
        .title_bottom(Line::from(" Esc to go back ").centered())
        .style(Style::default().bg(state.theme.background));

    if records.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "You didn't complete any tasks yet!",
            Style::default().fg(state.theme.muted),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let text_style = Style::default()
        .fg(state.theme.foreground)
        .add_modifier(Modifier::CROSSED_OUT);
    let detail_style = Style::default().fg(state.theme.muted);

    let items: Vec<ListItem> = records
        .iter()
        .map(|record| {
            ListItem::new(vec![
                Line::from(Span::styled(record.text.as_str(), text_style)),
                Line::from(Span::styled(format!("  {}", record_details(record)), detail_style)),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(state.theme.selection_bg));

    f.render_stateful_widget(list, area, &mut state.done_state);
}
