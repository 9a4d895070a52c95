use crate::app::AppState;
use crate::storage::KeyValueStore;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render<S: KeyValueStore>(f: &mut Frame, state: &mut AppState<S>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" catlist ")
        .style(Style::default().bg(state.theme.background));

    if state.layout.is_empty() {
        let message = if state.search.is_empty() {
            "You didn't add anything yet.".to_string()
        } else {
            format!("No items match \"{}\"", state.search.text())
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(state.theme.muted),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header_style = Style::default()
        .fg(state.theme.header)
        .add_modifier(Modifier::BOLD);
    let item_style = Style::default().fg(state.theme.foreground);

    // One line per section header plus one per row; must agree with
    // ListLayout::display_line so the selection lands on the right line.
    let mut lines: Vec<ListItem> = Vec::with_capacity(state.layout.row_count() + state.layout.sections().len());
    for section in state.layout.sections() {
        lines.push(ListItem::new(Line::from(Span::styled(
            format!("{} ({})", section.title, section.rows.len()),
            header_style,
        ))));
        for row in &section.rows {
            lines.push(ListItem::new(Line::from(vec![
                Span::styled("  • ", Style::default().fg(state.theme.muted)),
                Span::styled(row.as_str(), item_style),
            ])));
        }
    }

    let list = List::new(lines)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(state.theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, area, &mut state.list_state);
}
