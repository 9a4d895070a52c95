use crate::app::AppState;
use crate::storage::KeyValueStore;
use ratatui::{
    layout::Margin,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use super::centered_rect;

type HelpSection = (&'static str, &'static [(&'static str, &'static str)]);

const HELP_SECTIONS: &[HelpSection] = &[
    (
        "Navigate",
        &[
            ("j / ↓", "Next item"),
            ("k / ↑", "Previous item"),
            ("g / G", "First / last item"),
            ("a / n / o", "Add an item"),
            ("e / i / Enter", "Edit the selected item"),
            ("x / Space", "Complete (moves to the Done List)"),
            ("d / Delete", "Delete without logging"),
            ("/", "Search"),
            ("L", "Open the Done List"),
            ("R", "Reload from disk"),
            ("q", "Quit"),
        ],
    ),
    (
        "Editing",
        &[
            ("Enter", "Save"),
            ("Esc", "Discard"),
            ("Tab", "Choose a category"),
            ("← / →", "Move cursor"),
            ("Ctrl+← / Ctrl+→", "Move by word"),
            ("Home / End", "Start / end of line"),
        ],
    ),
    (
        "Search",
        &[
            ("type", "Filter as you type"),
            ("Enter", "Keep the filter and browse"),
            ("Esc", "Clear the filter"),
        ],
    ),
];

const fn help_total_lines() -> u16 {
    // heading + entries + blank per section, then the footer
    let mut lines = 1;
    let mut i = 0;
    while i < HELP_SECTIONS.len() {
        lines += HELP_SECTIONS[i].1.len() + 2;
        i += 1;
    }
    lines as u16
}

/// Total number of lines in the help content
pub const HELP_TOTAL_LINES: u16 = help_total_lines();

pub fn render<S: KeyValueStore>(f: &mut Frame, state: &AppState<S>) {
    let key_style = Style::default().fg(state.theme.accent).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(state.theme.foreground);
    let section_style = Style::default().fg(state.theme.header).add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = vec![];
    for (title, entries) in HELP_SECTIONS {
        lines.push(Line::from(Span::styled(format!("  {title}"), section_style)));
        for (keys, description) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("    {keys:<18}"), key_style),
                Span::styled(*description, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "  ↑/↓ or j/k to scroll • Esc or ? to close",
        dim_style,
    )));

    let total_lines = lines.len() as u16;
    let area = centered_rect(65, 80, f.area());
    let inner_height = area.height.saturating_sub(2);

    let max_scroll = total_lines.saturating_sub(inner_height);
    let scroll_offset = state.help_scroll.min(max_scroll) as usize;

    let visible_items: Vec<ListItem> = lines
        .into_iter()
        .skip(scroll_offset)
        .take(inner_height as usize)
        .map(ListItem::new)
        .collect();

    let list_widget = List::new(visible_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .title_bottom(Line::from(" ↑↓ scroll ").centered())
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(list_widget, area);

    if total_lines > inner_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll as usize + 1).position(scroll_offset);

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_lines_matches_content() {
        let entries: usize = HELP_SECTIONS.iter().map(|(_, e)| e.len()).sum();
        assert_eq!(HELP_TOTAL_LINES as usize, entries + HELP_SECTIONS.len() * 2 + 1);
    }
}
