use crate::app::AppState;
use crate::storage::KeyValueStore;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render<S: KeyValueStore>(f: &mut Frame, state: &AppState<S>, area: Rect) {
    if let Some((message, _)) = &state.status_message {
        render_status_message(f, state, message, area);
        return;
    }

    let map = state.service.map();
    let filter_indicator = match &state.filtered {
        Some(view) if view.is_active() => {
            format!(" | /{} ({} shown)", view.query(), state.layout.row_count())
        }
        _ => String::new(),
    };

    let left_content = format!(
        " {} | {} items in {} categories | {} done{}",
        state.mode,
        map.item_count(),
        map.categories().len(),
        state.service.completed().len(),
        filter_indicator
    );
    let right_content = format!("? help  q quit  v{VERSION} ");

    let padding = (area.width as usize).saturating_sub(left_content.width() + right_content.width());

    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);

    let status_line = format!("{left_content}{:padding$}{right_content}", "");
    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}

fn render_status_message<S: KeyValueStore>(f: &mut Frame, state: &AppState<S>, message: &str, area: Rect) {
    let display_message = format!(" {message} ");

    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.message_bg)
        .add_modifier(Modifier::BOLD);

    let padding = (area.width as usize).saturating_sub(display_message.width());
    let status_line = format!("{display_message}{:padding$}", "");

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}
