use crate::app::mode::Mode;
use crate::app::AppState;
use crate::storage::KeyValueStore;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn render<S: KeyValueStore>(f: &mut Frame, state: &AppState<S>, area: Rect) {
    let prompt_style = Style::default()
        .fg(state.theme.accent)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(state.theme.foreground);

    let (prompt, input, focused) = match (&state.editor, state.mode) {
        (Some(session), _) => (
            format!(" {} [{}] > ", session.title(), session.category),
            &session.input,
            state.mode == Mode::Edit,
        ),
        (None, Mode::Search) => (" / ".to_string(), &state.search, true),
        (None, _) if !state.search.is_empty() => (" / ".to_string(), &state.search, false),
        _ => {
            let hint = Paragraph::new(Line::from(Span::styled(
                " a add • e edit • x complete • / search",
                Style::default().fg(state.theme.muted),
            )));
            f.render_widget(hint, area);
            return;
        }
    };

    let line = Line::from(vec![
        Span::styled(prompt.as_str(), prompt_style),
        Span::styled(input.text(), text_style),
    ]);
    f.render_widget(Paragraph::new(line), area);

    if focused {
        let x = area.x + prompt.width() as u16 + input.cursor_column();
        f.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
    }
}
