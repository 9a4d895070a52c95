use crate::config::Config;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub header: Color,
    pub muted: Color,
    pub accent: Color,
    pub selection_bg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub message_bg: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            header: Color::Cyan,
            muted: Color::DarkGray,
            accent: Color::Yellow,
            selection_bg: Color::Rgb(60, 60, 60),
            status_bar_bg: Color::Rgb(40, 40, 40),
            status_bar_fg: Color::White,
            message_bg: Color::Rgb(0, 100, 0),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            ..Self::default_theme()
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            header: Color::Blue,
            muted: Color::Gray,
            accent: Color::Rgb(180, 130, 0), // Darker yellow for light backgrounds
            selection_bg: Color::Rgb(210, 210, 230),
            status_bar_bg: Color::LightBlue,
            status_bar_fg: Color::Black,
            message_bg: Color::Rgb(120, 190, 120),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.theme.as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::default_theme(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
