use ratatui::style::{Color, Modifier, Style};

/// Orange used for the selected day's background
const SELECTION_ORANGE: Color = Color::Indexed(208);

pub const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

/// Styles used when drawing a [`CalendarPicker`](crate::CalendarPicker)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Theme {
    pub day: Style,
    pub selected: Style,
    pub today: Style,
    pub other_month: Style,
    pub weekday_label: Style,
    pub title: Style,
}

impl Theme {
    pub const DEFAULT: Theme = Theme {
        day: BASE_STYLE,
        selected: Style::new()
            .fg(Color::White)
            .bg(SELECTION_ORANGE)
            .add_modifier(Modifier::BOLD),
        today: Style::new().fg(Color::Black).bg(Color::Gray),
        other_month: BASE_STYLE.fg(Color::DarkGray),
        weekday_label: BASE_STYLE.add_modifier(Modifier::BOLD),
        title: BASE_STYLE.add_modifier(Modifier::BOLD),
    };
}

impl Default for Theme {
    fn default() -> Theme {
        Theme::DEFAULT
    }
}

/// Construction-time settings for a [`CalendarPicker`](crate::CalendarPicker)
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CalendarConfig {
    pub theme: Theme,

    /// Leave blank the trailing rows that contain only days of the next
    /// month
    pub hide_unused_weeks: bool,
}

impl CalendarConfig {
    pub fn new() -> CalendarConfig {
        CalendarConfig::default()
    }

    pub fn theme(mut self, theme: Theme) -> CalendarConfig {
        self.theme = theme;
        self
    }

    pub fn hide_unused_weeks(mut self, hide: bool) -> CalendarConfig {
        self.hide_unused_weeks = hide;
        self
    }
}

