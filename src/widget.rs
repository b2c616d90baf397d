use crate::config::Theme;
use crate::grid::{DayCell, DAYS_IN_WEEK, WEEKS_PER_GRID};
use crate::picker::CalendarPicker;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::Span,
    widgets::Widget,
};

/// Number of columns per day of week
pub const DAY_WIDTH: u16 = 4;

/// Width of the calendar in columns
pub const GRID_WIDTH: u16 = DAY_WIDTH * 7;

/// Number of lines taken up by the title, the weekday labels and their rule
const HEADER_LINES: u16 = 3;

/// Height of the calendar in lines
pub const GRID_HEIGHT: u16 = HEADER_LINES + 6;

const ACS_HLINE: char = '─';

/// Turns a day cell into the text drawn for it.  The returned span should be
/// [`DAY_WIDTH`] columns wide.
pub trait DayRenderer {
    fn render(&self, cell: &DayCell, theme: &Theme) -> Span<'static>;
}

/// Draws the day of the month right-aligned, styled by the first of
/// selected, today and other-month that applies to the cell
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DefaultDayRenderer;

impl DayRenderer for DefaultDayRenderer {
    fn render(&self, cell: &DayCell, theme: &Theme) -> Span<'static> {
        let style = if cell.is_selected() {
            theme.selected
        } else if cell.is_today() {
            theme.today
        } else if cell.is_other_month() {
            theme.other_month
        } else {
            theme.day
        };
        Span::styled(format!(" {:>2} ", cell.day()), style)
    }
}

impl<R: DayRenderer> CalendarPicker<R> {
    /// Return the cell of the focused month drawn at the given terminal
    /// position when the picker is rendered into `area`
    pub fn cell_at(&self, area: Rect, column: u16, row: u16) -> Option<&DayCell> {
        let grid = grid_area(area);
        if !grid.contains(Position::new(column, row)) {
            return None;
        }
        let week = usize::from((row - grid.y).checked_sub(HEADER_LINES)?);
        let wd = usize::from((column - grid.x) / DAY_WIDTH);
        let center = self.pages().center();
        if self.config().hide_unused_weeks && week >= center.week_count() {
            return None;
        }
        center.cell(week * DAYS_IN_WEEK + wd)
    }
}

impl<R: DayRenderer> Widget for &CalendarPicker<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.config().theme;
        let center = self.pages().center();
        let anchor = center.anchor();
        let mut canvas = BufferCanvas::new(grid_area(area), buf);
        let title = format!("{} {}", anchor.month_name(), anchor.year());
        canvas.print_centered(0, &title, theme.title);
        for wd in 1..=7u8 {
            let label = format!(" {} ", anchor.locale().weekday_initials(wd));
            canvas.mvprint(1, DAY_WIDTH * u16::from(wd - 1), &label, theme.weekday_label);
        }
        canvas.hline(2, ACS_HLINE, GRID_WIDTH);
        let shown = if self.config().hide_unused_weeks {
            center.week_count()
        } else {
            WEEKS_PER_GRID
        };
        for (i, week) in std::iter::zip(0u16.., center.weeks().take(shown)) {
            for (j, cell) in std::iter::zip(0u16.., week) {
                let span = self.renderer().render(cell, theme);
                canvas.mvprint(HEADER_LINES + i, DAY_WIDTH * j, &span.content, span.style);
            }
        }
    }
}

fn grid_area(area: Rect) -> Rect {
    let width = GRID_WIDTH.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: GRID_HEIGHT.min(area.height),
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn print_centered(&mut self, y: u16, s: &str, style: Style) {
        let width = u16::try_from(Span::raw(s).width()).unwrap_or(u16::MAX);
        self.mvprint(y, self.area.width.saturating_sub(width) / 2, s, style);
    }

    // Text extending past the right edge of the area is truncated.
    fn mvprint(&mut self, y: u16, x: u16, s: &str, style: Style) {
        if y < self.area.height && x < self.area.width {
            self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(self.area.width - x),
                style,
            );
        }
    }

    fn hline(&mut self, y: u16, ch: char, length: u16) {
        self.mvprint(y, 0, &String::from(ch).repeat(length.into()), Style::new());
    }
}
