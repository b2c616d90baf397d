use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use swipecal::config::BASE_STYLE;
use swipecal::widget::{GRID_HEIGHT, GRID_WIDTH};
use swipecal::{CalendarDate, CalendarPicker, Direction, TimeUnit, Viewport};

/// Past this fraction of a page, releasing a drag completes the swipe
const SNAP_THRESHOLD: f64 = 0.5;

#[derive(Debug)]
pub(crate) struct App {
    picker: CalendarPicker,
    state: AppState,
    drag: Option<Drag>,

    /// Where the picker was last drawn, for mapping mouse positions to days
    area: Rect,
}

impl App {
    pub(crate) fn new(picker: CalendarPicker) -> App {
        App {
            picker,
            state: AppState::Calendar,
            drag: None,
            area: Rect::default(),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let event = read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(mouse) = event {
            self.handle_mouse(mouse);
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.select_adjacent(Direction::Backward),
                KeyCode::Char('l') | KeyCode::Right => self.select_adjacent(Direction::Forward),
                KeyCode::Char('p') | KeyCode::PageUp => self.picker.go_to_previous_month(),
                KeyCode::Char('n') | KeyCode::PageDown => self.picker.go_to_next_month(),
                KeyCode::Char('0') | KeyCode::Home => self.reset(),
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char(c @ '0'..='9') => match c.to_digit(10).map(u8::try_from) {
                            Some(Ok(d)) => state.handle_input(JumpToInput::Digit(d)),
                            _ => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.jump_to(date)
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        if self.state != AppState::Calendar {
            return;
        }
        let MouseEvent {
            kind, column, row, ..
        } = event;
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = Some(Drag {
                    origin: column,
                    moved: false,
                });
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.moved |= column != drag.origin;
                    let ratio = drag.ratio(column);
                    if let Ok(Some(_)) = self.picker.scroll(Viewport::dragging(ratio)) {
                        // Keep swiping relative to the newly focused month
                        drag.origin = column;
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => match self.drag.take() {
                Some(drag) if drag.moved => {
                    let ratio = drag.ratio(column);
                    let target = if ratio >= 1.0 + SNAP_THRESHOLD {
                        2.0
                    } else if ratio <= 1.0 - SNAP_THRESHOLD {
                        0.0
                    } else {
                        1.0
                    };
                    // A failed commit has already been logged by the picker
                    let _ = self.picker.scroll(Viewport::decelerating(target));
                    self.picker.settle();
                }
                Some(_) => {
                    self.tap(column, row);
                }
                None => (),
            },
            _ => (),
        }
    }

    /// Returns whether a day was selected
    fn tap(&mut self, column: u16, row: u16) -> bool {
        let Some(cell) = self.picker.cell_at(self.area, column, row) else {
            return false;
        };
        let (date, is_other_month) = (*cell.date(), cell.is_other_month());
        match self.picker.tap(&date, is_other_month) {
            Ok(selected) => selected,
            Err(e) => {
                tracing::warn!(error = %e, %date, "Failed to select tapped day");
                false
            }
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn select_adjacent(&mut self, direction: Direction) -> bool {
        self.picker.select_adjacent_day(direction).is_ok()
    }

    fn reset(&mut self) -> bool {
        let today = self.picker.today().start_of(TimeUnit::Days);
        self.show(&today)
    }

    fn jump_to(&mut self, date: time::Date) -> bool {
        let date = CalendarDate::from_date(date, self.picker.today().offset());
        self.show(&date)
    }

    fn show(&mut self, date: &CalendarDate) -> bool {
        self.picker.select_date(date).is_ok() && self.picker.show_month(date).is_ok()
    }

    fn status(&self) -> String {
        match self.picker.selected().map(|d| d.format("EEEE, MMMM d, yyyy")) {
            Some(Ok(s)) => s,
            Some(Err(_)) | None => String::from("No day selected"),
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        self.area = area;
        self.picker.render(area, buf);
        if let Some(y) = area.y.checked_add(GRID_HEIGHT + 1) {
            if y < area.bottom() {
                Line::styled(self.status(), BASE_STYLE)
                    .centered()
                    .render(Rect::new(area.x, y, area.width, 1), buf);
            }
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

/// A left-button drag in progress
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Drag {
    origin: u16,
    moved: bool,
}

impl Drag {
    /// Viewport position for the pointer being at `column`: dragging leftward
    /// by the width of the calendar reaches the next month.  The position
    /// never goes past the neighboring months.
    fn ratio(&self, column: u16) -> f64 {
        let dx = f64::from(column) - f64::from(self.origin);
        (1.0 - dx / f64::from(GRID_WIDTH)).clamp(0.0, 2.0)
    }
}
