use crate::config::CalendarConfig;
use crate::error::{OutOfTimeError, PagingError};
use crate::grid::DayCell;
use crate::moment::{CalendarDate, TimeUnit};
use crate::pager::{PageBuffer, Rotation, Viewport};
use crate::selection::{Selection, SelectionController};
use crate::widget::{DayRenderer, DefaultDayRenderer};
use std::fmt;

/// Direction for [`CalendarPicker::select_adjacent_day`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Forward,
    Backward,
}

type DateListener = Box<dyn FnMut(&CalendarDate)>;
type CellListener = Box<dyn FnMut(&DayCell)>;

#[derive(Default)]
struct Listeners {
    selection_changed: Vec<DateListener>,
    page_changed: Vec<DateListener>,
    cell_will_display: Vec<CellListener>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("selection_changed", &self.selection_changed.len())
            .field("page_changed", &self.page_changed.len())
            .field("cell_will_display", &self.cell_will_display.len())
            .finish()
    }
}

/// A paged month calendar with a single selectable day.
///
/// The host feeds the picker scroll reports, taps and navigation requests,
/// and is told about changes through the listeners registered with the
/// `on_*` methods.  Listeners are called synchronously, in registration
/// order, before the triggering method returns.
#[derive(Debug)]
pub struct CalendarPicker<R = DefaultDayRenderer> {
    pages: PageBuffer,
    selection: SelectionController,
    today: CalendarDate,
    config: CalendarConfig,
    renderer: R,
    listeners: Listeners,
}

impl CalendarPicker {
    /// Create a picker showing the month containing `today`.  All dates the
    /// picker produces are viewed in `today`'s offset and locale.
    pub fn new(today: CalendarDate, config: CalendarConfig) -> Result<CalendarPicker, OutOfTimeError> {
        Ok(CalendarPicker {
            pages: PageBuffer::new(&today, today.date())?,
            selection: SelectionController::new(),
            today,
            config,
            renderer: DefaultDayRenderer,
            listeners: Listeners::default(),
        })
    }
}

impl<R: DayRenderer> CalendarPicker<R> {
    pub fn with_renderer<R2: DayRenderer>(self, renderer: R2) -> CalendarPicker<R2> {
        CalendarPicker {
            pages: self.pages,
            selection: self.selection,
            today: self.today,
            config: self.config,
            renderer,
            listeners: self.listeners,
        }
    }

    pub fn on_selection_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&CalendarDate) + 'static,
    {
        self.listeners.selection_changed.push(Box::new(listener));
    }

    /// `listener` receives the first instant of the newly focused month
    pub fn on_page_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&CalendarDate) + 'static,
    {
        self.listeners.page_changed.push(Box::new(listener));
    }

    /// `listener` is called for every cell of all three grids whenever the
    /// picker reloads
    pub fn on_cell_will_display<F>(&mut self, listener: F)
    where
        F: FnMut(&DayCell) + 'static,
    {
        self.listeners.cell_will_display.push(Box::new(listener));
    }

    pub fn pages(&self) -> &PageBuffer {
        &self.pages
    }

    pub fn selected(&self) -> Option<&CalendarDate> {
        self.selection.selected()
    }

    pub fn today(&self) -> &CalendarDate {
        &self.today
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The first instant of the month currently in focus
    pub fn current_month(&self) -> &CalendarDate {
        self.pages.center().anchor()
    }

    pub fn is_paged(&self) -> bool {
        self.pages.is_paged()
    }

    /// Select the day containing `date`, bringing its month into view if no
    /// grid shows it
    pub fn select_date(&mut self, date: &CalendarDate) -> Result<(), OutOfTimeError> {
        let date = self.localize(date)?;
        let Selection { date, rebuilt } = self.selection.select(&date, &mut self.pages)?;
        for listener in &mut self.listeners.selection_changed {
            listener(&date);
        }
        if rebuilt {
            self.page_changed();
            self.reload();
        }
        Ok(())
    }

    /// Bring the month containing `date` into focus without changing the
    /// selection.  A neighboring month is paged to when the calendar is at
    /// rest; any other month is laid out from scratch.
    pub fn show_month(&mut self, date: &CalendarDate) -> Result<(), OutOfTimeError> {
        let date = self.localize(date)?;
        if self.pages.center().shows_month_of(&date)
            || (self.pages.right().shows_month_of(&date) && self.go_to_next_month())
            || (self.pages.left().shows_month_of(&date) && self.go_to_previous_month())
        {
            return Ok(());
        }
        self.pages.rebuild_around(&date)?;
        self.selection.apply(&mut self.pages);
        self.page_changed();
        self.reload();
        Ok(())
    }

    /// Select the day after or before the current selection (or today, if
    /// nothing is selected).  If that crosses into a month that is not in
    /// focus, the calendar pages over to it.
    pub fn select_adjacent_day(&mut self, direction: Direction) -> Result<(), OutOfTimeError> {
        let base = match self.selection.selected() {
            Some(&d) => d,
            None => self.today.start_of(TimeUnit::Days),
        };
        let next = match direction {
            Direction::Forward => base.checked_add(1, TimeUnit::Days),
            Direction::Backward => base.checked_subtract(1, TimeUnit::Days),
        }
        .ok_or(OutOfTimeError)?;
        self.select_date(&next)?;
        if !base.is_same_month(&next) && !self.pages.center().shows_month_of(&next) {
            if self.pages.right().shows_month_of(&next) {
                self.go_to_next_month();
            } else if self.pages.left().shows_month_of(&next) {
                self.go_to_previous_month();
            }
        }
        Ok(())
    }

    /// Page forward one month.  Returns `false` if the calendar is still
    /// moving or the next month cannot be represented.
    pub fn go_to_next_month(&mut self) -> bool {
        self.go_to_page(2.0)
    }

    /// Page backward one month.  Returns `false` if the calendar is still
    /// moving or the previous month cannot be represented.
    pub fn go_to_previous_month(&mut self) -> bool {
        self.go_to_page(0.0)
    }

    fn go_to_page(&mut self, ratio: f64) -> bool {
        if !self.pages.is_paged() {
            return false;
        }
        matches!(self.scroll(Viewport::at_rest(ratio)), Ok(Some(_)))
    }

    /// Report the current scroll position.  Committing to a page rotates the
    /// grids, notifies page listeners and reloads.  On error the picker is
    /// unchanged.
    pub fn scroll(&mut self, viewport: Viewport) -> Result<Option<Rotation>, PagingError> {
        match self.pages.on_scroll(viewport) {
            Ok(Some(rotation)) => {
                self.selection.apply(&mut self.pages);
                tracing::debug!(
                    ?rotation,
                    month = %self.current_month(),
                    "Paged to new month"
                );
                self.page_changed();
                self.reload();
                Ok(Some(rotation))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, ratio = viewport.ratio(), "Failed to commit page");
                Err(e)
            }
        }
    }

    /// Scrolling ended without a commit; return to the focused month
    pub fn settle(&mut self) {
        self.pages.settle();
    }

    /// Handle a tap on a day cell.  Taps on days belonging to neighboring
    /// months are ignored, and `Ok(false)` is returned.
    pub fn tap(&mut self, date: &CalendarDate, is_other_month: bool) -> Result<bool, OutOfTimeError> {
        if is_other_month {
            return Ok(false);
        }
        self.select_date(date)?;
        Ok(true)
    }

    /// Notify cell listeners of every cell in the buffer
    pub fn reload(&mut self) {
        for grid in self.pages.grids() {
            for cell in grid.cells() {
                for listener in &mut self.listeners.cell_will_display {
                    listener(cell);
                }
            }
        }
    }

    pub fn set_today(&mut self, today: CalendarDate) {
        self.today = today;
        self.pages.set_today(today.date());
    }

    fn localize(&self, date: &CalendarDate) -> Result<CalendarDate, OutOfTimeError> {
        date.checked_to_offset(self.today.offset())
            .map(|d| d.with_locale(self.today.locale()))
            .ok_or(OutOfTimeError)
    }

    fn page_changed(&mut self) {
        let month = *self.pages.center().anchor();
        for listener in &mut self.listeners.page_changed {
            listener(&month);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MonthGrid;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::{datetime, offset};
    use time::UtcOffset;

    fn ymd(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day, UtcOffset::UTC).unwrap()
    }

    fn picker() -> CalendarPicker {
        CalendarPicker::new(ymd(2015, 10, 12), CalendarConfig::default()).unwrap()
    }

    #[derive(Clone, Debug, Default)]
    struct Events {
        selections: Rc<RefCell<Vec<CalendarDate>>>,
        pages: Rc<RefCell<Vec<CalendarDate>>>,
        cells: Rc<RefCell<usize>>,
    }

    impl Events {
        fn attach(picker: &mut CalendarPicker) -> Events {
            let events = Events::default();
            let selections = Rc::clone(&events.selections);
            picker.on_selection_changed(move |d| selections.borrow_mut().push(*d));
            let pages = Rc::clone(&events.pages);
            picker.on_page_changed(move |d| pages.borrow_mut().push(*d));
            let cells = Rc::clone(&events.cells);
            picker.on_cell_will_display(move |_| *cells.borrow_mut() += 1);
            events
        }

        fn selections(&self) -> Vec<CalendarDate> {
            self.selections.borrow().clone()
        }

        fn pages(&self) -> Vec<CalendarDate> {
            self.pages.borrow().clone()
        }

        fn cells(&self) -> usize {
            *self.cells.borrow()
        }
    }

    fn month_of(picker: &CalendarPicker) -> (i32, u8) {
        (picker.current_month().year(), picker.current_month().month())
    }

    #[test]
    fn test_select_in_window() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        p.select_date(&ymd(2015, 11, 3)).unwrap();
        assert_eq!(events.selections(), [ymd(2015, 11, 3)]);
        assert!(events.pages().is_empty());
        assert_eq!(events.cells(), 0);
        assert_eq!(p.pages().full_rebuilds(), 0);
        assert_eq!(month_of(&p), (2015, 10));
    }

    #[test]
    fn test_select_out_of_window() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        p.select_date(&ymd(2016, 3, 1)).unwrap();
        assert_eq!(events.selections(), [ymd(2016, 3, 1)]);
        assert_eq!(events.pages(), [ymd(2016, 3, 1)]);
        assert_eq!(events.cells(), 3 * 42);
        assert_eq!(p.pages().full_rebuilds(), 1);
        assert_eq!(month_of(&p), (2016, 3));
    }

    #[test]
    fn test_select_converts_offset() {
        let mut p = picker();
        // Still October 31st in UTC
        let evening = CalendarDate::from_ymd(2015, 11, 1, offset!(+3))
            .unwrap()
            .add(1, TimeUnit::Hours);
        p.select_date(&evening).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 10, 31)));
        assert_eq!(p.selected().map(CalendarDate::offset), Some(UtcOffset::UTC));
    }

    #[test]
    fn test_next_then_previous_month() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        assert!(p.go_to_next_month());
        assert_eq!(month_of(&p), (2015, 11));
        assert!(p.go_to_previous_month());
        assert_eq!(month_of(&p), (2015, 10));
        assert_eq!(p.pages().grid_rebuilds(), 2);
        assert_eq!(p.pages().full_rebuilds(), 0);
        assert_eq!(events.pages(), [ymd(2015, 11, 1), ymd(2015, 10, 1)]);
        assert_eq!(events.cells(), 2 * 3 * 42);
    }

    #[test]
    fn test_navigation_ignored_while_moving() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        assert_eq!(p.scroll(Viewport::dragging(1.4)), Ok(None));
        assert!(!p.is_paged());
        assert!(!p.go_to_next_month());
        assert!(!p.go_to_previous_month());
        assert_eq!(month_of(&p), (2015, 10));
        assert!(events.pages().is_empty());
        p.settle();
        assert!(p.go_to_next_month());
        assert_eq!(month_of(&p), (2015, 11));
    }

    #[test]
    fn test_swipe() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        for ratio in [1.2, 1.5, 1.9] {
            assert_eq!(p.scroll(Viewport::dragging(ratio)), Ok(None));
        }
        assert_eq!(
            p.scroll(Viewport::decelerating(2.0)),
            Ok(Some(Rotation::Forward))
        );
        assert_eq!(month_of(&p), (2015, 11));
        assert!(p.is_paged());
        assert_eq!(events.pages(), [ymd(2015, 11, 1)]);
    }

    #[test]
    fn test_failed_commit_leaves_state() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        assert_eq!(
            p.scroll(Viewport::decelerating(4.0)),
            Err(PagingError::Inconsistent { page: 4 })
        );
        assert_eq!(month_of(&p), (2015, 10));
        assert!(events.pages().is_empty());
        assert_eq!(events.cells(), 0);
    }

    #[test]
    fn test_selection_survives_paging() {
        let mut p = picker();
        p.select_date(&ymd(2015, 10, 20)).unwrap();
        for _ in 0..3 {
            p.go_to_next_month();
        }
        for _ in 0..3 {
            p.go_to_previous_month();
        }
        let selected = p
            .pages()
            .grids()
            .flat_map(MonthGrid::cells)
            .filter(|c| c.is_selected())
            .map(|c| *c.date())
            .collect::<Vec<_>>();
        assert_eq!(selected, [ymd(2015, 10, 20)]);
    }

    #[test]
    fn test_next_day_across_year() {
        let mut p = picker();
        p.select_date(&ymd(2015, 12, 31)).unwrap();
        assert_eq!(month_of(&p), (2015, 12));
        let events = Events::attach(&mut p);
        p.select_adjacent_day(Direction::Forward).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2016, 1, 1)));
        assert_eq!(month_of(&p), (2016, 1));
        assert_eq!(events.selections(), [ymd(2016, 1, 1)]);
        assert_eq!(events.pages(), [ymd(2016, 1, 1)]);
        assert_eq!(p.pages().full_rebuilds(), 1);
    }

    #[test]
    fn test_previous_day_across_month() {
        let mut p = picker();
        p.select_date(&ymd(2015, 10, 1)).unwrap();
        p.select_adjacent_day(Direction::Backward).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 9, 30)));
        assert_eq!(month_of(&p), (2015, 9));
        p.select_adjacent_day(Direction::Forward).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 10, 1)));
        assert_eq!(month_of(&p), (2015, 10));
    }

    #[test]
    fn test_adjacent_day_within_month() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        p.select_adjacent_day(Direction::Forward).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 10, 13)));
        p.select_adjacent_day(Direction::Backward).unwrap();
        p.select_adjacent_day(Direction::Backward).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 10, 11)));
        assert_eq!(events.selections().len(), 3);
        assert!(events.pages().is_empty());
    }

    #[test]
    fn test_adjacent_day_when_not_focused() {
        let mut p = picker();
        p.select_date(&ymd(2015, 10, 31)).unwrap();
        p.go_to_next_month();
        assert_eq!(month_of(&p), (2015, 11));
        // November is already in focus, so no paging is needed
        p.select_adjacent_day(Direction::Forward).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 11, 1)));
        assert_eq!(month_of(&p), (2015, 11));
    }

    #[test]
    fn test_show_month() {
        let mut p = picker();
        p.select_date(&ymd(2015, 10, 20)).unwrap();
        let events = Events::attach(&mut p);
        p.show_month(&ymd(2015, 10, 31)).unwrap();
        assert!(events.pages().is_empty());
        p.show_month(&ymd(2015, 11, 30)).unwrap();
        assert_eq!(month_of(&p), (2015, 11));
        assert_eq!(p.pages().full_rebuilds(), 0);
        p.show_month(&ymd(2014, 2, 1)).unwrap();
        assert_eq!(month_of(&p), (2014, 2));
        assert_eq!(p.pages().full_rebuilds(), 1);
        assert_eq!(events.pages(), [ymd(2015, 11, 1), ymd(2014, 2, 1)]);
        p.show_month(&ymd(2015, 10, 1)).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 10, 20)));
        assert!(events.selections().is_empty());
        let selected = p
            .pages()
            .center()
            .selected_cell()
            .map(|c| *c.date());
        assert_eq!(selected, Some(ymd(2015, 10, 20)));
    }

    #[test]
    fn test_show_month_while_moving() {
        let mut p = picker();
        p.scroll(Viewport::dragging(1.6)).unwrap();
        p.show_month(&ymd(2015, 11, 1)).unwrap();
        assert_eq!(month_of(&p), (2015, 11));
        assert_eq!(p.pages().full_rebuilds(), 1);
        assert!(p.is_paged());
    }

    #[test]
    fn test_tap() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        assert_eq!(p.tap(&ymd(2015, 9, 28), true), Ok(false));
        assert_eq!(p.selected(), None);
        assert!(events.selections().is_empty());
        assert_eq!(p.tap(&ymd(2015, 10, 5), false), Ok(true));
        assert_eq!(p.selected(), Some(&ymd(2015, 10, 5)));
        assert_eq!(events.selections(), [ymd(2015, 10, 5)]);
    }

    #[test]
    fn test_reload() {
        let mut p = picker();
        let events = Events::attach(&mut p);
        p.reload();
        assert_eq!(events.cells(), 126);
    }

    #[test]
    fn test_set_today() {
        let mut p = picker();
        p.set_today(ymd(2015, 10, 13));
        let todays = p
            .pages()
            .center()
            .cells()
            .iter()
            .filter(|c| c.is_today())
            .map(DayCell::day)
            .collect::<Vec<_>>();
        assert_eq!(todays, [13]);
        p.select_adjacent_day(Direction::Forward).unwrap();
        assert_eq!(p.selected(), Some(&ymd(2015, 10, 14)));
    }

    #[test]
    fn test_end_of_time() {
        let mut p = picker();
        p.select_date(&ymd(9999, 10, 15)).unwrap();
        assert_eq!(month_of(&p), (9999, 10));
        assert!(!p.go_to_next_month());
        assert_eq!(month_of(&p), (9999, 10));
        assert!(p.is_paged());
        assert_eq!(p.select_date(&ymd(9999, 12, 31)), Err(OutOfTimeError));
        assert_eq!(p.selected(), Some(&ymd(9999, 10, 15)));
        // New Year's Day 10000 in UTC
        let west = CalendarDate::new(datetime!(9999-12-31 23:00 -5));
        assert_eq!(p.select_date(&west), Err(OutOfTimeError));
        assert_eq!(p.show_month(&west), Err(OutOfTimeError));
        assert_eq!(p.selected(), Some(&ymd(9999, 10, 15)));
        assert_eq!(month_of(&p), (9999, 10));
    }
}
