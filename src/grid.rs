use crate::error::OutOfTimeError;
use crate::moment::{days_in_month, CalendarDate, TimeUnit};
use std::iter::successors;
use std::slice::Chunks;
use time::Date;

pub const DAYS_IN_WEEK: usize = 7;

/// Every grid has this many rows, whether or not the month needs them all
pub const WEEKS_PER_GRID: usize = 6;

pub const CELLS_PER_GRID: usize = DAYS_IN_WEEK * WEEKS_PER_GRID;

/// A single day as displayed in a [`MonthGrid`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DayCell {
    date: CalendarDate,
    is_today: bool,
    is_other_month: bool,
    is_selected: bool,
}

impl DayCell {
    fn new(date: CalendarDate, anchor: &CalendarDate, today: Date) -> DayCell {
        DayCell {
            is_today: date.date() == today,
            is_other_month: !anchor.is_same_month(&date),
            is_selected: false,
            date,
        }
    }

    /// The first instant of the cell's day
    pub fn date(&self) -> &CalendarDate {
        &self.date
    }

    pub fn day(&self) -> u8 {
        self.date.day()
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    /// True for the leading and trailing days that belong to the months
    /// before and after the grid's anchor month
    pub fn is_other_month(&self) -> bool {
        self.is_other_month
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }
}

/// The 6×7 block of days shown for one month, starting on the Sunday on or
/// before the first of the month
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthGrid {
    anchor: CalendarDate,
    // Invariant: exactly CELLS_PER_GRID consecutive days
    cells: Vec<DayCell>,
}

impl MonthGrid {
    /// `today` is the host's current date, in the same offset as `anchor`
    pub fn new(anchor: &CalendarDate, today: Date) -> Result<MonthGrid, OutOfTimeError> {
        let anchor = anchor.start_of(TimeUnit::Months);
        let cells = make_cells(&anchor, today)?;
        Ok(MonthGrid { anchor, cells })
    }

    /// Re-anchor the grid on the month containing `anchor`.  On error, the
    /// grid is left as it was.
    pub fn rebuild(&mut self, anchor: &CalendarDate, today: Date) -> Result<(), OutOfTimeError> {
        let anchor = anchor.start_of(TimeUnit::Months);
        self.cells = make_cells(&anchor, today)?;
        self.anchor = anchor;
        Ok(())
    }

    /// The first instant of the month the grid represents
    pub fn anchor(&self) -> &CalendarDate {
        &self.anchor
    }

    /// Whether this grid represents the month containing `date`
    pub fn shows_month_of(&self, date: &CalendarDate) -> bool {
        self.anchor.is_same_month(date)
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&DayCell> {
        self.cells.get(index)
    }

    pub fn weeks(&self) -> Chunks<'_, DayCell> {
        self.cells.chunks(DAYS_IN_WEEK)
    }

    /// Number of rows actually spanned by the anchor month; the remaining
    /// rows hold only days of the following month.
    pub fn week_count(&self) -> usize {
        let month_len = usize::from(days_in_month(self.anchor.year(), self.anchor.date().month()));
        let lead = usize::from(self.anchor.weekday()) - 1;
        (month_len + lead).div_ceil(DAYS_IN_WEEK)
    }

    pub fn selected_cell(&self) -> Option<&DayCell> {
        self.cells.iter().find(|c| c.is_selected)
    }

    /// Flag the in-month cell falling on `selected`, clearing every other
    /// cell.  Days shown in the leading and trailing rows are never flagged,
    /// as they belong to the neighboring grids.
    pub fn mark_selected(&mut self, selected: Option<Date>) {
        for cell in &mut self.cells {
            cell.is_selected = !cell.is_other_month && Some(cell.date.date()) == selected;
        }
    }

    pub fn set_today(&mut self, today: Date) {
        for cell in &mut self.cells {
            cell.is_today = cell.date.date() == today;
        }
    }
}

fn first_visible_day(anchor: &CalendarDate) -> Option<CalendarDate> {
    // Step back from the end of the 1st rather than its start so that the
    // subtraction cannot land on the wrong side of a day boundary.
    let start = anchor.start_of(TimeUnit::Months);
    start
        .end_of(TimeUnit::Days)
        .checked_subtract(i64::from(start.weekday()) - 1, TimeUnit::Days)
        .map(|d| d.start_of(TimeUnit::Days))
}

fn make_cells(anchor: &CalendarDate, today: Date) -> Result<Vec<DayCell>, OutOfTimeError> {
    let first = first_visible_day(anchor).ok_or(OutOfTimeError)?;
    let cells = successors(Some(first), |d| d.checked_add(1, TimeUnit::Days))
        .take(CELLS_PER_GRID)
        .map(|date| DayCell::new(date, anchor, today))
        .collect::<Vec<_>>();
    if cells.len() == CELLS_PER_GRID {
        Ok(cells)
    } else {
        Err(OutOfTimeError)
    }
}
