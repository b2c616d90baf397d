use crate::error::OutOfTimeError;
use crate::moment::{CalendarDate, TimeUnit};
use crate::pager::PageBuffer;

/// Outcome of [`SelectionController::select`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selection {
    /// The newly selected day, truncated to its start
    pub date: CalendarDate,

    /// Whether the month was not loaded and all three grids were rebuilt
    /// around it
    pub rebuilt: bool,
}

/// Tracks the single selected day and keeps the grids' selection flags in
/// step with it
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectionController {
    selected: Option<CalendarDate>,
}

impl SelectionController {
    pub fn new() -> SelectionController {
        SelectionController::default()
    }

    pub fn selected(&self) -> Option<&CalendarDate> {
        self.selected.as_ref()
    }

    /// Select the day containing `date`.  If no grid shows its month, the
    /// buffer is rebuilt around it first; if that fails, nothing changes.
    pub fn select(
        &mut self,
        date: &CalendarDate,
        pages: &mut PageBuffer,
    ) -> Result<Selection, OutOfTimeError> {
        let date = date.start_of(TimeUnit::Days);
        let rebuilt = !pages.contains_month(&date);
        if rebuilt {
            pages.rebuild_around(&date)?;
        }
        self.selected = Some(date);
        self.apply(pages);
        tracing::trace!(%date, rebuilt, "Selected day");
        Ok(Selection { date, rebuilt })
    }

    /// Re-derive every cell's selection flag, as needed after a grid has
    /// been rebuilt
    pub fn apply(&self, pages: &mut PageBuffer) {
        let selected = self.selected.map(|d| d.date());
        for grid in pages.grids_mut() {
            grid.mark_selected(selected);
        }
    }
}
