use crate::error::{OutOfTimeError, PagingError};
use crate::grid::MonthGrid;
use crate::moment::{CalendarDate, TimeUnit};
use time::Date;

/// Number of month grids kept laid out side by side
pub const PAGE_COUNT: usize = 3;

/// Page coordinate of the center grid
pub const CENTER_PAGE: f64 = 1.0;

// How close to `CENTER_PAGE` a resting viewport must be to count as centered
const CENTER_EPSILON: f64 = 1e-9;

/// A horizontal scroll position reported by the host, measured in pages:
/// 0.0 shows the left grid, 1.0 the center grid, 2.0 the right grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    ratio: f64,
    dragging: bool,
    decelerating: bool,
}

impl Viewport {
    pub fn at_rest(ratio: f64) -> Viewport {
        Viewport {
            ratio,
            dragging: false,
            decelerating: false,
        }
    }

    /// The user's finger (or mouse button) is still down
    pub fn dragging(ratio: f64) -> Viewport {
        Viewport {
            ratio,
            dragging: true,
            decelerating: false,
        }
    }

    /// Released, but still gliding towards a page
    pub fn decelerating(ratio: f64) -> Viewport {
        Viewport {
            ratio,
            dragging: false,
            decelerating: true,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_decelerating(&self) -> bool {
        self.decelerating
    }

    fn is_centered_at_rest(&self) -> bool {
        (self.ratio - CENTER_PAGE).abs() < CENTER_EPSILON && !self.dragging && !self.decelerating
    }
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport::at_rest(CENTER_PAGE)
    }
}

/// Direction in which the window of grids moved after a page commit
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Rotation {
    /// The former left grid is now in the center
    Backward,
    /// The former right grid is now in the center
    Forward,
}

/// Three month grids (previous, focused, next) kept around a swipeable
/// viewport.
///
/// The grids live in fixed storage slots; paging never allocates a new grid
/// but repurposes the one that fell off the far side of the window.  Each
/// slot remembers the page it was last laid out at, and a commit to a page
/// is resolved by looking up that position, as a scroll view would by
/// comparing frame origins.
#[derive(Clone, Debug)]
pub struct PageBuffer {
    grids: [MonthGrid; PAGE_COUNT],

    /// Storage slot shown at each page, left to right
    order: [usize; PAGE_COUNT],

    /// Page each storage slot was last laid out at
    origins: [usize; PAGE_COUNT],

    viewport: Viewport,

    /// True once the viewport has come to rest on the center page; month
    /// navigation requests are ignored otherwise.
    paged: bool,

    today: Date,
    grid_rebuilds: u64,
    full_rebuilds: u64,
}

impl PageBuffer {
    /// Lay out the month containing `focus` in the center, flanked by its
    /// neighbors
    pub fn new(focus: &CalendarDate, today: Date) -> Result<PageBuffer, OutOfTimeError> {
        Ok(PageBuffer {
            grids: grids_around(focus, today)?,
            order: [0, 1, 2],
            origins: [0, 1, 2],
            viewport: Viewport::default(),
            paged: true,
            today,
            grid_rebuilds: 0,
            full_rebuilds: 0,
        })
    }

    pub fn left(&self) -> &MonthGrid {
        &self.grids[self.order[0]]
    }

    pub fn center(&self) -> &MonthGrid {
        &self.grids[self.order[1]]
    }

    pub fn right(&self) -> &MonthGrid {
        &self.grids[self.order[2]]
    }

    /// The grids in page order, left to right
    pub fn grids(&self) -> impl Iterator<Item = &MonthGrid> + '_ {
        self.order.iter().map(|&slot| &self.grids[slot])
    }

    pub(crate) fn grids_mut(&mut self) -> impl Iterator<Item = &mut MonthGrid> + '_ {
        self.grids.iter_mut()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_paged(&self) -> bool {
        self.paged
    }

    pub fn today(&self) -> Date {
        self.today
    }

    /// Number of single-grid rebuilds performed by page commits
    pub fn grid_rebuilds(&self) -> u64 {
        self.grid_rebuilds
    }

    /// Number of times all three grids were rebuilt around a new month
    pub fn full_rebuilds(&self) -> u64 {
        self.full_rebuilds
    }

    /// Whether any of the three grids represents the month containing `date`
    pub fn contains_month(&self, date: &CalendarDate) -> bool {
        self.grids.iter().any(|g| g.shows_month_of(date))
    }

    /// Handle a scroll position report from the host.
    ///
    /// A report at or beyond either outer page commits to that page and
    /// rotates the grids; a report at rest on the center page marks the
    /// buffer as paged.  If the commit fails, the buffer is left exactly as
    /// it was before the report.
    pub fn on_scroll(&mut self, viewport: Viewport) -> Result<Option<Rotation>, PagingError> {
        let (prev_viewport, prev_paged) = (self.viewport, self.paged);
        self.paged = false;
        if viewport.ratio.is_nan() {
            return Ok(None);
        }
        self.viewport = viewport;
        if viewport.ratio >= 2.0 || viewport.ratio <= 0.0 {
            let r = self.commit(page_of(viewport.ratio));
            if r.is_err() {
                self.viewport = prev_viewport;
                self.paged = prev_paged;
            }
            r
        } else {
            if viewport.is_centered_at_rest() {
                self.paged = true;
            }
            Ok(None)
        }
    }

    /// Scrolling has ended without reaching another page; snap back to the
    /// center page.
    pub fn settle(&mut self) {
        self.viewport = Viewport::default();
        self.paged = true;
    }

    /// Discard all three grids and lay them out around the month containing
    /// `focus`.  On error, the buffer is left unchanged.
    pub fn rebuild_around(&mut self, focus: &CalendarDate) -> Result<(), OutOfTimeError> {
        self.grids = grids_around(focus, self.today)?;
        self.order = [0, 1, 2];
        self.layout();
        self.viewport = Viewport::default();
        self.paged = true;
        self.full_rebuilds += 1;
        tracing::debug!(month = %focus.start_of(TimeUnit::Months), "Rebuilt month grids");
        Ok(())
    }

    pub fn set_today(&mut self, today: Date) {
        self.today = today;
        for grid in &mut self.grids {
            grid.set_today(today);
        }
    }

    fn commit(&mut self, page: i64) -> Result<Option<Rotation>, PagingError> {
        let position = usize::try_from(page)
            .ok()
            .and_then(|p| self.origins.iter().position(|&o| o == p))
            .and_then(|slot| self.order.iter().position(|&s| s == slot))
            .ok_or(PagingError::Inconsistent { page })?;
        let [left, center, right] = self.order;
        let rotation = match position {
            0 => {
                let anchor = self.grids[left]
                    .anchor()
                    .checked_subtract(1, TimeUnit::Months)
                    .ok_or(OutOfTimeError)?;
                self.grids[right].rebuild(&anchor, self.today)?;
                self.order = [right, left, center];
                Some(Rotation::Backward)
            }
            2 => {
                let anchor = self.grids[right]
                    .anchor()
                    .checked_add(1, TimeUnit::Months)
                    .ok_or(OutOfTimeError)?;
                self.grids[left].rebuild(&anchor, self.today)?;
                self.order = [center, right, left];
                Some(Rotation::Forward)
            }
            _ => None,
        };
        if rotation.is_some() {
            self.grid_rebuilds += 1;
        }
        self.layout();
        self.viewport = Viewport::default();
        self.paged = true;
        Ok(rotation)
    }

    fn layout(&mut self) {
        for (page, &slot) in self.order.iter().enumerate() {
            self.origins[slot] = page;
        }
    }
}

fn grids_around(focus: &CalendarDate, today: Date) -> Result<[MonthGrid; PAGE_COUNT], OutOfTimeError> {
    let center = focus.start_of(TimeUnit::Months);
    let left = center
        .checked_subtract(1, TimeUnit::Months)
        .ok_or(OutOfTimeError)?;
    let right = center.checked_add(1, TimeUnit::Months).ok_or(OutOfTimeError)?;
    Ok([
        MonthGrid::new(&left, today)?,
        MonthGrid::new(&center, today)?,
        MonthGrid::new(&right, today)?,
    ])
}

// Saturates for infinities, which then match no page
#[allow(clippy::cast_possible_truncation)]
fn page_of(ratio: f64) -> i64 {
    ratio.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::UtcOffset;

    fn buffer(year: i32, month: u8) -> PageBuffer {
        let focus = CalendarDate::from_ymd(year, month, 12, UtcOffset::UTC).unwrap();
        PageBuffer::new(&focus, date!(2015 - 10 - 12)).unwrap()
    }

    fn months(buf: &PageBuffer) -> Vec<(i32, u8)> {
        buf.grids()
            .map(|g| (g.anchor().year(), g.anchor().month()))
            .collect()
    }

    #[test]
    fn test_new() {
        let buf = buffer(2015, 10);
        assert_eq!(months(&buf), [(2015, 9), (2015, 10), (2015, 11)]);
        assert!(buf.is_paged());
        assert_eq!(buf.viewport(), Viewport::at_rest(CENTER_PAGE));
        assert_eq!(buf.grid_rebuilds(), 0);
        assert_eq!(buf.full_rebuilds(), 0);
    }

    #[test]
    fn test_page_forward() {
        let mut buf = buffer(2015, 10);
        let old_left = buf.order[0];
        assert_eq!(
            buf.on_scroll(Viewport::decelerating(2.0)),
            Ok(Some(Rotation::Forward))
        );
        assert_eq!(months(&buf), [(2015, 10), (2015, 11), (2015, 12)]);
        // The grid that fell off the left was reused on the right
        assert_eq!(buf.order[2], old_left);
        assert_eq!(buf.grid_rebuilds(), 1);
        assert_eq!(buf.full_rebuilds(), 0);
        assert!(buf.is_paged());
        assert_eq!(buf.viewport(), Viewport::default());
    }

    #[test]
    fn test_page_backward() {
        let mut buf = buffer(2015, 10);
        let old_right = buf.order[2];
        assert_eq!(
            buf.on_scroll(Viewport::dragging(0.0)),
            Ok(Some(Rotation::Backward))
        );
        assert_eq!(months(&buf), [(2015, 8), (2015, 9), (2015, 10)]);
        assert_eq!(buf.order[0], old_right);
        assert_eq!(buf.grid_rebuilds(), 1);
    }

    #[test]
    fn test_forward_then_backward() {
        let mut buf = buffer(2015, 10);
        buf.on_scroll(Viewport::at_rest(2.0)).unwrap();
        buf.on_scroll(Viewport::at_rest(0.0)).unwrap();
        assert_eq!(months(&buf), [(2015, 9), (2015, 10), (2015, 11)]);
        assert_eq!(buf.grid_rebuilds(), 2);
        assert_eq!(buf.full_rebuilds(), 0);
    }

    #[test]
    fn test_many_pages_keep_neighbors() {
        let mut buf = buffer(2015, 10);
        for _ in 0..15 {
            buf.on_scroll(Viewport::at_rest(2.0)).unwrap();
            let [l, c, r] = [buf.left(), buf.center(), buf.right()].map(|g| *g.anchor());
            assert_eq!(l.add(1, TimeUnit::Months), c);
            assert_eq!(c.add(1, TimeUnit::Months), r);
        }
        assert_eq!(buf.center().anchor().year(), 2017);
        assert_eq!(buf.center().anchor().month(), 1);
        for _ in 0..40 {
            buf.on_scroll(Viewport::at_rest(0.0)).unwrap();
        }
        assert_eq!(months(&buf), [(2013, 8), (2013, 9), (2013, 10)]);
        assert_eq!(buf.grid_rebuilds(), 55);
    }

    #[test]
    fn test_overshoot_truncates() {
        let mut buf = buffer(2015, 10);
        assert_eq!(
            buf.on_scroll(Viewport::decelerating(2.4)),
            Ok(Some(Rotation::Forward))
        );
        assert_eq!(
            buf.on_scroll(Viewport::decelerating(-0.3)),
            Ok(Some(Rotation::Backward))
        );
        assert_eq!(months(&buf), [(2015, 9), (2015, 10), (2015, 11)]);
    }

    #[test]
    fn test_inconsistent_page() {
        let mut buf = buffer(2015, 10);
        buf.on_scroll(Viewport::dragging(1.5)).unwrap();
        assert!(!buf.is_paged());
        assert_eq!(
            buf.on_scroll(Viewport::decelerating(3.0)),
            Err(PagingError::Inconsistent { page: 3 })
        );
        assert_eq!(
            buf.on_scroll(Viewport::decelerating(-1.0)),
            Err(PagingError::Inconsistent { page: -1 })
        );
        assert_eq!(
            buf.on_scroll(Viewport::at_rest(f64::INFINITY)),
            Err(PagingError::Inconsistent { page: i64::MAX })
        );
        assert_eq!(months(&buf), [(2015, 9), (2015, 10), (2015, 11)]);
        assert_eq!(buf.viewport(), Viewport::dragging(1.5));
        assert!(!buf.is_paged());
        assert_eq!(buf.grid_rebuilds(), 0);
    }

    #[test]
    fn test_paged_debounce() {
        let mut buf = buffer(2015, 10);
        assert_eq!(buf.on_scroll(Viewport::dragging(1.3)), Ok(None));
        assert!(!buf.is_paged());
        assert_eq!(buf.on_scroll(Viewport::dragging(1.0)), Ok(None));
        assert!(!buf.is_paged());
        assert_eq!(buf.on_scroll(Viewport::decelerating(1.0)), Ok(None));
        assert!(!buf.is_paged());
        assert_eq!(buf.on_scroll(Viewport::at_rest(1.2)), Ok(None));
        assert!(!buf.is_paged());
        assert_eq!(buf.on_scroll(Viewport::at_rest(1.0)), Ok(None));
        assert!(buf.is_paged());
    }

    #[test]
    fn test_nan_clears_paged() {
        let mut buf = buffer(2015, 10);
        assert_eq!(buf.on_scroll(Viewport::at_rest(f64::NAN)), Ok(None));
        assert!(!buf.is_paged());
        assert_eq!(buf.viewport(), Viewport::default());
    }

    #[test]
    fn test_settle() {
        let mut buf = buffer(2015, 10);
        buf.on_scroll(Viewport::dragging(1.7)).unwrap();
        buf.settle();
        assert!(buf.is_paged());
        assert_eq!(buf.viewport(), Viewport::default());
        assert_eq!(months(&buf), [(2015, 9), (2015, 10), (2015, 11)]);
    }

    #[test]
    fn test_rebuild_around() {
        let mut buf = buffer(2015, 10);
        buf.on_scroll(Viewport::at_rest(2.0)).unwrap();
        buf.on_scroll(Viewport::dragging(0.5)).unwrap();
        let target = CalendarDate::from_ymd(2016, 1, 31, UtcOffset::UTC).unwrap();
        buf.rebuild_around(&target).unwrap();
        assert_eq!(months(&buf), [(2015, 12), (2016, 1), (2016, 2)]);
        assert_eq!(buf.full_rebuilds(), 1);
        assert!(buf.is_paged());
        assert_eq!(buf.viewport(), Viewport::default());
        assert!(buf.contains_month(&target));
        // Paging still works after the slots were replaced
        buf.on_scroll(Viewport::at_rest(0.0)).unwrap();
        assert_eq!(months(&buf), [(2015, 11), (2015, 12), (2016, 1)]);
    }

    #[test]
    fn test_contains_month() {
        let buf = buffer(2015, 10);
        for (m, expected) in [(8, false), (9, true), (10, true), (11, true), (12, false)] {
            let d = CalendarDate::from_ymd(2015, m, 1, UtcOffset::UTC).unwrap();
            assert_eq!(buf.contains_month(&d), expected, "month {m}");
        }
    }

    #[test]
    fn test_end_of_time() {
        let mut buf = buffer(9999, 10);
        assert_eq!(
            buf.on_scroll(Viewport::at_rest(2.0)),
            Err(PagingError::OutOfTime(OutOfTimeError))
        );
        assert_eq!(months(&buf), [(9999, 9), (9999, 10), (9999, 11)]);
        assert_eq!(buf.grid_rebuilds(), 0);
        let last = CalendarDate::from_ymd(9999, 12, 5, UtcOffset::UTC).unwrap();
        assert_eq!(buf.rebuild_around(&last), Err(OutOfTimeError));
        assert_eq!(buf.full_rebuilds(), 0);
        assert_eq!(months(&buf), [(9999, 9), (9999, 10), (9999, 11)]);
    }

    #[test]
    fn test_set_today() {
        let mut buf = buffer(2015, 10);
        buf.set_today(date!(2015 - 11 - 03));
        let todays = buf
            .grids()
            .flat_map(MonthGrid::cells)
            .filter(|c| c.is_today())
            .count();
        // Shown in October's trailing row and in November's grid
        assert_eq!(todays, 2);
    }
}
