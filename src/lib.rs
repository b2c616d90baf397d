//! A horizontally paged month calendar with a single selectable day.
//!
//! The crate is built from a date engine ([`CalendarDate`]), fixed 42-cell
//! month grids ([`MonthGrid`]), a three-grid window that rotates as the user
//! swipes between months ([`PageBuffer`]) and the host-facing component tying
//! them together ([`CalendarPicker`]), which can be drawn with `ratatui`.

pub mod config;
pub mod error;
pub mod grid;
pub mod moment;
pub mod pager;
pub mod picker;
pub mod selection;
pub mod widget;

pub use crate::config::{CalendarConfig, Theme};
pub use crate::error::{DateError, OutOfTimeError, PagingError};
pub use crate::grid::{DayCell, MonthGrid};
pub use crate::moment::{CalendarDate, Locale, TimeUnit};
pub use crate::pager::{PageBuffer, Rotation, Viewport};
pub use crate::picker::{CalendarPicker, Direction};
pub use crate::selection::{Selection, SelectionController};
pub use crate::widget::{DayRenderer, DefaultDayRenderer};
