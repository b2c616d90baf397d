//! Immutable calendar dates with `moment`-style arithmetic.
//!
//! A [`CalendarDate`] is an absolute instant viewed through a fixed UTC
//! offset and a [`Locale`].  Every calendar field is derived from the
//! instant on access.  Whole-day arithmetic moves the calendar date and
//! keeps the wall-clock time, so stepping across month, year, or
//! daylight-saving boundaries never drifts by a day.
mod locale;
mod parse;
mod pattern;
mod unit;
pub use self::locale::Locale;
pub use self::unit::TimeUnit;
use self::pattern::{describe, Target, DEFAULT_PATTERN};
use crate::error::DateError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use time::{
    format_description, Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

#[derive(Clone, Copy)]
pub struct CalendarDate {
    instant: OffsetDateTime,
    locale: &'static Locale,
}

impl CalendarDate {
    /// Wrap an instant, viewed in its own offset, with the default locale
    pub fn new(instant: OffsetDateTime) -> CalendarDate {
        CalendarDate {
            instant,
            locale: &Locale::EN_US,
        }
    }

    /// The current instant in the host's local offset.  Falls back to UTC
    /// when the platform cannot report the local offset.
    pub fn now() -> CalendarDate {
        match OffsetDateTime::now_local() {
            Ok(now) => CalendarDate::new(now),
            Err(e) => {
                tracing::debug!(error = %e, "local offset unavailable; using UTC");
                CalendarDate::now_utc()
            }
        }
    }

    pub fn now_utc() -> CalendarDate {
        CalendarDate::new(OffsetDateTime::now_utc())
    }

    /// Midnight at the start of `date` in `offset`
    pub fn from_date(date: Date, offset: UtcOffset) -> CalendarDate {
        CalendarDate::new(date.midnight().assume_offset(offset))
    }

    /// Returns `None` if the fields do not name a real calendar date
    pub fn from_ymd(year: i32, month: u8, day: u8, offset: UtcOffset) -> Option<CalendarDate> {
        let month = Month::try_from(month).ok()?;
        let date = Date::from_calendar_date(year, month, day).ok()?;
        Some(CalendarDate::from_date(date, offset))
    }

    /// Build a date from `[year, month, day, hour, minute, second]` or any
    /// non-empty prefix thereof; omitted fields default to the start of
    /// their period.  Field combinations that do not resolve to a real
    /// date and time (e.g., April 31st) yield `None` rather than being
    /// rolled over.
    pub fn from_fields(fields: &[i32], offset: UtcOffset) -> Option<CalendarDate> {
        let (&year, rest) = fields.split_first()?;
        let field = |i: usize, default: u8| match rest.get(i) {
            Some(&value) => u8::try_from(value).ok(),
            None => Some(default),
        };
        let month = Month::try_from(field(0, 1)?).ok()?;
        let date = Date::from_calendar_date(year, month, field(1, 1)?).ok()?;
        let time = Time::from_hms(field(2, 0)?, field(3, 0)?, field(4, 0)?).ok()?;
        Some(CalendarDate::new(
            PrimitiveDateTime::new(date, time).assume_offset(offset),
        ))
    }

    pub fn from_unix_timestamp(seconds: i64) -> Option<CalendarDate> {
        OffsetDateTime::from_unix_timestamp(seconds)
            .ok()
            .map(CalendarDate::new)
    }

    /// Parse `text` against a fixed, ordered list of common layouts (RFC
    /// 3339, ISO dates and date-times, `MM/dd/yyyy`, `MM-dd-yyyy`,
    /// `MMMM d, yyyy`, ISO ordinal dates).  Inputs without an offset are
    /// taken to be in `offset`; inputs with one are converted to it.
    pub fn parse(text: &str, offset: UtcOffset) -> Option<CalendarDate> {
        parse::parse_any(text, offset).map(CalendarDate::new)
    }

    /// Parse `text` against a single LDML-style `pattern`
    pub fn parse_with(text: &str, pattern: &str, offset: UtcOffset) -> Option<CalendarDate> {
        parse::parse_pattern(text, pattern, offset).map(CalendarDate::new)
    }

    pub fn with_locale(self, locale: &'static Locale) -> CalendarDate {
        CalendarDate { locale, ..self }
    }

    /// The same instant viewed in another offset
    ///
    /// # Panics
    ///
    /// Panics if the local date in `offset` falls outside the representable
    /// range.  Use [`checked_to_offset()`](Self::checked_to_offset) near the
    /// edges of time.
    pub fn to_offset(self, offset: UtcOffset) -> CalendarDate {
        CalendarDate {
            instant: self.instant.to_offset(offset),
            ..self
        }
    }

    /// Returns `None` if the local date in `offset` falls outside the
    /// representable range
    pub fn checked_to_offset(self, offset: UtcOffset) -> Option<CalendarDate> {
        Some(CalendarDate {
            instant: self.instant.checked_to_offset(offset)?,
            ..self
        })
    }

    pub fn instant(&self) -> OffsetDateTime {
        self.instant
    }

    pub fn offset(&self) -> UtcOffset {
        self.instant.offset()
    }

    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    /// The calendar date in this date's offset
    pub fn date(&self) -> Date {
        self.instant.date()
    }

    pub fn year(&self) -> i32 {
        self.instant.year()
    }

    /// 1 = January
    pub fn month(&self) -> u8 {
        self.instant.month().into()
    }

    pub fn month_name(&self) -> &'static str {
        self.locale.month_name(self.month())
    }

    pub fn day(&self) -> u8 {
        self.instant.day()
    }

    pub fn hour(&self) -> u8 {
        self.instant.hour()
    }

    pub fn minute(&self) -> u8 {
        self.instant.minute()
    }

    pub fn second(&self) -> u8 {
        self.instant.second()
    }

    /// 1 = Sunday, 7 = Saturday
    pub fn weekday(&self) -> u8 {
        self.instant.weekday().number_from_sunday()
    }

    pub fn weekday_name(&self) -> &'static str {
        self.locale.weekday_name(self.weekday())
    }

    /// Which occurrence of its weekday this day is within its month (1 for
    /// the first Monday, etc.)
    pub fn weekday_ordinal(&self) -> u8 {
        (self.day() - 1) / 7 + 1
    }

    /// Week number with weeks starting on Sunday and week 1 being the week
    /// containing January 1st
    pub fn week_of_year(&self) -> u16 {
        let days_since_jan1 = self.instant.ordinal() - 1;
        let today = u16::from(self.instant.weekday().number_days_from_sunday());
        let jan1 = (today + 7 - days_since_jan1 % 7) % 7;
        (days_since_jan1 + jan1) / 7 + 1
    }

    /// 1 through 4
    pub fn quarter(&self) -> u8 {
        (self.month() - 1) / 3 + 1
    }

    pub fn day_of_year(&self) -> u16 {
        self.instant.ordinal()
    }

    pub fn get(&self, unit: TimeUnit) -> i32 {
        match unit {
            TimeUnit::Years => self.year(),
            TimeUnit::Quarters => self.quarter().into(),
            TimeUnit::Months => self.month().into(),
            TimeUnit::Days => self.day().into(),
            TimeUnit::Hours => self.hour().into(),
            TimeUnit::Minutes => self.minute().into(),
            TimeUnit::Seconds => self.second().into(),
        }
    }

    pub fn unix_timestamp(&self) -> i64 {
        self.instant.unix_timestamp()
    }

    /// Returns `None` if the result would fall outside the representable
    /// range of dates.
    ///
    /// Adding months, quarters, or years keeps the day of the month where
    /// possible and clamps it to the length of the target month otherwise
    /// (January 31st plus one month is the last day of February), so such
    /// additions are not always reversible.
    pub fn checked_add(&self, value: i64, unit: TimeUnit) -> Option<CalendarDate> {
        let instant = match unit {
            TimeUnit::Years => self.shift_months(value.checked_mul(12)?)?,
            TimeUnit::Quarters => self.shift_months(value.checked_mul(3)?)?,
            TimeUnit::Months => self.shift_months(value)?,
            TimeUnit::Days => {
                let date = self
                    .date()
                    .checked_add(Duration::seconds(value.checked_mul(SECONDS_PER_DAY)?))?;
                self.at_local(date, self.instant.time())
            }
            TimeUnit::Hours => self.shift_seconds(value.checked_mul(SECONDS_PER_HOUR)?)?,
            TimeUnit::Minutes => self.shift_seconds(value.checked_mul(SECONDS_PER_MINUTE)?)?,
            TimeUnit::Seconds => self.shift_seconds(value)?,
        };
        Some(CalendarDate { instant, ..*self })
    }

    pub fn checked_subtract(&self, value: i64, unit: TimeUnit) -> Option<CalendarDate> {
        self.checked_add(value.checked_neg()?, unit)
    }

    /// Like [`checked_add()`](Self::checked_add), but a result outside the
    /// representable range leaves the date unchanged
    pub fn add(&self, value: i64, unit: TimeUnit) -> CalendarDate {
        self.checked_add(value, unit).unwrap_or(*self)
    }

    pub fn subtract(&self, value: i64, unit: TimeUnit) -> CalendarDate {
        self.checked_subtract(value, unit).unwrap_or(*self)
    }

    /// Add a fixed-length duration, which may include fractional seconds
    pub fn add_duration(&self, duration: Duration) -> CalendarDate {
        match self.instant.checked_add(duration) {
            Some(instant) => CalendarDate { instant, ..*self },
            None => *self,
        }
    }

    pub fn subtract_duration(&self, duration: Duration) -> CalendarDate {
        match self.instant.checked_sub(duration) {
            Some(instant) => CalendarDate { instant, ..*self },
            None => *self,
        }
    }

    /// Signed time elapsed from `other` to `self`
    pub fn interval_since(&self, other: &CalendarDate) -> Duration {
        self.instant - other.instant
    }

    /// Whether the two instants are less than `precision` apart
    pub fn is_close_to(&self, other: &CalendarDate, precision: Duration) -> bool {
        self.interval_since(other).abs() < precision
    }

    /// The first instant of the period of length `unit` containing this
    /// date
    pub fn start_of(&self, unit: TimeUnit) -> CalendarDate {
        let date = self.date();
        let time = self.instant.time();
        let (date, time) = match unit {
            TimeUnit::Years => (first_of_month(date.year(), Month::January), Time::MIDNIGHT),
            TimeUnit::Quarters => (
                first_of_month(date.year(), quarter_start(date.month())),
                Time::MIDNIGHT,
            ),
            TimeUnit::Months => (first_of_month(date.year(), date.month()), Time::MIDNIGHT),
            TimeUnit::Days => (date, Time::MIDNIGHT),
            TimeUnit::Hours => (date, clock(time.hour(), 0, 0)),
            TimeUnit::Minutes => (date, clock(time.hour(), time.minute(), 0)),
            TimeUnit::Seconds => (date, clock(time.hour(), time.minute(), time.second())),
        };
        CalendarDate {
            instant: self.at_local(date, time),
            ..*self
        }
    }

    /// The last whole second of the period of length `unit` containing this
    /// date.  A period running past the end of time ends at the last
    /// representable second.
    pub fn end_of(&self, unit: TimeUnit) -> CalendarDate {
        let instant = self
            .start_of(unit)
            .checked_add(1, unit)
            .and_then(|next| next.instant.checked_sub(Duration::SECOND))
            .unwrap_or_else(|| self.at_local(Date::MAX, clock(23, 59, 59)));
        CalendarDate { instant, ..*self }
    }

    /// Whether `other`, viewed in this date's offset, falls in the same
    /// calendar month
    pub fn is_same_month(&self, other: &CalendarDate) -> bool {
        other
            .instant
            .checked_to_offset(self.offset())
            .is_some_and(|other| self.year() == other.year() && self.instant.month() == other.month())
    }

    /// Whether `other`, viewed in this date's offset, falls on the same
    /// calendar day
    pub fn is_same_day(&self, other: &CalendarDate) -> bool {
        other
            .instant
            .checked_to_offset(self.offset())
            .is_some_and(|other| self.date() == other.date())
    }

    /// Render the date using an LDML-style pattern such as `"MMMM d,
    /// yyyy"`.  Month and weekday names come from the date's locale.
    pub fn format(&self, pattern: &str) -> Result<String, DateError> {
        let description = describe(pattern, Target::Render(self));
        let items = format_description::parse_borrowed::<1>(&description)?;
        Ok(self.instant.format(&items)?)
    }

    fn at_local(&self, date: Date, time: Time) -> OffsetDateTime {
        PrimitiveDateTime::new(date, time).assume_offset(self.offset())
    }

    fn shift_months(&self, months: i64) -> Option<OffsetDateTime> {
        let total = (i64::from(self.year()) * 12 + i64::from(self.month()) - 1).checked_add(months)?;
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = Month::try_from(u8::try_from(total.rem_euclid(12) + 1).ok()?).ok()?;
        let day = self.day().min(days_in_month(year, month));
        let date = Date::from_calendar_date(year, month, day).ok()?;
        Some(self.at_local(date, self.instant.time()))
    }

    fn shift_seconds(&self, seconds: i64) -> Option<OffsetDateTime> {
        self.instant.checked_add(Duration::seconds(seconds))
    }
}

impl From<OffsetDateTime> for CalendarDate {
    fn from(instant: OffsetDateTime) -> CalendarDate {
        CalendarDate::new(instant)
    }
}

impl PartialEq for CalendarDate {
    fn eq(&self, other: &CalendarDate) -> bool {
        self.instant == other.instant
    }
}

impl Eq for CalendarDate {}

impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &CalendarDate) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarDate {
    fn cmp(&self, other: &CalendarDate) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl Hash for CalendarDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.unix_timestamp_nanos().hash(state);
    }
}

impl fmt::Debug for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarDate")
            .field("instant", &self.instant)
            .field("locale", &self.locale.id)
            .finish()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.format(DEFAULT_PATTERN).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

fn quarter_start(month: Month) -> Month {
    use Month::*;
    match month {
        January | February | March => January,
        April | May | June => April,
        July | August | September => July,
        October | November | December => October,
    }
}

fn first_of_month(year: i32, month: Month) -> Date {
    Date::from_calendar_date(year, month, 1).expect("the first of a month in range should be valid")
}

fn clock(hour: u8, minute: u8, second: u8) -> Time {
    Time::from_hms(hour, minute, second).expect("fields of an existing time should be valid")
}
