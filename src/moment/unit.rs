use crate::error::DateError;
use std::fmt;
use std::str::FromStr;

/// Calendar and clock units understood by [`CalendarDate`](super::CalendarDate)
/// arithmetic and truncation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TimeUnit {
    Years,
    Quarters,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// The one-letter name of the unit, as used in `moment`-style APIs
    pub fn short_name(self) -> &'static str {
        match self {
            TimeUnit::Years => "y",
            TimeUnit::Quarters => "Q",
            TimeUnit::Months => "M",
            TimeUnit::Days => "d",
            TimeUnit::Hours => "H",
            TimeUnit::Minutes => "m",
            TimeUnit::Seconds => "s",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Years => "years",
            TimeUnit::Quarters => "quarters",
            TimeUnit::Months => "months",
            TimeUnit::Days => "days",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = DateError;

    // Short names are case-sensitive ("M" is months, "m" is minutes); long
    // names are not.
    fn from_str(s: &str) -> Result<TimeUnit, DateError> {
        match s {
            "y" => return Ok(TimeUnit::Years),
            "Q" => return Ok(TimeUnit::Quarters),
            "M" => return Ok(TimeUnit::Months),
            "d" => return Ok(TimeUnit::Days),
            "H" => return Ok(TimeUnit::Hours),
            "m" => return Ok(TimeUnit::Minutes),
            "s" => return Ok(TimeUnit::Seconds),
            _ => (),
        }
        match s.to_ascii_lowercase().trim_end_matches('s') {
            "year" => Ok(TimeUnit::Years),
            "quarter" => Ok(TimeUnit::Quarters),
            "month" => Ok(TimeUnit::Months),
            "day" => Ok(TimeUnit::Days),
            "hour" => Ok(TimeUnit::Hours),
            "minute" => Ok(TimeUnit::Minutes),
            "second" => Ok(TimeUnit::Seconds),
            _ => Err(DateError::UnknownUnit(s.to_owned())),
        }
    }
}
