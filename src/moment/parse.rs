use super::pattern::{describe, Target};
use time::format_description::{self, well_known::Rfc3339, BorrowedFormatItem};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

#[derive(Clone, Copy, Debug)]
enum Layout {
    DateTime(&'static [BorrowedFormatItem<'static>]),
    Date(&'static [BorrowedFormatItem<'static>]),
}

// Tried in order after RFC 3339; the first layout that consumes the whole
// input wins.
static LAYOUTS: &[Layout] = &[
    Layout::DateTime(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]"
    )),
    Layout::DateTime(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    )),
    Layout::Date(format_description!("[year]-[month]-[day]")),
    Layout::Date(format_description!(
        "[month padding:none]/[day padding:none]/[year]"
    )),
    Layout::Date(format_description!(
        "[month padding:none]-[day padding:none]-[year]"
    )),
    Layout::Date(format_description!(
        "[month repr:long] [day padding:none], [year]"
    )),
    Layout::Date(format_description!("[year]-[ordinal]")),
];

impl Layout {
    fn parse(self, text: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
        match self {
            Layout::DateTime(items) => PrimitiveDateTime::parse(text, items)
                .ok()
                .map(|dt| dt.assume_offset(offset)),
            Layout::Date(items) => Date::parse(text, items)
                .ok()
                .map(|d| d.midnight().assume_offset(offset)),
        }
    }
}

pub(super) fn parse_any(text: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(instant) = OffsetDateTime::parse(text, &Rfc3339) {
        return instant.checked_to_offset(offset);
    }
    LAYOUTS.iter().find_map(|layout| layout.parse(text, offset))
}

pub(super) fn parse_pattern(text: &str, pattern: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let description = describe(pattern, Target::Parse);
    let items = format_description::parse_borrowed::<1>(&description).ok()?;
    let text = text.trim();
    if let Ok(instant) = OffsetDateTime::parse(text, &items) {
        return instant.checked_to_offset(offset);
    }
    PrimitiveDateTime::parse(text, &items)
        .map(|dt| dt.assume_offset(offset))
        .or_else(|_| Date::parse(text, &items).map(|d| d.midnight().assume_offset(offset)))
        .ok()
}
