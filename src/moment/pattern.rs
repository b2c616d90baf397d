//! Translation of LDML-style date patterns (`"MMMM d, yyyy"`) into `time`
//! format descriptions (`"[month repr:long] [day padding:none], [year]"`).
//!
//! Numeric fields become `time` components.  When rendering, name fields
//! (months, weekdays, AM/PM) are resolved through the date's [`Locale`] and
//! emitted as literal text; when parsing they fall back to `time`'s English
//! name components.
//!
//! [`Locale`]: super::Locale

use super::CalendarDate;

pub(super) const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm:ss ZZZZ";

#[derive(Clone, Copy, Debug)]
pub(super) enum Target<'a> {
    Render(&'a CalendarDate),
    Parse,
}

pub(super) fn describe(pattern: &str, target: Target<'_>) -> String {
    let mut out = String::with_capacity(pattern.len() * 4);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.next_if_eq(&'\'').is_some() {
                out.push('\'');
                continue;
            }
            // Quoted literal; a doubled quote inside it is a literal quote
            while let Some(q) = chars.next() {
                if q != '\'' {
                    push_literal(&mut out, q);
                } else if chars.next_if_eq(&'\'').is_some() {
                    out.push('\'');
                } else {
                    break;
                }
            }
        } else if c.is_ascii_alphabetic() {
            let mut count = 1;
            while chars.next_if_eq(&c).is_some() {
                count += 1;
            }
            push_field(&mut out, c, count, target);
        } else {
            push_literal(&mut out, c);
        }
    }
    out
}

fn push_field(out: &mut String, letter: char, count: usize, target: Target<'_>) {
    match (letter, count) {
        ('y', 1) => out.push_str("[year padding:none]"),
        ('y', 2) => out.push_str("[year repr:last_two]"),
        ('y', _) => out.push_str("[year]"),
        ('M' | 'L', 1) => out.push_str("[month padding:none]"),
        ('M' | 'L', 2) => out.push_str("[month]"),
        ('M' | 'L', 3) => push_name(out, target, "[month repr:short]", |d| {
            d.locale().month_abbreviation(d.month())
        }),
        ('M' | 'L', _) => push_name(out, target, "[month repr:long]", |d| {
            d.locale().month_name(d.month())
        }),
        ('d', 1) => out.push_str("[day padding:none]"),
        ('d', _) => out.push_str("[day]"),
        ('D', 1 | 2) => out.push_str("[ordinal padding:none]"),
        ('D', _) => out.push_str("[ordinal]"),
        ('E', 1..=3) => push_name(out, target, "[weekday repr:short]", |d| {
            d.locale().weekday_abbreviation(d.weekday())
        }),
        ('E', _) => push_name(out, target, "[weekday]", |d| {
            d.locale().weekday_name(d.weekday())
        }),
        ('a', _) => push_name(out, target, "[period]", |d| {
            d.locale().am_pm[usize::from(d.hour() >= 12)]
        }),
        ('H', 1) => out.push_str("[hour padding:none]"),
        ('H', _) => out.push_str("[hour]"),
        ('h', 1) => out.push_str("[hour repr:12 padding:none]"),
        ('h', _) => out.push_str("[hour repr:12]"),
        ('m', 1) => out.push_str("[minute padding:none]"),
        ('m', _) => out.push_str("[minute]"),
        ('s', 1) => out.push_str("[second padding:none]"),
        ('s', _) => out.push_str("[second]"),
        ('S', n) => {
            out.push_str("[subsecond digits:");
            out.push(char::from(b'0' + u8::try_from(n.min(9)).unwrap_or(9)));
            out.push(']');
        }
        ('Z', 1..=3) => out.push_str("[offset_hour sign:mandatory][offset_minute]"),
        ('Z', 4) => out.push_str("GMT[offset_hour sign:mandatory]:[offset_minute]"),
        ('Z', _) => out.push_str("[offset_hour sign:mandatory]:[offset_minute]"),
        ('Q', _) => push_number(out, target, letter, count, |d| u16::from(d.quarter())),
        ('w', _) => push_number(out, target, letter, count, CalendarDate::week_of_year),
        _ => {
            for _ in 0..count {
                out.push(letter);
            }
        }
    }
}

fn push_name<F>(out: &mut String, target: Target<'_>, component: &str, name: F)
where
    F: FnOnce(&CalendarDate) -> &'static str,
{
    match target {
        Target::Render(date) => name(date).chars().for_each(|c| push_literal(out, c)),
        Target::Parse => out.push_str(component),
    }
}

// Fields with no `time` component are only rendered; when parsing, the
// letters are kept as literal text.
fn push_number<F>(out: &mut String, target: Target<'_>, letter: char, count: usize, value: F)
where
    F: FnOnce(&CalendarDate) -> u16,
{
    match target {
        Target::Render(date) => {
            let digits = value(date).to_string();
            for _ in digits.len()..count {
                out.push('0');
            }
            out.push_str(&digits);
        }
        Target::Parse => {
            for _ in 0..count {
                out.push(letter);
            }
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    if c == '[' {
        out.push_str("[[");
    } else {
        out.push(c);
    }
}
