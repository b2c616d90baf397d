/// Names used when rendering dates for display.
///
/// Weekday tables start at Sunday, matching the weekday numbering of
/// [`CalendarDate::weekday()`](super::CalendarDate::weekday).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Locale {
    pub id: &'static str,
    pub month_names: [&'static str; 12],
    pub month_abbreviations: [&'static str; 12],
    pub weekday_names: [&'static str; 7],
    pub weekday_abbreviations: [&'static str; 7],
    pub am_pm: [&'static str; 2],
}

impl Locale {
    pub const EN_US: Locale = Locale {
        id: "en_US",
        month_names: [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ],
        month_abbreviations: [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ],
        weekday_names: [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ],
        weekday_abbreviations: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        am_pm: ["AM", "PM"],
    };

    pub const FR_FR: Locale = Locale {
        id: "fr_FR",
        month_names: [
            "janvier",
            "février",
            "mars",
            "avril",
            "mai",
            "juin",
            "juillet",
            "août",
            "septembre",
            "octobre",
            "novembre",
            "décembre",
        ],
        month_abbreviations: [
            "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
            "nov.", "déc.",
        ],
        weekday_names: [
            "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
        ],
        weekday_abbreviations: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
        am_pm: ["AM", "PM"],
    };

    /// `month` is 1-based
    pub fn month_name(&self, month: u8) -> &'static str {
        self.month_names[usize::from(month.clamp(1, 12) - 1)]
    }

    pub fn month_abbreviation(&self, month: u8) -> &'static str {
        self.month_abbreviations[usize::from(month.clamp(1, 12) - 1)]
    }

    /// `weekday` is 1-based with 1 = Sunday
    pub fn weekday_name(&self, weekday: u8) -> &'static str {
        self.weekday_names[usize::from(weekday.clamp(1, 7) - 1)]
    }

    pub fn weekday_abbreviation(&self, weekday: u8) -> &'static str {
        self.weekday_abbreviations[usize::from(weekday.clamp(1, 7) - 1)]
    }

    /// The first two characters of the weekday's abbreviation, as used in
    /// calendar column headers
    pub fn weekday_initials(&self, weekday: u8) -> String {
        self.weekday_abbreviation(weekday).chars().take(2).collect()
    }
}
