//! Civil-date helpers shared by the grid builder and the reminder index.
//!
//! Everything here works on `NaiveDate`, a calendar day with no time or
//! offset attached. The process timezone is consulted in exactly one place,
//! [`today`], so an ISO key can never drift to the neighbouring day.

use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::error::DateError;

/// Date format used for reminder keys and on the wire
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a civil date as its `YYYY-MM-DD` key
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key back into a civil date
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)
        .map_err(|_| DateError::InvalidDate(s.to_string()))
}

/// Today's date on the local calendar
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an English or Spanish weekday name such as "sunday", "Mon" or "mié"
pub fn parse_weekday(s: &str) -> Result<Weekday, DateError> {
    let lower = s.trim().to_lowercase();
    let spanish = match lower.as_str() {
        "dom" | "domingo" => Some(Weekday::Sun),
        "lun" | "lunes" => Some(Weekday::Mon),
        "mar" | "martes" => Some(Weekday::Tue),
        "mié" | "mie" | "miércoles" | "miercoles" => Some(Weekday::Wed),
        "jue" | "jueves" => Some(Weekday::Thu),
        "vie" | "viernes" => Some(Weekday::Fri),
        "sáb" | "sab" | "sábado" | "sabado" => Some(Weekday::Sat),
        _ => None,
    };
    match spanish {
        Some(day) => Ok(day),
        None => lower
            .parse::<Weekday>()
            .map_err(|_| DateError::InvalidWeekday(s.to_string())),
    }
}

/// A calendar month, anchored on its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Fails for impossible months and for the first and last months chrono
    /// can represent, whose grids would run off the calendar
    pub fn new(year: i32, month: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(Self::from_first)
            .ok_or_else(|| DateError::InvalidMonth(format!("{year}-{month:02}")))
    }

    /// Both neighbouring months must exist
    fn from_first(first: NaiveDate) -> Option<Self> {
        first.checked_sub_months(Months::new(1))?;
        first.checked_add_months(Months::new(1))?;
        Some(Self { first })
    }

    /// The month containing `date`, clamped to the supported range
    pub fn of(date: NaiveDate) -> Self {
        let first = date - Days::new(u64::from(date.day0()));
        [
            Some(first),
            first.checked_add_months(Months::new(1)),
            first.checked_sub_months(Months::new(1)),
        ]
        .into_iter()
        .flatten()
        .find_map(Self::from_first)
        .unwrap_or(Self { first })
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        Self::of(today())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1 = January
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Previous month, rolling the year over in January.
    ///
    /// Saturates at the earliest supported month.
    pub fn prev(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .and_then(Self::from_first)
            .unwrap_or(*self)
    }

    /// Next month, rolling the year over in December.
    ///
    /// Saturates at the latest supported month.
    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(Self::from_first)
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every day of the month in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first;
        first
            .iter_days()
            .take_while(move |d| d.month() == first.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DateError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

/// All dates of the month, ascending (28 to 31 entries)
pub fn days_in_month(month: YearMonth) -> Vec<NaiveDate> {
    month.days().collect()
}

/// Column (0..=6) of the month's first day, counted from `week_start`
pub fn first_weekday_of_month(month: YearMonth, week_start: Weekday) -> u32 {
    let day = month.first_day().weekday().num_days_from_monday();
    let start = week_start.num_days_from_monday();
    (day + 7 - start) % 7
}
