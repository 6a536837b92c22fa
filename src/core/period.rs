//! Academic period resolution.
//!
//! The organization reports on academic years (August 1 through July 31) and
//! their two semesters: first = August-December, second = January-July. All
//! functions here are pure and take the reference date explicitly, so callers
//! own the clock and tests never depend on "now".

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month index (1-based) that opens an academic year.
pub const ACADEMIC_YEAR_START_MONTH: u32 = 8;

/// Nominal semester length in days, used for the dashboard progress meter.
const SEMESTER_LENGTH_DAYS: i64 = 150;

/// One of the two halves of an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    /// August through December
    First,
    /// January through July
    Second,
}

impl Semester {
    /// Lowercase label as the store and API know it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

/// An inclusive `[start, end]` date interval used by every aggregation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

// Fixed month/day boundaries (Aug 1, Jul 31, ...) are always representable
// for any year the organization will ever report on.
fn boundary(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

impl Period {
    /// The academic year starting August 1 of `start_year`, inclusive of
    /// July 31 of the following calendar year.
    #[must_use]
    pub fn academic_year(start_year: i32) -> Self {
        Self {
            start: boundary(start_year, 8, 1),
            end: boundary(start_year + 1, 7, 31),
        }
    }

    /// One semester: first = Aug 1 ..= Dec 31 of `year`, second = Jan 1 ..=
    /// Jul 31 of `year`.
    #[must_use]
    pub fn semester(year: i32, semester: Semester) -> Self {
        match semester {
            Semester::First => Self {
                start: boundary(year, 8, 1),
                end: boundary(year, 12, 31),
            },
            Semester::Second => Self {
                start: boundary(year, 1, 1),
                end: boundary(year, 7, 31),
            },
        }
    }

    /// An arbitrary inclusive interval.
    #[must_use]
    pub const fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First day of the period.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the period, both ends inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The `(year, month)` pairs the period spans, in chronological order.
    ///
    /// For an academic year this is exactly twelve entries, August through
    /// July across two calendar years; a monthly series keeps this order so
    /// charts read in academic-year sequence.
    #[must_use]
    pub fn months(&self) -> Vec<(i32, u32)> {
        if self.start > self.end {
            return Vec::new();
        }

        let mut months = Vec::new();
        let (mut year, mut month) = (self.start.year(), self.start.month());
        let last = (self.end.year(), self.end.month());
        loop {
            months.push((year, month));
            if (year, month) == last {
                break;
            }
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        months
    }
}

/// The academic year containing `today`, as `(start_year, end_year)`.
///
/// August or later belongs to the year opening that August; January through
/// July belong to the year that opened the previous August.
#[must_use]
pub fn current_academic_year(today: NaiveDate) -> (i32, i32) {
    let year = today.year();
    if today.month() >= ACADEMIC_YEAR_START_MONTH {
        (year, year + 1)
    } else {
        (year - 1, year)
    }
}

/// Composite annual-record key for the academic year opening in `start_year`:
/// start and end year concatenated, e.g. `academic_year_key(2024) == 20242025`.
#[must_use]
pub fn academic_year_key(start_year: i32) -> i64 {
    i64::from(start_year) * 10_000 + i64::from(start_year) + 1
}

/// Human-readable label for an academic year, e.g. `"2024-2025"`.
#[must_use]
pub fn academic_year_label(start_year: i32) -> String {
    format!("{}-{}", start_year, start_year + 1)
}

/// The semester containing `today`.
///
/// The returned year is the calendar year containing the semester's months:
/// Aug-Dec → (that year, first); Jan-Jul → (that year, second).
#[must_use]
pub fn current_semester(today: NaiveDate) -> (i32, Semester) {
    if today.month() >= ACADEMIC_YEAR_START_MONTH {
        (today.year(), Semester::First)
    } else {
        (today.year(), Semester::Second)
    }
}

/// The semester immediately before `(year, semester)`.
///
/// The first semester of a year is preceded by that same calendar year's
/// second semester (Jan-Jul); a second semester is preceded by the first
/// semester of the previous calendar year.
#[must_use]
pub const fn previous_semester(year: i32, semester: Semester) -> (i32, Semester) {
    match semester {
        Semester::First => (year, Semester::Second),
        Semester::Second => (year - 1, Semester::First),
    }
}

/// Three-letter label for a 1-based month number, `"Jan"` through `"Dec"`.
///
/// Out-of-range input maps to `"???"` rather than panicking; callers only
/// ever pass months produced by [`Period::months`].
#[must_use]
pub const fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

/// Countdown toward the end of the current academic year, scored against a
/// nominal 150-day semester for the dashboard's progress meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SemesterProgress {
    /// Days remaining until July 31, floored at zero
    pub days_left: i64,
    /// The nominal semester length the percentage is scored against
    pub total_days: i64,
    /// Elapsed share of the nominal semester, clamped to 0-100 and rounded
    pub percentage: f64,
}

/// How far along the nominal semester is, relative to the academic year end.
#[must_use]
pub fn semester_progress(today: NaiveDate) -> SemesterProgress {
    let (start_year, _) = current_academic_year(today);
    let end = Period::academic_year(start_year).end();

    let days_left = (end - today).num_days().max(0);

    #[allow(clippy::cast_precision_loss)]
    let elapsed = (SEMESTER_LENGTH_DAYS - days_left) as f64 / SEMESTER_LENGTH_DAYS as f64;
    let percentage = (elapsed * 100.0).clamp(0.0, 100.0).round();

    SemesterProgress {
        days_left,
        total_days: SEMESTER_LENGTH_DAYS,
        percentage,
    }
}
