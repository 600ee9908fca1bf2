//! Elapsed time between two instants, expressed at several granularities.
//!
//! The calendar breakdown follows human calendar rules: a month is borrowed
//! as a whole year and a day is borrowed as the real length of the month
//! preceding the reference date. The other granularities use fixed-length
//! units.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const MONTHS_PER_YEAR: i64 = 12;

/// Length of a month in the approximated breakdown.
pub const APPROXIMATE_MONTH_DAYS: i64 = 30;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarBreakdown {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Months here are always 30 days long, unlike in [`CalendarBreakdown`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApproximateMonthsBreakdown {
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DaysBreakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinutesBreakdown {
    pub minutes: i64,
    pub seconds: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElapsedTime {
    #[cfg_attr(feature = "serde", serde(rename = "years_months_days_hours_minutes_seconds"))]
    pub calendar: CalendarBreakdown,
    #[cfg_attr(feature = "serde", serde(rename = "months_days_hours_minutes_seconds"))]
    pub approximate_months: ApproximateMonthsBreakdown,
    #[cfg_attr(feature = "serde", serde(rename = "days_hours_minutes_seconds"))]
    pub days: DaysBreakdown,
    #[cfg_attr(feature = "serde", serde(rename = "minutes_seconds"))]
    pub minutes: MinutesBreakdown,
    pub total_seconds: f64,
}

/// Hours, minutes and seconds left over after removing whole days.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ClockTime {
    hours: i64,
    minutes: i64,
    seconds: i64,
}

impl ClockTime {
    fn from_seconds(seconds: i64) -> Self {
        Self {
            hours: seconds / SECONDS_PER_HOUR,
            minutes: seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: seconds % SECONDS_PER_MINUTE,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct YearsMonthsDays {
    years: i64,
    months: i64,
    days: i64,
}

impl YearsMonthsDays {
    fn difference(since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            years: i64::from(until.year() - since.year()),
            months: i64::from(until.month()) - i64::from(since.month()),
            days: i64::from(until.day()) - i64::from(since.day()),
        }
    }

    fn carry_months(self) -> Self {
        if self.months < 0 {
            Self {
                years: self.years - 1,
                months: self.months + MONTHS_PER_YEAR,
                ..self
            }
        } else {
            self
        }
    }

    /// Borrows one month worth of days, using the length of the month
    /// before `until`. A start day past the end of that month is counted
    /// from its last day, so the result cannot stay negative.
    fn carry_days(self, since: NaiveDate, until: NaiveDate) -> Self {
        if self.days >= 0 {
            return self;
        }
        let (year, month) = previous_month(until);
        let borrowed = i64::from(days_in_month(year, month));
        let start_day = i64::from(since.day()).min(borrowed);
        Self {
            months: self.months - 1,
            days: i64::from(until.day()) + borrowed - start_day,
            ..self
        }
    }
}

/// Number of days in the given month of the given year.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

/// Time elapsed from midnight of `since` until `now`, or `None` when `since`
/// lies after `now`.
pub fn elapsed(since: NaiveDate, now: NaiveDateTime) -> Option<ElapsedTime> {
    if now.date() < since {
        return None;
    }

    let delta = now.signed_duration_since(since.and_time(NaiveTime::MIN));
    let whole_seconds = delta.num_seconds();
    let total_days = whole_seconds / SECONDS_PER_DAY;
    let clock = ClockTime::from_seconds(whole_seconds % SECONDS_PER_DAY);

    let ymd = YearsMonthsDays::difference(since, now.date())
        .carry_months()
        .carry_days(since, now.date())
        .carry_months();

    Some(ElapsedTime {
        calendar: CalendarBreakdown {
            years: ymd.years,
            months: ymd.months,
            days: ymd.days,
            hours: clock.hours,
            minutes: clock.minutes,
            seconds: clock.seconds,
        },
        approximate_months: ApproximateMonthsBreakdown {
            months: total_days / APPROXIMATE_MONTH_DAYS,
            days: total_days % APPROXIMATE_MONTH_DAYS,
            hours: clock.hours,
            minutes: clock.minutes,
            seconds: clock.seconds,
        },
        days: DaysBreakdown {
            days: total_days,
            hours: clock.hours,
            minutes: clock.minutes,
            seconds: clock.seconds,
        },
        minutes: MinutesBreakdown {
            minutes: whole_seconds / SECONDS_PER_MINUTE,
            seconds: whole_seconds % SECONDS_PER_MINUTE,
        },
        total_seconds: whole_seconds as f64 + f64::from(delta.subsec_nanos()) / 1e9,
    })
}
