//! Time windows and bucket arithmetic for the dashboard chart.

use serde::Deserialize;
use time::{Date, Duration, Month};

/// The time windows the dashboard can chart.
///
/// Selecting a different window always triggers a full refetch and rebuild
/// of the series; nothing is carried over from the previous selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Window {
    WeekToDate,
    #[default]
    MonthToDate,
    YearToDate,
    #[serde(rename = "last-3-months")]
    LastThreeMonths,
    #[serde(rename = "last-6-months")]
    LastSixMonths,
}

impl Window {
    /// Every window, in the order shown on the dashboard.
    pub(crate) fn all() -> [Window; 5] {
        [
            Self::WeekToDate,
            Self::MonthToDate,
            Self::YearToDate,
            Self::LastThreeMonths,
            Self::LastSixMonths,
        ]
    }

    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            Self::WeekToDate => "week-to-date",
            Self::MonthToDate => "month-to-date",
            Self::YearToDate => "year-to-date",
            Self::LastThreeMonths => "last-3-months",
            Self::LastSixMonths => "last-6-months",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::WeekToDate => "This Week",
            Self::MonthToDate => "This Month",
            Self::YearToDate => "Year to Date",
            Self::LastThreeMonths => "Last 3 Months",
            Self::LastSixMonths => "Last 6 Months",
        }
    }

    /// The bucket granularity used for this window.
    ///
    /// Granularity is constant across a whole series; it only varies between
    /// windows so each chart has a readable number of points.
    pub(crate) fn bucket(self) -> Bucket {
        match self {
            Self::WeekToDate | Self::MonthToDate => Bucket::Day,
            Self::LastThreeMonths => Bucket::Week,
            Self::YearToDate | Self::LastSixMonths => Bucket::Month,
        }
    }

    /// The first day of the window, given today's date.
    pub(crate) fn start_date(self, today: Date) -> Date {
        match self {
            Self::WeekToDate => week_start(today),
            Self::MonthToDate => month_start(today),
            Self::YearToDate => Date::from_calendar_date(today.year(), Month::January, 1)
                .expect("invalid year start date"),
            Self::LastThreeMonths => months_back(today, 3),
            // Five whole months back plus the current month makes six buckets.
            Self::LastSixMonths => month_start(months_back(today, 5)),
        }
    }
}

/// A fixed time sub-interval used to aggregate the chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bucket {
    Day,
    Week,
    Month,
}

impl Bucket {
    /// The first day of the bucket containing `date`.
    pub(crate) fn truncate(self, date: Date) -> Date {
        match self {
            Self::Day => date,
            Self::Week => week_start(date),
            Self::Month => month_start(date),
        }
    }

    /// The first day of the bucket after the one starting at `bucket_start`.
    pub(crate) fn next(self, bucket_start: Date) -> Date {
        match self {
            Self::Day => bucket_start + Duration::days(1),
            Self::Week => bucket_start + Duration::days(7),
            Self::Month => {
                let (year, month) = match bucket_start.month() {
                    Month::December => (bucket_start.year() + 1, Month::January),
                    month => (bucket_start.year(), month.next()),
                };

                Date::from_calendar_date(year, month, 1).expect("invalid month start date")
            }
        }
    }

    /// A short chart label for the bucket starting at `bucket_start`.
    pub(crate) fn label(self, bucket_start: Date) -> String {
        match self {
            Self::Day | Self::Week => {
                format!("{} {}", bucket_start.day(), month_abbrev(bucket_start.month()))
            }
            Self::Month => month_abbrev(bucket_start.month()).to_owned(),
        }
    }
}

fn week_start(date: Date) -> Date {
    let weekday_number = date.weekday().number_from_monday() as i64;

    date - Duration::days(weekday_number - 1)
}

fn month_start(date: Date) -> Date {
    date.replace_day(1).expect("invalid month start date")
}

/// The same day of the month `months` months before `date`, clamped to the
/// target month's length.
fn months_back(date: Date, months: u8) -> Date {
    let mut year = date.year();
    let mut month_number = i32::from(month_number(date.month())) - i32::from(months);
    while month_number < 1 {
        month_number += 12;
        year -= 1;
    }

    let month = month_from_number(month_number as u8);
    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).expect("invalid month arithmetic result")
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn month_number(month: Month) -> u8 {
    match month {
        Month::January => 1,
        Month::February => 2,
        Month::March => 3,
        Month::April => 4,
        Month::May => 5,
        Month::June => 6,
        Month::July => 7,
        Month::August => 8,
        Month::September => 9,
        Month::October => 10,
        Month::November => 11,
        Month::December => 12,
    }
}

fn month_from_number(month: u8) -> Month {
    match month {
        1 => Month::January,
        2 => Month::February,
        3 => Month::March,
        4 => Month::April,
        5 => Month::May,
        6 => Month::June,
        7 => Month::July,
        8 => Month::August,
        9 => Month::September,
        10 => Month::October,
        11 => Month::November,
        12 => Month::December,
        _ => panic!("invalid month number {month}"),
    }
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod window_tests {
    use time::macros::date;

    use super::{Bucket, Window, months_back};

    #[test]
    fn week_to_date_starts_on_monday() {
        // 2025-06-14 is a Saturday.
        let start = Window::WeekToDate.start_date(date!(2025 - 06 - 14));

        assert_eq!(start, date!(2025 - 06 - 09));
    }

    #[test]
    fn month_to_date_starts_on_the_first() {
        let start = Window::MonthToDate.start_date(date!(2025 - 06 - 14));

        assert_eq!(start, date!(2025 - 06 - 01));
    }

    #[test]
    fn year_to_date_starts_on_january_first() {
        let start = Window::YearToDate.start_date(date!(2025 - 06 - 14));

        assert_eq!(start, date!(2025 - 01 - 01));
    }

    #[test]
    fn last_six_months_starts_five_whole_months_back() {
        let start = Window::LastSixMonths.start_date(date!(2025 - 06 - 14));

        assert_eq!(start, date!(2025 - 01 - 01));
    }

    #[test]
    fn months_back_crosses_year_boundaries() {
        assert_eq!(months_back(date!(2025 - 02 - 15), 3), date!(2024 - 11 - 15));
    }

    #[test]
    fn months_back_clamps_to_month_length() {
        assert_eq!(months_back(date!(2025 - 05 - 31), 3), date!(2025 - 02 - 28));
    }

    #[test]
    fn month_bucket_next_crosses_year_boundary() {
        let next = Bucket::Month.next(date!(2024 - 12 - 01));

        assert_eq!(next, date!(2025 - 01 - 01));
    }

    #[test]
    fn week_bucket_truncates_to_monday() {
        assert_eq!(Bucket::Week.truncate(date!(2025 - 06 - 14)), date!(2025 - 06 - 09));
    }

    #[test]
    fn month_labels_are_three_letter_abbreviations() {
        assert_eq!(Bucket::Month.label(date!(2025 - 06 - 01)), "Jun");
        assert_eq!(Bucket::Day.label(date!(2025 - 06 - 01)), "1 Jun");
    }
}
