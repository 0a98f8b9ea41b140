use chrono::NaiveDate;

/// Signed number of calendar days from `a` to `b`.
///
/// Positive when `b` is after `a`. Spans month and year boundaries and leap
/// days correctly since it subtracts dates, not day-of-year numbers.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Whether `b` is exactly the calendar day after `a`.
pub fn is_next_day(a: NaiveDate, b: NaiveDate) -> bool {
    days_between(a, b) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(d(2023, 5, 1), d(2023, 5, 4)), 3);
        assert_eq!(days_between(d(2023, 5, 4), d(2023, 5, 1)), -3);
        assert_eq!(days_between(d(2023, 5, 1), d(2023, 5, 1)), 0);
    }

    #[test]
    fn next_day_across_year_boundary() {
        assert!(is_next_day(d(2022, 12, 31), d(2023, 1, 1)));
        assert!(!is_next_day(d(2022, 12, 31), d(2023, 1, 2)));
    }

    #[test]
    fn next_day_across_leap_day() {
        // 2020 is a leap year
        assert!(is_next_day(d(2020, 2, 28), d(2020, 2, 29)));
        assert!(is_next_day(d(2020, 2, 29), d(2020, 3, 1)));
        // 2021 is not
        assert!(is_next_day(d(2021, 2, 28), d(2021, 3, 1)));
        assert!(!is_next_day(d(2021, 2, 28), d(2021, 2, 27)));
    }
}
