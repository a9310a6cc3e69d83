//! Recurrence expansion.
//!
//! Expands one recurrence request into concrete dated windows. The rule is
//! consumed here and never persisted; duplicate handling (updating the
//! `is_available` flag of an identical stored window instead of inserting)
//! happens in the store's checked insert.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::time::{LocalStamp, TimeInterval, TimeOfDay};
use crate::models::window::{DateWindow, RecurrencePattern, RecurrenceRule};

/// Expand a recurrence rule into dated windows.
///
/// The start date itself is always produced; subsequent dates step by one
/// day, seven days, or one calendar month depending on the pattern, never
/// exceeding `rule.bound_end_date`. An unrecognized pattern yields the start
/// date only. Monthly stepping keeps the start's day-of-month and skips
/// months that do not have it (no clamping to month end).
///
/// When `end_time` is not after `start_time` the window crosses midnight and
/// ends on the following date, which is how overnight listings declare
/// availability.
pub fn expand(
    start_date: NaiveDate,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    rule: &RecurrenceRule,
) -> Vec<DateWindow> {
    let dates = expand_dates(start_date, rule);
    dates
        .into_iter()
        .filter_map(|date| {
            let start = LocalStamp::from_date_time(date, start_time);
            let end_date = if end_time > start_time {
                date
            } else {
                date.checked_add_days(Days::new(1))?
            };
            let end = LocalStamp::from_date_time(end_date, end_time);
            let interval = TimeInterval::new(start, end).ok()?;
            Some(DateWindow { date, interval })
        })
        .collect()
}

/// The concrete dates a rule produces, start date first.
pub fn expand_dates(start_date: NaiveDate, rule: &RecurrenceRule) -> Vec<NaiveDate> {
    let bound = rule.bound_end_date;
    let mut dates = vec![start_date];

    match rule.pattern {
        RecurrencePattern::Daily => {
            let mut date = start_date;
            while let Some(next) = date.checked_add_days(Days::new(1)) {
                if next > bound {
                    break;
                }
                dates.push(next);
                date = next;
            }
        }
        RecurrencePattern::Weekly => {
            let mut date = start_date;
            while let Some(next) = date.checked_add_days(Days::new(7)) {
                if next > bound {
                    break;
                }
                dates.push(next);
                date = next;
            }
        }
        RecurrencePattern::Monthly => {
            let day = start_date.day();
            let mut step = 1u32;
            loop {
                let Some(candidate) = start_date.checked_add_months(Months::new(step)) else {
                    break;
                };
                if candidate > bound {
                    break;
                }
                // checked_add_months clamps short months to their last day;
                // a changed day-of-month means the month lacks our day.
                if candidate.day() == day {
                    dates.push(candidate);
                }
                step += 1;
            }
        }
        RecurrencePattern::Unrecognized => {}
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn rule(pattern: RecurrencePattern, bound: &str) -> RecurrenceRule {
        RecurrenceRule {
            pattern,
            bound_end_date: date(bound),
        }
    }

    #[test]
    fn test_weekly_recurrence_dates() {
        // Monday 2024-01-01 bounded by 2024-01-22: four Mondays exactly.
        let dates = expand_dates(
            date("2024-01-01"),
            &rule(RecurrencePattern::Weekly, "2024-01-22"),
        );
        assert_eq!(
            dates,
            vec![
                date("2024-01-01"),
                date("2024-01-08"),
                date("2024-01-15"),
                date("2024-01-22"),
            ]
        );
    }

    #[test]
    fn test_daily_recurrence_is_inclusive() {
        let dates = expand_dates(
            date("2024-01-30"),
            &rule(RecurrencePattern::Daily, "2024-02-02"),
        );
        assert_eq!(
            dates,
            vec![
                date("2024-01-30"),
                date("2024-01-31"),
                date("2024-02-01"),
                date("2024-02-02"),
            ]
        );
    }

    #[test]
    fn test_monthly_recurrence_same_day_of_month() {
        let dates = expand_dates(
            date("2024-01-15"),
            &rule(RecurrencePattern::Monthly, "2024-04-30"),
        );
        assert_eq!(
            dates,
            vec![
                date("2024-01-15"),
                date("2024-02-15"),
                date("2024-03-15"),
                date("2024-04-15"),
            ]
        );
    }

    #[test]
    fn test_monthly_skips_months_without_day() {
        // Starting Jan 31: February/April lack a 31st and are skipped.
        let dates = expand_dates(
            date("2024-01-31"),
            &rule(RecurrencePattern::Monthly, "2024-05-31"),
        );
        assert_eq!(
            dates,
            vec![date("2024-01-31"), date("2024-03-31"), date("2024-05-31")]
        );
    }

    #[test]
    fn test_unrecognized_pattern_yields_start_only() {
        let dates = expand_dates(
            date("2024-01-01"),
            &rule(RecurrencePattern::Unrecognized, "2024-12-31"),
        );
        assert_eq!(dates, vec![date("2024-01-01")]);
    }

    #[test]
    fn test_bound_before_start_yields_start_only() {
        let dates = expand_dates(
            date("2024-06-01"),
            &rule(RecurrencePattern::Daily, "2024-05-01"),
        );
        assert_eq!(dates, vec![date("2024-06-01")]);
    }

    #[test]
    fn test_expand_builds_same_time_windows() {
        let windows = expand(
            date("2024-01-01"),
            TimeOfDay::parse("09:00").unwrap(),
            TimeOfDay::parse("17:00").unwrap(),
            &rule(RecurrencePattern::Weekly, "2024-01-08"),
        );

        assert_eq!(windows.len(), 2);
        assert_eq!(
            windows[0].interval,
            TimeInterval::parse("2024-01-01T09:00:00", "2024-01-01T17:00:00").unwrap()
        );
        assert_eq!(
            windows[1].interval,
            TimeInterval::parse("2024-01-08T09:00:00", "2024-01-08T17:00:00").unwrap()
        );
    }

    #[test]
    fn test_expand_overnight_window_ends_next_day() {
        let windows = expand(
            date("2024-01-01"),
            TimeOfDay::parse("22:00").unwrap(),
            TimeOfDay::parse("06:00").unwrap(),
            &rule(RecurrencePattern::Unrecognized, "2024-01-01"),
        );

        assert_eq!(windows.len(), 1);
        assert_eq!(
            windows[0].interval,
            TimeInterval::parse("2024-01-01T22:00:00", "2024-01-02T06:00:00").unwrap()
        );
    }
}
