use crate::gateway::Params;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const PARAM_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    Ever,
    ThisWeek,
    ThisMonth,
    LastWeek,
    LastMonth,
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::Ever,
        DateRange::ThisWeek,
        DateRange::ThisMonth,
        DateRange::LastWeek,
        DateRange::LastMonth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ever => "ever",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::LastWeek => "last_week",
            Self::LastMonth => "last_month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ever => "Ever",
            Self::ThisWeek => "This week",
            Self::ThisMonth => "This month",
            Self::LastWeek => "Last week",
            Self::LastMonth => "Last month",
        }
    }

    pub fn resolve(self, now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let today = now.date();
        match self {
            Self::Ever => None,
            Self::ThisWeek => Some((start_of_day(week_start(today)), now)),
            Self::ThisMonth => Some((start_of_day(month_start(today)), now)),
            Self::LastWeek => {
                let start = week_start(today) - Duration::weeks(1);
                Some((start_of_day(start), end_of_day(start + Duration::days(6))))
            }
            Self::LastMonth => {
                let last_day = month_start(today) - Duration::days(1);
                Some((start_of_day(month_start(last_day)), end_of_day(last_day)))
            }
        }
    }

    pub fn apply(self, now: NaiveDateTime, params: &mut Params) {
        if let Some((from, to)) = self.resolve(now) {
            params.insert(
                "fromDt".to_string(),
                Value::String(from.format(PARAM_FORMAT).to_string()),
            );
            params.insert(
                "toDt".to_string(),
                Value::String(to.format(PARAM_FORMAT).to_string()),
            );
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DateRange::ALL
            .into_iter()
            .find(|range| range.as_str() == value.trim())
            .ok_or_else(|| format!("unknown date range '{value}'"))
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn end(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
    }

    #[test]
    fn this_week_runs_from_monday_to_now() {
        let now = at(2026, 3, 12, 15, 30);
        assert_eq!(
            DateRange::ThisWeek.resolve(now),
            Some((at(2026, 3, 9, 0, 0), now))
        );
    }

    #[test]
    fn last_month_covers_previous_calendar_month() {
        let now = at(2026, 3, 12, 15, 30);
        assert_eq!(
            DateRange::LastMonth.resolve(now),
            Some((at(2026, 2, 1, 0, 0), end(2026, 2, 28)))
        );

        let january = at(2026, 1, 1, 0, 5);
        assert_eq!(
            DateRange::LastMonth.resolve(january),
            Some((at(2025, 12, 1, 0, 0), end(2025, 12, 31)))
        );
    }

    #[test]
    fn last_week_and_this_month() {
        let now = at(2026, 3, 9, 8, 0);
        assert_eq!(
            DateRange::LastWeek.resolve(now),
            Some((at(2026, 3, 2, 0, 0), end(2026, 3, 8)))
        );
        assert_eq!(
            DateRange::ThisMonth.resolve(now),
            Some((at(2026, 3, 1, 0, 0), now))
        );
    }

    #[test]
    fn ever_adds_no_params() {
        let mut params = Params::new();
        DateRange::Ever.apply(at(2026, 3, 12, 15, 30), &mut params);
        assert!(params.is_empty());

        DateRange::LastMonth.apply(at(2026, 3, 12, 15, 30), &mut params);
        assert_eq!(params["fromDt"], "2026-02-01T00:00:00.000");
        assert_eq!(params["toDt"], "2026-02-28T23:59:59.999");
    }

    #[test]
    fn labels_parse_back() {
        for range in DateRange::ALL {
            assert_eq!(range.as_str().parse::<DateRange>(), Ok(range));
        }
        assert!("yesterday".parse::<DateRange>().is_err());
    }
}
