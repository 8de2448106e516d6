use chrono::{DateTime, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::attendance::views::{StatsRecordView, StatsView};
use crate::model::attendance::{AttendanceRecord, minutes_to_hours, round1};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl StatsPeriod {
    /// Parse a query value; anything unrecognised falls back to weekly.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some(s) => s.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(period = s, "Unknown stats period, using weekly");
                StatsPeriod::Weekly
            }),
            None => StatsPeriod::Weekly,
        }
    }

    /// Local start of the reporting window.
    pub fn window_start(self, now: DateTime<Local>) -> NaiveDateTime {
        let local = now.naive_local();
        match self {
            StatsPeriod::Daily => local.date().and_time(NaiveTime::MIN),
            StatsPeriod::Weekly => local - Duration::days(7),
            StatsPeriod::Monthly => local
                .checked_sub_months(Months::new(1))
                .unwrap_or(local - Duration::days(30)),
        }
    }

    /// Inclusive day range whose midnights fall in `[window_start, now]`.
    pub fn day_range(self, now: DateTime<Local>) -> (NaiveDate, NaiveDate) {
        let start = self.window_start(now);
        let first = if start.time() == NaiveTime::MIN {
            start.date()
        } else {
            start.date().succ_opt().unwrap_or(start.date())
        };
        (first, now.date_naive())
    }
}

/// Aggregate records (already ordered by date descending) for a period.
pub fn summarize(period: StatsPeriod, records: &[AttendanceRecord]) -> StatsView {
    let total_minutes: u32 = records.iter().map(|r| r.total_active_minutes).sum();
    let total_days = records.len() as u32;
    let total_hours = minutes_to_hours(total_minutes);
    let average_hours_per_day = if total_days > 0 {
        round1(total_hours / f64::from(total_days))
    } else {
        0.0
    };

    StatsView {
        period,
        total_days,
        total_hours,
        total_minutes,
        average_hours_per_day,
        records: records
            .iter()
            .map(|r| StatsRecordView {
                date: r.date,
                check_in: r.check_in_time,
                check_out: r.check_out_time,
                active_hours: r.total_active_hours(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_with(date: NaiveDate, minutes: u32) -> AttendanceRecord {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut r = AttendanceRecord::open(1, date, at);
        r.total_active_minutes = minutes;
        r
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(StatsPeriod::parse_or_default(Some("daily")), StatsPeriod::Daily);
        assert_eq!(StatsPeriod::parse_or_default(Some("Monthly")), StatsPeriod::Monthly);
        assert_eq!(StatsPeriod::parse_or_default(Some("yearly")), StatsPeriod::Weekly);
        assert_eq!(StatsPeriod::parse_or_default(None), StatsPeriod::Weekly);
        assert_eq!(StatsPeriod::Monthly.to_string(), "monthly");
    }

    #[test]
    fn test_day_ranges() {
        let now = local(2026, 3, 10, 12, 0);
        assert_eq!(StatsPeriod::Daily.day_range(now), (day(2026, 3, 10), day(2026, 3, 10)));
        // 7 days back lands at 03-03 12:00, so 03-03's midnight is excluded.
        assert_eq!(StatsPeriod::Weekly.day_range(now), (day(2026, 3, 4), day(2026, 3, 10)));
        assert_eq!(StatsPeriod::Monthly.day_range(now), (day(2026, 2, 11), day(2026, 3, 10)));
    }

    #[test]
    fn test_weekly_range_at_midnight_includes_first_day() {
        let now = local(2026, 3, 10, 0, 0);
        assert_eq!(StatsPeriod::Weekly.day_range(now).0, day(2026, 3, 3));
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record_with(day(2026, 3, 10), 480),
            record_with(day(2026, 3, 9), 300),
            record_with(day(2026, 3, 8), 0),
        ];
        let stats = summarize(StatsPeriod::Weekly, &records);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.total_minutes, 780);
        assert_eq!(stats.total_hours, 13.0);
        assert_eq!(stats.average_hours_per_day, 4.3);
        assert_eq!(stats.records[0].active_hours, 8.0);
        assert_eq!(stats.records[1].active_hours, 5.0);
    }

    #[test]
    fn test_summarize_empty_has_zero_average() {
        let stats = summarize(StatsPeriod::Daily, &[]);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.total_hours, 0.0);
        assert_eq!(stats.average_hours_per_day, 0.0);
        assert!(stats.records.is_empty());
    }
}
