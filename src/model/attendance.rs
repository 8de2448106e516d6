use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type UserId = u64;

/// Activity reported for one hour-of-day of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourlyLog {
    #[schema(example = 9)]
    pub hour: u8,

    #[schema(example = 45)]
    pub active_minutes: u32,

    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
}

/// One attendance record per user per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub user: UserId,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(value_type = String, format = "date-time")]
    pub check_in_time: DateTime<Utc>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_out_time: Option<DateTime<Utc>>,

    pub hourly_logs: Vec<HourlyLog>,

    #[schema(example = 135)]
    pub total_active_minutes: u32,

    pub is_checked_in: bool,

    #[schema(value_type = String, format = "date-time")]
    pub last_heartbeat: DateTime<Utc>,

    /// Bumped by the store on every successful update.
    #[serde(skip)]
    pub version: u32,
}

impl AttendanceRecord {
    /// A fresh, checked-in record for `date`. The store assigns `id`.
    pub fn open(user: UserId, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            user,
            date,
            check_in_time: now,
            check_out_time: None,
            hourly_logs: Vec::new(),
            total_active_minutes: 0,
            is_checked_in: true,
            last_heartbeat: now,
            version: 0,
        }
    }

    /// Reopen a checked-out record. The original check-in time is kept.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.is_checked_in = true;
        self.check_out_time = None;
        self.last_heartbeat = now;
    }

    pub fn close(&mut self, now: DateTime<Utc>) {
        self.check_out_time = Some(now);
        self.is_checked_in = false;
    }

    /// Merge activity for `hour`, keeping the larger of the stored and
    /// reported minutes so retried heartbeats never double count.
    pub fn record_activity(&mut self, hour: u8, active_minutes: u32, now: DateTime<Utc>) {
        match self.hourly_logs.binary_search_by_key(&hour, |log| log.hour) {
            Ok(idx) => {
                let log = &mut self.hourly_logs[idx];
                log.active_minutes = log.active_minutes.max(active_minutes);
                log.timestamp = now;
            }
            Err(idx) => self.hourly_logs.insert(
                idx,
                HourlyLog {
                    hour,
                    active_minutes,
                    timestamp: now,
                },
            ),
        }
        self.recompute_total();
        self.last_heartbeat = now;
    }

    pub fn recompute_total(&mut self) {
        self.total_active_minutes = self.hourly_logs.iter().map(|l| l.active_minutes).sum();
    }

    pub fn total_active_hours(&self) -> f64 {
        minutes_to_hours(self.total_active_minutes)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn minutes_to_hours(minutes: u32) -> f64 {
    round1(f64::from(minutes) / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    fn record() -> AttendanceRecord {
        AttendanceRecord::open(7, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), at(8, 0))
    }

    #[test]
    fn test_record_activity_keeps_hours_sorted() {
        let mut r = record();
        r.record_activity(11, 20, at(11, 5));
        r.record_activity(9, 30, at(9, 5));
        r.record_activity(10, 40, at(10, 5));

        let hours: Vec<u8> = r.hourly_logs.iter().map(|l| l.hour).collect();
        assert_eq!(hours, vec![9, 10, 11]);
        assert_eq!(r.total_active_minutes, 90);
        assert_eq!(r.last_heartbeat, at(10, 5));
    }

    #[test]
    fn test_record_activity_takes_max_for_same_hour() {
        let mut r = record();
        r.record_activity(9, 45, at(9, 10));
        r.record_activity(9, 20, at(9, 40));

        assert_eq!(r.hourly_logs.len(), 1);
        assert_eq!(r.hourly_logs[0].active_minutes, 45);
        assert_eq!(r.hourly_logs[0].timestamp, at(9, 40));
        assert_eq!(r.total_active_minutes, 45);
    }

    #[test]
    fn test_resume_clears_checkout_but_keeps_check_in() {
        let mut r = record();
        r.close(at(12, 0));
        assert!(!r.is_checked_in);
        assert_eq!(r.check_out_time, Some(at(12, 0)));

        r.resume(at(13, 0));
        assert!(r.is_checked_in);
        assert_eq!(r.check_out_time, None);
        assert_eq!(r.check_in_time, at(8, 0));
        assert_eq!(r.last_heartbeat, at(13, 0));
    }

    #[test]
    fn test_hour_rounding() {
        assert_eq!(minutes_to_hours(0), 0.0);
        assert_eq!(minutes_to_hours(135), 2.3);
        assert_eq!(minutes_to_hours(480), 8.0);
        assert_eq!(round1(13.0 / 3.0), 4.3);
    }
}
