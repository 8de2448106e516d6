use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::attendance::stats::StatsPeriod;
use crate::model::attendance::AttendanceRecord;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatSummary {
    #[schema(example = 14)]
    pub hour: u8,
    #[schema(example = 135)]
    pub total_active_minutes: u32,
    #[schema(example = 2.3)]
    pub total_active_hours: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutSummary {
    #[schema(value_type = String, format = "date-time")]
    pub check_in: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub check_out: DateTime<Utc>,
    #[schema(example = 7.5)]
    pub total_active_hours: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckOutResult {
    pub attendance: AttendanceRecord,
    pub summary: CheckOutSummary,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub is_checked_in: bool,
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_in_time: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_out_time: Option<DateTime<Utc>>,
    pub total_active_minutes: u32,
    pub total_active_hours: f64,
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub last_heartbeat: Option<DateTime<Utc>>,
}

impl From<&AttendanceRecord> for StatusView {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            is_checked_in: r.is_checked_in,
            check_in_time: Some(r.check_in_time),
            check_out_time: r.check_out_time,
            total_active_minutes: r.total_active_minutes,
            total_active_hours: r.total_active_hours(),
            last_heartbeat: Some(r.last_heartbeat),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecordView {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "date-time")]
    pub check_in: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_out: Option<DateTime<Utc>>,
    pub active_hours: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub period: StatsPeriod,
    pub total_days: u32,
    pub total_hours: f64,
    pub total_minutes: u32,
    pub average_hours_per_day: f64,
    pub records: Vec<StatsRecordView>,
}
