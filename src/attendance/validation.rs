//! Checks run on every record before it is written.

use crate::attendance::error::{AttendanceError, AttendanceResult};
use crate::model::attendance::AttendanceRecord;

pub const MAX_ACTIVE_MINUTES: i64 = 60;
pub const DEFAULT_ACTIVE_MINUTES: i64 = 60;

/// Clamp reported activity to `[0, 60]`.
pub fn clamp_active_minutes(active_minutes: i64) -> u32 {
    active_minutes.clamp(0, MAX_ACTIVE_MINUTES) as u32
}

pub fn validate_record(record: &AttendanceRecord) -> AttendanceResult<()> {
    let mut previous_hour: Option<u8> = None;
    for log in &record.hourly_logs {
        if log.hour > 23 {
            return Err(invalid(format!("hour {} is out of range 0-23", log.hour)));
        }
        if i64::from(log.active_minutes) > MAX_ACTIVE_MINUTES {
            return Err(invalid(format!(
                "activeMinutes {} for hour {} exceeds {}",
                log.active_minutes, log.hour, MAX_ACTIVE_MINUTES
            )));
        }
        if previous_hour.is_some_and(|prev| prev >= log.hour) {
            return Err(invalid(format!(
                "hourly logs must be unique and ordered by hour (hour {})",
                log.hour
            )));
        }
        previous_hour = Some(log.hour);
    }

    let sum: u32 = record.hourly_logs.iter().map(|l| l.active_minutes).sum();
    if sum != record.total_active_minutes {
        return Err(invalid(format!(
            "totalActiveMinutes {} does not match hourly sum {}",
            record.total_active_minutes, sum
        )));
    }

    if record.is_checked_in && record.check_out_time.is_some() {
        return Err(invalid(
            "checkOutTime must be empty while checked in".to_string(),
        ));
    }

    Ok(())
}

fn invalid(message: String) -> AttendanceError {
    AttendanceError::Validation(message)
}
