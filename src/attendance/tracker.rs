use std::sync::Arc;

use chrono::{DateTime, Local, Timelike, Utc};
use tracing::{debug, info, instrument, warn};

use crate::attendance::clock::Clock;
use crate::attendance::error::{AttendanceError, AttendanceResult};
use crate::attendance::stats::{StatsPeriod, summarize};
use crate::attendance::store::{RecordStore, StoreError};
use crate::attendance::validation::{clamp_active_minutes, validate_record};
use crate::attendance::views::{
    CheckOutResult, CheckOutSummary, HeartbeatSummary, StatsView, StatusView,
};
use crate::model::attendance::{AttendanceRecord, UserId, minutes_to_hours};

/// Daily attendance lifecycle: check-in, heartbeats, check-out and
/// reporting. Stateless between calls; every operation is a single
/// read-modify-write through the store.
pub struct AttendanceTracker {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl AttendanceTracker {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    #[instrument(name = "attendance_check_in", skip(self, now))]
    pub async fn check_in(
        &self,
        user: UserId,
        now: DateTime<Local>,
    ) -> AttendanceResult<AttendanceRecord> {
        let today = now.date_naive();
        let now_utc = now.with_timezone(&Utc);

        match self.store.find_by_user_and_date(user, today).await? {
            Some(record) if record.is_checked_in => {
                debug!(record_id = record.id, "Check-in rejected: session already open");
                Err(AttendanceError::AlreadyCheckedIn(Box::new(record)))
            }
            Some(mut record) => {
                record.resume(now_utc);
                validate_record(&record)?;
                let saved = self.store.update(record).await?;
                info!(record_id = saved.id, "Attendance session resumed");
                Ok(saved)
            }
            None => {
                let record = AttendanceRecord::open(user, today, now_utc);
                validate_record(&record)?;
                match self.store.insert(record).await {
                    Ok(saved) => {
                        info!(record_id = saved.id, %today, "Checked in");
                        Ok(saved)
                    }
                    Err(StoreError::Duplicate) => {
                        // Lost a race with a concurrent check-in for the same day.
                        warn!(%today, "Concurrent check-in detected");
                        match self.store.find_by_user_and_date(user, today).await? {
                            Some(existing) if existing.is_checked_in => {
                                Err(AttendanceError::AlreadyCheckedIn(Box::new(existing)))
                            }
                            _ => Err(AttendanceError::ConcurrentModification),
                        }
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Record activity for the current hour of the open session.
    /// `active_minutes` is clamped to 0..=60.
    #[instrument(name = "attendance_heartbeat", skip(self, now))]
    pub async fn heartbeat(
        &self,
        user: UserId,
        now: DateTime<Local>,
        active_minutes: i64,
    ) -> AttendanceResult<HeartbeatSummary> {
        let mut record = self
            .store
            .find_active_session(user)
            .await?
            .ok_or(AttendanceError::NoActiveSession)?;

        let minutes = clamp_active_minutes(active_minutes);
        if i64::from(minutes) != active_minutes {
            debug!(reported = active_minutes, stored = minutes, "Clamped heartbeat minutes");
        }
        let hour = now.hour() as u8;

        record.record_activity(hour, minutes, now.with_timezone(&Utc));
        validate_record(&record)?;
        let saved = self.store.update(record).await?;

        debug!(
            record_id = saved.id,
            hour,
            total = saved.total_active_minutes,
            "Heartbeat recorded"
        );

        Ok(HeartbeatSummary {
            hour,
            total_active_minutes: saved.total_active_minutes,
            total_active_hours: saved.total_active_hours(),
        })
    }

    #[instrument(name = "attendance_check_out", skip(self, now))]
    pub async fn check_out(
        &self,
        user: UserId,
        now: DateTime<Local>,
    ) -> AttendanceResult<CheckOutResult> {
        let mut record = self
            .store
            .find_active_session(user)
            .await?
            .ok_or(AttendanceError::NoActiveSession)?;

        // The lookup only returns open records; a closed one means a racing
        // check-out got there first.
        if !record.is_checked_in {
            return Err(AttendanceError::AlreadyCheckedOut);
        }

        let now_utc = now.with_timezone(&Utc);
        record.close(now_utc);
        validate_record(&record)?;
        let saved = self.store.update(record).await?;

        info!(
            record_id = saved.id,
            active_minutes = saved.total_active_minutes,
            "Checked out"
        );

        let summary = CheckOutSummary {
            check_in: saved.check_in_time,
            check_out: now_utc,
            total_active_hours: minutes_to_hours(saved.total_active_minutes),
        };
        Ok(CheckOutResult {
            attendance: saved,
            summary,
        })
    }

    /// Current session if open, otherwise the last one seen.
    #[instrument(name = "attendance_status", skip(self, _now))]
    pub async fn status(
        &self,
        user: UserId,
        _now: DateTime<Local>,
    ) -> AttendanceResult<StatusView> {
        let record = match self.store.find_active_session(user).await? {
            Some(active) => Some(active),
            None => self.store.find_latest(user).await?,
        };

        Ok(record.as_ref().map(StatusView::from).unwrap_or_default())
    }

    #[instrument(name = "attendance_stats", skip(self, now))]
    pub async fn stats(
        &self,
        user: UserId,
        period: StatsPeriod,
        now: DateTime<Local>,
    ) -> AttendanceResult<StatsView> {
        let (from, to) = period.day_range(now);
        let records = self.store.find_in_range(user, from, to).await?;
        debug!(%from, %to, count = records.len(), "Loaded records for stats");
        Ok(summarize(period, &records))
    }
}
