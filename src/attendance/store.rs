//! Persistence contract for attendance records.

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use crate::model::attendance::{AttendanceRecord, UserId};

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "Database error: {}", _0)]
    Database(String),

    #[display(fmt = "Serialization error: {}", _0)]
    Serialization(String),

    /// The (user, date) uniqueness constraint rejected an insert.
    #[display(fmt = "Attendance record already exists for this day")]
    Duplicate,

    /// The stored version no longer matches the one being written.
    #[display(fmt = "Attendance record version conflict")]
    Conflict,
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Attendance record persistence.
///
/// Implementations must enforce one record per (user, date) and treat
/// `update` as a compare-and-swap on `version`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Record for `user` on `date`, if any.
    async fn find_by_user_and_date(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Most recent record (by `date` descending) with `is_checked_in` set.
    /// Finds sessions opened on an earlier day that are still running.
    async fn find_active_session(&self, user: UserId) -> StoreResult<Option<AttendanceRecord>>;

    /// Most recent record by `date` regardless of state.
    async fn find_latest(&self, user: UserId) -> StoreResult<Option<AttendanceRecord>>;

    /// Records with `from <= date <= to`, ordered by `date` descending.
    async fn find_in_range(
        &self,
        user: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>>;

    /// Insert a new record, returning it with its assigned id.
    /// Fails with `StoreError::Duplicate` if (user, date) is taken.
    async fn insert(&self, record: AttendanceRecord) -> StoreResult<AttendanceRecord>;

    /// Write back a record read earlier. Fails with `StoreError::Conflict`
    /// if it changed since; on success returns it with the new version.
    async fn update(&self, record: AttendanceRecord) -> StoreResult<AttendanceRecord>;
}
