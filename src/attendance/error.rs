use derive_more::Display;

use crate::attendance::store::StoreError;
use crate::model::attendance::AttendanceRecord;

/// Failures of attendance operations. Business-rule variants are expected
/// outcomes; only `StoreUnavailable` indicates a fault.
#[derive(Debug, Display)]
pub enum AttendanceError {
    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn(Box<AttendanceRecord>),

    #[display(fmt = "Already checked out")]
    AlreadyCheckedOut,

    #[display(fmt = "No active session found. Please check in first")]
    NoActiveSession,

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "Attendance record was modified concurrently, please retry")]
    ConcurrentModification,

    #[display(fmt = "Attendance store unavailable: {}", _0)]
    StoreUnavailable(String),
}

impl std::error::Error for AttendanceError {}

impl AttendanceError {
    /// Machine-checkable error kind sent to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            AttendanceError::AlreadyCheckedIn(_) => "ALREADY_CHECKED_IN",
            AttendanceError::AlreadyCheckedOut => "ALREADY_CHECKED_OUT",
            AttendanceError::NoActiveSession => "NO_ACTIVE_SESSION",
            AttendanceError::NotFound(_) => "NOT_FOUND",
            AttendanceError::Validation(_) => "VALIDATION_ERROR",
            AttendanceError::ConcurrentModification => "CONCURRENT_MODIFICATION",
            AttendanceError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict | StoreError::Duplicate => AttendanceError::ConcurrentModification,
            other => AttendanceError::StoreUnavailable(other.to_string()),
        }
    }
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;
