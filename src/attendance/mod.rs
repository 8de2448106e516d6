//! Employee attendance: daily sessions, hourly heartbeats and reporting.

pub mod clock;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod mysql;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod validation;
pub mod views;

pub use error::AttendanceError;
pub use tracker::AttendanceTracker;
