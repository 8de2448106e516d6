//! MySQL-backed record store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

use crate::attendance::store::{RecordStore, StoreError, StoreResult};
use crate::model::attendance::{AttendanceRecord, HourlyLog, UserId};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, date, check_in_time, check_out_time, hourly_logs,
           total_active_minutes, is_checked_in, last_heartbeat, version
    FROM attendance
"#;

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    user_id: u64,
    date: NaiveDate,
    check_in_time: DateTime<Utc>,
    check_out_time: Option<DateTime<Utc>>,
    hourly_logs: Json<Vec<HourlyLog>>,
    total_active_minutes: u32,
    is_checked_in: bool,
    last_heartbeat: DateTime<Utc>,
    version: u32,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: row.id,
            user: row.user_id,
            date: row.date,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            hourly_logs: row.hourly_logs.0,
            total_active_minutes: row.total_active_minutes,
            is_checked_in: row.is_checked_in,
            last_heartbeat: row.last_heartbeat,
            version: row.version,
        }
    }
}

#[derive(Clone)]
pub struct MySqlRecordStore {
    pool: MySqlPool,
}

impl MySqlRecordStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the attendance table if it does not exist yet.
    pub async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendance (
                id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
                user_id BIGINT UNSIGNED NOT NULL,
                date DATE NOT NULL,
                check_in_time DATETIME(3) NOT NULL,
                check_out_time DATETIME(3) NULL,
                hourly_logs JSON NOT NULL,
                total_active_minutes INT UNSIGNED NOT NULL DEFAULT 0,
                is_checked_in BOOLEAN NOT NULL DEFAULT FALSE,
                last_heartbeat DATETIME(3) NOT NULL,
                version INT UNSIGNED NOT NULL DEFAULT 0,
                UNIQUE KEY uq_attendance_user_date (user_id, date),
                KEY idx_attendance_open (user_id, is_checked_in, date)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Attendance schema initialized");
        Ok(())
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        user: UserId,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE {clause} ORDER BY date DESC LIMIT 1");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AttendanceRecord::from))
    }
}

#[async_trait]
impl RecordStore for MySqlRecordStore {
    async fn find_by_user_and_date(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE user_id = ? AND date = ?");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(user)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AttendanceRecord::from))
    }

    async fn find_active_session(&self, user: UserId) -> StoreResult<Option<AttendanceRecord>> {
        self.fetch_one_where("user_id = ? AND is_checked_in = TRUE", user)
            .await
    }

    async fn find_latest(&self, user: UserId) -> StoreResult<Option<AttendanceRecord>> {
        self.fetch_one_where("user_id = ?", user).await
    }

    async fn find_in_range(
        &self,
        user: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE user_id = ? AND date >= ? AND date <= ? ORDER BY date DESC"
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(user)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn insert(&self, mut record: AttendanceRecord) -> StoreResult<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
            (user_id, date, check_in_time, check_out_time, hourly_logs,
             total_active_minutes, is_checked_in, last_heartbeat, version)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(record.user)
        .bind(record.date)
        .bind(record.check_in_time)
        .bind(record.check_out_time)
        .bind(Json(&record.hourly_logs))
        .bind(record.total_active_minutes)
        .bind(record.is_checked_in)
        .bind(record.last_heartbeat)
        .execute(&self.pool)
        .await?;

        record.id = result.last_insert_id();
        record.version = 0;
        Ok(record)
    }

    async fn update(&self, mut record: AttendanceRecord) -> StoreResult<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_out_time = ?, hourly_logs = ?, total_active_minutes = ?,
                is_checked_in = ?, last_heartbeat = ?, version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(record.check_out_time)
        .bind(Json(&record.hourly_logs))
        .bind(record.total_active_minutes)
        .bind(record.is_checked_in)
        .bind(record.last_heartbeat)
        .bind(record.id)
        .bind(record.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }

        record.version += 1;
        Ok(record)
    }
}
