//! In-memory record store used by tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::attendance::store::{RecordStore, StoreError, StoreResult};
use crate::model::attendance::{AttendanceRecord, UserId};

#[derive(Default)]
struct Inner {
    records: BTreeMap<(UserId, NaiveDate), AttendanceRecord>,
    next_id: u64,
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    inner: Mutex<Inner>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a record in place as-is, bypassing the tracker.
    pub fn seed(&self, mut record: AttendanceRecord) -> AttendanceRecord {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        record.id = inner.next_id;
        inner
            .records
            .insert((record.user, record.date), record.clone());
        record
    }

    pub fn all_for(&self, user: UserId) -> Vec<AttendanceRecord> {
        let inner = self.inner.lock().unwrap();
        inner
            .records
            .range((user, NaiveDate::MIN)..=(user, NaiveDate::MAX))
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn newest_matching(
        &self,
        user: UserId,
        pred: impl Fn(&AttendanceRecord) -> bool,
    ) -> Option<AttendanceRecord> {
        let inner = self.inner.lock().unwrap();
        inner
            .records
            .range((user, NaiveDate::MIN)..=(user, NaiveDate::MAX))
            .rev()
            .map(|(_, r)| r)
            .find(|r| pred(r))
            .cloned()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_user_and_date(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.records.get(&(user, date)).cloned())
    }

    async fn find_active_session(&self, user: UserId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.newest_matching(user, |r| r.is_checked_in))
    }

    async fn find_latest(&self, user: UserId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.newest_matching(user, |_| true))
    }

    async fn find_in_range(
        &self,
        user: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        if from > to {
            return Ok(Vec::new());
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .range((user, from)..=(user, to))
            .rev()
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn insert(&self, mut record: AttendanceRecord) -> StoreResult<AttendanceRecord> {
        let mut inner = self.inner.lock().unwrap();
        let key = (record.user, record.date);
        if inner.records.contains_key(&key) {
            return Err(StoreError::Duplicate);
        }
        inner.next_id += 1;
        record.id = inner.next_id;
        record.version = 0;
        inner.records.insert(key, record.clone());
        Ok(record)
    }

    async fn update(&self, mut record: AttendanceRecord) -> StoreResult<AttendanceRecord> {
        let mut inner = self.inner.lock().unwrap();
        match inner.records.get_mut(&(record.user, record.date)) {
            Some(stored) if stored.id == record.id && stored.version == record.version => {
                record.version += 1;
                *stored = record.clone();
                Ok(record)
            }
            Some(_) => Err(StoreError::Conflict),
            None => Err(StoreError::Database(format!(
                "attendance record {} not found",
                record.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn open(user: UserId, d: u32) -> AttendanceRecord {
        let at = Utc.with_ymd_and_hms(2026, 3, d, 8, 0, 0).unwrap();
        AttendanceRecord::open(user, day(d), at)
    }

    #[actix_web::test]
    async fn test_insert_enforces_unique_user_day() {
        let store = InMemoryRecordStore::new();
        store.insert(open(1, 2)).await.unwrap();
        assert!(matches!(
            store.insert(open(1, 2)).await,
            Err(StoreError::Duplicate)
        ));
        // Other users and days are independent.
        store.insert(open(2, 2)).await.unwrap();
        store.insert(open(1, 3)).await.unwrap();
    }

    #[actix_web::test]
    async fn test_stale_update_conflicts() {
        let store = InMemoryRecordStore::new();
        let saved = store.insert(open(1, 2)).await.unwrap();

        let first = store.update(saved.clone()).await.unwrap();
        assert_eq!(first.version, 1);
        assert!(matches!(
            store.update(saved).await,
            Err(StoreError::Conflict)
        ));
    }

    #[actix_web::test]
    async fn test_active_session_is_newest_open_record() {
        let store = InMemoryRecordStore::new();
        store.seed(open(1, 1));
        let mut closed = open(1, 3);
        closed.is_checked_in = false;
        store.seed(closed);
        store.seed(open(1, 2));

        let active = store.find_active_session(1).await.unwrap().unwrap();
        assert_eq!(active.date, day(2));
        let latest = store.find_latest(1).await.unwrap().unwrap();
        assert_eq!(latest.date, day(3));
        assert!(store.find_active_session(9).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_range_is_descending_and_inclusive() {
        let store = InMemoryRecordStore::new();
        for d in 1..=5 {
            store.seed(open(1, d));
        }
        store.seed(open(2, 3));

        let dates: Vec<NaiveDate> = store
            .find_in_range(1, day(2), day(4))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![day(4), day(3), day(2)]);
    }
}
