//! In-memory [`RecordStore`] implementation.
//!
//! All tables live behind one mutex, which makes every trait method,
//! including the multi-row [`RecordStore::commit`], trivially atomic. Clones share
//! the same tables, so tests can hand an engine a handle and keep another
//! for assertions. This is the store used by the test suite and benchmark
//! harness; a production deployment would put a database behind the same
//! trait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    AttendanceRecord, BreakInterval, BreakViolation, DailyReport, LeaveBalance, LeaveCategory,
    LeaveRequest, User,
};

use super::{RecordStore, StoreError, WriteSet};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    attendance: HashMap<Uuid, AttendanceRecord>,
    breaks: HashMap<Uuid, BreakInterval>,
    categories: HashMap<Uuid, LeaveCategory>,
    balances: HashMap<(Uuid, Uuid), LeaveBalance>,
    leave_requests: HashMap<Uuid, LeaveRequest>,
    daily_reports: HashMap<(Uuid, NaiveDate), DailyReport>,
}

/// An [`RecordStore`] backed by in-process hash maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user row (test/bootstrap helper).
    pub fn put_user(&self, user: User) {
        self.lock().users.insert(user.id, user);
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("store lock poisoned")
    }
}

impl RecordStore for MemoryStore {
    fn user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    fn active_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self
            .lock()
            .users
            .values()
            .filter(|u| u.is_active)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    fn attendance(&self, id: Uuid) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.lock().attendance.get(&id).cloned())
    }

    fn attendance_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self
            .lock()
            .attendance
            .values()
            .find(|r| r.user_id == user_id && r.date == date)
            .cloned())
    }

    fn open_attendance_for(&self, user_id: Uuid) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records: Vec<AttendanceRecord> = self
            .lock()
            .attendance
            .values()
            .filter(|r| r.user_id == user_id && r.is_open())
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn open_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records: Vec<AttendanceRecord> = self
            .lock()
            .attendance
            .values()
            .filter(|r| r.is_open())
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.date, r.id));
        Ok(records)
    }

    fn attendance_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self
            .lock()
            .attendance
            .values()
            .filter(|r| {
                r.user_id == user_id
                    && r.punch_in.is_some()
                    && r.date >= start
                    && r.date <= end
            })
            .cloned()
            .collect())
    }

    fn insert_attendance(&self, record: AttendanceRecord) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if tables
            .attendance
            .values()
            .any(|r| r.user_id == record.user_id && r.date == record.date)
        {
            return Err(StoreError::Conflict(format!(
                "attendance already exists for user {} on {}",
                record.user_id, record.date
            )));
        }
        tables.attendance.insert(record.id, record);
        Ok(())
    }

    fn update_attendance(&self, record: AttendanceRecord) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if !tables.attendance.contains_key(&record.id) {
            return Err(StoreError::MissingRow(format!("attendance {}", record.id)));
        }
        tables.attendance.insert(record.id, record);
        Ok(())
    }

    fn breaks_for(&self, attendance_id: Uuid) -> Result<Vec<BreakInterval>, StoreError> {
        let mut intervals: Vec<BreakInterval> = self
            .lock()
            .breaks
            .values()
            .filter(|b| b.attendance_id == attendance_id)
            .cloned()
            .collect();
        intervals.sort_by_key(|b| b.break_start);
        Ok(intervals)
    }

    fn open_break(&self, attendance_id: Uuid) -> Result<Option<BreakInterval>, StoreError> {
        Ok(self
            .lock()
            .breaks
            .values()
            .find(|b| b.attendance_id == attendance_id && b.is_open())
            .cloned())
    }

    fn insert_break(&self, interval: BreakInterval) -> Result<(), StoreError> {
        self.lock().breaks.insert(interval.id, interval);
        Ok(())
    }

    fn update_break(&self, interval: BreakInterval) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if !tables.breaks.contains_key(&interval.id) {
            return Err(StoreError::MissingRow(format!("break {}", interval.id)));
        }
        tables.breaks.insert(interval.id, interval);
        Ok(())
    }

    fn category(&self, id: Uuid) -> Result<Option<LeaveCategory>, StoreError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    fn active_categories(&self) -> Result<Vec<LeaveCategory>, StoreError> {
        let mut categories: Vec<LeaveCategory> = self
            .lock()
            .categories
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn insert_category(&self, category: LeaveCategory) -> Result<(), StoreError> {
        self.lock().categories.insert(category.id, category);
        Ok(())
    }

    fn balance(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<LeaveBalance>, StoreError> {
        Ok(self.lock().balances.get(&(user_id, category_id)).cloned())
    }

    fn balances_for_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<LeaveBalance>, StoreError> {
        let mut balances: Vec<LeaveBalance> = self
            .lock()
            .balances
            .values()
            .filter(|b| b.category_id == category_id)
            .cloned()
            .collect();
        balances.sort_by_key(|b| b.user_id);
        Ok(balances)
    }

    fn insert_balance(&self, balance: LeaveBalance) -> Result<(), StoreError> {
        let mut tables = self.lock();
        let key = (balance.user_id, balance.category_id);
        if tables.balances.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "balance already exists for user {} category {}",
                balance.user_id, balance.category_id
            )));
        }
        tables.balances.insert(key, balance);
        Ok(())
    }

    fn update_balance(&self, balance: LeaveBalance) -> Result<(), StoreError> {
        let mut tables = self.lock();
        let key = (balance.user_id, balance.category_id);
        if !tables.balances.contains_key(&key) {
            return Err(StoreError::MissingRow(format!(
                "balance for user {} category {}",
                balance.user_id, balance.category_id
            )));
        }
        tables.balances.insert(key, balance);
        Ok(())
    }

    fn leave_request(&self, id: Uuid) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.lock().leave_requests.get(&id).cloned())
    }

    fn insert_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError> {
        self.lock().leave_requests.insert(request.id, request);
        Ok(())
    }

    fn update_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if !tables.leave_requests.contains_key(&request.id) {
            return Err(StoreError::MissingRow(format!("leave request {}", request.id)));
        }
        tables.leave_requests.insert(request.id, request);
        Ok(())
    }

    fn append_break_violation(
        &self,
        manager_id: Uuid,
        date: NaiveDate,
        violation: BreakViolation,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables
            .daily_reports
            .entry((manager_id, date))
            .or_insert_with(|| DailyReport {
                manager_id,
                report_date: date,
                violations: Vec::new(),
            })
            .violations
            .push(violation);
        Ok(())
    }

    fn daily_report(
        &self,
        manager_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyReport>, StoreError> {
        Ok(self.lock().daily_reports.get(&(manager_id, date)).cloned())
    }

    fn commit(&self, writes: WriteSet) -> Result<(), StoreError> {
        // One guard covers the whole batch, so the writes land atomically
        // with respect to every other store method. Validation runs before
        // any row is applied: on error the batch leaves no trace.
        let mut tables = self.lock();
        for record in writes.attendance() {
            if tables
                .attendance
                .values()
                .any(|r| r.id != record.id && r.user_id == record.user_id && r.date == record.date)
            {
                return Err(StoreError::Conflict(format!(
                    "attendance already exists for user {} on {}",
                    record.user_id, record.date
                )));
            }
        }
        for record in writes.attendance() {
            tables.attendance.insert(record.id, record.clone());
        }
        for request in writes.leave_requests() {
            tables.leave_requests.insert(request.id, request.clone());
        }
        for balance in writes.balances() {
            tables
                .balances
                .insert((balance.user_id, balance.category_id), balance.clone());
        }
        Ok(())
    }
}
