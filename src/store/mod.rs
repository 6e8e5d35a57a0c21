//! Persistent record store boundary.
//!
//! The engines treat storage as an injected collaborator behind the
//! [`RecordStore`] trait: keyed lookups and single-row writes per entity,
//! a handful of open-session queries, an atomic append into the per-manager
//! daily report, and one multi-row transaction primitive ([`WriteSet`]) used
//! wherever several rows must change together (punch-in with midnight
//! repair, leave approval, the annual reset).
//!
//! Concurrency control lives behind this trait: the (user, date) uniqueness
//! of attendance records and the atomicity of [`RecordStore::commit`] are
//! store obligations, not engine ones.

mod memory;

pub use memory::MemoryStore;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AttendanceRecord, BreakInterval, BreakViolation, DailyReport, LeaveBalance, LeaveCategory,
    LeaveRequest, User,
};

/// Error returned by a [`RecordStore`] operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage failed (I/O, connection, serialization).
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A write conflicted with existing state (e.g. a duplicate
    /// (user, date) attendance row).
    #[error("write conflict: {0}")]
    Conflict(String),

    /// An update referenced a row that does not exist.
    #[error("missing row: {0}")]
    MissingRow(String),
}

/// An explicit batch of row upserts applied atomically by
/// [`RecordStore::commit`].
///
/// The engine builds the full post-state of every affected row up front;
/// the store applies all of them or none. Rows are upserted by primary key
/// (attendance and requests by id, balances by (user, category)).
#[derive(Debug, Clone, Default)]
pub struct WriteSet {
    attendance: Vec<AttendanceRecord>,
    leave_requests: Vec<LeaveRequest>,
    balances: Vec<LeaveBalance>,
}

impl WriteSet {
    /// Creates an empty write set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attendance row to upsert.
    pub fn put_attendance(&mut self, record: AttendanceRecord) {
        self.attendance.push(record);
    }

    /// Adds a leave request row to upsert.
    pub fn put_leave_request(&mut self, request: LeaveRequest) {
        self.leave_requests.push(request);
    }

    /// Adds a balance row to upsert.
    pub fn put_balance(&mut self, balance: LeaveBalance) {
        self.balances.push(balance);
    }

    /// Returns true when no writes have been queued.
    pub fn is_empty(&self) -> bool {
        self.attendance.is_empty() && self.leave_requests.is_empty() && self.balances.is_empty()
    }

    /// The queued attendance upserts.
    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    /// The queued leave request upserts.
    pub fn leave_requests(&self) -> &[LeaveRequest] {
        &self.leave_requests
    }

    /// The queued balance upserts.
    pub fn balances(&self) -> &[LeaveBalance] {
        &self.balances
    }
}

/// Durable keyed storage for the engines' entities.
///
/// Every method is individually atomic; [`RecordStore::commit`] extends that
/// to a multi-row batch. Implementations must serialize concurrent writers
/// touching the same rows.
pub trait RecordStore: Send + Sync {
    /// Looks up a user by id.
    fn user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Returns all active users.
    fn active_users(&self) -> Result<Vec<User>, StoreError>;

    /// Looks up an attendance record by id.
    fn attendance(&self, id: Uuid) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Looks up a user's attendance record for an exact date.
    fn attendance_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Returns every open (punched-in, not punched-out) record for a user,
    /// regardless of date.
    fn open_attendance_for(&self, user_id: Uuid) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Returns every open record across all users, for the auto-logout sweep.
    fn open_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Returns a user's punched-in records with dates in `[start, end]`.
    fn attendance_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Inserts a new attendance record; fails with [`StoreError::Conflict`]
    /// if one already exists for the same (user, date).
    fn insert_attendance(&self, record: AttendanceRecord) -> Result<(), StoreError>;

    /// Replaces an existing attendance record by id.
    fn update_attendance(&self, record: AttendanceRecord) -> Result<(), StoreError>;

    /// Returns all break intervals for an attendance record.
    fn breaks_for(&self, attendance_id: Uuid) -> Result<Vec<BreakInterval>, StoreError>;

    /// Returns the open break interval for a record, if any.
    fn open_break(&self, attendance_id: Uuid) -> Result<Option<BreakInterval>, StoreError>;

    /// Inserts a new break interval.
    fn insert_break(&self, interval: BreakInterval) -> Result<(), StoreError>;

    /// Replaces an existing break interval by id.
    fn update_break(&self, interval: BreakInterval) -> Result<(), StoreError>;

    /// Looks up a leave category by id.
    fn category(&self, id: Uuid) -> Result<Option<LeaveCategory>, StoreError>;

    /// Returns all active categories.
    fn active_categories(&self) -> Result<Vec<LeaveCategory>, StoreError>;

    /// Inserts a new leave category.
    fn insert_category(&self, category: LeaveCategory) -> Result<(), StoreError>;

    /// Looks up a user's balance row for a category.
    fn balance(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<LeaveBalance>, StoreError>;

    /// Returns every balance row for a category.
    fn balances_for_category(&self, category_id: Uuid) -> Result<Vec<LeaveBalance>, StoreError>;

    /// Inserts a new balance row; fails with [`StoreError::Conflict`] if one
    /// already exists for the same (user, category).
    fn insert_balance(&self, balance: LeaveBalance) -> Result<(), StoreError>;

    /// Replaces an existing balance row.
    fn update_balance(&self, balance: LeaveBalance) -> Result<(), StoreError>;

    /// Looks up a leave request by id.
    fn leave_request(&self, id: Uuid) -> Result<Option<LeaveRequest>, StoreError>;

    /// Inserts a new leave request.
    fn insert_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError>;

    /// Replaces an existing leave request by id.
    fn update_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError>;

    /// Atomically appends a violation entry to the manager's daily report,
    /// creating the report on first use.
    fn append_break_violation(
        &self,
        manager_id: Uuid,
        date: NaiveDate,
        violation: BreakViolation,
    ) -> Result<(), StoreError>;

    /// Returns a manager's daily report, if one exists for the date.
    fn daily_report(
        &self,
        manager_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyReport>, StoreError>;

    /// Applies every row in the write set atomically; on error nothing is
    /// applied.
    fn commit(&self, writes: WriteSet) -> Result<(), StoreError>;
}
