//! Attendance session and break models.
//!
//! This module defines the [`AttendanceRecord`] and [`BreakInterval`] structs
//! that the attendance engine reads and writes, together with the
//! [`AttendanceStatus`] classification a completed session ends up in.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The classification of a day's attendance session.
///
/// A record stays [`Pending`](AttendanceStatus::Pending) from punch-in until
/// the session is closed (by punch-out, the midnight-crossing repair, or the
/// auto-logout sweep); closing assigns one of the three terminal statuses
/// from the elapsed hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Session is open; no status has been assigned yet.
    Pending,
    /// Fewer than 6 elapsed hours.
    HalfDay,
    /// At least 6 but fewer than 8 elapsed hours.
    ShortDay,
    /// 8 or more elapsed hours.
    FullDay,
}

/// One user's attendance session for one calendar date.
///
/// At most one record exists per (user, date); the store enforces the
/// uniqueness. A record is created open at punch-in and mutated exactly once
/// to a terminal state when the session closes. The stored `total_hours` is
/// always derived from the two punch timestamps, never set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The user the session belongs to.
    pub user_id: Uuid,
    /// The calendar date the session was opened on.
    pub date: NaiveDate,
    /// When the user punched in.
    pub punch_in: Option<NaiveDateTime>,
    /// Where the user punched in (free-form, e.g. "lat,lon").
    pub punch_in_location: Option<String>,
    /// When the session closed.
    pub punch_out: Option<NaiveDateTime>,
    /// Where the user punched out.
    pub punch_out_location: Option<String>,
    /// Elapsed hours, rounded to 2 decimal places at close.
    pub total_hours: Option<Decimal>,
    /// The session classification; terminal once the session closes.
    pub status: AttendanceStatus,
    /// True when the session was closed by a sweep or the midnight repair
    /// rather than by the user.
    pub auto_logged_out: bool,
    /// Free-text notes (e.g. the forced-close reason).
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Returns true while the session is punched in but not yet closed.
    pub fn is_open(&self) -> bool {
        self.punch_in.is_some() && self.punch_out.is_none()
    }

    /// Returns true once the session has been closed.
    pub fn is_completed(&self) -> bool {
        self.punch_out.is_some()
    }
}

/// One break taken within an attendance session.
///
/// At most one interval per record may be open (no `break_end`) at a time;
/// closing an interval computes its duration in whole minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    /// Unique identifier for the interval.
    pub id: Uuid,
    /// The attendance record the break belongs to.
    pub attendance_id: Uuid,
    /// When the break started.
    pub break_start: NaiveDateTime,
    /// When the break ended, if it has.
    pub break_end: Option<NaiveDateTime>,
    /// Break length in minutes, set when the break ends.
    pub duration_minutes: Option<i64>,
}

impl BreakInterval {
    /// Returns true while the break has not been ended.
    pub fn is_open(&self) -> bool {
        self.break_end.is_none()
    }
}
