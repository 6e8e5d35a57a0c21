//! The attendance engine.
//!
//! Owns the punch in/out lifecycle, break tracking, the post-punch-out
//! break-violation check, and the periodic auto-logout sweep. Every
//! operation is a bounded read-modify-write against the injected store;
//! the midnight-crossing repair and the new punch-in land in one atomic
//! commit.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, BreakInterval, BreakViolation, Notification,
    NotificationKind,
};
use crate::notify::NotificationSink;
use crate::store::{RecordStore, WriteSet};

use super::status::{
    AUTO_LOGOUT_HOURS, MAX_BREAK_MINUTES, classify, elapsed_hours, round_hours, round_minutes,
};

/// Result payload of a successful punch-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchInOutcome {
    /// The newly created attendance record.
    pub attendance_id: Uuid,
    /// The recorded punch-in time.
    pub punched_in_at: NaiveDateTime,
}

/// Result payload of a successful punch-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchOutOutcome {
    /// The closed attendance record.
    pub attendance_id: Uuid,
    /// Elapsed hours, rounded to 2 decimal places.
    pub total_hours: Decimal,
    /// The assigned session classification.
    pub status: AttendanceStatus,
}

/// Result payload of a successful break start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakStarted {
    /// The newly opened break interval.
    pub break_id: Uuid,
    /// When the break started.
    pub started_at: NaiveDateTime,
}

/// Result payload of a successful break end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEnded {
    /// The closed break interval.
    pub break_id: Uuid,
    /// Break length in whole minutes.
    pub duration_minutes: i64,
}

/// The attendance engine.
///
/// Generic over its three collaborators so tests can supply an in-memory
/// store, a fixed clock, and a collecting sink.
pub struct AttendanceEngine<S, C, N> {
    store: S,
    clock: C,
    notifier: N,
}

impl<S, C, N> AttendanceEngine<S, C, N>
where
    S: RecordStore,
    C: Clock,
    N: NotificationSink,
{
    /// Creates an engine over the given collaborators.
    pub fn new(store: S, clock: C, notifier: N) -> Self {
        Self {
            store,
            clock,
            notifier,
        }
    }

    /// Opens today's attendance session for a user.
    ///
    /// Fails with [`EngineError::AlreadyPunchedIn`] while today's session is
    /// open and [`EngineError::AlreadyCompleted`] once it has closed. Any
    /// session left open on a PRIOR date is repaired first: it is
    /// force-closed at 23:59:59 of its own date and tagged auto-logged-out.
    /// The repairs and the new record commit atomically.
    pub fn punch_in(&self, user_id: Uuid, location: &str) -> EngineResult<PunchInOutcome> {
        let now = self.clock.now();
        let today = now.date();

        if let Some(existing) = self.store.attendance_on(user_id, today)? {
            if existing.is_open() {
                return Err(EngineError::AlreadyPunchedIn);
            }
            if existing.is_completed() {
                return Err(EngineError::AlreadyCompleted);
            }
        }

        let mut writes = WriteSet::new();
        for stale in self.store.open_attendance_for(user_id)? {
            if stale.date < today {
                let closed_at = end_of_day(stale.date);
                info!(
                    user_id = %user_id,
                    attendance_id = %stale.id,
                    stale_date = %stale.date,
                    "repairing midnight-crossed session"
                );
                writes.put_attendance(force_closed(stale, closed_at, "System: Midnight crossing"));
            }
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            user_id,
            date: today,
            punch_in: Some(now),
            punch_in_location: Some(location.to_string()),
            punch_out: None,
            punch_out_location: None,
            total_hours: None,
            status: AttendanceStatus::Pending,
            auto_logged_out: false,
            notes: None,
        };
        let attendance_id = record.id;
        writes.put_attendance(record);
        self.store.commit(writes)?;

        info!(user_id = %user_id, attendance_id = %attendance_id, "punched in");
        Ok(PunchInOutcome {
            attendance_id,
            punched_in_at: now,
        })
    }

    /// Closes today's attendance session for a user.
    ///
    /// Computes exact elapsed hours, classifies the session by the 6/8/10
    /// rule, stores the total rounded to 2 decimal places, and then runs the
    /// break-violation check against the day's closed breaks.
    pub fn punch_out(&self, user_id: Uuid, location: &str) -> EngineResult<PunchOutOutcome> {
        let now = self.clock.now();
        let today = now.date();

        let record = self
            .store
            .attendance_on(user_id, today)?
            .ok_or(EngineError::NoPunchIn)?;
        if record.is_completed() {
            return Err(EngineError::AlreadyPunchedOut);
        }
        let Some(punch_in) = record.punch_in else {
            return Err(EngineError::NoPunchIn);
        };

        let exact = elapsed_hours(punch_in, now);
        let status = classify(exact);
        let total_hours = round_hours(exact);

        let mut updated = record;
        updated.punch_out = Some(now);
        updated.punch_out_location = Some(location.to_string());
        updated.total_hours = Some(total_hours);
        updated.status = status;
        self.store.update_attendance(updated.clone())?;

        info!(
            user_id = %user_id,
            attendance_id = %updated.id,
            total_hours = %total_hours,
            status = ?status,
            "punched out"
        );

        self.check_break_violations(&updated, now)?;

        Ok(PunchOutOutcome {
            attendance_id: updated.id,
            total_hours,
            status,
        })
    }

    /// Starts a break within an attendance session.
    ///
    /// Fails with [`EngineError::NotFound`] when the record does not exist
    /// and [`EngineError::BreakInProgress`] while another break is open.
    pub fn start_break(&self, attendance_id: Uuid) -> EngineResult<BreakStarted> {
        let now = self.clock.now();

        if self.store.attendance(attendance_id)?.is_none() {
            return Err(EngineError::NotFound);
        }
        if self.store.open_break(attendance_id)?.is_some() {
            return Err(EngineError::BreakInProgress);
        }

        let interval = BreakInterval {
            id: Uuid::new_v4(),
            attendance_id,
            break_start: now,
            break_end: None,
            duration_minutes: None,
        };
        let break_id = interval.id;
        self.store.insert_break(interval)?;

        Ok(BreakStarted {
            break_id,
            started_at: now,
        })
    }

    /// Ends the open break of an attendance session.
    ///
    /// The duration is recorded in whole minutes, rounded half away from
    /// zero.
    pub fn end_break(&self, attendance_id: Uuid) -> EngineResult<BreakEnded> {
        let now = self.clock.now();

        let mut interval = self
            .store
            .open_break(attendance_id)?
            .ok_or(EngineError::NoActiveBreak)?;

        let duration_minutes = round_minutes(now - interval.break_start);
        interval.break_end = Some(now);
        interval.duration_minutes = Some(duration_minutes);
        let break_id = interval.id;
        self.store.update_break(interval)?;

        Ok(BreakEnded {
            break_id,
            duration_minutes,
        })
    }

    /// Force-closes every session open for 10 hours or more.
    ///
    /// Each session closes at exactly `punch_in + 10h` (not the sweep run
    /// time), so enforcement latency is bounded by the sweep interval
    /// without inflating the recorded hours. Returns the number of sessions
    /// processed; a repeated run in the same instant processes none.
    pub fn auto_logout_long_sessions(&self) -> EngineResult<usize> {
        let now = self.clock.now();
        let limit = Duration::hours(AUTO_LOGOUT_HOURS);
        let mut processed = 0;

        for record in self.store.open_attendance()? {
            let Some(punch_in) = record.punch_in else {
                continue;
            };
            if now - punch_in < limit {
                continue;
            }

            let user_id = record.user_id;
            let attendance_id = record.id;
            let closed = force_closed(
                record,
                punch_in + limit,
                "Auto-logout: 10 hour limit reached",
            );
            self.store.update_attendance(closed)?;

            info!(
                user_id = %user_id,
                attendance_id = %attendance_id,
                punched_in_at = %punch_in,
                "session force-closed at the 10 hour limit"
            );
            self.notify(Notification {
                recipient: user_id,
                kind: NotificationKind::AutoLogout,
                title: "Auto Logout".to_string(),
                message: "You were automatically logged out after 10 hours of active session."
                    .to_string(),
                action_ref: None,
            });
            processed += 1;
        }

        Ok(processed)
    }

    /// Checks the day's closed breaks against the 75-minute allowance and,
    /// on violation, notifies the user's manager and appends an entry to the
    /// manager's daily report.
    fn check_break_violations(
        &self,
        record: &AttendanceRecord,
        now: NaiveDateTime,
    ) -> EngineResult<()> {
        let breaks = self.store.breaks_for(record.id)?;
        let total_break_minutes: i64 = breaks.iter().filter_map(|b| b.duration_minutes).sum();
        if total_break_minutes <= MAX_BREAK_MINUTES {
            return Ok(());
        }

        let Some(user) = self.store.user(record.user_id)? else {
            return Ok(());
        };
        let Some(manager_id) = user.manager_id else {
            return Ok(());
        };

        warn!(
            user_id = %record.user_id,
            attendance_id = %record.id,
            total_break_minutes,
            "break allowance exceeded"
        );
        self.notify(Notification {
            recipient: manager_id,
            kind: NotificationKind::BreakViolation,
            title: "Break Time Violation".to_string(),
            message: format!(
                "{} exceeded the break time limit. Total break time: {} minutes (Limit: {} minutes)",
                user.full_name, total_break_minutes, MAX_BREAK_MINUTES
            ),
            action_ref: Some(format!("manager/attendance-details?id={}", record.id)),
        });
        self.store.append_break_violation(
            manager_id,
            now.date(),
            BreakViolation {
                user_id: record.user_id,
                attendance_id: record.id,
                total_break_minutes,
                recorded_at: now,
            },
        )?;

        Ok(())
    }

    // Delivery failures must not fail the business operation.
    fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.deliver(notification) {
            warn!(error = %err, "notification delivery failed");
        }
    }
}

/// Closes a session at the given instant, classifying it from the elapsed
/// hours and tagging it as auto-logged-out with the given note.
fn force_closed(
    mut record: AttendanceRecord,
    at: NaiveDateTime,
    note: &str,
) -> AttendanceRecord {
    if let Some(punch_in) = record.punch_in {
        let exact = elapsed_hours(punch_in, at);
        record.total_hours = Some(round_hours(exact));
        record.status = classify(exact);
    }
    record.punch_out = Some(at);
    record.auto_logged_out = true;
    record.notes = Some(note.to_string());
    record
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .expect("23:59:59 is a valid time of day")
}
