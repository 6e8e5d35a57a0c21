//! Comprehensive integration tests for the attendance and leave engines.
//!
//! This test suite drives full flows over a shared in-memory store:
//! - A complete workday with breaks and a violation report
//! - Midnight-crossing repair on the next morning's punch-in
//! - The auto-logout sweep against a mixed population of sessions
//! - The leave request lifecycle (create, notify, approve, deduct)
//! - Comp-off credit priority over tier balances
//! - The December 31 annual reset cycle
//! - Cross-engine interaction (attendance blocking leave)

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use attendance_engine::attendance::AttendanceEngine;
use attendance_engine::clock::FixedClock;
use attendance_engine::error::EngineError;
use attendance_engine::leave::{LeaveEngine, LeaveRequestInput, NewLeaveCategory, QuotaResetOutcome};
use attendance_engine::models::{AttendanceStatus, LeaveStatus, NotificationKind, User};
use attendance_engine::notify::MemorySink;
use attendance_engine::store::{MemoryStore, RecordStore};

// =============================================================================
// Test Helpers
// =============================================================================

struct World {
    store: MemoryStore,
    clock: FixedClock,
    sink: MemorySink,
    attendance: AttendanceEngine<MemoryStore, FixedClock, MemorySink>,
    leave: LeaveEngine<MemoryStore, FixedClock, MemorySink>,
    manager_id: Uuid,
    user_id: Uuid,
}

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
        .unwrap()
}

fn dec(value: &str) -> Decimal {
    use std::str::FromStr;
    Decimal::from_str(value).unwrap()
}

fn world_at(start: NaiveDateTime) -> World {
    let store = MemoryStore::new();
    let clock = FixedClock::at(start);
    let sink = MemorySink::new();

    let manager_id = Uuid::new_v4();
    store.put_user(User {
        id: manager_id,
        full_name: "Meera Nair".to_string(),
        manager_id: None,
        is_active: true,
    });
    let user_id = Uuid::new_v4();
    store.put_user(User {
        id: user_id,
        full_name: "Arjun Rao".to_string(),
        manager_id: Some(manager_id),
        is_active: true,
    });

    World {
        attendance: AttendanceEngine::new(store.clone(), clock.clone(), sink.clone()),
        leave: LeaveEngine::new(store.clone(), clock.clone(), sink.clone()),
        store,
        clock,
        sink,
        manager_id,
        user_id,
    }
}

fn seed_annual_category(world: &World, quota_days: i64) -> Uuid {
    world
        .leave
        .create_category(NewLeaveCategory {
            name: "Earned Leave".to_string(),
            code: "EL".to_string(),
            has_monthly_quota: false,
            monthly_quota_days: None,
            has_quarterly_quota: false,
            quarterly_quota_days: None,
            has_annual_quota: true,
            annual_quota_days: Some(Decimal::from(quota_days)),
            requires_approval: true,
            is_paid: true,
        })
        .unwrap()
}

fn leave_request(world: &World, category_id: Uuid, start: &str, end: &str) -> LeaveRequestInput {
    LeaveRequestInput {
        user_id: world.user_id,
        category_id,
        start_date: make_date(start),
        end_date: make_date(end),
        is_half_day: false,
        reason: "Travel".to_string(),
    }
}

// =============================================================================
// Attendance flows
// =============================================================================

#[test]
fn test_full_workday_with_breaks_files_violation_report() {
    let world = world_at(make_datetime("2026-03-02", "09:00:00"));

    let punch = world.attendance.punch_in(world.user_id, "12.97,77.59").unwrap();

    // Two breaks totalling 80 minutes.
    world.clock.set(make_datetime("2026-03-02", "11:00:00"));
    world.attendance.start_break(punch.attendance_id).unwrap();
    world.clock.set(make_datetime("2026-03-02", "11:50:00"));
    let first = world.attendance.end_break(punch.attendance_id).unwrap();
    assert_eq!(first.duration_minutes, 50);

    world.clock.set(make_datetime("2026-03-02", "14:00:00"));
    world.attendance.start_break(punch.attendance_id).unwrap();
    world.clock.set(make_datetime("2026-03-02", "14:30:00"));
    let second = world.attendance.end_break(punch.attendance_id).unwrap();
    assert_eq!(second.duration_minutes, 30);

    world.clock.set(make_datetime("2026-03-02", "18:00:00"));
    let outcome = world.attendance.punch_out(world.user_id, "12.97,77.59").unwrap();
    assert_eq!(outcome.status, AttendanceStatus::FullDay);
    assert_eq!(outcome.total_hours, dec("9.00"));

    // 80 minutes of breaks exceed the 75-minute allowance.
    let report = world
        .store
        .daily_report(world.manager_id, make_date("2026-03-02"))
        .unwrap()
        .expect("violation report");
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].total_break_minutes, 80);

    let sent = world.sink.sent();
    let violation = sent
        .iter()
        .find(|n| n.kind == NotificationKind::BreakViolation)
        .expect("manager notification");
    assert_eq!(violation.recipient, world.manager_id);
    assert!(violation.message.contains("Arjun Rao"));
}

#[test]
fn test_workday_within_break_allowance_files_nothing() {
    let world = world_at(make_datetime("2026-03-02", "09:00:00"));
    let punch = world.attendance.punch_in(world.user_id, "office").unwrap();

    world.clock.set(make_datetime("2026-03-02", "12:00:00"));
    world.attendance.start_break(punch.attendance_id).unwrap();
    world.clock.set(make_datetime("2026-03-02", "13:15:00"));
    world.attendance.end_break(punch.attendance_id).unwrap();

    world.clock.set(make_datetime("2026-03-02", "17:00:00"));
    world.attendance.punch_out(world.user_id, "office").unwrap();

    assert!(
        world
            .store
            .daily_report(world.manager_id, make_date("2026-03-02"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_next_morning_punch_in_repairs_forgotten_session() {
    let world = world_at(make_datetime("2026-03-01", "21:00:00"));
    let stale = world.attendance.punch_in(world.user_id, "office").unwrap();

    world.clock.set(make_datetime("2026-03-02", "09:00:00"));
    let fresh = world.attendance.punch_in(world.user_id, "office").unwrap();

    let repaired = world.store.attendance(stale.attendance_id).unwrap().unwrap();
    assert_eq!(repaired.punch_out, Some(make_datetime("2026-03-01", "23:59:59")));
    assert!(repaired.auto_logged_out);
    assert_eq!(repaired.notes.as_deref(), Some("System: Midnight crossing"));

    // The fresh session is untouched by the repair.
    let record = world.store.attendance(fresh.attendance_id).unwrap().unwrap();
    assert!(record.is_open());
    assert_eq!(record.date, make_date("2026-03-02"));
}

#[test]
fn test_sweep_closes_only_sessions_past_ten_hours() {
    let world = world_at(make_datetime("2026-03-02", "06:00:00"));
    let early_bird = world.user_id;

    let late_id = Uuid::new_v4();
    world.store.put_user(User {
        id: late_id,
        full_name: "Kiran Shah".to_string(),
        manager_id: Some(world.manager_id),
        is_active: true,
    });

    let early_punch = world.attendance.punch_in(early_bird, "office").unwrap();
    world.clock.set(make_datetime("2026-03-02", "09:30:00"));
    let late_punch = world.attendance.punch_in(late_id, "office").unwrap();

    // 16:10: the 6:00 session is past ten hours, the 9:30 one is not.
    world.clock.set(make_datetime("2026-03-02", "16:10:00"));
    assert_eq!(world.attendance.auto_logout_long_sessions().unwrap(), 1);

    let closed = world.store.attendance(early_punch.attendance_id).unwrap().unwrap();
    assert_eq!(closed.punch_out, Some(make_datetime("2026-03-02", "16:00:00")));
    assert_eq!(closed.total_hours, Some(dec("10.00")));
    assert_eq!(closed.status, AttendanceStatus::FullDay);

    let open = world.store.attendance(late_punch.attendance_id).unwrap().unwrap();
    assert!(open.is_open());

    // The next run catches the second session once it crosses the line.
    world.clock.set(make_datetime("2026-03-02", "19:40:00"));
    assert_eq!(world.attendance.auto_logout_long_sessions().unwrap(), 1);
    let closed = world.store.attendance(late_punch.attendance_id).unwrap().unwrap();
    assert_eq!(closed.punch_out, Some(make_datetime("2026-03-02", "19:30:00")));
}

// =============================================================================
// Leave flows
// =============================================================================

#[test]
fn test_leave_request_lifecycle_create_approve_deduct() {
    let world = world_at(make_datetime("2026-03-02", "10:00:00"));
    let category_id = seed_annual_category(&world, 18);

    let outcome = world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-09", "2026-03-11"))
        .unwrap();
    assert_eq!(outcome.total_days, dec("3"));

    let sent = world.sink.sent();
    assert!(
        sent.iter()
            .any(|n| n.kind == NotificationKind::General && n.recipient == world.manager_id)
    );

    world
        .leave
        .approve(outcome.request_id, world.manager_id, Some("Approved for travel"))
        .unwrap();

    let request = world.store.leave_request(outcome.request_id).unwrap().unwrap();
    assert_eq!(request.status, LeaveStatus::Approved);
    assert_eq!(request.reviewed_at, Some(make_datetime("2026-03-02", "10:00:00")));

    let balance = world.store.balance(world.user_id, category_id).unwrap().unwrap();
    assert_eq!(balance.annual_balance, Some(dec("15")));

    let sent = world.sink.sent();
    assert!(
        sent.iter()
            .any(|n| n.kind == NotificationKind::LeaveApproved && n.recipient == world.user_id)
    );
}

#[test]
fn test_insufficient_quota_blocks_creation_exact_quota_passes() {
    let world = world_at(make_datetime("2026-03-02", "10:00:00"));
    let category_id = seed_annual_category(&world, 2);

    let err = world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-09", "2026-03-11"))
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientQuota { .. }));

    // Two days fit a balance of exactly two.
    let outcome = world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-09", "2026-03-10"))
        .unwrap();
    world.leave.approve(outcome.request_id, world.manager_id, None).unwrap();

    let balance = world.store.balance(world.user_id, category_id).unwrap().unwrap();
    assert_eq!(balance.annual_balance, Some(Decimal::ZERO));
}

#[test]
fn test_comp_off_credit_is_consumed_before_tiers() {
    let world = world_at(make_datetime("2026-03-02", "10:00:00"));
    let category_id = seed_annual_category(&world, 18);

    world
        .leave
        .add_comp_off(world.user_id, category_id, dec("5"), "Release weekend")
        .unwrap();
    let sent = world.sink.sent();
    assert!(sent.iter().any(|n| n.kind == NotificationKind::CompOffAdded));

    let outcome = world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-09", "2026-03-11"))
        .unwrap();
    world.leave.approve(outcome.request_id, world.manager_id, None).unwrap();

    let balance = world.store.balance(world.user_id, category_id).unwrap().unwrap();
    assert_eq!(balance.comp_off_balance, dec("2"));
    assert_eq!(balance.annual_balance, Some(dec("18")));
}

#[test]
fn test_punched_attendance_blocks_overlapping_leave() {
    let world = world_at(make_datetime("2026-03-10", "09:00:00"));
    let category_id = seed_annual_category(&world, 18);

    world.attendance.punch_in(world.user_id, "office").unwrap();

    let err = world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-09", "2026-03-11"))
        .unwrap_err();
    assert!(matches!(err, EngineError::AttendanceConflict));

    // A range clear of the punched day goes through.
    world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-16", "2026-03-17"))
        .unwrap();
}

// =============================================================================
// Annual reset cycle
// =============================================================================

#[test]
fn test_annual_reset_cycle() {
    let world = world_at(make_datetime("2026-03-02", "10:00:00"));
    let category_id = seed_annual_category(&world, 18);

    // Burn ten days through an approved request, then earn comp-off.
    let outcome = world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-09", "2026-03-18"))
        .unwrap();
    world.leave.approve(outcome.request_id, world.manager_id, None).unwrap();
    world
        .leave
        .add_comp_off(world.user_id, category_id, dec("1.5"), "Audit support")
        .unwrap();

    // Daily scheduler invocations before year end are no-ops.
    world.clock.set(make_datetime("2026-12-30", "23:00:00"));
    assert_eq!(world.leave.reset_annual_quotas().unwrap(), QuotaResetOutcome::Skipped);
    let balance = world.store.balance(world.user_id, category_id).unwrap().unwrap();
    assert_eq!(balance.annual_balance, Some(dec("8")));

    // December 31: tiers restore, comp-off survives.
    world.clock.set(make_datetime("2026-12-31", "01:00:00"));
    let reset = world.leave.reset_annual_quotas().unwrap();
    assert_eq!(
        reset,
        QuotaResetOutcome::Completed {
            categories: 1,
            balances: 2,
        }
    );

    let balance = world.store.balance(world.user_id, category_id).unwrap().unwrap();
    assert_eq!(balance.annual_balance, Some(dec("18")));
    assert_eq!(balance.comp_off_balance, dec("1.5"));
    assert_eq!(balance.last_reset, make_date("2026-12-31"));

    // Re-running on the same day is safe.
    assert!(matches!(
        world.leave.reset_annual_quotas().unwrap(),
        QuotaResetOutcome::Completed { .. }
    ));
}

// =============================================================================
// Cross-engine day-in-the-life
// =============================================================================

#[test]
fn test_day_in_the_life() {
    let world = world_at(make_datetime("2026-03-02", "08:55:00"));
    let category_id = seed_annual_category(&world, 18);

    // Monday: a normal day.
    world.attendance.punch_in(world.user_id, "office").unwrap();
    world.clock.advance(Duration::hours(8) + Duration::minutes(10));
    let monday = world.attendance.punch_out(world.user_id, "office").unwrap();
    assert_eq!(monday.status, AttendanceStatus::FullDay);

    // Tuesday: user requests Thursday and Friday off.
    world.clock.set(make_datetime("2026-03-03", "09:30:00"));
    world.attendance.punch_in(world.user_id, "office").unwrap();
    let request = world
        .leave
        .create_request(leave_request(&world, category_id, "2026-03-05", "2026-03-06"))
        .unwrap();
    world
        .leave
        .approve(request.request_id, world.manager_id, None)
        .unwrap();

    // Tuesday ends as a short day.
    world.clock.set(make_datetime("2026-03-03", "16:00:00"));
    let tuesday = world.attendance.punch_out(world.user_id, "office").unwrap();
    assert_eq!(tuesday.status, AttendanceStatus::ShortDay);
    assert_eq!(tuesday.total_hours, dec("6.50"));

    let balance = world.store.balance(world.user_id, category_id).unwrap().unwrap();
    assert_eq!(balance.annual_balance, Some(dec("16")));

    // Nothing for the sweep to do.
    world.clock.set(make_datetime("2026-03-03", "23:00:00"));
    assert_eq!(world.attendance.auto_logout_long_sessions().unwrap(), 0);
}
