//! The 6/8/10 hour rule.
//!
//! This module holds the fixed session-classification policy: a completed
//! session is a half day under 6.0 elapsed hours, a short day from 6.0 up to
//! (but excluding) 8.0, and a full day at 8.0 or more. The 10-hour ceiling
//! is not part of classification: it is the auto-logout sweep's trigger,
//! and a manual punch-out past 10 hours still classifies as a full day.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::AttendanceStatus;

/// Elapsed hours below which a session is a half day.
pub const HALF_DAY_THRESHOLD: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Elapsed hours at which a session becomes a full day.
pub const FULL_DAY_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Open-session hours after which the sweep force-closes a session.
pub const AUTO_LOGOUT_HOURS: i64 = 10;

/// Total closed-break minutes a session may accumulate before the user's
/// manager is notified.
pub const MAX_BREAK_MINUTES: i64 = 75;

/// Classifies a completed session by its exact elapsed hours.
///
/// Boundary values belong to the higher class: exactly 6.0 hours is a short
/// day and exactly 8.0 hours is a full day.
///
/// # Examples
///
/// ```
/// use attendance_engine::attendance::classify;
/// use attendance_engine::models::AttendanceStatus;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(classify(Decimal::from_str("5.99").unwrap()), AttendanceStatus::HalfDay);
/// assert_eq!(classify(Decimal::from_str("6.0").unwrap()), AttendanceStatus::ShortDay);
/// assert_eq!(classify(Decimal::from_str("8.0").unwrap()), AttendanceStatus::FullDay);
/// ```
pub fn classify(total_hours: Decimal) -> AttendanceStatus {
    if total_hours < HALF_DAY_THRESHOLD {
        AttendanceStatus::HalfDay
    } else if total_hours < FULL_DAY_THRESHOLD {
        AttendanceStatus::ShortDay
    } else {
        AttendanceStatus::FullDay
    }
}

/// Computes exact elapsed hours between two timestamps as a `Decimal`.
///
/// Classification runs on this exact value; storage rounds it separately via
/// [`round_hours`].
pub fn elapsed_hours(punch_in: NaiveDateTime, punch_out: NaiveDateTime) -> Decimal {
    Decimal::from((punch_out - punch_in).num_seconds()) / Decimal::from(3600)
}

/// Rounds an hour total to 2 decimal places for storage, half away from
/// zero.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a break duration to whole minutes, half away from zero.
pub fn round_minutes(duration: Duration) -> i64 {
    (Decimal::from(duration.num_seconds()) / Decimal::from(60))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
