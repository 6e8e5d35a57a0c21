//! Attendance time-accounting engine.
//!
//! Covers the punch in/out lifecycle, break tracking against the 75-minute
//! allowance, the 6/8/10 hour session classification, the midnight-crossing
//! repair, and the periodic auto-logout sweep.

mod engine;
mod status;

pub use engine::{AttendanceEngine, BreakEnded, BreakStarted, PunchInOutcome, PunchOutOutcome};
pub use status::{
    AUTO_LOGOUT_HOURS, FULL_DAY_THRESHOLD, HALF_DAY_THRESHOLD, MAX_BREAK_MINUTES, classify,
    elapsed_hours, round_hours, round_minutes,
};
