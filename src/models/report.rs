//! Manager daily report of break violations.
//!
//! One [`DailyReport`] exists per (manager, date), created lazily by the
//! first violation of the day. Entries are only ever appended: the store
//! exposes an atomic append primitive, so concurrent violations for the same
//! manager cannot lose updates, and downstream reporting folds over the
//! accumulated entries.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One break-limit violation entry in a manager's daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakViolation {
    /// The user who exceeded the break allowance.
    pub user_id: Uuid,
    /// The attendance record the breaks belong to.
    pub attendance_id: Uuid,
    /// Total closed-break minutes for the session.
    pub total_break_minutes: i64,
    /// When the violation was detected.
    pub recorded_at: NaiveDateTime,
}

/// The per-manager, per-day aggregate of break violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    /// The manager the report belongs to.
    pub manager_id: Uuid,
    /// The calendar date the report covers.
    pub report_date: NaiveDate,
    /// Violation entries in append order.
    pub violations: Vec<BreakViolation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    #[test]
    fn test_report_serde_round_trip() {
        let report = DailyReport {
            manager_id: Uuid::new_v4(),
            report_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            violations: vec![BreakViolation {
                user_id: Uuid::new_v4(),
                attendance_id: Uuid::new_v4(),
                total_break_minutes: 92,
                recorded_at: make_datetime("2026-03-02", "17:30:00"),
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: DailyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }

    #[test]
    fn test_report_json_shape() {
        let report = DailyReport {
            manager_id: Uuid::nil(),
            report_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            violations: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["report_date"], "2026-03-02");
        assert!(json["violations"].as_array().unwrap().is_empty());
    }
}
