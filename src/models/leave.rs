//! Leave category, balance, and request models.
//!
//! This module defines the leave-side entities: the policy definition
//! ([`LeaveCategory`]), the per-user quota ledger row ([`LeaveBalance`]),
//! and the request lifecycle record ([`LeaveRequest`]), together with the
//! [`leave_days`] day-count rule.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the three periodic quota pools a category may enable.
///
/// Tiers are independent: a category may enable any subset, and the
/// availability check requires the full requested amount in EACH enabled
/// tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaTier {
    /// The monthly allowance pool.
    Monthly,
    /// The quarterly allowance pool.
    Quarterly,
    /// The annual allowance pool.
    Annual,
}

impl QuotaTier {
    /// All tiers in deduction-check order.
    pub const ALL: [QuotaTier; 3] = [QuotaTier::Monthly, QuotaTier::Quarterly, QuotaTier::Annual];
}

impl std::fmt::Display for QuotaTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaTier::Monthly => write!(f, "monthly"),
            QuotaTier::Quarterly => write!(f, "quarterly"),
            QuotaTier::Annual => write!(f, "annual"),
        }
    }
}

/// A leave policy definition.
///
/// Each tier is an independent boolean-plus-quantity pair: `has_*_quota`
/// says whether the pool applies to this category, and the matching
/// `*_quota_days` is the allowance a balance row resets to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveCategory {
    /// Unique identifier for the category.
    pub id: Uuid,
    /// Display name (e.g. "Casual Leave").
    pub name: String,
    /// Short code (e.g. "CL").
    pub code: String,
    /// Whether the monthly pool applies.
    pub has_monthly_quota: bool,
    /// Monthly allowance in days, when the monthly pool applies.
    pub monthly_quota_days: Option<Decimal>,
    /// Whether the quarterly pool applies.
    pub has_quarterly_quota: bool,
    /// Quarterly allowance in days, when the quarterly pool applies.
    pub quarterly_quota_days: Option<Decimal>,
    /// Whether the annual pool applies.
    pub has_annual_quota: bool,
    /// Annual allowance in days, when the annual pool applies.
    pub annual_quota_days: Option<Decimal>,
    /// Whether requests in this category need manager approval.
    pub requires_approval: bool,
    /// Whether leave in this category is paid.
    pub is_paid: bool,
    /// Whether the category is currently usable.
    pub is_active: bool,
}

impl LeaveCategory {
    /// Returns true if the given tier is enabled for this category.
    pub fn tier_enabled(&self, tier: QuotaTier) -> bool {
        match tier {
            QuotaTier::Monthly => self.has_monthly_quota,
            QuotaTier::Quarterly => self.has_quarterly_quota,
            QuotaTier::Annual => self.has_annual_quota,
        }
    }

    /// Returns the configured allowance for the given tier.
    pub fn quota_days(&self, tier: QuotaTier) -> Option<Decimal> {
        match tier {
            QuotaTier::Monthly => self.monthly_quota_days,
            QuotaTier::Quarterly => self.quarterly_quota_days,
            QuotaTier::Annual => self.annual_quota_days,
        }
    }

    /// Returns true if no quota tier applies (the category is exempt from
    /// balance tracking, e.g. some comp-off-only categories).
    pub fn is_quota_exempt(&self) -> bool {
        !self.has_monthly_quota && !self.has_quarterly_quota && !self.has_annual_quota
    }
}

/// One user's quota ledger row for one category.
///
/// Tier balances are `None` when the tier is disabled for the category. The
/// comp-off balance is always present, purely additive, and untouched by the
/// periodic reset. Balances never go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The user the ledger row belongs to.
    pub user_id: Uuid,
    /// The category the ledger row tracks.
    pub category_id: Uuid,
    /// Remaining monthly allowance, when that tier is enabled.
    pub monthly_balance: Option<Decimal>,
    /// Remaining quarterly allowance, when that tier is enabled.
    pub quarterly_balance: Option<Decimal>,
    /// Remaining annual allowance, when that tier is enabled.
    pub annual_balance: Option<Decimal>,
    /// Compensatory-leave credit, consumed before any tier.
    pub comp_off_balance: Decimal,
    /// When the periodic tiers were last reset.
    pub last_reset: NaiveDate,
}

impl LeaveBalance {
    /// Returns the remaining balance for the given tier.
    pub fn tier_balance(&self, tier: QuotaTier) -> Option<Decimal> {
        match tier {
            QuotaTier::Monthly => self.monthly_balance,
            QuotaTier::Quarterly => self.quarterly_balance,
            QuotaTier::Annual => self.annual_balance,
        }
    }

    /// Sets the remaining balance for the given tier.
    pub fn set_tier_balance(&mut self, tier: QuotaTier, value: Option<Decimal>) {
        match tier {
            QuotaTier::Monthly => self.monthly_balance = value,
            QuotaTier::Quarterly => self.quarterly_balance = value,
            QuotaTier::Annual => self.annual_balance = value,
        }
    }
}

/// The lifecycle state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    Pending,
    /// Approved; quota has been deducted.
    Approved,
    /// Rejected; no quota was touched.
    Rejected,
}

/// A leave request.
///
/// `total_days` is fixed at creation and never recomputed; the status moves
/// from pending to exactly one of approved/rejected, irreversibly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The requesting user.
    pub user_id: Uuid,
    /// The category requested against.
    pub category_id: Uuid,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// True for a half-day request.
    pub is_half_day: bool,
    /// Day count computed at creation.
    pub total_days: Decimal,
    /// The requester's stated reason.
    pub reason: String,
    /// Lifecycle state.
    pub status: LeaveStatus,
    /// Who reviewed the request, once reviewed.
    pub reviewed_by: Option<Uuid>,
    /// When the review happened.
    pub reviewed_at: Option<NaiveDateTime>,
    /// Free-text notes left by the reviewer.
    pub review_notes: Option<String>,
}

/// Computes the day count for a leave range.
///
/// A half-day request always counts as 0.5 regardless of the range;
/// otherwise the count is inclusive of both endpoints.
///
/// # Example
///
/// ```
/// use attendance_engine::models::leave_days;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
/// assert_eq!(leave_days(start, end, false), Decimal::from(3));
/// assert_eq!(leave_days(start, start, true), Decimal::new(5, 1)); // 0.5
/// ```
pub fn leave_days(start_date: NaiveDate, end_date: NaiveDate, is_half_day: bool) -> Decimal {
    if is_half_day {
        return Decimal::new(5, 1);
    }
    Decimal::from((end_date - start_date).num_days() + 1)
}
