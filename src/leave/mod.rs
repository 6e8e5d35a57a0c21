//! Leave-quota ledger engine.
//!
//! Covers the leave-request lifecycle, the multi-tier quota ledger with
//! comp-off deduction priority, the December 31 annual reset, and balance
//! seeding for new categories.

mod engine;
mod quota;

pub use engine::{
    CreateRequestOutcome, LeaveEngine, LeaveRequestInput, NewLeaveCategory, QuotaResetOutcome,
};
pub use quota::{QuotaSource, check_availability, plan_deduction};
