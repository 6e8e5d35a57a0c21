//! The leave engine.
//!
//! Owns the leave-request lifecycle (create, approve, reject), comp-off
//! credits, the December 31 annual quota reset, and balance seeding when a
//! category is created. Approval is the one multi-row transition: the
//! status change and the quota deduction commit together or not at all.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    LeaveBalance, LeaveCategory, LeaveRequest, LeaveStatus, Notification, NotificationKind,
    QuotaTier, leave_days,
};
use crate::notify::NotificationSink;
use crate::store::{RecordStore, WriteSet};

use super::quota::{check_availability, plan_deduction};

/// Input for [`LeaveEngine::create_request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequestInput {
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
    /// The requester's stated reason.
    pub reason: String,
}

/// Result payload of a successful request creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequestOutcome {
    /// The newly created request.
    pub request_id: Uuid,
    /// The day count fixed at creation.
    pub total_days: Decimal,
}

/// Input for [`LeaveEngine::create_category`].
///
/// Each tier is an independent enable-flag-plus-allowance pair, mirroring
/// the stored [`LeaveCategory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLeaveCategory {
    /// Display name (e.g. "Casual Leave").
    pub name: String,
    /// Short code (e.g. "CL").
    pub code: String,
    /// Whether the monthly pool applies.
    pub has_monthly_quota: bool,
    /// Monthly allowance in days; required when the monthly pool applies.
    pub monthly_quota_days: Option<Decimal>,
    /// Whether the quarterly pool applies.
    pub has_quarterly_quota: bool,
    /// Quarterly allowance in days; required when the quarterly pool applies.
    pub quarterly_quota_days: Option<Decimal>,
    /// Whether the annual pool applies.
    pub has_annual_quota: bool,
    /// Annual allowance in days; required when the annual pool applies.
    pub annual_quota_days: Option<Decimal>,
    /// Whether requests need manager approval.
    pub requires_approval: bool,
    /// Whether leave in this category is paid.
    pub is_paid: bool,
}

/// Result of a [`LeaveEngine::reset_annual_quotas`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaResetOutcome {
    /// The run was outside December 31 and did nothing.
    Skipped,
    /// The reset ran.
    Completed {
        /// Active categories processed.
        categories: usize,
        /// Balance rows reset.
        balances: usize,
    },
}

/// The leave engine.
///
/// Generic over its collaborators the same way as
/// [`crate::attendance::AttendanceEngine`].
pub struct LeaveEngine<S, C, N> {
    store: S,
    clock: C,
    notifier: N,
}

impl<S, C, N> LeaveEngine<S, C, N>
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

    /// Creates a pending leave request.
    ///
    /// Validates the reason, the date range, the absence of punched-in
    /// attendance within the range, and quota availability; fixes the day
    /// count at creation time; notifies the user's manager, if they have
    /// one.
    pub fn create_request(&self, input: LeaveRequestInput) -> EngineResult<CreateRequestOutcome> {
        if input.reason.trim().is_empty() {
            return Err(EngineError::MissingField {
                field: "reason".to_string(),
            });
        }
        if input.start_date > input.end_date {
            return Err(EngineError::InvalidDateRange);
        }
        let conflicts =
            self.store
                .attendance_in_range(input.user_id, input.start_date, input.end_date)?;
        if !conflicts.is_empty() {
            return Err(EngineError::AttendanceConflict);
        }

        let total_days = leave_days(input.start_date, input.end_date, input.is_half_day);

        let category = self
            .store
            .category(input.category_id)?
            .ok_or(EngineError::InvalidCategory)?;
        let balance = self.store.balance(input.user_id, input.category_id)?;
        check_availability(&category, balance.as_ref(), total_days)?;

        let request = LeaveRequest {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            category_id: input.category_id,
            start_date: input.start_date,
            end_date: input.end_date,
            is_half_day: input.is_half_day,
            total_days,
            reason: input.reason,
            status: LeaveStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
        };
        let request_id = request.id;
        self.store.insert_leave_request(request)?;

        info!(
            user_id = %input.user_id,
            request_id = %request_id,
            total_days = %total_days,
            "leave request created"
        );

        if let Some(user) = self.store.user(input.user_id)?
            && let Some(manager_id) = user.manager_id
        {
            self.notify(Notification {
                recipient: manager_id,
                kind: NotificationKind::General,
                title: "New Leave Request".to_string(),
                message: format!(
                    "{} has submitted a new leave request awaiting your approval.",
                    user.full_name
                ),
                action_ref: Some(format!("manager/leave-approvals?request_id={}", request_id)),
            });
        }

        Ok(CreateRequestOutcome {
            request_id,
            total_days,
        })
    }

    /// Approves a pending request and deducts its days from the user's
    /// balance in one atomic commit.
    ///
    /// Fails with [`EngineError::NotFound`] / [`EngineError::AlreadyProcessed`]
    /// without side effects; a storage failure rolls the whole transition
    /// back and surfaces as [`EngineError::System`]. The approval
    /// notification goes out only after the commit has succeeded.
    pub fn approve(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        notes: Option<&str>,
    ) -> EngineResult<()> {
        let now = self.clock.now();

        let request = self
            .store
            .leave_request(request_id)?
            .ok_or(EngineError::NotFound)?;
        if request.status != LeaveStatus::Pending {
            return Err(EngineError::AlreadyProcessed);
        }

        let mut updated = request;
        updated.status = LeaveStatus::Approved;
        updated.reviewed_by = Some(reviewer_id);
        updated.reviewed_at = Some(now);
        updated.review_notes = notes.map(str::to_string);

        let mut writes = WriteSet::new();
        if let Some(category) = self.store.category(updated.category_id)?
            && let Some(balance) = self.store.balance(updated.user_id, updated.category_id)?
        {
            writes.put_balance(plan_deduction(&category, &balance, updated.total_days));
        }
        let user_id = updated.user_id;
        let (start_date, end_date) = (updated.start_date, updated.end_date);
        writes.put_leave_request(updated);
        self.store.commit(writes)?;

        info!(
            request_id = %request_id,
            reviewer_id = %reviewer_id,
            "leave request approved"
        );
        self.notify(Notification {
            recipient: user_id,
            kind: NotificationKind::LeaveApproved,
            title: "Leave Approved".to_string(),
            message: format!(
                "Your leave request from {} to {} has been approved.",
                start_date, end_date
            ),
            action_ref: None,
        });

        Ok(())
    }

    /// Rejects a pending request.
    ///
    /// Same guards as approval; no quota is touched. The rejection
    /// notification includes the reviewer's notes when present.
    pub fn reject(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        notes: Option<&str>,
    ) -> EngineResult<()> {
        let now = self.clock.now();

        let request = self
            .store
            .leave_request(request_id)?
            .ok_or(EngineError::NotFound)?;
        if request.status != LeaveStatus::Pending {
            return Err(EngineError::AlreadyProcessed);
        }

        let mut updated = request;
        updated.status = LeaveStatus::Rejected;
        updated.reviewed_by = Some(reviewer_id);
        updated.reviewed_at = Some(now);
        updated.review_notes = notes.map(str::to_string);
        let user_id = updated.user_id;
        let (start_date, end_date) = (updated.start_date, updated.end_date);
        self.store.update_leave_request(updated)?;

        info!(
            request_id = %request_id,
            reviewer_id = %reviewer_id,
            "leave request rejected"
        );
        let mut message = format!(
            "Your leave request from {} to {} has been rejected.",
            start_date, end_date
        );
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            message.push_str(&format!(" Reason: {}", notes));
        }
        self.notify(Notification {
            recipient: user_id,
            kind: NotificationKind::LeaveRejected,
            title: "Leave Rejected".to_string(),
            message,
            action_ref: None,
        });

        Ok(())
    }

    /// Adds comp-off credit to a user's balance for a category.
    ///
    /// The credit is purely additive and independent of the periodic tiers.
    /// Fails with [`EngineError::NoBalance`] when the user holds no ledger
    /// row for the category.
    pub fn add_comp_off(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        days: Decimal,
        reason: &str,
    ) -> EngineResult<()> {
        let mut balance = self
            .store
            .balance(user_id, category_id)?
            .ok_or(EngineError::NoBalance)?;
        balance.comp_off_balance += days;
        self.store.update_balance(balance)?;

        info!(user_id = %user_id, category_id = %category_id, days = %days, "comp-off added");
        self.notify(Notification {
            recipient: user_id,
            kind: NotificationKind::CompOffAdded,
            title: "Comp-Off Added".to_string(),
            message: format!(
                "{} day(s) comp-off has been added to your account. Reason: {}",
                days, reason
            ),
            action_ref: None,
        });

        Ok(())
    }

    /// Resets the periodic quota tiers of every active category.
    ///
    /// A guarded no-op outside December 31, so the external scheduler can
    /// invoke it daily. Each enabled tier of every balance row is restored
    /// to the category's configured allowance; comp-off balances are never
    /// touched. One atomic commit per category.
    pub fn reset_annual_quotas(&self) -> EngineResult<QuotaResetOutcome> {
        let today = self.clock.today();
        if today.month() != 12 || today.day() != 31 {
            info!(date = %today, "annual quota reset skipped outside December 31");
            return Ok(QuotaResetOutcome::Skipped);
        }

        let mut categories = 0;
        let mut balances = 0;
        for category in self.store.active_categories()? {
            if category.is_quota_exempt() {
                continue;
            }

            let mut writes = WriteSet::new();
            let mut count = 0;
            for mut balance in self.store.balances_for_category(category.id)? {
                for tier in QuotaTier::ALL {
                    if category.tier_enabled(tier) {
                        balance.set_tier_balance(tier, category.quota_days(tier));
                    }
                }
                balance.last_reset = today;
                writes.put_balance(balance);
                count += 1;
            }
            if !writes.is_empty() {
                self.store.commit(writes)?;
            }
            categories += 1;
            balances += count;
        }

        info!(categories, balances, "annual quotas reset");
        Ok(QuotaResetOutcome::Completed {
            categories,
            balances,
        })
    }

    /// Creates a new leave category and seeds a balance row for every
    /// active user.
    ///
    /// Every enabled tier must carry its allowance; the category is created
    /// active.
    pub fn create_category(&self, input: NewLeaveCategory) -> EngineResult<Uuid> {
        if input.name.trim().is_empty() {
            return Err(EngineError::MissingField {
                field: "name".to_string(),
            });
        }
        if input.code.trim().is_empty() {
            return Err(EngineError::MissingField {
                field: "code".to_string(),
            });
        }
        let tiers = [
            (input.has_monthly_quota, input.monthly_quota_days, "monthly_quota_days"),
            (
                input.has_quarterly_quota,
                input.quarterly_quota_days,
                "quarterly_quota_days",
            ),
            (input.has_annual_quota, input.annual_quota_days, "annual_quota_days"),
        ];
        for (enabled, days, field) in tiers {
            if enabled && days.is_none() {
                return Err(EngineError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        let category = LeaveCategory {
            id: Uuid::new_v4(),
            name: input.name,
            code: input.code,
            has_monthly_quota: input.has_monthly_quota,
            monthly_quota_days: input.monthly_quota_days,
            has_quarterly_quota: input.has_quarterly_quota,
            quarterly_quota_days: input.quarterly_quota_days,
            has_annual_quota: input.has_annual_quota,
            annual_quota_days: input.annual_quota_days,
            requires_approval: input.requires_approval,
            is_paid: input.is_paid,
            is_active: true,
        };
        let category_id = category.id;
        self.store.insert_category(category)?;
        let seeded = self.initialize_category_for_all_users(category_id)?;

        info!(category_id = %category_id, seeded, "leave category created");
        Ok(category_id)
    }

    /// Seeds a balance row for every active user who does not already hold
    /// one for the category.
    ///
    /// Enabled tiers start at their full allowance, comp-off at zero, and
    /// `last_reset` at December 31 of the current year. Returns the number
    /// of rows created; reinvoking is harmless.
    pub fn initialize_category_for_all_users(&self, category_id: Uuid) -> EngineResult<usize> {
        let category = self
            .store
            .category(category_id)?
            .ok_or(EngineError::InvalidCategory)?;
        let year_end = year_end(self.clock.today());

        let mut seeded = 0;
        for user in self.store.active_users()? {
            if self.store.balance(user.id, category_id)?.is_some() {
                continue;
            }
            self.store.insert_balance(LeaveBalance {
                user_id: user.id,
                category_id,
                monthly_balance: enabled_quota(category.has_monthly_quota, category.monthly_quota_days),
                quarterly_balance: enabled_quota(
                    category.has_quarterly_quota,
                    category.quarterly_quota_days,
                ),
                annual_balance: enabled_quota(category.has_annual_quota, category.annual_quota_days),
                comp_off_balance: Decimal::ZERO,
                last_reset: year_end,
            })?;
            seeded += 1;
        }

        Ok(seeded)
    }

    // Delivery failures must not fail the business operation.
    fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.deliver(notification) {
            tracing::warn!(error = %err, "notification delivery failed");
        }
    }
}

fn enabled_quota(enabled: bool, days: Option<Decimal>) -> Option<Decimal> {
    if enabled { days } else { None }
}

fn year_end(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 12, 31).expect("December 31 exists in every year")
}
