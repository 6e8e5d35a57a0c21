//! Quota availability and deduction rules.
//!
//! Pure functions over a category definition and one balance row. Two rules
//! carry deliberately asymmetric policy preserved from the organization's
//! reference behavior:
//!
//! - availability requires the FULL requested amount in EACH enabled tier
//!   (tiers are not cumulative), unless comp-off alone covers the request;
//! - deduction draws comp-off first, and when comp-off only partially
//!   covers, EVERY enabled tier whose balance covers the remainder is
//!   decremented by the remainder, while a tier that falls short is left
//!   untouched.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveBalance, LeaveCategory, QuotaTier};

/// Where an available request will be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaSource {
    /// The category tracks no quota at all; nothing will be deducted.
    Exempt,
    /// Comp-off credit alone covers the request.
    CompOff,
    /// The enabled periodic tiers cover the request.
    Tiers,
}

/// Checks whether a user's balance can cover `requested_days`.
///
/// Order of evaluation: inactive category, quota exemption, missing balance
/// row, comp-off coverage, then each enabled tier (monthly, quarterly,
/// annual) independently against the full requested amount.
///
/// # Errors
///
/// [`EngineError::InvalidCategory`] for an inactive category,
/// [`EngineError::NoBalance`] when no ledger row exists, and
/// [`EngineError::InsufficientQuota`] naming the first enabled tier that
/// cannot cover the request.
pub fn check_availability(
    category: &LeaveCategory,
    balance: Option<&LeaveBalance>,
    requested_days: Decimal,
) -> EngineResult<QuotaSource> {
    if !category.is_active {
        return Err(EngineError::InvalidCategory);
    }
    if category.is_quota_exempt() {
        return Ok(QuotaSource::Exempt);
    }

    let balance = balance.ok_or(EngineError::NoBalance)?;

    if balance.comp_off_balance >= requested_days {
        return Ok(QuotaSource::CompOff);
    }

    for tier in QuotaTier::ALL {
        if !category.tier_enabled(tier) {
            continue;
        }
        // An enabled tier with no stored balance cannot cover anything.
        let covered = balance
            .tier_balance(tier)
            .is_some_and(|remaining| remaining >= requested_days);
        if !covered {
            return Err(EngineError::InsufficientQuota { tier });
        }
    }

    Ok(QuotaSource::Tiers)
}

/// Computes the post-deduction balance row for an approved request.
///
/// Comp-off is consumed first. When it covers the full amount only comp-off
/// changes; otherwise comp-off is zeroed and every enabled tier whose
/// balance covers the remainder is decremented by the remainder. Balances
/// never go negative.
pub fn plan_deduction(
    category: &LeaveCategory,
    balance: &LeaveBalance,
    days: Decimal,
) -> LeaveBalance {
    let mut updated = balance.clone();

    if updated.comp_off_balance >= days {
        updated.comp_off_balance -= days;
        return updated;
    }

    let mut remaining = days;
    if updated.comp_off_balance > Decimal::ZERO {
        remaining -= updated.comp_off_balance;
        updated.comp_off_balance = Decimal::ZERO;
    }

    for tier in QuotaTier::ALL {
        if !category.tier_enabled(tier) {
            continue;
        }
        if let Some(current) = updated.tier_balance(tier)
            && current >= remaining
        {
            updated.set_tier_balance(tier, Some(current - remaining));
        }
    }

    updated
}
