use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::month::BillingMonth;
use crate::schedule::FeeRateSource;

/// how a pending figure was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBreakdown {
    /// first month not yet paid, if any has elapsed
    pub first_unpaid: Option<BillingMonth>,
    /// elapsed unpaid months up to and including the current month
    pub months_due: u32,
    /// schedule fees for those months
    pub accrued_fees: Money,
    /// debt carried in the wallet (absolute value of a negative balance)
    pub legacy_debt: Money,
    /// wallet credit netted against the fees
    pub credit_applied: Money,
    /// amount owed, never negative
    pub net_pending: Money,
}

/// net amount owed for months after `paid_until` through `as_of`
pub fn pending_amount<R: FeeRateSource>(
    rates: &R,
    paid_until: BillingMonth,
    wallet_balance: Money,
    as_of: BillingMonth,
) -> Money {
    pending_breakdown(rates, paid_until, wallet_balance, as_of).net_pending
}

/// pending amount together with its components
pub fn pending_breakdown<R: FeeRateSource>(
    rates: &R,
    paid_until: BillingMonth,
    wallet_balance: Money,
    as_of: BillingMonth,
) -> PendingBreakdown {
    let first_unpaid = paid_until.succ().filter(|cursor| *cursor <= as_of);

    let (months_due, accrued_fees) = match first_unpaid {
        Some(cursor) => {
            let months = cursor.months_until(as_of) + 1;
            (
                u32::try_from(months).unwrap_or(u32::MAX),
                rates.total_for_range(cursor, as_of),
            )
        }
        None => (0, Money::ZERO),
    };

    let net_pending = (accrued_fees - wallet_balance).clamp_non_negative();
    let legacy_debt = (-wallet_balance).clamp_non_negative();
    let credit_applied = wallet_balance.clamp_non_negative().min(accrued_fees);

    debug!(
        %paid_until,
        %as_of,
        months_due,
        %accrued_fees,
        %wallet_balance,
        %net_pending,
        "computed pending dues"
    );

    PendingBreakdown {
        first_unpaid,
        months_due,
        accrued_fees,
        legacy_debt,
        credit_applied,
        net_pending,
    }
}

/// pending calculator bound to a rate source
pub struct PendingCalculator<R> {
    rates: R,
}

impl<R: FeeRateSource> PendingCalculator<R> {
    pub fn new(rates: R) -> Self {
        Self { rates }
    }

    /// pending as of an explicit month
    pub fn pending(&self, paid_until: BillingMonth, wallet_balance: Money, as_of: BillingMonth) -> Money {
        pending_amount(&self.rates, paid_until, wallet_balance, as_of)
    }

    /// pending as of the provider's current month
    pub fn pending_now(
        &self,
        paid_until: BillingMonth,
        wallet_balance: Money,
        time_provider: &SafeTimeProvider,
    ) -> Money {
        self.pending(paid_until, wallet_balance, BillingMonth::current(time_provider))
    }

    pub fn breakdown(
        &self,
        paid_until: BillingMonth,
        wallet_balance: Money,
        as_of: BillingMonth,
    ) -> PendingBreakdown {
        pending_breakdown(&self.rates, paid_until, wallet_balance, as_of)
    }
}
