use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::month::BillingMonth;
use crate::schedule::FeeRateSource;
use crate::types::{MemberId, MemberStanding};

/// the part of a member the dues calculators read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberState {
    /// last month whose dues are fully settled
    pub paid_until: BillingMonth,
    /// positive = prepaid credit, negative = carried debt
    pub wallet_balance: Money,
    /// bumped on every committed change, used for compare-and-set writes
    pub version: u64,
}

impl MemberState {
    pub fn new(paid_until: BillingMonth, wallet_balance: Money) -> Self {
        Self {
            paid_until,
            wallet_balance,
            version: 0,
        }
    }

    /// net amount owed as of `as_of`
    pub fn pending<R: FeeRateSource>(&self, rates: &R, as_of: BillingMonth) -> Money {
        crate::dues::pending_amount(rates, self.paid_until, self.wallet_balance, as_of)
    }

    /// check if carrying debt from before tracking
    pub fn has_legacy_debt(&self) -> bool {
        self.wallet_balance.is_negative()
    }

    /// check if any elapsed month is unpaid
    pub fn has_unpaid_months(&self, as_of: BillingMonth) -> bool {
        self.paid_until < as_of
    }

    /// classify for display
    pub fn standing<R: FeeRateSource>(&self, rates: &R, as_of: BillingMonth) -> MemberStanding {
        let pending = self.pending(rates, as_of);
        if self.has_unpaid_months(as_of) && pending.is_positive() {
            MemberStanding::Overdue
        } else if self.has_legacy_debt() {
            MemberStanding::LegacyDebt
        } else if self.wallet_balance.is_positive() {
            MemberStanding::InCredit
        } else {
            MemberStanding::Settled
        }
    }
}

/// state snapshot for audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub snapshot_id: Uuid,
    pub member_id: MemberId,
    pub timestamp: DateTime<Utc>,
    pub state: MemberState,
    pub trigger: String,
}

impl StateSnapshot {
    pub fn capture(member_id: MemberId, state: MemberState, timestamp: DateTime<Utc>, trigger: String) -> Self {
        Self {
            snapshot_id: Uuid::new_v4(),
            member_id,
            timestamp,
            state,
            trigger,
        }
    }
}
