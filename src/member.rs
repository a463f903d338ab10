use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::dues::PaymentOutcome;
use crate::month::BillingMonth;
use crate::schedule::FeeRateSource;
use crate::state::{MemberState, StateSnapshot};
use crate::types::{MemberId, MemberProfile, MemberStanding};

/// a member of the organization and their dues position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub profile: MemberProfile,
    pub state: MemberState,
    pub joined_at: DateTime<Utc>,
    #[serde(skip)]
    pub snapshots: Vec<StateSnapshot>,
}

impl Member {
    /// enrol with a starting paid-until month and any debt carried in
    pub fn enrol(
        profile: MemberProfile,
        paid_until: BillingMonth,
        legacy_debt: Money,
        joined_at: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4();
        let state = MemberState::new(paid_until, -legacy_debt);
        let snapshot = StateSnapshot::capture(id, state, joined_at, "enrolment".to_string());

        Self {
            id,
            profile,
            state,
            joined_at,
            snapshots: vec![snapshot],
        }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn paid_until(&self) -> BillingMonth {
        self.state.paid_until
    }

    pub fn wallet_balance(&self) -> Money {
        self.state.wallet_balance
    }

    pub fn version(&self) -> u64 {
        self.state.version
    }

    pub fn pending<R: FeeRateSource>(&self, rates: &R, as_of: BillingMonth) -> Money {
        self.state.pending(rates, as_of)
    }

    pub fn standing<R: FeeRateSource>(&self, rates: &R, as_of: BillingMonth) -> MemberStanding {
        self.state.standing(rates, as_of)
    }

    /// commit a computed payment outcome, returning the previous state
    pub(crate) fn commit_payment(
        &mut self,
        outcome: &PaymentOutcome,
        amount: Money,
        timestamp: DateTime<Utc>,
    ) -> MemberState {
        let previous = self.state;
        self.state = outcome.next_state(&previous);
        self.snapshots.push(StateSnapshot::capture(
            self.id,
            self.state,
            timestamp,
            format!("payment: {}", amount),
        ));
        previous
    }
}
