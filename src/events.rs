use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::month::BillingMonth;
use crate::types::{MemberId, PaymentId};

/// all events emitted while tracking dues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // roster events
    MemberEnrolled {
        member_id: MemberId,
        name: String,
        paid_until: BillingMonth,
        legacy_debt: Money,
        timestamp: DateTime<Utc>,
    },
    MemberRemoved {
        member_id: MemberId,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        member_id: MemberId,
        payment_id: PaymentId,
        amount: Money,
        new_balance: Money,
        timestamp: DateTime<Utc>,
    },
    MonthsSettled {
        member_id: MemberId,
        from: BillingMonth,
        through: BillingMonth,
        months: u32,
        fees: Money,
        timestamp: DateTime<Utc>,
    },
    DebtReduced {
        member_id: MemberId,
        remaining_debt: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentTruncated {
        member_id: MemberId,
        stopped_at: BillingMonth,
        unspent: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
