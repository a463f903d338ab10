//! Append-only record of payments received.
//!
//! Entries are written once, after the new member state has been computed,
//! and never edited. Removing a member does not remove their entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::month::BillingMonth;
use crate::state::MemberState;
use crate::types::{MemberId, PaymentId};

/// a single payment as committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub member_id: MemberId,
    pub amount: Money,
    pub recorded_at: DateTime<Utc>,
    pub state_before: MemberState,
    pub state_after: MemberState,
}

impl PaymentRecord {
    pub fn new(
        member_id: MemberId,
        amount: Money,
        recorded_at: DateTime<Utc>,
        state_before: MemberState,
        state_after: MemberState,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            amount,
            recorded_at,
            state_before,
            state_after,
        }
    }

    /// months this payment moved the paid-until date forward
    pub fn months_settled(&self) -> i64 {
        self.state_before.paid_until.months_until(self.state_after.paid_until)
    }
}

#[derive(Debug, Default, Clone)]
pub struct PaymentLedger {
    records: Vec<PaymentRecord>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: PaymentRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// all entries in the order they were written
    pub fn records(&self) -> &[PaymentRecord] {
        &self.records
    }

    /// a member's payments, newest first
    pub fn history(&self, member_id: MemberId) -> Vec<&PaymentRecord> {
        let mut history: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.member_id == member_id)
            .collect();
        history.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        history
    }

    /// total received in `month`, across all members
    pub fn collected_in(&self, month: BillingMonth) -> Money {
        self.records
            .iter()
            .filter(|r| BillingMonth::from_datetime(r.recorded_at) == month)
            .map(|r| r.amount)
            .sum()
    }

    /// total ever received from a member
    pub fn total_paid_by(&self, member_id: MemberId) -> Money {
        self.records
            .iter()
            .filter(|r| r.member_id == member_id)
            .map(|r| r.amount)
            .sum()
    }
}
