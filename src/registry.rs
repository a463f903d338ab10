//! In-memory member roster and payment ledger.
//!
//! The registry plays the persistence role around the pure calculators: it
//! reads a member's current state, runs the processor, and commits the new
//! state together with a ledger entry. Writes are guarded by the state
//! version, so a caller that computed against stale state is rejected
//! instead of silently overwriting a concurrent payment.

use std::collections::HashMap;

use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};

use crate::analytics::DuesSummary;
use crate::config::DuesConfig;
use crate::decimal::Money;
use crate::dues::{PaymentOutcome, PaymentProcessor};
use crate::errors::{DuesError, Result};
use crate::events::{Event, EventStore};
use crate::ledger::{PaymentLedger, PaymentRecord};
use crate::member::Member;
use crate::month::BillingMonth;
use crate::schedule::FeeSchedule;
use crate::types::{MemberId, MemberProfile};
use crate::views::{MemberView, PaymentPreview};

/// details for a new member
#[derive(Debug, Clone, Default)]
pub struct Enrolment {
    pub profile: MemberProfile,
    /// defaults to the current month
    pub paid_until: Option<BillingMonth>,
    /// fees owed from before tracking started, entered as a positive amount
    pub legacy_debt: Money,
}

impl Enrolment {
    pub fn new(profile: MemberProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn paid_until(mut self, month: BillingMonth) -> Self {
        self.paid_until = Some(month);
        self
    }

    pub fn legacy_debt(mut self, amount: Money) -> Self {
        self.legacy_debt = amount;
        self
    }
}

/// what a committed payment produced
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub record: PaymentRecord,
    pub outcome: PaymentOutcome,
}

pub struct MemberRegistry {
    config: DuesConfig,
    members: HashMap<MemberId, Member>,
    ledger: PaymentLedger,
    events: EventStore,
}

impl MemberRegistry {
    pub fn new(config: DuesConfig) -> Self {
        Self {
            config,
            members: HashMap::new(),
            ledger: PaymentLedger::new(),
            events: EventStore::new(),
        }
    }

    pub fn config(&self) -> &DuesConfig {
        &self.config
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    fn processor(&self) -> PaymentProcessor<&FeeSchedule> {
        PaymentProcessor::new(&self.config.fee_schedule).with_max_months(self.config.max_months_per_payment)
    }

    /// add a member
    pub fn enrol(&mut self, enrolment: Enrolment, time_provider: &SafeTimeProvider) -> Result<MemberId> {
        if enrolment.legacy_debt.is_negative() {
            return Err(DuesError::InvalidLegacyDebt {
                amount: enrolment.legacy_debt,
            });
        }
        if enrolment.profile.name.trim().is_empty() {
            return Err(DuesError::InvalidMember {
                message: "member name is required".to_string(),
            });
        }

        let now = time_provider.now();
        let paid_until = enrolment
            .paid_until
            .unwrap_or_else(|| BillingMonth::from_datetime(now));

        let member = Member::enrol(enrolment.profile, paid_until, enrolment.legacy_debt, now);
        let id = member.id;
        if self.members.contains_key(&id) {
            return Err(DuesError::DuplicateMember { id });
        }

        info!(member_id = %id, name = member.name(), %paid_until, legacy_debt = %enrolment.legacy_debt, "member enrolled");

        self.events.emit(Event::MemberEnrolled {
            member_id: id,
            name: member.profile.name.clone(),
            paid_until,
            legacy_debt: enrolment.legacy_debt,
            timestamp: now,
        });
        self.members.insert(id, member);

        Ok(id)
    }

    /// put back a member loaded from storage, keeping its id and version
    pub fn restore(&mut self, member: Member) -> Result<MemberId> {
        let id = member.id;
        if self.members.contains_key(&id) {
            return Err(DuesError::DuplicateMember { id });
        }

        info!(member_id = %id, name = member.name(), version = member.version(), "member restored");
        self.members.insert(id, member);
        Ok(id)
    }

    /// remove a member; their ledger entries are kept
    pub fn remove(&mut self, id: MemberId, time_provider: &SafeTimeProvider) -> Result<Member> {
        let member = self
            .members
            .remove(&id)
            .ok_or(DuesError::MemberNotFound { id })?;

        info!(member_id = %id, name = member.name(), "member removed");
        self.events.emit(Event::MemberRemoved {
            member_id: id,
            timestamp: time_provider.now(),
        });

        Ok(member)
    }

    pub fn get(&self, id: MemberId) -> Result<&Member> {
        self.members.get(&id).ok_or(DuesError::MemberNotFound { id })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// all members, most recently joined first
    pub fn members(&self) -> Vec<&Member> {
        let mut members: Vec<_> = self.members.values().collect();
        members.sort_by(|a, b| b.joined_at.cmp(&a.joined_at).then_with(|| a.profile.name.cmp(&b.profile.name)));
        members
    }

    /// members whose name, mobile or house matches `term`
    pub fn search(&self, term: &str) -> Vec<&Member> {
        self.members()
            .into_iter()
            .filter(|m| m.profile.matches(term))
            .collect()
    }

    /// amount a member owes in the current month
    pub fn pending_for(&self, id: MemberId, time_provider: &SafeTimeProvider) -> Result<Money> {
        let member = self.get(id)?;
        Ok(member.pending(&self.config.fee_schedule, BillingMonth::current(time_provider)))
    }

    /// what a payment would do, without committing it
    pub fn preview_payment(
        &self,
        id: MemberId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentPreview> {
        let member = self.get(id)?;
        let as_of = BillingMonth::current(time_provider);
        let outcome = self.processor().apply(&member.state, amount);
        let pending = member.pending(&self.config.fee_schedule, as_of);

        Ok(PaymentPreview::new(member, amount, pending, &outcome, &self.config.currency))
    }

    /// apply and commit a payment
    ///
    /// `expected_version` is the member version the caller last read; a
    /// mismatch means another payment landed in between.
    pub fn record_payment(
        &mut self,
        id: MemberId,
        amount: Money,
        expected_version: u64,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        if !amount.is_positive() {
            return Err(DuesError::InvalidPaymentAmount { amount });
        }

        let processor = PaymentProcessor::new(&self.config.fee_schedule)
            .with_max_months(self.config.max_months_per_payment);

        let member = self
            .members
            .get_mut(&id)
            .ok_or(DuesError::MemberNotFound { id })?;

        if member.version() != expected_version {
            warn!(
                member_id = %id,
                expected = expected_version,
                actual = member.version(),
                "rejected payment against stale member state"
            );
            return Err(DuesError::StaleMemberState {
                expected: expected_version,
                actual: member.version(),
            });
        }

        let now = time_provider.now();
        let outcome = processor.apply(&member.state, amount);
        let before = member.commit_payment(&outcome, amount, now);
        let record = PaymentRecord::new(id, amount, now, before, member.state);

        info!(
            member_id = %id,
            payment_id = %record.id,
            %amount,
            paid_until = %member.paid_until(),
            balance = %member.wallet_balance(),
            "payment recorded"
        );

        self.events.emit(Event::PaymentRecorded {
            member_id: id,
            payment_id: record.id,
            amount,
            new_balance: outcome.new_balance,
            timestamp: now,
        });

        if let (Some(first), Some(last)) = (outcome.settled_months.first(), outcome.settled_months.last()) {
            self.events.emit(Event::MonthsSettled {
                member_id: id,
                from: first.month,
                through: last.month,
                months: outcome.months_advanced(),
                fees: outcome.total_consumed(),
                timestamp: now,
            });
        } else if before.wallet_balance.is_negative() {
            self.events.emit(Event::DebtReduced {
                member_id: id,
                remaining_debt: (-outcome.new_balance).clamp_non_negative(),
                timestamp: now,
            });
        }

        if outcome.truncated {
            self.events.emit(Event::PaymentTruncated {
                member_id: id,
                stopped_at: outcome.new_paid_until,
                unspent: outcome.new_balance,
                timestamp: now,
            });
        }

        self.ledger.append(record.clone());

        Ok(PaymentReceipt { record, outcome })
    }

    /// a member's payments, newest first
    pub fn history(&self, id: MemberId) -> Result<Vec<&PaymentRecord>> {
        self.get(id)?;
        Ok(self.ledger.history(id))
    }

    /// roster-wide figures for the current month
    pub fn summary(&self, time_provider: &SafeTimeProvider) -> DuesSummary {
        let as_of = BillingMonth::current(time_provider);
        DuesSummary::compute(self.members.values(), &self.ledger, &self.config.fee_schedule, as_of)
    }

    /// presentation view of a member
    pub fn view(&self, id: MemberId, time_provider: &SafeTimeProvider) -> Result<MemberView> {
        let member = self.get(id)?;
        Ok(MemberView::from_member(
            member,
            &self.config.fee_schedule,
            BillingMonth::current(time_provider),
            &self.config.currency,
        ))
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }
}
