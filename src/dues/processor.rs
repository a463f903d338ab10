use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decimal::Money;
use crate::month::BillingMonth;
use crate::schedule::FeeRateSource;
use crate::state::MemberState;

/// default cap on months a single payment may settle (100 years)
pub const DEFAULT_MAX_MONTHS_PER_PAYMENT: u32 = 1_200;

/// a month paid in full by a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledMonth {
    pub month: BillingMonth,
    pub fee: Money,
}

/// result of applying funds to a member's dues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub previous_paid_until: BillingMonth,
    pub new_paid_until: BillingMonth,
    /// payment plus the prior wallet balance
    pub available_funds: Money,
    /// what is left after settling months; the new wallet balance
    pub new_balance: Money,
    /// months paid, oldest first
    pub settled_months: Vec<SettledMonth>,
    /// stopped by the iteration cap or the end of the calendar, not by funds
    pub truncated: bool,
}

impl PaymentOutcome {
    pub fn months_advanced(&self) -> u32 {
        self.settled_months.len() as u32
    }

    /// fees consumed by the settled months
    pub fn total_consumed(&self) -> Money {
        self.settled_months.iter().map(|m| m.fee).sum()
    }

    /// the payment only reduced carried debt, the date did not move
    pub fn reduced_debt_only(&self) -> bool {
        self.available_funds.is_negative()
    }

    /// member state after committing this outcome
    pub fn next_state(&self, previous: &MemberState) -> MemberState {
        MemberState {
            paid_until: self.new_paid_until,
            wallet_balance: self.new_balance,
            version: previous.version + 1,
        }
    }
}

/// greedy month-by-month payment application
#[derive(Debug, Clone)]
pub struct PaymentProcessor<R> {
    rates: R,
    max_months: u32,
}

impl<R: FeeRateSource> PaymentProcessor<R> {
    pub fn new(rates: R) -> Self {
        Self {
            rates,
            max_months: DEFAULT_MAX_MONTHS_PER_PAYMENT,
        }
    }

    pub fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }

    /// apply `payment_amount` plus `current_balance` to months after `paid_until`
    pub fn process(
        &self,
        paid_until: BillingMonth,
        payment_amount: Money,
        current_balance: Money,
    ) -> PaymentOutcome {
        let available_funds = payment_amount + current_balance;
        let mut remaining = available_funds;
        let mut cursor = paid_until;
        let mut settled_months = Vec::new();
        let mut truncated = false;

        loop {
            if settled_months.len() >= self.max_months as usize {
                truncated = true;
                break;
            }

            let Some(next) = cursor.succ() else {
                truncated = true;
                break;
            };

            let fee = self.rates.rate_for_month(next);
            if remaining < fee {
                break;
            }

            remaining -= fee;
            cursor = next;
            settled_months.push(SettledMonth { month: next, fee });
        }

        if truncated {
            warn!(
                %paid_until,
                %cursor,
                %remaining,
                max_months = self.max_months,
                "payment application stopped before funds were exhausted"
            );
        }

        debug!(
            %paid_until,
            %payment_amount,
            %current_balance,
            new_paid_until = %cursor,
            new_balance = %remaining,
            months = settled_months.len(),
            "processed payment"
        );

        PaymentOutcome {
            previous_paid_until: paid_until,
            new_paid_until: cursor,
            available_funds,
            new_balance: remaining,
            settled_months,
            truncated,
        }
    }

    /// apply a payment to a member state snapshot
    pub fn apply(&self, state: &MemberState, payment_amount: Money) -> PaymentOutcome {
        self.process(state.paid_until, payment_amount, state.wallet_balance)
    }
}

/// apply a payment with the default iteration cap
pub fn process_payment<R: FeeRateSource>(
    rates: &R,
    paid_until: BillingMonth,
    payment_amount: Money,
    current_balance: Money,
) -> PaymentOutcome {
    PaymentProcessor::new(rates).process(paid_until, payment_amount, current_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::FeeSchedule;

    fn month(y: i32, m: u32) -> BillingMonth {
        BillingMonth::new(y, m).unwrap()
    }

    fn flat_15() -> FeeSchedule {
        FeeSchedule::flat(Money::from_major(15)).unwrap()
    }

    #[test]
    fn test_exact_two_months() {
        let start = month(2025, 4);
        let outcome = process_payment(&flat_15(), start, Money::from_major(30), Money::ZERO);

        assert_eq!(outcome.months_advanced(), 2);
        assert_eq!(outcome.new_paid_until, month(2025, 6));
        assert_eq!(outcome.new_balance, Money::ZERO);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_remainder_goes_to_wallet_then_gets_used() {
        let schedule = flat_15();
        let start = month(2025, 4);

        let first = process_payment(&schedule, start, Money::from_major(100), Money::ZERO);
        assert_eq!(first.months_advanced(), 6);
        assert_eq!(first.new_paid_until, month(2025, 10));
        assert_eq!(first.new_balance, Money::from_major(10));

        let second = process_payment(&schedule, first.new_paid_until, Money::from_major(20), first.new_balance);
        assert_eq!(second.available_funds, Money::from_major(30));
        assert_eq!(second.months_advanced(), 2);
        assert_eq!(second.new_paid_until, month(2025, 12));
        assert_eq!(second.new_balance, Money::ZERO);
    }

    #[test]
    fn test_payment_short_of_debt_keeps_date() {
        let start = month(2025, 4);
        let outcome = process_payment(&flat_15(), start, Money::from_major(30), Money::from_major(-50));

        assert_eq!(outcome.new_paid_until, start);
        assert_eq!(outcome.new_balance, Money::from_major(-20));
        assert!(outcome.reduced_debt_only());
        assert!(outcome.settled_months.is_empty());
    }

    #[test]
    fn test_debt_cleared_before_months_advance() {
        let start = month(2025, 4);
        let outcome = process_payment(&flat_15(), start, Money::from_major(100), Money::from_major(-50));

        // 50 left after the debt buys 3 months, 5 stays in the wallet
        assert_eq!(outcome.months_advanced(), 3);
        assert_eq!(outcome.new_balance, Money::from_major(5));
        assert!(!outcome.reduced_debt_only());
    }

    #[test]
    fn test_zero_payment_is_identity() {
        let start = month(2025, 4);
        for balance in [0, 7, 14] {
            let outcome = process_payment(&flat_15(), start, Money::ZERO, Money::from_major(balance));
            assert_eq!(outcome.new_paid_until, start);
            assert_eq!(outcome.new_balance, Money::from_major(balance));
        }
    }

    #[test]
    fn test_no_proration() {
        let outcome = process_payment(&flat_15(), month(2025, 1), Money::from_minor(1_499), Money::ZERO);
        assert_eq!(outcome.months_advanced(), 0);
        assert_eq!(outcome.new_balance, Money::from_minor(1_499));
    }

    #[test]
    fn test_tiered_fees_consumed_per_month() {
        let schedule = FeeSchedule::builder()
            .rule(month(2024, 1), Money::from_major(10))
            .rule(month(2025, 1), Money::from_major(15))
            .build()
            .unwrap();

        // nov 10, dec 10, jan 15 = 35; feb would need 15 more
        let outcome = process_payment(&schedule, month(2024, 10), Money::from_major(45), Money::ZERO);
        assert_eq!(outcome.new_paid_until, month(2025, 1));
        assert_eq!(outcome.new_balance, Money::from_major(10));
        assert_eq!(
            outcome.settled_months.iter().map(|m| m.fee).collect::<Vec<_>>(),
            vec![Money::from_major(10), Money::from_major(10), Money::from_major(15)]
        );
    }

    #[test]
    fn test_conservation_and_monotonic_advance() {
        let schedule = FeeSchedule::builder()
            .rule(month(2023, 1), Money::from_major(12))
            .rule(month(2024, 7), Money::from_major(15))
            .build()
            .unwrap();

        for start_offset in 0..30 {
            let start = month(2023, 1).checked_add(start_offset).unwrap();
            for (amount, balance) in [(0, 0), (30, -45), (100, 0), (7, 8), (250, 11), (15, -15)] {
                let amount = Money::from_major(amount);
                let balance = Money::from_major(balance);
                let outcome = process_payment(&schedule, start, amount, balance);

                assert!(outcome.new_paid_until >= start);
                assert_eq!(amount + balance, outcome.total_consumed() + outcome.new_balance);
                assert_eq!(
                    start.months_until(outcome.new_paid_until),
                    outcome.months_advanced() as i64
                );

                // the next month is always unaffordable
                let next = outcome.new_paid_until.succ().unwrap();
                assert!(outcome.new_balance < schedule.rate_for_month(next));
            }
        }
    }

    #[test]
    fn test_iteration_cap_truncates_and_conserves() {
        let processor = PaymentProcessor::new(flat_15()).with_max_months(12);
        let outcome = processor.process(month(2025, 1), Money::from_major(1_000), Money::ZERO);

        assert!(outcome.truncated);
        assert_eq!(outcome.months_advanced(), 12);
        assert_eq!(outcome.new_paid_until, month(2026, 1));
        assert_eq!(outcome.new_balance, Money::from_major(820));
        assert_eq!(outcome.total_consumed() + outcome.new_balance, Money::from_major(1_000));
    }

    #[test]
    fn test_apply_to_state_bumps_version() {
        let state = MemberState::new(month(2025, 4), Money::from_major(10));
        let processor = PaymentProcessor::new(flat_15());
        let outcome = processor.apply(&state, Money::from_major(20));
        let next = outcome.next_state(&state);

        assert_eq!(next.paid_until, month(2025, 6));
        assert_eq!(next.wallet_balance, Money::ZERO);
        assert_eq!(next.version, state.version + 1);
    }
}
