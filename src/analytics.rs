use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::ledger::PaymentLedger;
use crate::member::Member;
use crate::month::BillingMonth;
use crate::schedule::FeeRateSource;
use crate::types::MemberStanding;

/// roster-wide dues figures for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuesSummary {
    pub as_of: BillingMonth,
    pub total_members: usize,
    /// sum of every member's pending amount
    pub total_pending: Money,
    /// payments recorded during `as_of`
    pub collected_this_month: Money,
    pub overdue_members: usize,
    pub members_with_legacy_debt: usize,
    pub members_in_credit: usize,
}

impl DuesSummary {
    pub fn compute<'a, R, I>(members: I, ledger: &PaymentLedger, rates: &R, as_of: BillingMonth) -> Self
    where
        R: FeeRateSource,
        I: IntoIterator<Item = &'a Member>,
    {
        let mut summary = DuesSummary {
            as_of,
            total_members: 0,
            total_pending: Money::ZERO,
            collected_this_month: ledger.collected_in(as_of),
            overdue_members: 0,
            members_with_legacy_debt: 0,
            members_in_credit: 0,
        };

        for member in members {
            summary.total_members += 1;
            summary.total_pending += member.pending(rates, as_of);

            match member.standing(rates, as_of) {
                MemberStanding::Overdue => summary.overdue_members += 1,
                MemberStanding::InCredit => summary.members_in_credit += 1,
                MemberStanding::LegacyDebt | MemberStanding::Settled => {}
            }
            // an overdue member can still carry old debt
            if member.state.has_legacy_debt() {
                summary.members_with_legacy_debt += 1;
            }
        }

        debug!(
            %as_of,
            total_members = summary.total_members,
            total_pending = %summary.total_pending,
            collected = %summary.collected_this_month,
            "computed dues summary"
        );

        summary
    }

    /// share of members with fees outstanding, 0 for an empty roster
    pub fn overdue_ratio(&self) -> Decimal {
        if self.total_members == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.overdue_members as u64) / Decimal::from(self.total_members as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PaymentRecord;
    use crate::schedule::FeeSchedule;
    use crate::state::MemberState;
    use crate::types::MemberProfile;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn month(y: i32, m: u32) -> BillingMonth {
        BillingMonth::new(y, m).unwrap()
    }

    fn member(name: &str, paid_until: BillingMonth, debt: i64) -> Member {
        Member::enrol(MemberProfile::new(name), paid_until, Money::from_major(debt), Utc::now())
    }

    #[test]
    fn test_summary_counts() {
        let schedule = FeeSchedule::default();
        let now = month(2025, 6);

        let mut credit = member("Credit", month(2025, 6), 0);
        credit.state = MemberState::new(month(2025, 6), Money::from_major(10));

        let members = vec![
            member("Overdue", month(2025, 4), 0),
            member("Debt", month(2025, 6), 20),
            member("Both", month(2025, 5), 5),
            member("Settled", month(2025, 7), 0),
            credit,
        ];

        let mut ledger = PaymentLedger::new();
        let june = Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap();
        let may = Utc.with_ymd_and_hms(2025, 5, 28, 9, 0, 0).unwrap();
        let state = MemberState::new(now, Money::ZERO);
        ledger.append(PaymentRecord::new(members[0].id, Money::from_major(15), may, state, state));
        ledger.append(PaymentRecord::new(members[1].id, Money::from_major(30), june, state, state));

        let summary = DuesSummary::compute(&members, &ledger, &schedule, now);

        assert_eq!(summary.total_members, 5);
        // 30 + 20 + (15 + 5)
        assert_eq!(summary.total_pending, Money::from_major(70));
        assert_eq!(summary.collected_this_month, Money::from_major(30));
        assert_eq!(summary.overdue_members, 2);
        assert_eq!(summary.members_with_legacy_debt, 2);
        assert_eq!(summary.members_in_credit, 1);
        assert_eq!(summary.overdue_ratio(), dec!(0.4));
    }

    #[test]
    fn test_empty_roster() {
        let summary = DuesSummary::compute(&Vec::<Member>::new(), &PaymentLedger::new(), &FeeSchedule::default(), month(2025, 1));
        assert_eq!(summary.total_members, 0);
        assert_eq!(summary.total_pending, Money::ZERO);
        assert_eq!(summary.overdue_ratio(), dec!(0));
    }
}
