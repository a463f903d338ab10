/// serialization support for members and payment previews
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::dues::PaymentOutcome;
use crate::member::Member;
use crate::month::BillingMonth;
use crate::schedule::FeeRateSource;
use crate::types::{MemberId, MemberStanding};

/// serializable view of a member and their dues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberView {
    pub id: MemberId,
    pub profile: ProfileView,
    pub dues: DuesView,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub name: String,
    pub father_name: Option<String>,
    pub house_name: Option<String>,
    pub emirate: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub is_executive: bool,
    pub membership_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuesView {
    pub standing: MemberStanding,
    pub paid_until: BillingMonth,
    pub wallet_balance: Money,
    pub pending: Money,
    pub current_fee: Money,
    pub currency: String,
    pub version: u64,
}

impl MemberView {
    pub fn from_member<R: FeeRateSource>(
        member: &Member,
        rates: &R,
        as_of: BillingMonth,
        currency: &str,
    ) -> Self {
        let profile = &member.profile;
        MemberView {
            id: member.id,
            profile: ProfileView {
                name: profile.name.clone(),
                father_name: profile.father_name.clone(),
                house_name: profile.house_name.clone(),
                emirate: profile.emirate.clone(),
                mobile: profile.mobile.clone(),
                email: profile.email.clone(),
                designation: profile.designation.clone(),
                is_executive: profile.is_executive,
                membership_date: profile.membership_date,
            },
            dues: DuesView {
                standing: member.standing(rates, as_of),
                paid_until: member.paid_until(),
                wallet_balance: member.wallet_balance(),
                pending: member.pending(rates, as_of),
                current_fee: rates.rate_for_month(as_of),
                currency: currency.to_string(),
                version: member.version(),
            },
            joined_at: member.joined_at,
        }
    }

    /// serialize to pretty json
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}

/// what recording a payment would do, computed without committing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPreview {
    pub member_id: MemberId,
    pub member_name: String,
    pub payment_amount: Money,
    pub pending: Money,
    pub wallet_balance: Money,
    /// payment plus wallet balance
    pub total_available: Money,
    pub months_covered: u32,
    pub current_paid_until: BillingMonth,
    pub new_paid_until: BillingMonth,
    pub new_balance: Money,
    /// the payment only shrinks carried debt, no month gets paid
    pub reduces_debt_only: bool,
    pub truncated: bool,
    pub currency: String,
    /// the version the preview was computed against
    pub version: u64,
}

impl PaymentPreview {
    pub fn new(
        member: &Member,
        payment_amount: Money,
        pending: Money,
        outcome: &PaymentOutcome,
        currency: &str,
    ) -> Self {
        PaymentPreview {
            member_id: member.id,
            member_name: member.profile.name.clone(),
            payment_amount,
            pending,
            wallet_balance: member.wallet_balance(),
            total_available: outcome.available_funds,
            months_covered: outcome.months_advanced(),
            current_paid_until: outcome.previous_paid_until,
            new_paid_until: outcome.new_paid_until,
            new_balance: outcome.new_balance,
            reduces_debt_only: outcome.reduced_debt_only(),
            truncated: outcome.truncated,
            currency: currency.to_string(),
            version: member.version(),
        }
    }

    /// one-line summary for confirmation prompts
    pub fn describe(&self) -> String {
        if self.reduces_debt_only {
            format!(
                "{} {} reduces debt to {} {}",
                self.payment_amount,
                self.currency,
                (-self.new_balance).clamp_non_negative(),
                self.currency
            )
        } else {
            format!(
                "{} {} covers {} month(s), paid until {}, balance {} {}",
                self.payment_amount,
                self.currency,
                self.months_covered,
                self.new_paid_until,
                self.new_balance,
                self.currency
            )
        }
    }

    /// serialize to pretty json
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dues::process_payment;
    use crate::schedule::FeeSchedule;
    use crate::types::MemberProfile;

    fn month(y: i32, m: u32) -> BillingMonth {
        BillingMonth::new(y, m).unwrap()
    }

    #[test]
    fn test_member_view_json() {
        let schedule = FeeSchedule::default();
        let member = Member::enrol(
            MemberProfile::new("Ibrahim").with_house("Al Falah").executive(),
            month(2025, 3),
            Money::ZERO,
            Utc::now(),
        );

        let view = MemberView::from_member(&member, &schedule, month(2025, 6), "AED");
        assert_eq!(view.dues.pending, Money::from_major(45));
        assert_eq!(view.dues.standing, MemberStanding::Overdue);

        let json: serde_json::Value = serde_json::from_str(&view.to_json_pretty()).unwrap();
        assert_eq!(json["profile"]["name"], "Ibrahim");
        assert_eq!(json["profile"]["is_executive"], true);
        assert_eq!(json["dues"]["paid_until"], "2025-03");
        assert_eq!(json["dues"]["pending"], "45");
        assert_eq!(json["dues"]["standing"], "Overdue");
    }

    #[test]
    fn test_preview_debt_only() {
        let schedule = FeeSchedule::default();
        let member = Member::enrol(MemberProfile::new("Sara"), month(2025, 6), Money::from_major(50), Utc::now());
        let outcome = process_payment(&schedule, member.paid_until(), Money::from_major(30), member.wallet_balance());

        let preview = PaymentPreview::new(&member, Money::from_major(30), Money::from_major(50), &outcome, "AED");
        assert!(preview.reduces_debt_only);
        assert_eq!(preview.total_available, Money::from_major(-20));
        assert_eq!(preview.months_covered, 0);
        assert_eq!(preview.new_paid_until, month(2025, 6));
        assert_eq!(preview.describe(), "30 AED reduces debt to 20 AED");
    }

    #[test]
    fn test_preview_months_covered() {
        let schedule = FeeSchedule::default();
        let member = Member::enrol(MemberProfile::new("Omar"), month(2025, 4), Money::ZERO, Utc::now());
        let outcome = process_payment(&schedule, member.paid_until(), Money::from_major(100), member.wallet_balance());

        let preview = PaymentPreview::new(&member, Money::from_major(100), Money::from_major(30), &outcome, "AED");
        assert_eq!(preview.months_covered, 6);
        assert_eq!(
            preview.describe(),
            "100 AED covers 6 month(s), paid until 2025-10, balance 10 AED"
        );

        let json: serde_json::Value = serde_json::from_str(&preview.to_json_pretty()).unwrap();
        assert_eq!(json["new_balance"], "10");
        assert_eq!(json["reduces_debt_only"], false);
    }
}
