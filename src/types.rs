use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a member
pub type MemberId = Uuid;

/// unique identifier for a ledger entry
pub type PaymentId = Uuid;

/// descriptive member details; none of these affect dues
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberProfile {
    pub name: String,
    pub father_name: Option<String>,
    pub house_name: Option<String>,
    pub emirate: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub is_executive: bool,
    /// date the person joined the organization, if it predates enrolment here
    pub membership_date: Option<NaiveDate>,
}

impl MemberProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    pub fn with_house(mut self, house_name: impl Into<String>) -> Self {
        self.house_name = Some(house_name.into());
        self
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    pub fn executive(mut self) -> Self {
        self.is_executive = true;
        self
    }

    /// case-insensitive match on name, mobile or house name
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        let contains = |field: &str| field.to_lowercase().contains(&term);
        contains(&self.name)
            || self.mobile.as_deref().is_some_and(contains)
            || self.house_name.as_deref().is_some_and(contains)
    }
}

/// how a member stands against the fee schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStanding {
    /// nothing owed, no credit
    Settled,
    /// nothing owed and prepaid credit in the wallet
    InCredit,
    /// monthly fees owed for elapsed months
    Overdue,
    /// carrying debt from before tracking started (negative wallet)
    LegacyDebt,
}
