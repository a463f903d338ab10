//! Monthly fee schedule.
//!
//! A schedule is a list of cutovers, each setting the fee charged for its
//! month and every later month until the next cutover. The most recent
//! cutover applies indefinitely forward; months before the first cutover
//! are charged the first cutover's fee, so every month has a price.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::month::BillingMonth;

/// anything that can price a calendar month
pub trait FeeRateSource {
    /// fee due for `month`; must be defined for every month
    fn rate_for_month(&self, month: BillingMonth) -> Money;

    /// sum of fees for `first..=last`, zero when the range is empty
    fn total_for_range(&self, first: BillingMonth, last: BillingMonth) -> Money {
        let mut total = Money::ZERO;
        let mut cursor = Some(first);
        while let Some(month) = cursor.filter(|m| *m <= last) {
            total += self.rate_for_month(month);
            cursor = month.succ();
        }
        total
    }
}

/// a single cutover: `monthly_fee` applies from `effective_from` onward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRule {
    pub effective_from: BillingMonth,
    pub monthly_fee: Money,
}

impl FeeRule {
    pub fn new(effective_from: BillingMonth, monthly_fee: Money) -> Self {
        Self {
            effective_from,
            monthly_fee,
        }
    }
}

/// immutable fee schedule, rules held most recent first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeeScheduleDef", into = "FeeScheduleDef")]
pub struct FeeSchedule {
    rules: Vec<FeeRule>,
}

/// serialized form, validated on the way in
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeeScheduleDef {
    rules: Vec<FeeRule>,
}

impl FeeSchedule {
    /// build a schedule from rules in any order
    pub fn new(mut rules: Vec<FeeRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(DuesError::InvalidSchedule {
                message: "at least one fee rule is required".to_string(),
            });
        }

        if let Some(rule) = rules.iter().find(|r| !r.monthly_fee.is_positive()) {
            return Err(DuesError::InvalidSchedule {
                message: format!(
                    "monthly fee from {} must be positive, got {}",
                    rule.effective_from, rule.monthly_fee
                ),
            });
        }

        let mut seen = BTreeSet::new();
        if let Some(rule) = rules.iter().find(|r| !seen.insert(r.effective_from)) {
            return Err(DuesError::InvalidSchedule {
                message: format!("duplicate cutover at {}", rule.effective_from),
            });
        }

        rules.sort_by(|a, b| b.effective_from.cmp(&a.effective_from));
        Ok(Self { rules })
    }

    /// one fee for every month
    pub fn flat(monthly_fee: Money) -> Result<Self> {
        // the cutover month is irrelevant when there is only one rule
        Self::new(vec![FeeRule::new(BillingMonth::epoch(), monthly_fee)])
    }

    pub fn builder() -> FeeScheduleBuilder {
        FeeScheduleBuilder::default()
    }

    /// rules ordered most recent cutover first
    pub fn rules(&self) -> &[FeeRule] {
        &self.rules
    }

    /// cutover months, oldest first
    pub fn cutovers(&self) -> Vec<BillingMonth> {
        self.rules.iter().rev().map(|r| r.effective_from).collect()
    }

    /// fee in force for the month containing `as_of`
    pub fn current_fee(&self, as_of: BillingMonth) -> Money {
        self.rate_for_month(as_of)
    }

    /// the rule governing `month`
    fn rule_for(&self, month: BillingMonth) -> &FeeRule {
        self.rules
            .iter()
            .find(|r| r.effective_from <= month)
            // before the earliest cutover: the earliest rule, which is last
            .unwrap_or_else(|| &self.rules[self.rules.len() - 1])
    }
}

/// the standard flat fee of 15 per month
impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            rules: vec![FeeRule::new(BillingMonth::epoch(), Money::from_major(15))],
        }
    }
}

impl FeeRateSource for FeeSchedule {
    fn rate_for_month(&self, month: BillingMonth) -> Money {
        self.rule_for(month).monthly_fee
    }

    /// closed form: one multiplication per segment the range overlaps
    fn total_for_range(&self, first: BillingMonth, last: BillingMonth) -> Money {
        if first > last {
            return Money::ZERO;
        }

        let mut total = Money::ZERO;
        let mut segment_end = last;

        for (idx, rule) in self.rules.iter().enumerate() {
            let is_earliest = idx + 1 == self.rules.len();
            let segment_start = if is_earliest {
                first
            } else {
                rule.effective_from.max(first)
            };

            if segment_start <= segment_end {
                let months = segment_start.months_until(segment_end) + 1;
                total += rule.monthly_fee.times(months as u64);
            }

            if rule.effective_from <= first {
                break;
            }
            match rule.effective_from.pred() {
                Some(prev) => segment_end = prev.min(segment_end),
                None => break,
            }
        }

        total
    }
}

impl<T: FeeRateSource + ?Sized> FeeRateSource for &T {
    fn rate_for_month(&self, month: BillingMonth) -> Money {
        (**self).rate_for_month(month)
    }

    fn total_for_range(&self, first: BillingMonth, last: BillingMonth) -> Money {
        (**self).total_for_range(first, last)
    }
}

impl TryFrom<FeeScheduleDef> for FeeSchedule {
    type Error = DuesError;

    fn try_from(def: FeeScheduleDef) -> Result<Self> {
        FeeSchedule::new(def.rules)
    }
}

impl From<FeeSchedule> for FeeScheduleDef {
    fn from(schedule: FeeSchedule) -> Self {
        let mut rules = schedule.rules;
        rules.reverse();
        FeeScheduleDef { rules }
    }
}

/// fluent construction of a tiered schedule
#[derive(Debug, Default)]
pub struct FeeScheduleBuilder {
    rules: Vec<FeeRule>,
}

impl FeeScheduleBuilder {
    pub fn rule(mut self, effective_from: BillingMonth, monthly_fee: Money) -> Self {
        self.rules.push(FeeRule::new(effective_from, monthly_fee));
        self
    }

    pub fn build(self) -> Result<FeeSchedule> {
        FeeSchedule::new(self.rules)
    }
}
