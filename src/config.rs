use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::dues::DEFAULT_MAX_MONTHS_PER_PAYMENT;
use crate::errors::{DuesError, Result};
use crate::schedule::FeeSchedule;

/// dues tracking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuesConfig {
    /// label shown next to amounts; amounts are never converted
    #[serde(default = "default_currency")]
    pub currency: String,
    /// upper bound on months settled by one payment
    #[serde(default = "default_max_months")]
    pub max_months_per_payment: u32,
    /// amount suggested when recording a payment
    #[serde(default = "default_payment_amount")]
    pub default_payment_amount: Money,
    pub fee_schedule: FeeSchedule,
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_max_months() -> u32 {
    DEFAULT_MAX_MONTHS_PER_PAYMENT
}

fn default_payment_amount() -> Money {
    Money::from_major(30)
}

impl DuesConfig {
    /// single flat monthly fee with default limits
    pub fn flat(monthly_fee: Money) -> Result<Self> {
        Ok(Self {
            currency: default_currency(),
            max_months_per_payment: default_max_months(),
            default_payment_amount: monthly_fee.times(2),
            fee_schedule: FeeSchedule::flat(monthly_fee)?,
        })
    }

    /// use a tiered schedule
    pub fn with_schedule(mut self, fee_schedule: FeeSchedule) -> Self {
        self.fee_schedule = fee_schedule;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// load config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DuesError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// parse and validate TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DuesConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DuesError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency.trim().is_empty() {
            return Err(DuesError::InvalidConfiguration {
                message: "currency label must not be empty".to_string(),
            });
        }
        if self.max_months_per_payment == 0 {
            return Err(DuesError::InvalidConfiguration {
                message: "max_months_per_payment must be at least 1".to_string(),
            });
        }
        if !self.default_payment_amount.is_positive() {
            return Err(DuesError::InvalidConfiguration {
                message: format!(
                    "default_payment_amount must be positive, got {}",
                    self.default_payment_amount
                ),
            });
        }
        Ok(())
    }
}

impl Default for DuesConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            fee_schedule: FeeSchedule::default(),
            max_months_per_payment: default_max_months(),
            default_payment_amount: default_payment_amount(),
        }
    }
}
