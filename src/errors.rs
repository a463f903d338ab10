use std::path::PathBuf;

use thiserror::Error;

use crate::decimal::Money;
use crate::types::MemberId;

#[derive(Error, Debug)]
pub enum DuesError {
    #[error("invalid fee schedule: {message}")]
    InvalidSchedule {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid legacy debt: {amount} (must not be negative)")]
    InvalidLegacyDebt {
        amount: Money,
    },

    #[error("invalid member: {message}")]
    InvalidMember {
        message: String,
    },

    #[error("member not found: {id}")]
    MemberNotFound {
        id: MemberId,
    },

    #[error("member already registered: {id}")]
    DuplicateMember {
        id: MemberId,
    },

    #[error("stale member state: expected version {expected}, found {actual}")]
    StaleMemberState {
        expected: u64,
        actual: u64,
    },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, DuesError>;
