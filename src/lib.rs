pub mod analytics;
pub mod config;
pub mod decimal;
pub mod dues;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod member;
pub mod month;
pub mod registry;
pub mod schedule;
pub mod state;
pub mod types;
pub mod views;

// re-export key types
pub use analytics::DuesSummary;
pub use config::DuesConfig;
pub use decimal::Money;
pub use dues::{
    pending_amount, pending_breakdown, process_payment, PaymentOutcome, PaymentProcessor,
    PendingBreakdown, PendingCalculator, SettledMonth, DEFAULT_MAX_MONTHS_PER_PAYMENT,
};
pub use errors::{DuesError, Result};
pub use events::{Event, EventStore};
pub use ledger::{PaymentLedger, PaymentRecord};
pub use member::Member;
pub use month::BillingMonth;
pub use registry::{Enrolment, MemberRegistry, PaymentReceipt};
pub use schedule::{FeeRateSource, FeeRule, FeeSchedule, FeeScheduleBuilder};
pub use state::{MemberState, StateSnapshot};
pub use types::{MemberId, MemberProfile, MemberStanding, PaymentId};
pub use views::{MemberView, PaymentPreview};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
