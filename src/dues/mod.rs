pub mod pending;
pub mod processor;

pub use pending::{pending_amount, pending_breakdown, PendingBreakdown, PendingCalculator};
pub use processor::{
    process_payment, PaymentOutcome, PaymentProcessor, SettledMonth, DEFAULT_MAX_MONTHS_PER_PAYMENT,
};
