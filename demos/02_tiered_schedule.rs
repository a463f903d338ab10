/// tiered schedule - fees that change over time
use membership_dues_rs::{
    pending_breakdown, process_payment, BillingMonth, FeeRateSource, FeeSchedule, Money,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    println!("=== tiered fee schedule ===\n");

    let schedule = FeeSchedule::builder()
        .rule(BillingMonth::new(2020, 1)?, Money::from_major(10))
        .rule(BillingMonth::new(2023, 7)?, Money::from_major(12))
        .rule(BillingMonth::new(2025, 1)?, Money::from_major(15))
        .build()?;

    for cutover in schedule.cutovers() {
        println!("from {}: {} per month", cutover, schedule.rate_for_month(cutover));
    }

    // member last paid for march 2023, checked in june 2025
    let paid_until = BillingMonth::new(2023, 3)?;
    let as_of = BillingMonth::new(2025, 6)?;
    let breakdown = pending_breakdown(&schedule, paid_until, Money::ZERO, as_of);
    println!(
        "\n{} months due since {}: {}",
        breakdown.months_due,
        paid_until,
        breakdown.net_pending
    );

    // each month is consumed at the fee of its own era
    let outcome = process_payment(&schedule, paid_until, Money::from_major(100), Money::ZERO);
    for settled in &outcome.settled_months {
        println!("  {} settled at {}", settled.month, settled.fee);
    }
    println!(
        "paid until {}, {} left in the wallet",
        outcome.new_paid_until,
        outcome.new_balance
    );

    Ok(())
}
