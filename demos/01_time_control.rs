/// time control - deterministic dues with a controlled clock
use chrono::{Duration, TimeZone, Utc};
use membership_dues_rs::{
    BillingMonth, DuesConfig, Enrolment, MemberProfile, MemberRegistry, Money, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    println!("=== time control example ===\n");

    // create controlled time for testing
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut registry = MemberRegistry::new(DuesConfig::default());
    let id = registry.enrol(Enrolment::new(MemberProfile::new("Khalfan")), &time)?;
    println!("enrolled in {}, pending {}", BillingMonth::current(&time), registry.pending_for(id, &time)?);

    // let five months go by unpaid
    for _ in 0..5 {
        controller.advance(Duration::days(31));
        println!(
            "{}: pending {}",
            BillingMonth::current(&time),
            registry.pending_for(id, &time)?
        );
    }

    // settle everything with some credit left over
    let version = registry.get(id)?.version();
    let receipt = registry.record_payment(id, Money::from_major(100), version, &time)?;
    println!(
        "\npaid 100: {} months settled, paid until {}, balance {}",
        receipt.outcome.months_advanced(),
        receipt.outcome.new_paid_until,
        receipt.outcome.new_balance
    );

    // credit is used up as the next months arrive
    for _ in 0..3 {
        controller.advance(Duration::days(31));
        let member = registry.get(id)?;
        println!(
            "{}: pending {}, standing {:?}",
            BillingMonth::current(&time),
            registry.pending_for(id, &time)?,
            member.standing(&registry.config().fee_schedule, BillingMonth::current(&time))
        );
    }

    Ok(())
}
