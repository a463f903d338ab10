/// quick start - minimal example to get started
use membership_dues_rs::{DuesConfig, Enrolment, MemberProfile, MemberRegistry, Money, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // flat fee of 15 per month, real clock
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut registry = MemberRegistry::new(DuesConfig::default());

    // enrol a member carrying 45 of old debt
    let id = registry.enrol(
        Enrolment::new(MemberProfile::new("Abdulla Saif")).legacy_debt(Money::from_major(45)),
        &time,
    )?;
    println!("pending after enrolment: {}", registry.pending_for(id, &time)?);

    // pay enough to clear the debt and three months ahead
    registry.record_payment(id, Money::from_major(90), 0, &time)?;

    // print current state
    println!("{}", registry.view(id, &time)?.to_json_pretty());

    Ok(())
}
