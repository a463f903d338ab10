/// json state - serialization for debugging and monitoring
use chrono::{Duration, TimeZone, Utc};
use membership_dues_rs::{
    BillingMonth, DuesConfig, Enrolment, MemberProfile, MemberRegistry, Money, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    println!("=== json state serialization ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let config = DuesConfig::from_toml_str(
        r#"
        currency = "AED"
        default_payment_amount = 30

        [[fee_schedule.rules]]
        effective_from = "2024-01"
        monthly_fee = 15
        "#,
    )?;
    let mut registry = MemberRegistry::new(config);

    let id = registry.enrol(
        Enrolment::new(
            MemberProfile::new("Maryam Ali")
                .with_house("Bait Al Khair")
                .with_mobile("0501112233")
                .with_designation("treasurer")
                .executive(),
        )
        .paid_until(BillingMonth::new(2024, 12)?)
        .legacy_debt(Money::from_major(20)),
        &time,
    )?;

    // stage 1: after enrolment
    println!("stage 1: enrolled with legacy debt");
    println!("----------------------------------");
    println!("{}\n", registry.view(id, &time)?.to_json_pretty());

    // stage 2: preview before paying
    let amount = registry.config().default_payment_amount;
    let preview = registry.preview_payment(id, amount, &time)?;
    println!("stage 2: preview of {}", amount);
    println!("------------------------");
    println!("{}", preview.describe());
    println!("{}\n", preview.to_json_pretty());

    // stage 3: after payments
    registry.record_payment(id, Money::from_major(80), preview.version, &time)?;
    println!("stage 3: after paying 80");
    println!("------------------------");
    println!("{}\n", registry.view(id, &time)?.to_json_pretty());

    // stage 4: two months later
    controller.advance(Duration::days(61));
    println!("stage 4: two months later");
    println!("-------------------------");
    println!("{}\n", serde_json::to_string_pretty(&registry.summary(&time))?);

    for event in registry.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
