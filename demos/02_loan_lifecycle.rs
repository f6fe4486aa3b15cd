/// loan lifecycle - apply every installment until the loan is retired
use chrono::{Duration, TimeZone, Utc};
use vehicle_finance_rs::{
    Event, LendingConfig, LoanAccount, LoanClass, Money, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let control = time.test_control().unwrap();

    let mut loan = LoanAccount::builder()
        .credit_score(640)
        .loan_class(LoanClass::New)
        .vin("JH4KA7561PC008269")
        .vehicle_price(Money::from_major(24_500))
        .down_payment(Money::from_major(4_500))
        .term_months(12)
        .config(LendingConfig::default())
        .build_with_time(&time)?;

    println!("originated {} at {}", loan.id(), loan.annual_rate());

    while !loan.is_paid_off() {
        control.advance(Duration::days(30));
        let outcome = loan.apply_payment_with_time(&time)?;
        println!(
            "{}  #{:>2}  paid ${}  balance ${}",
            time.now().format("%Y-%m-%d"),
            outcome.installment_number,
            outcome.amount,
            outcome.balance
        );
    }

    if let Err(e) = loan.apply_payment_with_time(&time) {
        println!("\nextra payment rejected: {}", e);
    }

    println!("\nevents:");
    for event in loan.take_events() {
        match event {
            Event::PaymentApplied { .. } => {}
            other => println!("  {:?}", other),
        }
    }

    Ok(())
}
