/// persistence - hand a loan to storage and bring it back
use vehicle_finance_rs::{
    validate, LendingConfig, LoanAccount, LoanRecord, OriginationRequest,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LendingConfig::default();

    let request: OriginationRequest = serde_json::from_str(
        r#"{
            "credit_score": "598",
            "loan_class": "used",
            "vin": "1ftfw1et5dfc10312",
            "vehicle_price": "13750.00",
            "down_payment": "1500.00",
            "term_months": 48,
            "installments_paid": 5
        }"#,
    )?;

    let terms = validate(&request, &config)?;
    let loan = LoanAccount::originate(terms)?;
    println!("{}", loan.to_json_pretty());

    let row = loan.to_record().to_json()?;
    println!("\nstored row: {}", row);

    let mut restored = LoanAccount::from_record_with(&LoanRecord::from_json(&row)?, &config)?;
    let outcome = restored.apply_payment()?;
    println!("\nafter one more payment: {:?}", outcome);

    Ok(())
}
