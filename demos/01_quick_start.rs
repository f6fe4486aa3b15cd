/// quick start - price a used-vehicle loan
use vehicle_finance_rs::{LoanAccount, LoanClass, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loan = LoanAccount::builder()
        .credit_score(700)
        .loan_class(LoanClass::Used)
        .vin("1HGCM82633A004352")
        .vehicle_price(Money::from_major(20_000))
        .down_payment(Money::from_major(2_000))
        .term_months(36)
        .build()?;

    println!("apr:             {}", loan.annual_rate());
    println!("principal:       ${}", loan.principal());
    println!("monthly payment: ${}", loan.monthly_payment());
    println!("total repayment: ${}", loan.total_repayment());
    println!("total interest:  ${}", loan.total_interest());

    Ok(())
}
