/// serialization support for loans
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::loan::LoanAccount;
use crate::types::{CreditScore, CustomerId, FinanceId, LoanClass, LoanStatus, Vin};

/// flat finance record as kept by the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub finance_id: FinanceId,
    pub customer_id: Option<CustomerId>,
    pub vin: Vin,
    pub credit_score: CreditScore,
    pub loan_class: LoanClass,
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub term_months: u32,
    pub installments_paid: u32,
    pub apr_percent: Decimal,
    pub monthly_payment: Money,
    pub balance: Money,
    pub paid_off: bool,
    pub origination_date: DateTime<Utc>,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl From<&LoanAccount> for LoanRecord {
    fn from(loan: &LoanAccount) -> Self {
        let terms = loan.terms();
        let state = loan.state();
        LoanRecord {
            finance_id: loan.id(),
            customer_id: loan.customer_id(),
            vin: terms.vin.clone(),
            credit_score: terms.credit_score,
            loan_class: terms.loan_class,
            vehicle_price: terms.vehicle_price,
            down_payment: terms.down_payment,
            term_months: terms.term_months,
            installments_paid: state.installments_paid,
            apr_percent: loan.annual_rate().as_percentage(),
            monthly_payment: loan.monthly_payment(),
            balance: state.balance,
            paid_off: loan.is_paid_off(),
            origination_date: state.origination_date,
            last_payment_date: state.last_payment_date,
        }
    }
}

impl LoanRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// serializable view of a loan's state
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: FinanceId,
    pub customer_id: Option<CustomerId>,
    pub status: LoanStatus,
    pub origination_date: DateTime<Utc>,
    pub vehicle: VehicleView,
    pub financial: FinancialView,
    pub payments: PaymentView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleView {
    pub vin: Vin,
    pub loan_class: LoanClass,
    pub price: Money,
    pub down_payment: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinancialView {
    pub credit_score: CreditScore,
    pub apr_percent: Decimal,
    pub principal: Money,
    pub monthly_payment: Money,
    pub total_repayment: Money,
    pub total_interest: Money,
    pub balance: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentView {
    pub term_months: u32,
    pub installments_paid: u32,
    pub remaining_installments: u32,
    pub amount_paid: Money,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl LoanView {
    pub fn from_loan(loan: &LoanAccount) -> Self {
        let terms = loan.terms();
        let state = loan.state();
        LoanView {
            id: loan.id(),
            customer_id: loan.customer_id(),
            status: loan.status(),
            origination_date: state.origination_date,
            vehicle: VehicleView {
                vin: terms.vin.clone(),
                loan_class: terms.loan_class,
                price: terms.vehicle_price,
                down_payment: terms.down_payment,
            },
            financial: FinancialView {
                credit_score: terms.credit_score,
                apr_percent: loan.annual_rate().as_percentage(),
                principal: loan.principal(),
                monthly_payment: loan.monthly_payment(),
                total_repayment: loan.total_repayment(),
                total_interest: loan.total_interest(),
                balance: loan.balance(),
            },
            payments: PaymentView {
                term_months: terms.term_months,
                installments_paid: state.installments_paid,
                remaining_installments: loan.remaining_installments(),
                amount_paid: loan.amount_paid(),
                last_payment_date: state.last_payment_date,
            },
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    fn sample_loan(time: &SafeTimeProvider) -> LoanAccount {
        LoanAccount::builder()
            .credit_score(640)
            .loan_class(LoanClass::Used)
            .vin("JH4KA7561PC008269")
            .vehicle_price(Money::from_major(15_000))
            .down_payment(Money::from_major(3_000))
            .term_months(60)
            .build_with_time(time)
            .unwrap()
    }

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_record_carries_computed_fields() {
        let time = test_time();
        let mut loan = sample_loan(&time);
        loan.apply_payment_with_time(&time).unwrap();

        let record = loan.to_record();
        assert_eq!(record.apr_percent, dec!(11.25));
        assert_eq!(record.monthly_payment, loan.monthly_payment());
        assert_eq!(record.balance, loan.balance());
        assert_eq!(record.installments_paid, 1);
        assert!(!record.paid_off);
        assert_eq!(record.last_payment_date, Some(time.now()));
    }

    #[test]
    fn test_record_restores_loan() {
        let time = test_time();
        let mut loan = sample_loan(&time);
        for _ in 0..7 {
            loan.apply_payment_with_time(&time).unwrap();
        }

        let json = loan.to_record().to_json().unwrap();
        let record = LoanRecord::from_json(&json).unwrap();
        let restored = LoanAccount::from_record(&record).unwrap();

        assert_eq!(restored.id(), loan.id());
        assert_eq!(restored.balance(), loan.balance());
        assert_eq!(restored.installments_paid(), 7);
        assert_eq!(restored.to_record(), record);
        assert!(restored.events().is_empty());
    }

    #[test]
    fn test_restore_recomputes_stale_values() {
        let time = test_time();
        let loan = sample_loan(&time);

        let mut record = loan.to_record();
        record.apr_percent = dec!(99);
        record.balance = Money::from_major(1);
        record.paid_off = true;

        let restored = LoanAccount::from_record(&record).unwrap();
        assert_eq!(restored.annual_rate().as_percentage(), dec!(11.25));
        assert_eq!(restored.balance(), loan.balance());
        assert!(!restored.is_paid_off());
    }

    #[test]
    fn test_json_view() {
        let loan = sample_loan(&test_time());
        let json = loan.to_json_pretty();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "Active");
        assert_eq!(value["vehicle"]["vin"], "JH4KA7561PC008269");
        assert_eq!(value["vehicle"]["loan_class"], "used");
        let principal: Money =
            serde_json::from_value(value["financial"]["principal"].clone()).unwrap();
        assert_eq!(principal, Money::from_major(12_000));
        assert_eq!(value["payments"]["remaining_installments"], 60);
    }
}
