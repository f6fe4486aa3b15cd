use serde::{Deserialize, Serialize};

use crate::config::LendingConfig;
use crate::decimal::Money;
use crate::errors::{FinanceError, Result};
use crate::loan::OriginationTerms;
use crate::types::{CreditScore, CustomerId, FinanceId, LoanClass, Vin};

/// raw origination request as it arrives from a form or api
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginationRequest {
    #[serde(default)]
    pub finance_id: Option<FinanceId>,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    pub credit_score: String,
    pub loan_class: String,
    pub vin: String,
    pub vehicle_price: Money,
    pub term_months: u32,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub installments_paid: u32,
}

/// field constraints of a finance record, checked in field order
///
/// Returns the first violation found.
pub fn validate(request: &OriginationRequest, config: &LendingConfig) -> Result<OriginationTerms> {
    let credit_score: CreditScore = request.credit_score.parse()?;
    if credit_score.value() < config.min_credit_score
        || credit_score.value() > config.max_credit_score
    {
        return Err(FinanceError::ScoreOutOfRange {
            score: credit_score.value(),
            min: config.min_credit_score,
            max: config.max_credit_score,
        });
    }

    let loan_class: LoanClass = request.loan_class.parse()?;
    let vin = Vin::with_length(&request.vin, config.vin_length)?;

    if request.vehicle_price.is_negative() || request.vehicle_price > config.max_vehicle_price {
        return Err(FinanceError::InvalidAmount {
            field: "vehicle price",
            amount: request.vehicle_price,
        });
    }

    if !config.term_in_range(request.term_months) {
        return Err(FinanceError::InvalidTerm {
            term: request.term_months,
            min: config.min_term_months,
            max: config.max_term_months,
        });
    }

    if request.down_payment.is_negative() || request.down_payment > request.vehicle_price {
        return Err(FinanceError::InvalidAmount {
            field: "down payment",
            amount: request.down_payment,
        });
    }

    Ok(OriginationTerms {
        finance_id: request.finance_id,
        customer_id: request.customer_id,
        credit_score,
        loan_class,
        vin: vin.to_string(),
        vehicle_price: request.vehicle_price,
        term_months: request.term_months,
        down_payment: request.down_payment,
        installments_paid: request.installments_paid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OriginationRequest {
        OriginationRequest {
            finance_id: None,
            customer_id: None,
            credit_score: "700".to_string(),
            loan_class: "USED".to_string(),
            vin: "1hgcm82633a004352".to_string(),
            vehicle_price: Money::from_major(20_000),
            term_months: 36,
            down_payment: Money::from_major(2_000),
            installments_paid: 0,
        }
    }

    #[test]
    fn test_valid_request() {
        let terms = validate(&request(), &LendingConfig::default()).unwrap();
        assert_eq!(terms.credit_score, CreditScore(700));
        assert_eq!(terms.loan_class, LoanClass::Used);
        assert_eq!(terms.vin, "1HGCM82633A004352");
    }

    #[test]
    fn test_score_rules() {
        let config = LendingConfig::default();

        let mut r = request();
        r.credit_score = "abc".to_string();
        assert!(matches!(validate(&r, &config), Err(FinanceError::InvalidScore { .. })));

        for (score, ok) in [("299", false), ("300", true), ("850", true), ("851", false)] {
            r.credit_score = score.to_string();
            assert_eq!(validate(&r, &config).is_ok(), ok, "score {}", score);
        }
    }

    #[test]
    fn test_price_cap() {
        let config = LendingConfig::default();
        let mut r = request();
        r.vehicle_price = Money::from_major(10_000_000);
        r.down_payment = Money::ZERO;
        assert!(validate(&r, &config).is_ok());

        r.vehicle_price = Money::from_cents(1_000_000_001);
        assert!(matches!(
            validate(&r, &config),
            Err(FinanceError::InvalidAmount { field: "vehicle price", .. })
        ));
    }

    #[test]
    fn test_first_violation_wins() {
        let mut r = request();
        r.credit_score = "100".to_string();
        r.vin = "short".to_string();
        r.term_months = 120;
        assert!(matches!(
            validate(&r, &LendingConfig::default()),
            Err(FinanceError::ScoreOutOfRange { score: 100, .. })
        ));

        r.credit_score = "700".to_string();
        assert!(matches!(
            validate(&r, &LendingConfig::default()),
            Err(FinanceError::InvalidVin { .. })
        ));
    }

    #[test]
    fn test_term_and_down_payment() {
        let config = LendingConfig::default();
        let mut r = request();
        r.term_months = 85;
        assert!(matches!(
            validate(&r, &config),
            Err(FinanceError::InvalidTerm { term: 85, min: 1, max: 84 })
        ));

        r.term_months = 36;
        r.down_payment = Money::from_major(20_001);
        assert!(matches!(
            validate(&r, &config),
            Err(FinanceError::InvalidAmount { field: "down payment", .. })
        ));
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "credit_score": "612",
            "loan_class": "new",
            "vin": "JH4KA7561PC008269",
            "vehicle_price": "31500.00",
            "term_months": 60
        }"#;
        let r: OriginationRequest = serde_json::from_str(json).unwrap();
        assert!(r.down_payment.is_zero());

        let terms = validate(&r, &LendingConfig::default()).unwrap();
        assert_eq!(terms.loan_class, LoanClass::New);
        assert_eq!(terms.vehicle_price, Money::from_major(31_500));
    }
}
