use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};

/// one installment of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// generate the installment-by-installment split of a fixed-payment loan
    ///
    /// Interest is charged on the running balance each month and rounded to
    /// cents; the last installment takes whatever principal is left so the
    /// schedule always closes at exactly zero.
    pub fn generate(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Self> {
        let monthly_payment = AmortizationCalculator::monthly_payment(principal, annual_rate, term_months)?;
        let monthly_rate = annual_rate.monthly_rate();

        let mut payments = Vec::with_capacity(term_months as usize);
        let mut balance = principal;
        let mut cumulative_interest = Money::ZERO;
        let mut cumulative_principal = Money::ZERO;

        for i in 1..=term_months {
            let interest_portion = Money::from_decimal(balance.as_decimal() * monthly_rate);
            let is_last = i == term_months;

            let (payment_amount, principal_portion) = if is_last {
                (balance + interest_portion, balance)
            } else {
                let scheduled = (monthly_payment - interest_portion).min(balance);
                (scheduled + interest_portion, scheduled)
            };

            cumulative_interest += interest_portion;
            cumulative_principal += principal_portion;
            let ending_balance = balance - principal_portion;

            payments.push(ScheduledPayment {
                payment_number: i,
                beginning_balance: balance,
                payment_amount,
                interest_portion,
                principal_portion,
                ending_balance,
                cumulative_interest,
                cumulative_principal,
            });

            balance = ending_balance;
        }

        let total_payment = payments
            .iter()
            .map(|p| p.payment_amount)
            .fold(Money::ZERO, |acc, x| acc + x);

        Ok(Self {
            principal,
            annual_rate,
            term_months,
            monthly_payment,
            payments,
            total_interest: cumulative_interest,
            total_payment,
        })
    }

    /// get payment for specific period (1-based)
    pub fn get_payment(&self, payment_number: u32) -> Option<&ScheduledPayment> {
        let index = payment_number.checked_sub(1)?;
        self.payments.get(index as usize)
    }

    /// outstanding principal after the given installment
    pub fn balance_after_payment(&self, payment_number: u32) -> Money {
        if payment_number >= self.term_months {
            return Money::ZERO;
        }
        self.get_payment(payment_number)
            .map(|p| p.ending_balance)
            .unwrap_or(self.principal)
    }
}

/// fixed-payment amortization calculator
pub struct AmortizationCalculator;

impl AmortizationCalculator {
    /// fixed monthly payment that retires `principal` over `term_months`
    ///
    /// A zero rate is repaid straight-line. The result is rounded half-up to cents.
    pub fn monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
        if term_months == 0 {
            return Err(FinanceError::InvalidTerm {
                term: term_months,
                min: 1,
                max: u32::MAX,
            });
        }
        if principal.is_negative() {
            return Err(FinanceError::InvalidAmount {
                field: "principal",
                amount: principal,
            });
        }
        if annual_rate.is_negative() {
            return Err(FinanceError::InvalidRate { rate: annual_rate });
        }

        if annual_rate.is_zero() {
            return Ok(principal / Decimal::from(term_months));
        }

        let payment = amortized_payment(principal.as_decimal(), annual_rate.monthly_rate(), term_months)?;
        Ok(Money::from_decimal(payment))
    }

    /// full schedule for the same inputs
    pub fn schedule(principal: Money, annual_rate: Rate, term_months: u32) -> Result<AmortizationSchedule> {
        AmortizationSchedule::generate(principal, annual_rate, term_months)
    }
}

/// P * r * (1 + r)^n / ((1 + r)^n - 1), unrounded
///
/// Fails when the denominator vanishes, i.e. for a zero monthly rate.
pub fn amortized_payment(principal: Decimal, monthly_rate: Decimal, months: u32) -> Result<Decimal> {
    let base = Decimal::ONE + monthly_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound *= base;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinanceError::DegenerateDivision {
            context: "amortized payment",
        });
    }

    Ok(principal * monthly_rate * compound / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn apr(p: Decimal) -> Rate {
        Rate::from_percent(p)
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let payment = AmortizationCalculator::monthly_payment(Money::from_major(1200), Rate::ZERO, 12).unwrap();
        assert_eq!(payment, Money::from_cents(10_000));
    }

    #[test]
    fn test_known_payments() {
        // 10,000 over 12 months at 6%
        let payment = AmortizationCalculator::monthly_payment(Money::from_major(10_000), apr(dec!(6.0)), 12).unwrap();
        assert_eq!(payment, Money::from_cents(86_066));

        // 18,000 over 36 months at 6%
        let payment = AmortizationCalculator::monthly_payment(Money::from_major(18_000), apr(dec!(6.0)), 36).unwrap();
        assert_eq!(payment, Money::from_cents(54_759));
    }

    #[test]
    fn test_single_month_term() {
        let payment = AmortizationCalculator::monthly_payment(Money::from_major(1_000), apr(dec!(12)), 1).unwrap();
        // one month of 1% interest
        assert_eq!(payment, Money::from_major(1_010));
    }

    #[test]
    fn test_payment_covers_principal() {
        let principals = [dec!(100), dec!(999.99), dec!(18000), dec!(250000)];
        let rates = [dec!(3.7), dec!(6.0), dec!(11.25), dec!(20.5)];
        for principal in principals {
            for rate in rates {
                for term in [1, 12, 36, 60, 84] {
                    let p = Money::from_decimal(principal);
                    let payment = AmortizationCalculator::monthly_payment(p, apr(rate), term).unwrap();
                    assert!(payment * term >= p, "{} at {}% for {}", principal, rate, term);
                }
            }
        }
    }

    #[test]
    fn test_zero_principal() {
        let payment = AmortizationCalculator::monthly_payment(Money::ZERO, apr(dec!(6)), 36).unwrap();
        assert!(payment.is_zero());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            AmortizationCalculator::monthly_payment(Money::from_major(100), apr(dec!(6)), 0),
            Err(FinanceError::InvalidTerm { term: 0, .. })
        ));
        assert!(matches!(
            AmortizationCalculator::monthly_payment(Money::from_major(-100), apr(dec!(6)), 12),
            Err(FinanceError::InvalidAmount { field: "principal", .. })
        ));
        assert!(matches!(
            AmortizationCalculator::monthly_payment(Money::from_major(100), apr(dec!(-1)), 12),
            Err(FinanceError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_raw_formula_rejects_zero_rate() {
        assert_eq!(
            amortized_payment(dec!(1200), Decimal::ZERO, 12),
            Err(FinanceError::DegenerateDivision {
                context: "amortized payment"
            })
        );
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let principal = Money::from_major(10_000);
        let schedule = AmortizationSchedule::generate(principal, apr(dec!(6.0)), 12).unwrap();

        assert_eq!(schedule.payments.len(), 12);
        assert_eq!(schedule.monthly_payment, Money::from_cents(86_066));

        let first = &schedule.payments[0];
        assert_eq!(first.beginning_balance, principal);
        assert_eq!(first.interest_portion, Money::from_major(50));
        assert_eq!(first.principal_portion, Money::from_cents(81_066));

        let last = schedule.payments.last().unwrap();
        assert!(last.ending_balance.is_zero());
        assert_eq!(last.cumulative_principal, principal);
        // final installment differs from the level payment by rounding residue only
        assert!((last.payment_amount - schedule.monthly_payment).abs() < Money::from_major(1));

        assert_eq!(schedule.total_payment, principal + schedule.total_interest);

        for pair in schedule.payments.windows(2) {
            assert!(pair[1].interest_portion <= pair[0].interest_portion);
            assert_eq!(pair[1].beginning_balance, pair[0].ending_balance);
        }
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = AmortizationSchedule::generate(Money::from_major(1_000), Rate::ZERO, 3).unwrap();
        assert_eq!(schedule.monthly_payment, Money::from_cents(33_333));
        assert!(schedule.total_interest.is_zero());
        assert_eq!(schedule.payments[2].payment_amount, Money::from_cents(33_334));
        assert_eq!(schedule.total_payment, Money::from_major(1_000));
    }

    #[test]
    fn test_schedule_lookup() {
        let principal = Money::from_major(5_000);
        let schedule = AmortizationCalculator::schedule(principal, apr(dec!(4.7)), 24).unwrap();

        assert!(schedule.get_payment(0).is_none());
        assert_eq!(schedule.get_payment(1).map(|p| p.payment_number), Some(1));
        assert!(schedule.get_payment(25).is_none());

        assert_eq!(schedule.balance_after_payment(0), principal);
        assert!(schedule.balance_after_payment(12) < principal);
        assert!(schedule.balance_after_payment(24).is_zero());
    }
}
