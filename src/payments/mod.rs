pub mod amortization;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::FinanceId;

pub use amortization::{
    amortized_payment, AmortizationCalculator, AmortizationSchedule, ScheduledPayment,
};

/// result of applying one installment; the fields a caller persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub finance_id: FinanceId,
    /// 1-based number of the installment just applied
    pub installment_number: u32,
    pub amount: Money,
    pub balance: Money,
    pub installments_paid: u32,
    pub paid_off: bool,
}
