use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{FinanceId, LoanStatus};

/// mutable servicing state of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    pub finance_id: FinanceId,

    // balances
    pub balance: Money,
    pub installments_paid: u32,

    // dates
    pub origination_date: DateTime<Utc>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_status_change: DateTime<Utc>,

    // status
    pub status: LoanStatus,
}

impl LoanState {
    /// state at origination (or reconstruction) of a loan
    pub fn new(
        finance_id: FinanceId,
        balance: Money,
        installments_paid: u32,
        paid_off: bool,
        origination_date: DateTime<Utc>,
    ) -> Self {
        let (status, balance) = if paid_off {
            (LoanStatus::PaidOff, Money::ZERO)
        } else {
            (LoanStatus::Active, balance)
        };

        Self {
            finance_id,
            balance,
            installments_paid,
            origination_date,
            last_payment_date: None,
            last_status_change: origination_date,
            status,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.status == LoanStatus::PaidOff
    }

    /// record one installment; returns true when this payment retired the loan
    pub fn record_installment(
        &mut self,
        amount: Money,
        term_months: u32,
        now: DateTime<Utc>,
    ) -> bool {
        self.balance -= amount;
        self.installments_paid = self.installments_paid.saturating_add(1);
        self.last_payment_date = Some(now);

        let retired = self.installments_paid >= term_months || self.balance <= Money::ZERO;
        if retired {
            // the final installment can overshoot by rounding residue
            self.balance = Money::ZERO;
            self.update_status(LoanStatus::PaidOff, now);
        }
        retired
    }

    /// update status; PaidOff never reverts
    pub fn update_status(&mut self, new_status: LoanStatus, now: DateTime<Utc>) {
        if self.status == LoanStatus::PaidOff || self.status == new_status {
            return;
        }
        self.status = new_status;
        self.last_status_change = now;
    }
}
