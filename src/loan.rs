use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::LendingConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};
use crate::events::{Event, EventStore};
use crate::payments::{AmortizationCalculator, AmortizationSchedule, PaymentOutcome};
use crate::serialization::{LoanRecord, LoanView};
use crate::state::LoanState;
use crate::types::{CreditScore, CustomerId, FinanceId, LoanClass, LoanStatus, Vin};

/// origination inputs as handed over by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginationTerms {
    pub finance_id: Option<FinanceId>,
    pub customer_id: Option<CustomerId>,
    pub credit_score: CreditScore,
    pub loan_class: LoanClass,
    pub vin: String,
    pub vehicle_price: Money,
    pub term_months: u32,
    pub down_payment: Money,
    /// nonzero when reconstructing a loan already in repayment
    pub installments_paid: u32,
}

/// terms fixed at origination; never mutated afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub vin: Vin,
    pub vehicle_price: Money,
    pub term_months: u32,
    pub loan_class: LoanClass,
    pub credit_score: CreditScore,
    pub down_payment: Money,
}

/// values derived once from the fixed terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanPricing {
    pub principal: Money,
    pub annual_rate: Rate,
    pub monthly_payment: Money,
    pub total_repayment: Money,
}

impl LoanPricing {
    fn compute(terms: &LoanTerms, config: &LendingConfig) -> Result<Self> {
        let annual_rate = config.rate_for(terms.credit_score, terms.loan_class);
        let principal = terms.vehicle_price - terms.down_payment;
        let monthly_payment =
            AmortizationCalculator::monthly_payment(principal, annual_rate, terms.term_months)?;
        let total_repayment = monthly_payment * terms.term_months;

        debug!(
            principal = %principal,
            rate = %annual_rate,
            monthly_payment = %monthly_payment,
            term_months = terms.term_months,
            "loan priced"
        );

        Ok(Self {
            principal,
            annual_rate,
            monthly_payment,
            total_repayment,
        })
    }
}

/// financed vehicle loan
#[derive(Debug, Clone)]
pub struct LoanAccount {
    id: FinanceId,
    customer_id: Option<CustomerId>,
    terms: LoanTerms,
    pricing: LoanPricing,
    state: LoanState,
    events: EventStore,
}

impl LoanAccount {
    /// builder for creating loans
    pub fn builder() -> LoanAccountBuilder {
        LoanAccountBuilder::new()
    }

    /// originate with the standard configuration and system time
    pub fn originate(terms: OriginationTerms) -> Result<Self> {
        let time = SafeTimeProvider::new(TimeSource::System);
        Self::originate_with(terms, &LendingConfig::default(), &time)
    }

    /// originate with explicit configuration and time provider
    ///
    /// Checks the term, then the vin, then the amounts. The credit score is
    /// never range-checked here; out-of-range scores price at the edge bands.
    pub fn originate_with(
        terms: OriginationTerms,
        config: &LendingConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let loan_terms = check_terms(&terms, config)?;
        let pricing = LoanPricing::compute(&loan_terms, config)?;
        let id = terms.finance_id.unwrap_or_else(Uuid::new_v4);
        let now = time_provider.now();

        let mut loan = Self::assemble(
            id,
            terms.customer_id,
            loan_terms,
            pricing,
            terms.installments_paid,
            now,
        );

        loan.events.emit(Event::LoanOriginated {
            finance_id: id,
            vin: loan.terms.vin.clone(),
            loan_class: loan.terms.loan_class,
            principal: pricing.principal,
            annual_rate: pricing.annual_rate,
            monthly_payment: pricing.monthly_payment,
            term_months: loan.terms.term_months,
            timestamp: now,
        });

        info!(
            finance_id = %id,
            vin = %loan.terms.vin,
            status = ?loan.state.status,
            "loan originated"
        );

        Ok(loan)
    }

    /// rebuild a persisted loan under the standard configuration
    pub fn from_record(record: &LoanRecord) -> Result<Self> {
        Self::from_record_with(record, &LendingConfig::default())
    }

    /// rebuild a persisted loan from its fixed terms and installment count
    ///
    /// Stored rate, payment, balance and paid-off flag are recomputed rather
    /// than trusted. No events are emitted.
    pub fn from_record_with(record: &LoanRecord, config: &LendingConfig) -> Result<Self> {
        let origination = OriginationTerms {
            finance_id: Some(record.finance_id),
            customer_id: record.customer_id,
            credit_score: record.credit_score,
            loan_class: record.loan_class,
            vin: record.vin.to_string(),
            vehicle_price: record.vehicle_price,
            term_months: record.term_months,
            down_payment: record.down_payment,
            installments_paid: record.installments_paid,
        };
        let loan_terms = check_terms(&origination, config)?;
        let pricing = LoanPricing::compute(&loan_terms, config)?;

        let mut loan = Self::assemble(
            record.finance_id,
            record.customer_id,
            loan_terms,
            pricing,
            record.installments_paid,
            record.origination_date,
        );
        loan.state.last_payment_date = record.last_payment_date;

        if loan.to_record() != *record {
            warn!(
                finance_id = %record.finance_id,
                "stored loan values differ from recomputed values"
            );
        }

        Ok(loan)
    }

    fn assemble(
        id: FinanceId,
        customer_id: Option<CustomerId>,
        terms: LoanTerms,
        pricing: LoanPricing,
        installments_paid: u32,
        origination_date: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let already_paid = pricing.monthly_payment * installments_paid;
        let balance = pricing.total_repayment - already_paid;
        let paid_off = installments_paid >= terms.term_months;

        Self {
            id,
            customer_id,
            state: LoanState::new(id, balance, installments_paid, paid_off, origination_date),
            terms,
            pricing,
            events: EventStore::new(),
        }
    }

    /// apply one scheduled installment using system time
    pub fn apply_payment(&mut self) -> Result<PaymentOutcome> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.apply_payment_with_time(&time)
    }

    /// apply one scheduled installment
    ///
    /// Fails with `AlreadyPaidOff` once the loan is retired; state and events
    /// are left untouched in that case.
    pub fn apply_payment_with_time(
        &mut self,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentOutcome> {
        if self.state.is_paid_off() {
            warn!(finance_id = %self.id, "payment rejected on paid-off loan");
            return Err(FinanceError::AlreadyPaidOff { finance_id: self.id });
        }

        let now = time_provider.now();
        let amount = self.pricing.monthly_payment;
        let retired = self
            .state
            .record_installment(amount, self.terms.term_months, now);

        self.events.emit(Event::PaymentApplied {
            finance_id: self.id,
            installment_number: self.state.installments_paid,
            amount,
            remaining_balance: self.state.balance,
            timestamp: now,
        });

        debug!(
            finance_id = %self.id,
            installment = self.state.installments_paid,
            balance = %self.state.balance,
            "payment applied"
        );

        if retired {
            self.events.emit(Event::StatusChanged {
                finance_id: self.id,
                old_status: LoanStatus::Active,
                new_status: LoanStatus::PaidOff,
                reason: "final installment applied".to_string(),
                timestamp: now,
            });
            self.events.emit(Event::LoanPaidOff {
                finance_id: self.id,
                installments_paid: self.state.installments_paid,
                total_paid: self.amount_paid(),
                timestamp: now,
            });
            info!(finance_id = %self.id, "loan paid off");
        }

        Ok(PaymentOutcome {
            finance_id: self.id,
            installment_number: self.state.installments_paid,
            amount,
            balance: self.state.balance,
            installments_paid: self.state.installments_paid,
            paid_off: retired,
        })
    }

    pub fn id(&self) -> FinanceId {
        self.id
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn pricing(&self) -> &LoanPricing {
        &self.pricing
    }

    pub fn state(&self) -> &LoanState {
        &self.state
    }

    pub fn principal(&self) -> Money {
        self.pricing.principal
    }

    pub fn annual_rate(&self) -> Rate {
        self.pricing.annual_rate
    }

    pub fn monthly_payment(&self) -> Money {
        self.pricing.monthly_payment
    }

    /// scheduled total over the full term
    pub fn total_repayment(&self) -> Money {
        self.pricing.total_repayment
    }

    /// interest over the full term
    pub fn total_interest(&self) -> Money {
        (self.pricing.total_repayment - self.pricing.principal).max(Money::ZERO)
    }

    pub fn balance(&self) -> Money {
        self.state.balance
    }

    pub fn installments_paid(&self) -> u32 {
        self.state.installments_paid
    }

    pub fn remaining_installments(&self) -> u32 {
        self.terms
            .term_months
            .saturating_sub(self.state.installments_paid)
    }

    /// installments applied so far, capped at the term
    pub fn amount_paid(&self) -> Money {
        let counted = self.state.installments_paid.min(self.terms.term_months);
        self.pricing.monthly_payment * counted
    }

    pub fn is_paid_off(&self) -> bool {
        self.state.is_paid_off()
    }

    pub fn status(&self) -> LoanStatus {
        self.state.status
    }

    /// principal/interest split of every installment
    pub fn schedule(&self) -> Result<AmortizationSchedule> {
        AmortizationSchedule::generate(
            self.pricing.principal,
            self.pricing.annual_rate,
            self.terms.term_months,
        )
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// flat row for the storage layer
    pub fn to_record(&self) -> LoanRecord {
        LoanRecord::from(self)
    }

    /// get json representation of current state
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&LoanView::from_loan(self))
            .unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}

/// construction checks in order: term, vin, amounts
///
/// The price cap also keeps pricing arithmetic inside `Decimal` range.
fn check_terms(terms: &OriginationTerms, config: &LendingConfig) -> Result<LoanTerms> {
    if !config.term_in_range(terms.term_months) {
        return Err(FinanceError::InvalidTerm {
            term: terms.term_months,
            min: config.min_term_months,
            max: config.max_term_months,
        });
    }

    let vin = Vin::with_length(&terms.vin, config.vin_length)?;

    if terms.vehicle_price.is_negative() || terms.vehicle_price > config.max_vehicle_price {
        return Err(FinanceError::InvalidAmount {
            field: "vehicle price",
            amount: terms.vehicle_price,
        });
    }
    if terms.down_payment.is_negative() || terms.down_payment > terms.vehicle_price {
        return Err(FinanceError::InvalidAmount {
            field: "down payment",
            amount: terms.down_payment,
        });
    }

    Ok(LoanTerms {
        vin,
        vehicle_price: terms.vehicle_price,
        term_months: terms.term_months,
        loan_class: terms.loan_class,
        credit_score: terms.credit_score,
        down_payment: terms.down_payment,
    })
}

/// builder for loans
pub struct LoanAccountBuilder {
    finance_id: Option<FinanceId>,
    customer_id: Option<CustomerId>,
    credit_score: Option<CreditScore>,
    loan_class: Option<LoanClass>,
    vin: Option<String>,
    vehicle_price: Option<Money>,
    term_months: Option<u32>,
    down_payment: Option<Money>,
    installments_paid: u32,
    config: Option<LendingConfig>,
}

impl LoanAccountBuilder {
    pub fn new() -> Self {
        Self {
            finance_id: None,
            customer_id: None,
            credit_score: None,
            loan_class: None,
            vin: None,
            vehicle_price: None,
            term_months: None,
            down_payment: None,
            installments_paid: 0,
            config: None,
        }
    }

    pub fn finance_id(mut self, id: FinanceId) -> Self {
        self.finance_id = Some(id);
        self
    }

    pub fn customer_id(mut self, id: CustomerId) -> Self {
        self.customer_id = Some(id);
        self
    }

    pub fn credit_score(mut self, score: impl Into<CreditScore>) -> Self {
        self.credit_score = Some(score.into());
        self
    }

    pub fn loan_class(mut self, class: LoanClass) -> Self {
        self.loan_class = Some(class);
        self
    }

    pub fn vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = Some(vin.into());
        self
    }

    pub fn vehicle_price(mut self, price: Money) -> Self {
        self.vehicle_price = Some(price);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn down_payment(mut self, amount: Money) -> Self {
        self.down_payment = Some(amount);
        self
    }

    pub fn installments_paid(mut self, count: u32) -> Self {
        self.installments_paid = count;
        self
    }

    pub fn config(mut self, config: LendingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// collect the inputs without pricing them
    pub fn terms(self) -> Result<OriginationTerms> {
        Ok(OriginationTerms {
            finance_id: self.finance_id,
            customer_id: self.customer_id,
            credit_score: self.credit_score.ok_or(FinanceError::InvalidConfiguration {
                message: "Credit score required".to_string(),
            })?,
            loan_class: self.loan_class.ok_or(FinanceError::InvalidConfiguration {
                message: "Loan class required".to_string(),
            })?,
            vin: self.vin.ok_or(FinanceError::InvalidConfiguration {
                message: "Vin required".to_string(),
            })?,
            vehicle_price: self.vehicle_price.ok_or(FinanceError::InvalidConfiguration {
                message: "Vehicle price required".to_string(),
            })?,
            term_months: self.term_months.ok_or(FinanceError::InvalidConfiguration {
                message: "Term required".to_string(),
            })?,
            down_payment: self.down_payment.unwrap_or(Money::ZERO),
            installments_paid: self.installments_paid,
        })
    }

    /// build with system time
    pub fn build(self) -> Result<LoanAccount> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    /// build with explicit time provider
    pub fn build_with_time(mut self, time_provider: &SafeTimeProvider) -> Result<LoanAccount> {
        let config = self.config.take().unwrap_or_default();
        let terms = self.terms()?;
        LoanAccount::originate_with(terms, &config, time_provider)
    }
}

impl Default for LoanAccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}
