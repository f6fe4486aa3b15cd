use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{FinanceId, LoanClass, LoanStatus, Vin};

/// all events that can be emitted by a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanOriginated {
        finance_id: FinanceId,
        vin: Vin,
        loan_class: LoanClass,
        principal: Money,
        annual_rate: Rate,
        monthly_payment: Money,
        term_months: u32,
        timestamp: DateTime<Utc>,
    },
    LoanPaidOff {
        finance_id: FinanceId,
        installments_paid: u32,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentApplied {
        finance_id: FinanceId,
        installment_number: u32,
        amount: Money,
        remaining_balance: Money,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        finance_id: FinanceId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn finance_id(&self) -> FinanceId {
        match self {
            Event::LoanOriginated { finance_id, .. }
            | Event::LoanPaidOff { finance_id, .. }
            | Event::PaymentApplied { finance_id, .. }
            | Event::StatusChanged { finance_id, .. } => *finance_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::LoanOriginated { timestamp, .. }
            | Event::LoanPaidOff { timestamp, .. }
            | Event::PaymentApplied { timestamp, .. }
            | Event::StatusChanged { timestamp, .. } => *timestamp,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// drain pending events, e.g. to hand them to storage
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
