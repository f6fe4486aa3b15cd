pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod payments;
pub mod rate_table;
pub mod serialization;
pub mod state;
pub mod types;
pub mod validation;

// re-export key types
pub use config::LendingConfig;
pub use decimal::{Money, Rate};
pub use errors::{FinanceError, Result};
pub use events::{Event, EventStore};
pub use loan::{LoanAccount, LoanAccountBuilder, LoanPricing, LoanTerms, OriginationTerms};
pub use payments::{AmortizationCalculator, AmortizationSchedule, PaymentOutcome, ScheduledPayment};
pub use rate_table::{rate_for, RateTable, RateTier};
pub use serialization::{LoanRecord, LoanView};
pub use state::LoanState;
pub use types::{CreditScore, CustomerId, FinanceId, LoanClass, LoanStatus, Vin};
pub use validation::{validate, OriginationRequest};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
