use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::FinanceId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinanceError {
    #[error("invalid term: {term} months is outside {min}..={max}")]
    InvalidTerm {
        term: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid credit score: {input:?} is not a number")]
    InvalidScore {
        input: String,
    },

    #[error("credit score out of range: {score} is outside {min}..={max}")]
    ScoreOutOfRange {
        score: i32,
        min: i32,
        max: i32,
    },

    #[error("invalid vin: {vin:?} must be exactly {length} characters")]
    InvalidVin {
        vin: String,
        length: usize,
    },

    #[error("invalid loan class: {input:?}")]
    InvalidCondition {
        input: String,
    },

    #[error("invalid {field}: {amount}")]
    InvalidAmount {
        field: &'static str,
        amount: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidRate {
        rate: Rate,
    },

    #[error("loan {finance_id} is already paid off")]
    AlreadyPaidOff {
        finance_id: FinanceId,
    },

    #[error("degenerate division in {context}")]
    DegenerateDivision {
        context: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

impl From<serde_json::Error> for FinanceError {
    fn from(e: serde_json::Error) -> Self {
        FinanceError::Serialization {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinanceError>;
