use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{FinanceError, Result};

/// unique identifier for a finance record, assigned by the storage layer
pub type FinanceId = Uuid;

/// identifier of the customer account that owns the loan
pub type CustomerId = Uuid;

/// standard vehicle identification number length
pub const VIN_LENGTH: usize = 17;

/// vehicle identification number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// trims and upper-cases the input, which must be exactly 17 characters
    pub fn new(vin: &str) -> Result<Self> {
        Self::with_length(vin, VIN_LENGTH)
    }

    pub(crate) fn with_length(vin: &str, length: usize) -> Result<Self> {
        let normalized = vin.trim().to_ascii_uppercase();
        if normalized.chars().count() != length {
            return Err(FinanceError::InvalidVin {
                vin: vin.to_string(),
                length,
            });
        }
        Ok(Vin(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Vin {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        Vin::new(s)
    }
}

impl TryFrom<String> for Vin {
    type Error = FinanceError;

    fn try_from(s: String) -> Result<Self> {
        Vin::new(&s)
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}

/// loan class, priced by the condition of the financed vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanClass {
    /// new vehicle, low-risk pricing
    New,
    /// pre-owned vehicle, high-risk pricing
    Used,
}

impl fmt::Display for LoanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanClass::New => f.write_str("new"),
            LoanClass::Used => f.write_str("used"),
        }
    }
}

impl FromStr for LoanClass {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(LoanClass::New),
            "used" | "preowned" | "pre-owned" => Ok(LoanClass::Used),
            _ => Err(FinanceError::InvalidCondition {
                input: s.to_string(),
            }),
        }
    }
}

/// borrower credit score at origination
///
/// Any integer is representable; range checks belong to the validation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditScore(pub i32);

impl CreditScore {
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CreditScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CreditScore {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i32>()
            .map(CreditScore)
            .map_err(|_| FinanceError::InvalidScore {
                input: s.to_string(),
            })
    }
}

impl From<i32> for CreditScore {
    fn from(score: i32) -> Self {
        CreditScore(score)
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// installments outstanding
    Active,
    /// every scheduled installment applied; terminal
    PaidOff,
}
