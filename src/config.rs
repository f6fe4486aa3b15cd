use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};
use crate::rate_table::RateTable;
use crate::types::{CreditScore, LoanClass, VIN_LENGTH};

/// lending configuration: pricing tables and origination limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingConfig {
    pub new_rates: RateTable,
    pub used_rates: RateTable,
    pub min_term_months: u32,
    pub max_term_months: u32,
    pub min_credit_score: i32,
    pub max_credit_score: i32,
    pub max_vehicle_price: Money,
    pub vin_length: usize,
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            new_rates: RateTable::standard_new(),
            used_rates: RateTable::standard_used(),
            min_term_months: 1,
            max_term_months: 84,
            min_credit_score: 300,
            max_credit_score: 850,
            max_vehicle_price: Money::from_decimal(dec!(10_000_000)),
            vin_length: VIN_LENGTH,
        }
    }
}

impl LendingConfig {
    /// load from json; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LendingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// range checks on the limits; run once when a config is loaded
    pub fn validate(&self) -> Result<()> {
        if self.min_term_months == 0 {
            return Err(FinanceError::InvalidConfiguration {
                message: "minimum term must be at least one month".to_string(),
            });
        }
        if self.min_term_months > self.max_term_months {
            return Err(FinanceError::InvalidConfiguration {
                message: format!(
                    "term range {}..={} is empty",
                    self.min_term_months, self.max_term_months
                ),
            });
        }
        if self.min_credit_score > self.max_credit_score {
            return Err(FinanceError::InvalidConfiguration {
                message: format!(
                    "credit score range {}..={} is empty",
                    self.min_credit_score, self.max_credit_score
                ),
            });
        }
        if self.max_vehicle_price.is_negative() {
            return Err(FinanceError::InvalidConfiguration {
                message: format!("negative vehicle price cap {}", self.max_vehicle_price),
            });
        }
        if self.vin_length == 0 {
            return Err(FinanceError::InvalidConfiguration {
                message: "vin length must be positive".to_string(),
            });
        }
        // rate tables can only exist in checked form
        Ok(())
    }

    pub fn rate_table(&self, class: LoanClass) -> &RateTable {
        match class {
            LoanClass::New => &self.new_rates,
            LoanClass::Used => &self.used_rates,
        }
    }

    /// APR for the score under this configuration's pricing
    pub fn rate_for(&self, score: CreditScore, class: LoanClass) -> Rate {
        self.rate_table(class).rate_for(score)
    }

    pub fn term_in_range(&self, term_months: u32) -> bool {
        (self.min_term_months..=self.max_term_months).contains(&term_months)
    }
}
