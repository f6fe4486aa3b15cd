use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Rate;
use crate::errors::{FinanceError, Result};
use crate::types::{CreditScore, LoanClass};

/// one credit-score band and its APR
///
/// Bounds are inclusive. `None` leaves that side open, so the lowest band
/// also absorbs scores below the reporting floor and the highest band
/// absorbs scores above the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    pub min_score: Option<i32>,
    pub max_score: Option<i32>,
    pub rate_percent: Decimal,
}

impl RateTier {
    pub const fn new(min_score: Option<i32>, max_score: Option<i32>, rate_percent: Decimal) -> Self {
        Self {
            min_score,
            max_score,
            rate_percent,
        }
    }

    pub fn contains(&self, score: i32) -> bool {
        self.min_score.map_or(true, |min| score >= min)
            && self.max_score.map_or(true, |max| score <= max)
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percent(self.rate_percent)
    }
}

/// high-risk pricing, applied to pre-owned vehicles
const USED_TIERS: [RateTier; 5] = [
    RateTier::new(None, Some(579), dec!(20.5)),
    RateTier::new(Some(580), Some(619), dec!(17.75)),
    RateTier::new(Some(620), Some(659), dec!(11.25)),
    RateTier::new(Some(660), Some(719), dec!(6.0)),
    RateTier::new(Some(720), None, dec!(4.5)),
];

/// low-risk pricing, applied to new vehicles
const NEW_TIERS: [RateTier; 5] = [
    RateTier::new(None, Some(579), dec!(14.5)),
    RateTier::new(Some(580), Some(619), dec!(12.0)),
    RateTier::new(Some(620), Some(659), dec!(7.5)),
    RateTier::new(Some(660), Some(719), dec!(4.7)),
    RateTier::new(Some(720), None, dec!(3.7)),
];

/// ordered, contiguous, exhaustive set of score bands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateTier>", into = "Vec<RateTier>")]
pub struct RateTable {
    tiers: Vec<RateTier>,
}

impl RateTable {
    /// build a table, checking that every integer score lands in exactly one band
    pub fn new(tiers: Vec<RateTier>) -> Result<Self> {
        let invalid = |message: String| Err(FinanceError::InvalidConfiguration { message });

        let (first, last) = match (tiers.first(), tiers.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return invalid("rate table has no tiers".to_string()),
        };
        if first.min_score.is_some() {
            return invalid("lowest rate tier must be open below".to_string());
        }
        if last.max_score.is_some() {
            return invalid("highest rate tier must be open above".to_string());
        }

        for tier in &tiers {
            if tier.rate_percent < Decimal::ZERO {
                return invalid(format!("negative rate {}", tier.rate_percent));
            }
            if let (Some(min), Some(max)) = (tier.min_score, tier.max_score) {
                if min > max {
                    return invalid(format!("empty tier {}..={}", min, max));
                }
            }
        }

        for pair in tiers.windows(2) {
            let upper = pair[0].max_score;
            let next_lower = pair[1].min_score;
            match (upper, next_lower) {
                (Some(max), Some(min)) if max.checked_add(1) == Some(min) => {}
                _ => {
                    return invalid(format!(
                        "rate tiers not contiguous: {:?} followed by {:?}",
                        upper, next_lower
                    ))
                }
            }
        }

        Ok(Self { tiers })
    }

    /// pricing for pre-owned vehicles
    pub fn standard_used() -> Self {
        Self {
            tiers: USED_TIERS.to_vec(),
        }
    }

    /// pricing for new vehicles
    pub fn standard_new() -> Self {
        Self {
            tiers: NEW_TIERS.to_vec(),
        }
    }

    pub fn standard(class: LoanClass) -> Self {
        match class {
            LoanClass::New => Self::standard_new(),
            LoanClass::Used => Self::standard_used(),
        }
    }

    pub fn tiers(&self) -> &[RateTier] {
        &self.tiers
    }

    /// band containing the score
    pub fn tier_for(&self, score: CreditScore) -> &RateTier {
        band_for(&self.tiers, score.value())
    }

    /// APR for the score
    pub fn rate_for(&self, score: CreditScore) -> Rate {
        self.tier_for(score).rate()
    }
}

impl TryFrom<Vec<RateTier>> for RateTable {
    type Error = FinanceError;

    fn try_from(tiers: Vec<RateTier>) -> Result<Self> {
        RateTable::new(tiers)
    }
}

impl From<RateTable> for Vec<RateTier> {
    fn from(table: RateTable) -> Self {
        table.tiers
    }
}

/// APR for a score under the standard pricing of the loan class
///
/// Scores outside 300..=850 are not rejected; they fall into the nearest
/// edge band. Callers are expected to range-check scores beforehand.
pub fn rate_for(score: CreditScore, class: LoanClass) -> Rate {
    let tiers: &[RateTier] = match class {
        LoanClass::New => &NEW_TIERS,
        LoanClass::Used => &USED_TIERS,
    };
    let tier = band_for(tiers, score.value());

    debug!(score = score.value(), class = %class, rate = %tier.rate_percent, "rate tier selected");
    tier.rate()
}

/// band containing the score; tiers must be non-empty and exhaustive
fn band_for(tiers: &[RateTier], score: i32) -> &RateTier {
    tiers
        .iter()
        .find(|tier| tier.contains(score))
        .unwrap_or(&tiers[tiers.len() - 1])
}
