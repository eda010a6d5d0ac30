//! Asset breakdown types
//!
//! A financial entry splits assets into two risk groups of nine named fields
//! each. Totals are always derived from these fields, never stored
//! independently by callers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Higher-volatility asset classes
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema,
)]
#[serde(default)]
pub struct HighMediumRisk {
    pub domestic_stocks: f64,
    pub us_stocks: f64,
    pub world_stocks: f64,
    pub investment_trusts: f64,
    pub etfs: f64,
    pub reits: f64,
    pub crypto: f64,
    pub fx_deposits: f64,
    pub commodities: f64,
}

impl HighMediumRisk {
    /// Field name/value pairs, in declaration order
    pub fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("domestic_stocks", self.domestic_stocks),
            ("us_stocks", self.us_stocks),
            ("world_stocks", self.world_stocks),
            ("investment_trusts", self.investment_trusts),
            ("etfs", self.etfs),
            ("reits", self.reits),
            ("crypto", self.crypto),
            ("fx_deposits", self.fx_deposits),
            ("commodities", self.commodities),
        ]
    }

    /// Sum of all nine fields
    pub fn total(&self) -> f64 {
        self.fields().iter().map(|(_, v)| v).sum()
    }

    /// Accumulate another breakdown into this one (chart date merging)
    pub fn add(&mut self, other: &Self) {
        self.domestic_stocks += other.domestic_stocks;
        self.us_stocks += other.us_stocks;
        self.world_stocks += other.world_stocks;
        self.investment_trusts += other.investment_trusts;
        self.etfs += other.etfs;
        self.reits += other.reits;
        self.crypto += other.crypto;
        self.fx_deposits += other.fx_deposits;
        self.commodities += other.commodities;
    }
}

/// Capital-preserving asset classes
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema,
)]
#[serde(default)]
pub struct LowRisk {
    pub cash: f64,
    pub savings: f64,
    pub time_deposits: f64,
    pub government_bonds: f64,
    pub corporate_bonds: f64,
    pub pension: f64,
    pub insurance: f64,
    pub gold: f64,
    pub mmf: f64,
}

impl LowRisk {
    /// Field name/value pairs, in declaration order
    pub fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("cash", self.cash),
            ("savings", self.savings),
            ("time_deposits", self.time_deposits),
            ("government_bonds", self.government_bonds),
            ("corporate_bonds", self.corporate_bonds),
            ("pension", self.pension),
            ("insurance", self.insurance),
            ("gold", self.gold),
            ("mmf", self.mmf),
        ]
    }

    /// Sum of all nine fields
    pub fn total(&self) -> f64 {
        self.fields().iter().map(|(_, v)| v).sum()
    }

    /// Accumulate another breakdown into this one (chart date merging)
    pub fn add(&mut self, other: &Self) {
        self.cash += other.cash;
        self.savings += other.savings;
        self.time_deposits += other.time_deposits;
        self.government_bonds += other.government_bonds;
        self.corporate_bonds += other.corporate_bonds;
        self.pension += other.pension;
        self.insurance += other.insurance;
        self.gold += other.gold;
        self.mmf += other.mmf;
    }
}

/// Whether an amount is a valid currency value: finite, non-negative, and at
/// most two decimal places.
pub fn is_valid_amount(value: f64) -> bool {
    if !value.is_finite() || value < 0.0 {
        return false;
    }
    let cents = value * 100.0;
    (cents - cents.round()).abs() < 1e-6
}

/// Validate both breakdowns, returning one message per offending field.
pub fn invalid_amount_fields(high_medium: &HighMediumRisk, low: &LowRisk) -> Vec<String> {
    let mut errors = Vec::new();
    for (name, value) in high_medium.fields().iter().chain(low.fields().iter()) {
        if !is_valid_amount(*value) {
            errors.push(format!(
                "{}: must be a non-negative amount with at most 2 decimal places",
                name
            ));
        }
    }
    errors
}
