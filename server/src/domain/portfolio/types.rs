//! Aggregated portfolio output types

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::types::{HighMediumRisk, LowRisk};

/// One point of the combined time series: every entry across every profile
/// sharing this calendar date, summed field by field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub total_assets: f64,
    pub total_high_medium_risk: f64,
    pub total_low_risk: f64,
    pub high_medium_risk: HighMediumRisk,
    pub low_risk: LowRisk,
}

impl ChartPoint {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_assets: 0.0,
            total_high_medium_risk: 0.0,
            total_low_risk: 0.0,
            high_medium_risk: HighMediumRisk::default(),
            low_risk: LowRisk::default(),
        }
    }
}

/// One slice of the risk distribution
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RiskSlice {
    pub name: String,
    pub value: f64,
    pub percentage: f64,
}

/// The combined view over a set of profiles
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CombinedPortfolio {
    pub chart_data: Vec<ChartPoint>,
    pub risk_distribution: Vec<RiskSlice>,
    pub total_assets: f64,
}

impl CombinedPortfolio {
    pub fn empty() -> Self {
        Self {
            chart_data: Vec::new(),
            risk_distribution: Vec::new(),
            total_assets: 0.0,
        }
    }
}
