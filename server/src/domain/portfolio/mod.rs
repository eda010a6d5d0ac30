//! Portfolio aggregation engine
//!
//! Pure functions from per-profile entry series to combined views. The
//! access engine owns filtering the input to visible profiles; this module
//! never sees anything the caller may not.

mod aggregate;
mod period;
mod types;

pub use aggregate::{
    HIGH_MEDIUM_RISK_LABEL, LOW_RISK_LABEL, aggregate_combined_portfolio,
    filter_combined_by_period, filter_entries_by_period, group_entries_by_profile,
};
pub use period::{InvalidTimePeriod, TimePeriod};
pub use types::{ChartPoint, CombinedPortfolio, RiskSlice};
