//! Domain logic
//!
//! - `access` - the access control engine (visibility, permission checks,
//!   approval workflow)
//! - `portfolio` - the portfolio aggregation engine (period filters,
//!   combined snapshots, merged time series)

pub mod access;
pub mod portfolio;
