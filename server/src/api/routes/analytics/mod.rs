//! Analytics API endpoints
//!
//! The combined view runs the full pipeline: resolve the caller's visible
//! profiles, fetch their entries, filter by period, aggregate. Requested ids
//! outside the visible set are silently dropped, never rejected.

pub mod types;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::api::auth::Auth;
use crate::api::extractors::ValidatedQuery;
use crate::api::types::ApiError;
use crate::data::sqlite::repositories::{entry, profile};
use crate::domain::access::Visibility;
use crate::domain::portfolio::{
    CombinedPortfolio, TimePeriod, aggregate_combined_portfolio, filter_combined_by_period,
    group_entries_by_profile,
};

use types::CombinedQuery;

/// Shared state for Analytics API endpoints
#[derive(Clone)]
pub struct AnalyticsApiState {
    pub pool: SqlitePool,
    /// Totals cross-check tolerance in currency minor units
    pub totals_tolerance: f64,
}

/// Build Analytics API routes
pub fn routes(pool: SqlitePool, totals_tolerance: f64) -> Router<()> {
    let state = AnalyticsApiState {
        pool,
        totals_tolerance,
    };

    Router::new()
        .route("/combined", get(get_combined))
        .with_state(state)
}

/// Combined portfolio across the caller's visible profiles
#[utoipa::path(
    get,
    path = "/api/v1/analytics/combined",
    tag = "analytics",
    params(
        ("period" = String, Query, description = "30days | 3months | 1year | 3years | 5years | 10years"),
        ("profile_ids" = Option<String>, Query, description = "Comma-separated profile ids to restrict to")
    ),
    responses(
        (status = 200, description = "Combined snapshot, risk split, and time series", body = CombinedPortfolio),
        (status = 400, description = "Unrecognized period literal")
    )
)]
pub async fn get_combined(
    State(state): State<AnalyticsApiState>,
    auth: Auth,
    ValidatedQuery(query): ValidatedQuery<CombinedQuery>,
) -> Result<Json<CombinedPortfolio>, ApiError> {
    let period: TimePeriod = query.period.parse().map_err(|e| {
        ApiError::bad_request(
            "INVALID_TIME_PERIOD",
            format!("{}. Expected one of: 30days, 3months, 1year, 3years, 5years, 10years", e),
        )
    })?;

    let visibility = auth.engine.list_visible_profiles(auth.principal_id()).await?;
    let requested = query.requested_profile_ids();

    let profile_ids: Vec<String> = match (&visibility, requested) {
        (Visibility::All, Some(ids)) => ids,
        (Visibility::All, None) => profile::list_profiles(&state.pool)
            .await
            .map_err(ApiError::from_sqlite)?
            .into_iter()
            .map(|p| p.id)
            .collect(),
        (Visibility::Profiles(_), Some(ids)) => visibility.intersect(&ids),
        (Visibility::Profiles(set), None) => set.iter().cloned().collect(),
    };

    if profile_ids.is_empty() {
        return Ok(Json(CombinedPortfolio::empty()));
    }

    let entries = entry::list_entries_for_profiles(&state.pool, &profile_ids)
        .await
        .map_err(ApiError::from_sqlite)?;

    let grouped = group_entries_by_profile(entries);
    let filtered = filter_combined_by_period(&grouped, period, Utc::now());
    let combined = aggregate_combined_portfolio(&filtered, state.totals_tolerance);

    Ok(Json(combined))
}
