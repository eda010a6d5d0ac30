//! Analytics API types

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Query params for the combined portfolio view
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CombinedQuery {
    /// One of: 30days, 3months, 1year, 3years, 5years, 10years
    #[validate(length(min = 1, message = "period is required"))]
    pub period: String,

    /// Optional comma-separated profile ids; intersected with the caller's
    /// visible set
    pub profile_ids: Option<String>,
}

impl CombinedQuery {
    /// Split the optional id list, dropping empty segments
    pub fn requested_profile_ids(&self) -> Option<Vec<String>> {
        self.profile_ids.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}
