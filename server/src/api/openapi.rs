//! OpenAPI specification endpoint

use axum::Json;
use axum::response::IntoResponse;
use utoipa::OpenApi;

use crate::api::routes::{analytics, entries, health, profiles, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Personal finance tracker"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "users", description = "Users and the approval workflow"),
        (name = "profiles", description = "Profile management"),
        (name = "entries", description = "Financial entries"),
        (name = "analytics", description = "Combined portfolio views")
    ),
    paths(
        // Health
        health::health,
        // Users
        users::get_current_user,
        users::list_users,
        users::approve_user,
        users::reject_user,
        users::replace_user_links,
        // Profiles
        profiles::list_profiles,
        profiles::create_profile,
        profiles::update_profile,
        profiles::delete_profile,
        // Entries
        entries::list_entries,
        entries::create_entry,
        entries::update_entry,
        entries::delete_entry,
        // Analytics
        analytics::get_combined,
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Folio API");
        assert!(doc.paths.paths.contains_key("/api/v1/health"));
        assert!(doc.paths.paths.contains_key("/api/v1/analytics/combined"));
    }
}
