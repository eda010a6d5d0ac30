//! Shared row types for the transactional store

use serde::{Deserialize, Serialize};

use super::assets::{HighMediumRisk, LowRisk};

// ============================================================================
// User types
// ============================================================================

/// User row from database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    /// External identity provider subject
    pub subject: String,
    pub email: Option<String>,
    pub role: String,
    pub approved_at: Option<i64>,
    pub approved_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ============================================================================
// Profile types
// ============================================================================

/// Profile row from database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

// ============================================================================
// Profile link types
// ============================================================================

/// Profile link row from database: the sole grant of non-admin access
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LinkRow {
    pub id: String,
    pub user_id: String,
    pub profile_id: String,
    pub permission: String,
    pub created_at: i64,
    pub updated_at: i64,
}

// ============================================================================
// Financial entry types
// ============================================================================

/// Financial entry row: a dated snapshot of one profile's asset composition.
///
/// `entry_date` stays a string at this layer; rows with a malformed date are
/// tolerated by the aggregation engine (skipped, not errored).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EntryRow {
    pub id: String,
    pub profile_id: String,
    pub entry_date: String,
    #[sqlx(flatten)]
    pub high_medium_risk: HighMediumRisk,
    #[sqlx(flatten)]
    pub low_risk: LowRisk,
    pub total_high_medium_risk: f64,
    pub total_low_risk: f64,
    pub total_assets: f64,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Caller-supplied entry values. Totals are intentionally absent: the
/// repository derives them on every insert/update.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub entry_date: String,
    pub high_medium_risk: HighMediumRisk,
    pub low_risk: LowRisk,
}
