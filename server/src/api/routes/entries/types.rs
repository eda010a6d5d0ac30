//! Financial entry API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::data::types::{EntryRow, HighMediumRisk, LowRisk, NewEntry};
use crate::utils::time::{parse_entry_date, timestamp_to_datetime};

/// Financial entry DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryDto {
    pub id: String,
    pub profile_id: String,
    pub entry_date: String,
    pub high_medium_risk: HighMediumRisk,
    pub low_risk: LowRisk,
    pub total_high_medium_risk: f64,
    pub total_low_risk: f64,
    pub total_assets: f64,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EntryRow> for EntryDto {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.id,
            profile_id: row.profile_id,
            entry_date: row.entry_date,
            high_medium_risk: row.high_medium_risk,
            low_risk: row.low_risk,
            total_high_medium_risk: row.total_high_medium_risk,
            total_low_risk: row.total_low_risk,
            total_assets: row.total_assets,
            created_by: row.created_by,
            created_at: timestamp_to_datetime(row.created_at),
            updated_at: timestamp_to_datetime(row.updated_at),
        }
    }
}

/// Request body for creating or updating an entry.
///
/// Totals are not accepted: the server derives them from the breakdowns no
/// matter what the caller sends (unknown JSON fields are ignored).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EntryBody {
    #[validate(custom(function = "validate_entry_date"))]
    pub entry_date: String,

    #[serde(default)]
    pub high_medium_risk: HighMediumRisk,

    #[serde(default)]
    pub low_risk: LowRisk,
}

impl EntryBody {
    pub fn into_new_entry(self) -> NewEntry {
        NewEntry {
            entry_date: self.entry_date,
            high_medium_risk: self.high_medium_risk,
            low_risk: self.low_risk,
        }
    }
}

/// Query params for listing entries
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListEntriesQuery {
    /// Inclusive lower bound (YYYY-MM-DD)
    #[validate(custom(function = "validate_entry_date"))]
    pub from: Option<String>,

    /// Inclusive upper bound (YYYY-MM-DD)
    #[validate(custom(function = "validate_entry_date"))]
    pub to: Option<String>,
}

fn validate_entry_date(date: &str) -> Result<(), ValidationError> {
    if parse_entry_date(date).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("entry_date")
            .with_message("entry_date must be a valid YYYY-MM-DD date".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_body_valid() {
        let body = EntryBody {
            entry_date: "2024-01-15".to_string(),
            high_medium_risk: HighMediumRisk::default(),
            low_risk: LowRisk::default(),
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_entry_body_rejects_bad_date() {
        let body = EntryBody {
            entry_date: "Jan 15".to_string(),
            high_medium_risk: HighMediumRisk::default(),
            low_risk: LowRisk::default(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_caller_supplied_totals_are_ignored_by_deserialization() {
        // total_assets in the payload is not a field of EntryBody
        let body: EntryBody = serde_json::from_str(
            r#"{"entry_date": "2024-01-15", "low_risk": {"cash": 100.0}, "total_assets": 999999.0}"#,
        )
        .unwrap();
        assert_eq!(body.low_risk.cash, 100.0);
    }

    #[test]
    fn test_list_query_bounds_optional() {
        let query = ListEntriesQuery {
            from: None,
            to: Some("2024-12-31".to_string()),
        };
        assert!(query.validate().is_ok());

        let bad = ListEntriesQuery {
            from: Some("yesterday".to_string()),
            to: None,
        };
        assert!(bad.validate().is_err());
    }
}
