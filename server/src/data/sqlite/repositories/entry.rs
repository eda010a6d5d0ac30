//! Financial entry repository for SQLite operations
//!
//! The three totals are derived columns: every insert and update recomputes
//! them from the 18 asset fields, ignoring anything the caller supplied.
//! One entry per `(profile_id, entry_date)`; collisions surface as
//! `SqliteError::Conflict`.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{EntryRow, NewEntry};

const ENTRY_COLUMNS: &str = "id, profile_id, entry_date, \
     domestic_stocks, us_stocks, world_stocks, investment_trusts, etfs, reits, crypto, fx_deposits, commodities, \
     cash, savings, time_deposits, government_bonds, corporate_bonds, pension, insurance, gold, mmf, \
     total_high_medium_risk, total_low_risk, total_assets, \
     created_by, created_at, updated_at";

/// Insert a new entry, deriving totals from the asset fields
pub async fn insert_entry(
    pool: &SqlitePool,
    profile_id: &str,
    entry: &NewEntry,
    created_by: Option<&str>,
) -> Result<EntryRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();
    let hm = &entry.high_medium_risk;
    let low = &entry.low_risk;
    let total_hm = hm.total();
    let total_low = low.total();

    let mut tx = pool.begin().await?;

    let existing: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM financial_entries WHERE profile_id = ? AND entry_date = ?",
    )
    .bind(profile_id)
    .bind(&entry.entry_date)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_some() {
        return Err(SqliteError::Conflict(format!(
            "An entry already exists for {} on {}",
            profile_id, entry.entry_date
        )));
    }

    sqlx::query(
        "INSERT INTO financial_entries (\
             id, profile_id, entry_date, \
             domestic_stocks, us_stocks, world_stocks, investment_trusts, etfs, reits, crypto, fx_deposits, commodities, \
             cash, savings, time_deposits, government_bonds, corporate_bonds, pension, insurance, gold, mmf, \
             total_high_medium_risk, total_low_risk, total_assets, \
             created_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(profile_id)
    .bind(&entry.entry_date)
    .bind(hm.domestic_stocks)
    .bind(hm.us_stocks)
    .bind(hm.world_stocks)
    .bind(hm.investment_trusts)
    .bind(hm.etfs)
    .bind(hm.reits)
    .bind(hm.crypto)
    .bind(hm.fx_deposits)
    .bind(hm.commodities)
    .bind(low.cash)
    .bind(low.savings)
    .bind(low.time_deposits)
    .bind(low.government_bonds)
    .bind(low.corporate_bonds)
    .bind(low.pension)
    .bind(low.insurance)
    .bind(low.gold)
    .bind(low.mmf)
    .bind(total_hm)
    .bind(total_low)
    .bind(total_hm + total_low)
    .bind(created_by)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(EntryRow {
        id,
        profile_id: profile_id.to_string(),
        entry_date: entry.entry_date.clone(),
        high_medium_risk: *hm,
        low_risk: *low,
        total_high_medium_risk: total_hm,
        total_low_risk: total_low,
        total_assets: total_hm + total_low,
        created_by: created_by.map(String::from),
        created_at: now,
        updated_at: now,
    })
}

/// Get a single entry, scoped to its profile
pub async fn get_entry(
    pool: &SqlitePool,
    profile_id: &str,
    entry_id: &str,
) -> Result<Option<EntryRow>, SqliteError> {
    let row = sqlx::query_as::<_, EntryRow>(&format!(
        "SELECT {} FROM financial_entries WHERE profile_id = ? AND id = ?",
        ENTRY_COLUMNS
    ))
    .bind(profile_id)
    .bind(entry_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List a profile's entries ordered by date, optionally bounded (inclusive).
/// Dates are ISO strings, so lexicographic comparison is chronological.
pub async fn list_entries(
    pool: &SqlitePool,
    profile_id: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<EntryRow>, SqliteError> {
    let mut sql = format!(
        "SELECT {} FROM financial_entries WHERE profile_id = ?",
        ENTRY_COLUMNS
    );
    if from.is_some() {
        sql.push_str(" AND entry_date >= ?");
    }
    if to.is_some() {
        sql.push_str(" AND entry_date <= ?");
    }
    sql.push_str(" ORDER BY entry_date ASC, id ASC");

    let mut query = sqlx::query_as::<_, EntryRow>(&sql).bind(profile_id);
    if let Some(from) = from {
        query = query.bind(from);
    }
    if let Some(to) = to {
        query = query.bind(to);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Fetch entries for a set of profiles (aggregation input), ordered per
/// profile by date
pub async fn list_entries_for_profiles(
    pool: &SqlitePool,
    profile_ids: &[String],
) -> Result<Vec<EntryRow>, SqliteError> {
    if profile_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; profile_ids.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM financial_entries WHERE profile_id IN ({}) ORDER BY profile_id ASC, entry_date ASC, id ASC",
        ENTRY_COLUMNS, placeholders
    );

    let mut query = sqlx::query_as::<_, EntryRow>(&sql);
    for id in profile_ids {
        query = query.bind(id);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Update an entry in place, re-deriving totals
pub async fn update_entry(
    pool: &SqlitePool,
    profile_id: &str,
    entry_id: &str,
    entry: &NewEntry,
) -> Result<Option<EntryRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let hm = &entry.high_medium_risk;
    let low = &entry.low_risk;
    let total_hm = hm.total();
    let total_low = low.total();

    let mut tx = pool.begin().await?;

    // Moving the entry onto another entry's date is a collision
    let clash: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM financial_entries WHERE profile_id = ? AND entry_date = ? AND id != ?",
    )
    .bind(profile_id)
    .bind(&entry.entry_date)
    .bind(entry_id)
    .fetch_optional(&mut *tx)
    .await?;

    if clash.is_some() {
        return Err(SqliteError::Conflict(format!(
            "An entry already exists for {} on {}",
            profile_id, entry.entry_date
        )));
    }

    let result = sqlx::query(
        "UPDATE financial_entries SET \
             entry_date = ?, \
             domestic_stocks = ?, us_stocks = ?, world_stocks = ?, investment_trusts = ?, \
             etfs = ?, reits = ?, crypto = ?, fx_deposits = ?, commodities = ?, \
             cash = ?, savings = ?, time_deposits = ?, government_bonds = ?, corporate_bonds = ?, \
             pension = ?, insurance = ?, gold = ?, mmf = ?, \
             total_high_medium_risk = ?, total_low_risk = ?, total_assets = ?, \
             updated_at = ? \
         WHERE profile_id = ? AND id = ?",
    )
    .bind(&entry.entry_date)
    .bind(hm.domestic_stocks)
    .bind(hm.us_stocks)
    .bind(hm.world_stocks)
    .bind(hm.investment_trusts)
    .bind(hm.etfs)
    .bind(hm.reits)
    .bind(hm.crypto)
    .bind(hm.fx_deposits)
    .bind(hm.commodities)
    .bind(low.cash)
    .bind(low.savings)
    .bind(low.time_deposits)
    .bind(low.government_bonds)
    .bind(low.corporate_bonds)
    .bind(low.pension)
    .bind(low.insurance)
    .bind(low.gold)
    .bind(low.mmf)
    .bind(total_hm)
    .bind(total_low)
    .bind(total_hm + total_low)
    .bind(now)
    .bind(profile_id)
    .bind(entry_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    tx.commit().await?;

    get_entry(pool, profile_id, entry_id).await
}

/// Delete an entry, scoped to its profile
pub async fn delete_entry(
    pool: &SqlitePool,
    profile_id: &str,
    entry_id: &str,
) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM financial_entries WHERE profile_id = ? AND id = ?")
        .bind(profile_id)
        .bind(entry_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::profile;
    use crate::data::types::{HighMediumRisk, LowRisk};

    async fn setup() -> (SqlitePool, String) {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        let p = profile::create_profile(&pool, "Family").await.unwrap();
        (pool, p.id)
    }

    fn sample_entry(date: &str) -> NewEntry {
        NewEntry {
            entry_date: date.to_string(),
            high_medium_risk: HighMediumRisk {
                domestic_stocks: 1000.0,
                us_stocks: 2000.0,
                crypto: 500.0,
                ..Default::default()
            },
            low_risk: LowRisk {
                cash: 3000.0,
                savings: 1500.0,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_insert_derives_totals() {
        let (pool, profile_id) = setup().await;

        let entry = insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();

        assert!((entry.total_high_medium_risk - 3500.0).abs() < 1e-9);
        assert!((entry.total_low_risk - 4500.0).abs() < 1e-9);
        assert!((entry.total_assets - 8000.0).abs() < 1e-9);
        assert!(
            (entry.total_assets - (entry.total_high_medium_risk + entry.total_low_risk)).abs()
                < 0.01
        );
    }

    #[tokio::test]
    async fn test_insert_duplicate_date_conflicts() {
        let (pool, profile_id) = setup().await;
        insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();

        let err = insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_same_date_across_profiles_is_fine() {
        let (pool, profile_id) = setup().await;
        let other = profile::create_profile(&pool, "Other").await.unwrap();

        insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();
        insert_entry(&pool, &other.id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_round_trip_preserves_breakdown() {
        let (pool, profile_id) = setup().await;
        let created = insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();

        let fetched = get_entry(&pool, &profile_id, &created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.high_medium_risk, created.high_medium_risk);
        assert_eq!(fetched.low_risk, created.low_risk);
        assert_eq!(fetched.entry_date, "2024-01-15");
    }

    #[tokio::test]
    async fn test_list_entries_ordered_and_bounded() {
        let (pool, profile_id) = setup().await;
        for date in ["2024-03-01", "2024-01-01", "2024-02-01"] {
            insert_entry(&pool, &profile_id, &sample_entry(date), None)
                .await
                .unwrap();
        }

        let all = list_entries(&pool, &profile_id, None, None).await.unwrap();
        let dates: Vec<&str> = all.iter().map(|e| e.entry_date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-02-01", "2024-03-01"]);

        let bounded = list_entries(&pool, &profile_id, Some("2024-01-15"), Some("2024-02-15"))
            .await
            .unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].entry_date, "2024-02-01");
    }

    #[tokio::test]
    async fn test_update_recomputes_totals() {
        let (pool, profile_id) = setup().await;
        let created = insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();

        let mut changed = sample_entry("2024-01-15");
        changed.low_risk.cash = 10_000.0;

        let updated = update_entry(&pool, &profile_id, &created.id, &changed)
            .await
            .unwrap()
            .unwrap();
        assert!((updated.total_low_risk - 11_500.0).abs() < 1e-9);
        assert!((updated.total_assets - 15_000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_onto_existing_date_conflicts() {
        let (pool, profile_id) = setup().await;
        insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();
        let second = insert_entry(&pool, &profile_id, &sample_entry("2024-01-16"), None)
            .await
            .unwrap();

        let err = update_entry(&pool, &profile_id, &second.id, &sample_entry("2024-01-15"))
            .await
            .unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_entry_is_none() {
        let (pool, profile_id) = setup().await;
        let result = update_entry(&pool, &profile_id, "missing", &sample_entry("2024-01-15"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_entry_is_profile_scoped() {
        let (pool, profile_id) = setup().await;
        let other = profile::create_profile(&pool, "Other").await.unwrap();
        let entry = insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();

        // Wrong profile: no-op
        assert!(!delete_entry(&pool, &other.id, &entry.id).await.unwrap());
        assert!(delete_entry(&pool, &profile_id, &entry.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_entries_for_profiles() {
        let (pool, profile_id) = setup().await;
        let other = profile::create_profile(&pool, "Other").await.unwrap();
        insert_entry(&pool, &profile_id, &sample_entry("2024-01-15"), None)
            .await
            .unwrap();
        insert_entry(&pool, &other.id, &sample_entry("2024-01-20"), None)
            .await
            .unwrap();

        let both = list_entries_for_profiles(&pool, &[profile_id.clone(), other.id.clone()])
            .await
            .unwrap();
        assert_eq!(both.len(), 2);

        let one = list_entries_for_profiles(&pool, &[other.id.clone()])
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].profile_id, other.id);

        assert!(list_entries_for_profiles(&pool, &[]).await.unwrap().is_empty());
    }
}
