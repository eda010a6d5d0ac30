//! Profile repository for SQLite operations
//!
//! Profiles have an independent lifecycle: they carry no owner column and may
//! exist with zero links. Deleting a profile cascades its links and entries.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::ProfileRow;

const PROFILE_COLUMNS: &str = "id, name, created_at, updated_at";

/// Create a new profile with a generated CUID2 ID
pub async fn create_profile(pool: &SqlitePool, name: &str) -> Result<ProfileRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query("INSERT INTO profiles (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(ProfileRow {
        id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a profile by ID
pub async fn get_profile(pool: &SqlitePool, id: &str) -> Result<Option<ProfileRow>, SqliteError> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {} FROM profiles WHERE id = ?",
        PROFILE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List all profiles ordered by creation time
pub async fn list_profiles(pool: &SqlitePool) -> Result<Vec<ProfileRow>, SqliteError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {} FROM profiles ORDER BY created_at ASC, id ASC",
        PROFILE_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List profiles matching the given IDs, in creation order
pub async fn list_profiles_by_ids(
    pool: &SqlitePool,
    ids: &[String],
) -> Result<Vec<ProfileRow>, SqliteError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM profiles WHERE id IN ({}) ORDER BY created_at ASC, id ASC",
        PROFILE_COLUMNS, placeholders
    );

    let mut query = sqlx::query_as::<_, ProfileRow>(&sql);
    for id in ids {
        query = query.bind(id);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Rename a profile
pub async fn update_profile(
    pool: &SqlitePool,
    id: &str,
    name: &str,
) -> Result<Option<ProfileRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("UPDATE profiles SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_profile(pool, id).await
}

/// Delete a profile by ID (links and entries cascade)
pub async fn delete_profile(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
