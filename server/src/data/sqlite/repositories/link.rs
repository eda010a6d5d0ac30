//! Profile link repository for SQLite operations
//!
//! A link is the sole grant of non-admin access to a profile. Grants are
//! upserted: `(user_id, profile_id)` is unique and a second grant for the
//! same pair updates the permission in place.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::LinkRow;

const LINK_COLUMNS: &str = "id, user_id, profile_id, permission, created_at, updated_at";

/// Grant or update a user's permission on a profile
pub async fn upsert_link(
    pool: &SqlitePool,
    user_id: &str,
    profile_id: &str,
    permission: &str,
) -> Result<LinkRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO profile_links (id, user_id, profile_id, permission, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, profile_id) DO UPDATE SET
            permission = excluded.permission,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(profile_id)
    .bind(permission)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    // The conflict path keeps the original row id, so re-read
    let link = get_link_for_pair(pool, user_id, profile_id).await?;
    link.ok_or_else(|| SqliteError::Conflict("Link missing after upsert".to_string()))
}

/// Get the link for a specific (user, profile) pair
pub async fn get_link_for_pair(
    pool: &SqlitePool,
    user_id: &str,
    profile_id: &str,
) -> Result<Option<LinkRow>, SqliteError> {
    let row = sqlx::query_as::<_, LinkRow>(&format!(
        "SELECT {} FROM profile_links WHERE user_id = ? AND profile_id = ?",
        LINK_COLUMNS
    ))
    .bind(user_id)
    .bind(profile_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List all links granted to a user
pub async fn list_links_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<LinkRow>, SqliteError> {
    let rows = sqlx::query_as::<_, LinkRow>(&format!(
        "SELECT {} FROM profile_links WHERE user_id = ? ORDER BY created_at ASC, id ASC",
        LINK_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List all links on a profile
pub async fn list_links_for_profile(
    pool: &SqlitePool,
    profile_id: &str,
) -> Result<Vec<LinkRow>, SqliteError> {
    let rows = sqlx::query_as::<_, LinkRow>(&format!(
        "SELECT {} FROM profile_links WHERE profile_id = ? ORDER BY created_at ASC, id ASC",
        LINK_COLUMNS
    ))
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List every link (for admin user listings)
pub async fn list_all_links(pool: &SqlitePool) -> Result<Vec<LinkRow>, SqliteError> {
    let rows = sqlx::query_as::<_, LinkRow>(&format!(
        "SELECT {} FROM profile_links ORDER BY created_at ASC, id ASC",
        LINK_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete a link by ID
pub async fn delete_link(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM profile_links WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Replace a user's entire grant set in one transaction
pub async fn replace_links_for_user(
    pool: &SqlitePool,
    user_id: &str,
    grants: &[(String, String)],
) -> Result<Vec<LinkRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM profile_links WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (profile_id, permission) in grants {
        sqlx::query(
            "INSERT INTO profile_links (id, user_id, profile_id, permission, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(user_id, profile_id) DO UPDATE SET \
                 permission = excluded.permission, updated_at = excluded.updated_at",
        )
        .bind(cuid2::create_id())
        .bind(user_id)
        .bind(profile_id)
        .bind(permission)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    list_links_for_user(pool, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{profile, user};

    async fn setup() -> (SqlitePool, String, String) {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();

        let (owner, _) = user::get_or_create_by_subject(&pool, "idp|alice", None)
            .await
            .unwrap();
        let p = profile::create_profile(&pool, "Family").await.unwrap();
        (pool, owner.id, p.id)
    }

    #[tokio::test]
    async fn test_upsert_creates_link() {
        let (pool, user_id, profile_id) = setup().await;

        let link = upsert_link(&pool, &user_id, &profile_id, "read")
            .await
            .unwrap();
        assert_eq!(link.permission, "read");
        assert_eq!(link.user_id, user_id);
    }

    #[tokio::test]
    async fn test_upsert_updates_permission_in_place() {
        let (pool, user_id, profile_id) = setup().await;

        let first = upsert_link(&pool, &user_id, &profile_id, "read")
            .await
            .unwrap();
        let second = upsert_link(&pool, &user_id, &profile_id, "edit")
            .await
            .unwrap();

        // Same row, new permission: the pair is unique
        assert_eq!(first.id, second.id);
        assert_eq!(second.permission, "edit");
        assert_eq!(
            list_links_for_user(&pool, &user_id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_list_links_for_profile() {
        let (pool, user_id, profile_id) = setup().await;
        let (bob, _) = user::get_or_create_by_subject(&pool, "idp|bob", None)
            .await
            .unwrap();

        upsert_link(&pool, &user_id, &profile_id, "edit")
            .await
            .unwrap();
        upsert_link(&pool, &bob.id, &profile_id, "read")
            .await
            .unwrap();

        let links = list_links_for_profile(&pool, &profile_id).await.unwrap();
        assert_eq!(links.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_link() {
        let (pool, user_id, profile_id) = setup().await;
        let link = upsert_link(&pool, &user_id, &profile_id, "read")
            .await
            .unwrap();

        assert!(delete_link(&pool, &link.id).await.unwrap());
        assert!(get_link_for_pair(&pool, &user_id, &profile_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_replace_links_for_user() {
        let (pool, user_id, profile_id) = setup().await;
        let other = profile::create_profile(&pool, "Other").await.unwrap();
        upsert_link(&pool, &user_id, &profile_id, "edit")
            .await
            .unwrap();

        let links = replace_links_for_user(
            &pool,
            &user_id,
            &[(other.id.clone(), "read".to_string())],
        )
        .await
        .unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].profile_id, other.id);
        assert_eq!(links[0].permission, "read");
    }

    #[tokio::test]
    async fn test_replace_links_with_empty_set_revokes_all() {
        let (pool, user_id, profile_id) = setup().await;
        upsert_link(&pool, &user_id, &profile_id, "edit")
            .await
            .unwrap();

        let links = replace_links_for_user(&pool, &user_id, &[]).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_links() {
        let (pool, user_id, profile_id) = setup().await;
        upsert_link(&pool, &user_id, &profile_id, "edit")
            .await
            .unwrap();

        user::delete_user(&pool, &user_id).await.unwrap();
        assert!(list_links_for_profile(&pool, &profile_id)
            .await
            .unwrap()
            .is_empty());
    }
}
