//! User repository for SQLite operations
//!
//! Users are created on first authentication: the auth middleware resolves
//! the identity provider subject to a row here. The very first user ever
//! created is promoted to admin; everyone after starts pending.

use sqlx::SqlitePool;

use crate::core::constants::{LOCAL_USER_ID, ROLE_ADMIN, ROLE_PENDING};
use crate::data::sqlite::SqliteError;
use crate::data::types::UserRow;

const USER_COLUMNS: &str = "id, subject, email, role, approved_at, approved_by, created_at, updated_at";

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users WHERE id = ?",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Get a user by identity provider subject
pub async fn get_by_subject(
    pool: &SqlitePool,
    subject: &str,
) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users WHERE subject = ?",
        USER_COLUMNS
    ))
    .bind(subject)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Count all users
pub async fn count_users(pool: &SqlitePool) -> Result<u64, SqliteError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count.0 as u64)
}

/// Resolve a user by subject, creating the row on first sight.
///
/// Returns the user and whether it was created. The existence check and the
/// first-user count run in one transaction so concurrent first sign-ins
/// cannot both become admin.
pub async fn get_or_create_by_subject(
    pool: &SqlitePool,
    subject: &str,
    email: Option<&str>,
) -> Result<(UserRow, bool), SqliteError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users WHERE subject = ?",
        USER_COLUMNS
    ))
    .bind(subject)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(user) = existing {
        return Ok((user, false));
    }

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *tx)
        .await?;

    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();
    let first_user = count.0 == 0;
    let (role, approved_at) = if first_user {
        (ROLE_ADMIN, Some(now))
    } else {
        (ROLE_PENDING, None)
    };

    sqlx::query(
        "INSERT INTO users (id, subject, email, role, approved_at, approved_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, NULL, ?, ?)",
    )
    .bind(&id)
    .bind(subject)
    .bind(email)
    .bind(role)
    .bind(approved_at)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    if first_user {
        tracing::info!(%id, "First user promoted to admin");
    } else {
        tracing::info!(%id, "New user created, pending approval");
    }

    Ok((
        UserRow {
            id,
            subject: subject.to_string(),
            email: email.map(String::from),
            role: role.to_string(),
            approved_at,
            approved_by: None,
            created_at: now,
            updated_at: now,
        },
        true,
    ))
}

/// List all users ordered by creation time
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserRow>, SqliteError> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users ORDER BY created_at ASC, id ASC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Set a user's role as part of the approval workflow
pub async fn approve_user(
    pool: &SqlitePool,
    id: &str,
    role: &str,
    approved_by: &str,
) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE users SET role = ?, approved_at = ?, approved_by = ?, updated_at = ? WHERE id = ?",
    )
    .bind(role)
    .bind(now)
    .bind(approved_by)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_user(pool, id).await
}

/// Delete a user by ID (links cascade)
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Seed the local admin used in `--no-auth` mode
pub async fn ensure_local_user(pool: &SqlitePool) -> Result<UserRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT OR IGNORE INTO users (id, subject, email, role, approved_at, approved_by, created_at, updated_at) \
         VALUES (?, ?, NULL, ?, ?, NULL, ?, ?)",
    )
    .bind(LOCAL_USER_ID)
    .bind(LOCAL_USER_ID)
    .bind(ROLE_ADMIN)
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let user = get_user(pool, LOCAL_USER_ID).await?;
    user.ok_or_else(|| SqliteError::Conflict("Local user missing after seed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_first_user_becomes_admin() {
        let pool = setup_test_pool().await;

        let (user, created) = get_or_create_by_subject(&pool, "idp|alice", Some("alice@example.com"))
            .await
            .unwrap();

        assert!(created);
        assert_eq!(user.role, ROLE_ADMIN);
        assert!(user.approved_at.is_some());
    }

    #[tokio::test]
    async fn test_second_user_is_pending() {
        let pool = setup_test_pool().await;

        get_or_create_by_subject(&pool, "idp|alice", None)
            .await
            .unwrap();
        let (user, created) = get_or_create_by_subject(&pool, "idp|bob", Some("bob@example.com"))
            .await
            .unwrap();

        assert!(created);
        assert_eq!(user.role, ROLE_PENDING);
        assert!(user.approved_at.is_none());
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let pool = setup_test_pool().await;

        let (first, _) = get_or_create_by_subject(&pool, "idp|alice", None)
            .await
            .unwrap();
        let (again, created) = get_or_create_by_subject(&pool, "idp|alice", None)
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(first.id, again.id);
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_subject() {
        let pool = setup_test_pool().await;
        get_or_create_by_subject(&pool, "idp|alice", Some("alice@example.com"))
            .await
            .unwrap();

        let user = get_by_subject(&pool, "idp|alice").await.unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));

        assert!(get_by_subject(&pool, "idp|nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_approve_user_sets_audit_fields() {
        let pool = setup_test_pool().await;
        let (admin, _) = get_or_create_by_subject(&pool, "idp|alice", None)
            .await
            .unwrap();
        let (pending, _) = get_or_create_by_subject(&pool, "idp|bob", None)
            .await
            .unwrap();

        let approved = approve_user(&pool, &pending.id, "approved", &admin.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(approved.role, "approved");
        assert!(approved.approved_at.is_some());
        assert_eq!(approved.approved_by.as_deref(), Some(admin.id.as_str()));
    }

    #[tokio::test]
    async fn test_approve_missing_user_is_none() {
        let pool = setup_test_pool().await;
        let result = approve_user(&pool, "nope", "approved", "admin").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let pool = setup_test_pool().await;
        let (user, _) = get_or_create_by_subject(&pool, "idp|alice", None)
            .await
            .unwrap();

        assert!(delete_user(&pool, &user.id).await.unwrap());
        assert!(get_user(&pool, &user.id).await.unwrap().is_none());
        assert!(!delete_user(&pool, &user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_users_ordered() {
        let pool = setup_test_pool().await;
        get_or_create_by_subject(&pool, "idp|alice", None)
            .await
            .unwrap();
        get_or_create_by_subject(&pool, "idp|bob", None)
            .await
            .unwrap();

        let users = list_users(&pool).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].subject, "idp|alice");
    }

    #[tokio::test]
    async fn test_ensure_local_user() {
        let pool = setup_test_pool().await;

        let user = ensure_local_user(&pool).await.unwrap();
        assert_eq!(user.id, LOCAL_USER_ID);
        assert_eq!(user.role, ROLE_ADMIN);

        // Idempotent
        ensure_local_user(&pool).await.unwrap();
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }
}
