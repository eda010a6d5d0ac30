//! SQLite schema definitions
//!
//! Initial schema with all tables. No migrations needed for first version.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users (principals; role is set by the admin approval workflow)
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    subject TEXT NOT NULL UNIQUE,
    email TEXT CHECK(email IS NULL OR length(email) >= 3),
    role TEXT NOT NULL DEFAULT 'pending' CHECK(role IN ('admin', 'approved', 'pending', 'rejected')),
    approved_at INTEGER,
    approved_by TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_subject ON users(subject);
CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

-- =============================================================================
-- 2. Profiles (no owner column; access is granted purely via links)
-- =============================================================================
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 100),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- =============================================================================
-- 3. Profile links (references users + profiles)
-- =============================================================================
CREATE TABLE IF NOT EXISTS profile_links (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    profile_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    permission TEXT NOT NULL DEFAULT 'read' CHECK(permission IN ('read', 'edit')),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(user_id, profile_id)
);

CREATE INDEX IF NOT EXISTS idx_profile_links_user ON profile_links(user_id);
CREATE INDEX IF NOT EXISTS idx_profile_links_profile ON profile_links(profile_id);

-- =============================================================================
-- 4. Financial entries (one dated snapshot per profile per day)
-- =============================================================================
CREATE TABLE IF NOT EXISTS financial_entries (
    id TEXT PRIMARY KEY,
    profile_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    entry_date TEXT NOT NULL,

    -- high/medium risk breakdown
    domestic_stocks REAL NOT NULL DEFAULT 0,
    us_stocks REAL NOT NULL DEFAULT 0,
    world_stocks REAL NOT NULL DEFAULT 0,
    investment_trusts REAL NOT NULL DEFAULT 0,
    etfs REAL NOT NULL DEFAULT 0,
    reits REAL NOT NULL DEFAULT 0,
    crypto REAL NOT NULL DEFAULT 0,
    fx_deposits REAL NOT NULL DEFAULT 0,
    commodities REAL NOT NULL DEFAULT 0,

    -- low risk breakdown
    cash REAL NOT NULL DEFAULT 0,
    savings REAL NOT NULL DEFAULT 0,
    time_deposits REAL NOT NULL DEFAULT 0,
    government_bonds REAL NOT NULL DEFAULT 0,
    corporate_bonds REAL NOT NULL DEFAULT 0,
    pension REAL NOT NULL DEFAULT 0,
    insurance REAL NOT NULL DEFAULT 0,
    gold REAL NOT NULL DEFAULT 0,
    mmf REAL NOT NULL DEFAULT 0,

    -- derived totals, recomputed by the repository on every write
    total_high_medium_risk REAL NOT NULL DEFAULT 0,
    total_low_risk REAL NOT NULL DEFAULT 0,
    total_assets REAL NOT NULL DEFAULT 0,

    created_by TEXT REFERENCES users(id) ON DELETE SET NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(profile_id, entry_date)
);

CREATE INDEX IF NOT EXISTS idx_entries_profile_date ON financial_entries(profile_id, entry_date);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn test_schema_version_is_positive() {
        assert!(SCHEMA_VERSION > 0);
    }

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_schema_is_not_empty() {
        assert!(!SCHEMA.is_empty());
    }

    #[test]
    fn test_schema_contains_required_tables() {
        let required_tables = [
            "schema_version",
            "schema_migrations",
            "users",
            "profiles",
            "profile_links",
            "financial_entries",
        ];

        for table in required_tables {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)),
                "Schema missing table: {}",
                table
            );
        }
    }

    #[test]
    fn test_schema_cascades_profile_deletion() {
        // Profile deletion must take links and entries with it
        let cascades = SCHEMA
            .matches("REFERENCES profiles(id) ON DELETE CASCADE")
            .count();
        assert_eq!(cascades, 2);
    }

    #[test]
    fn test_schema_prevents_duplicate_links_and_entries() {
        assert!(SCHEMA.contains("UNIQUE(user_id, profile_id)"));
        assert!(SCHEMA.contains("UNIQUE(profile_id, entry_date)"));
    }
}
