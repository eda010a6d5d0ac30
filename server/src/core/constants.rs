// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Folio";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "folio";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".folio";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "folio.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FOLIO_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "FOLIO_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "FOLIO_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FOLIO_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "FOLIO_DATA_DIR";

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "FOLIO_DEBUG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5870;

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the bearer-token verification secret (HS256).
/// Token issuance belongs to the external identity provider; this server
/// only verifies.
pub const ENV_AUTH_SECRET: &str = "FOLIO_AUTH_SECRET";

/// Environment variable to disable authentication (local mode)
pub const ENV_NO_AUTH: &str = "FOLIO_NO_AUTH";

/// Principal ID used in `--no-auth` local mode (seeded as admin)
pub const LOCAL_USER_ID: &str = "local";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "folio.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Roles & Permissions
// =============================================================================

/// User role: full control, sees every profile, runs the approval workflow
pub const ROLE_ADMIN: &str = "admin";

/// User role: approved user, access via profile links only
pub const ROLE_APPROVED: &str = "approved";

/// User role: awaiting admin approval, no data access
pub const ROLE_PENDING: &str = "pending";

/// User role: rejected by an admin, no data access
pub const ROLE_REJECTED: &str = "rejected";

/// Profile link permission: read entries only
pub const PERMISSION_READ: &str = "read";

/// Profile link permission: read plus insert/update/delete entries
pub const PERMISSION_EDIT: &str = "edit";

// =============================================================================
// Entries & Aggregation
// =============================================================================

/// Canonical entry date format (date-only, no timezone)
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Absolute tolerance for totals cross-checks, in currency minor units.
/// Matches a 2-decimal minor unit; currencies with other scales can pass a
/// different value to the aggregation entry points.
pub const TOTALS_TOLERANCE: f64 = 0.01;
