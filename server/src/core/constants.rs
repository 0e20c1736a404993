// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Ratings";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "ratings";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "ratings.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "RATINGS_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "RATINGS_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "RATINGS_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "RATINGS_LOG";

/// Environment variable for the database connection string
pub const ENV_DATABASE_URL: &str = "POSTGRES_URI";

/// Fallback environment variable for the database connection string
pub const ENV_DATABASE_URL_FALLBACK: &str = "DATABASE_URL";

/// Environment variable for the session signing secret
pub const ENV_SECRET_KEY: &str = "SERVER_SECRET_KEY";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default database used when no connection string is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite://ratings.db";

/// Graceful shutdown timeout
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Request Limits
// =============================================================================

/// Default body limit for form posts
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Sessions
// =============================================================================

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "ratings_session";

/// Flash message cookie name
pub const FLASH_COOKIE_NAME: &str = "ratings_flash";

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_DAYS: u32 = 30;

/// Flash cookies only need to survive one redirect
pub const FLASH_TTL_SECS: i64 = 60;

/// Minimum accepted length of the session signing secret
pub const MIN_SECRET_KEY_LEN: usize = 16;

// =============================================================================
// Domain Rules
// =============================================================================

/// Lowest accepted rating score
pub const MIN_SCORE: i32 = 1;

/// Highest accepted rating score
pub const MAX_SCORE: i32 = 5;

/// Display value for users registered without an email
pub const ANONYMOUS_EMAIL: &str = "Anonymous";

/// Maximum stored zipcode length
pub const MAX_ZIPCODE_LEN: usize = 15;

// =============================================================================
// Seeding
// =============================================================================

/// Default directory holding the MovieLens seed files
pub const DEFAULT_SEED_DIR: &str = "seed_data";

/// User records file name
pub const SEED_USERS_FILE: &str = "u.user";

/// Movie records file name
pub const SEED_MOVIES_FILE: &str = "u.item";

/// Rating records file name
pub const SEED_RATINGS_FILE: &str = "u.data";

/// Rows per multi-row INSERT statement during seeding
pub const SEED_INSERT_CHUNK: usize = 500;

// =============================================================================
// SQLite
// =============================================================================

/// Maximum SQLite pool connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// PostgreSQL
// =============================================================================

/// Default maximum pool connections
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default minimum pool connections
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Default pool acquire timeout
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Default statement timeout
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;
