//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted email length
pub const MAX_EMAIL_LENGTH: u64 = 255;

/// Maximum accepted username length
pub const MAX_USERNAME_LENGTH: u64 = 100;

/// Maximum length of each free-text profile field
pub const MAX_PROFILE_FIELD_LENGTH: u64 = 255;

// =============================================================================
// Pagination
// =============================================================================

/// Rows skipped when the caller gives no offset
pub const DEFAULT_SKIP: u64 = 0;

/// Rows returned when the caller gives no limit
pub const DEFAULT_LIMIT: u64 = 100;

/// Upper bound applied to caller-supplied limits
pub const MAX_LIMIT: u64 = 1000;

// =============================================================================
// Dashboard
// =============================================================================

/// System status reported when every component is healthy
pub const SYSTEM_STATUS_OPERATIONAL: &str = "operational";
