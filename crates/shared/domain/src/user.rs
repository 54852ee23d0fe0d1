//! User record and the payload schemas that surround it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::constants::{MAX_EMAIL_LENGTH, MAX_PROFILE_FIELD_LENGTH, MAX_USERNAME_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::password::Password;

/// Stored user record, including the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Stored password as a value object for verification.
    pub fn password(&self) -> Password {
        Password::from_hash(self.hashed_password.clone())
    }
}

/// Insert record handed to the repository: password already hashed,
/// id and timestamps left to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl TryFrom<UserCreate> for NewUser {
    type Error = DomainError;

    /// Validates the payload and hashes the password.
    fn try_from(payload: UserCreate) -> DomainResult<Self> {
        payload.validate()?;
        let password = Password::new(&payload.password)?;

        Ok(Self {
            email: payload.email,
            username: payload.username,
            hashed_password: password.into_string(),
            is_active: true,
            is_admin: false,
        })
    }
}

impl TryFrom<AdminUserCreate> for NewUser {
    type Error = DomainError;

    fn try_from(payload: AdminUserCreate) -> DomainResult<Self> {
        payload.validate()?;
        let password = Password::new(&payload.password)?;

        Ok(Self {
            email: payload.email,
            username: payload.username,
            hashed_password: password.into_string(),
            is_active: payload.is_active,
            is_admin: payload.is_admin,
        })
    }
}

/// Keeps an explicit `null` apart from an absent field: absent stays `None`
/// through `#[serde(default)]`, `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Self-service payloads
// =============================================================================

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserCreate {
    #[validate(
        email(message = "Invalid email address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email is too long")
    )]
    pub email: String,
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH, message = "Username must be 1-100 characters"))]
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserUpdate {
    #[validate(
        email(message = "Invalid email address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email is too long")
    )]
    #[serde(default)]
    pub email: Option<String>,
    /// `Some(None)` clears the username.
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH, message = "Username must be 1-100 characters"))]
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub username: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.is_active.is_none()
            && self.is_admin.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserPasswordUpdate {
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// User as returned to clients (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserRead {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserRead {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// =============================================================================
// Admin payloads
// =============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminUserCreate {
    #[validate(
        email(message = "Invalid email address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email is too long")
    )]
    pub email: String,
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH, message = "Username must be 1-100 characters"))]
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminUserUpdate {
    #[validate(
        email(message = "Invalid email address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email is too long")
    )]
    #[serde(default)]
    pub email: Option<String>,
    /// `Some(None)` clears the username.
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH, message = "Username must be 1-100 characters"))]
    #[serde(default, deserialize_with = "present")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub username: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl From<AdminUserUpdate> for UserUpdate {
    fn from(update: AdminUserUpdate) -> Self {
        Self {
            email: update.email,
            username: update.username,
            is_active: update.is_active,
            is_admin: update.is_admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminUserResponse {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for AdminUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminDashboardStats {
    pub total_users: u64,
    pub total_questions: u64,
    pub total_subjects: u64,
    pub active_sessions: u64,
    pub system_status: String,
    pub recent_uploads: u64,
    pub total_course_materials: u64,
}

// =============================================================================
// Profile
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserProfile {
    #[validate(length(max = MAX_PROFILE_FIELD_LENGTH, message = "Academic level is too long"))]
    #[serde(default)]
    pub academic_level: Option<String>,
    #[validate(length(max = MAX_PROFILE_FIELD_LENGTH, message = "University is too long"))]
    #[serde(default)]
    pub university: Option<String>,
    #[validate(length(max = MAX_PROFILE_FIELD_LENGTH, message = "Degree is too long"))]
    #[serde(default)]
    pub degree: Option<String>,
    #[validate(length(max = MAX_PROFILE_FIELD_LENGTH, message = "Year is too long"))]
    #[serde(default)]
    pub year: Option<String>,
}

/// Profile updates carry the same optional fields as the profile itself.
pub type UserProfileUpdate = UserProfile;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SYSTEM_STATUS_OPERATIONAL;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "ada@example.com".to_string(),
            username: Some("ada".to_string()),
            hashed_password: "hashed".to_string(),
            is_active: true,
            is_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_create_rejects_short_password() {
        let payload = UserCreate {
            email: "ada@example.com".to_string(),
            username: None,
            password: "short".to_string(),
        };

        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("password"));
    }

    #[test]
    fn test_user_create_rejects_bad_email() {
        let payload = UserCreate {
            email: "not-an-email".to_string(),
            username: None,
            password: "long-enough".to_string(),
        };

        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("email"));
    }

    #[test]
    fn test_user_create_username_is_optional() {
        let payload: UserCreate = serde_json::from_str(
            r#"{"email": "ada@example.com", "password": "long-enough"}"#,
        )
        .unwrap();

        assert!(payload.username.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_user_update_skips_absent_fields() {
        let update: UserUpdate = serde_json::from_str(r#"{"is_active": false}"#).unwrap();

        assert_eq!(update.is_active, Some(false));
        assert!(update.email.is_none());
        assert!(update.validate().is_ok());
        assert!(!update.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_user_update_distinguishes_null_from_absent() {
        let cleared: UserUpdate = serde_json::from_str(r#"{"username": null}"#).unwrap();
        assert_eq!(cleared.username, Some(None));
        assert!(!cleared.is_empty());
        assert!(cleared.validate().is_ok());

        let renamed: UserUpdate = serde_json::from_str(r#"{"username": "ada"}"#).unwrap();
        assert_eq!(renamed.username, Some(Some("ada".to_string())));

        let untouched: UserUpdate = serde_json::from_str(r#"{"is_admin": true}"#).unwrap();
        assert_eq!(untouched.username, None);
    }

    #[test]
    fn test_user_update_rejects_empty_username() {
        let update = UserUpdate {
            username: Some(Some(String::new())),
            ..Default::default()
        };

        let err = update.validate().unwrap_err();
        assert!(err.field_errors().contains_key("username"));
    }

    #[test]
    fn test_user_update_validates_present_email() {
        let update = UserUpdate {
            email: Some("broken".to_string()),
            ..Default::default()
        };

        assert!(update.validate().is_err());
    }

    #[test]
    fn test_password_update_requires_long_new_password() {
        let payload = UserPasswordUpdate {
            current_password: "x".to_string(),
            new_password: "1234567".to_string(),
        };

        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("new_password"));
        assert!(!err.field_errors().contains_key("current_password"));
    }

    #[test]
    fn test_admin_create_defaults() {
        let payload: AdminUserCreate = serde_json::from_str(
            r#"{"email": "root@example.com", "password": "long-enough"}"#,
        )
        .unwrap();

        assert!(!payload.is_admin);
        assert!(payload.is_active);
    }

    #[test]
    fn test_new_user_from_create_hashes_password() {
        let payload = UserCreate {
            email: "ada@example.com".to_string(),
            username: Some("ada".to_string()),
            password: "long-enough".to_string(),
        };

        let new_user = NewUser::try_from(payload).unwrap();

        assert_ne!(new_user.hashed_password, "long-enough");
        assert!(Password::from_hash(new_user.hashed_password).verify("long-enough"));
        assert!(new_user.is_active);
        assert!(!new_user.is_admin);
    }

    #[test]
    fn test_new_user_from_admin_create_keeps_flags() {
        let payload = AdminUserCreate {
            email: "root@example.com".to_string(),
            username: None,
            password: "long-enough".to_string(),
            is_admin: true,
            is_active: false,
        };

        let new_user = NewUser::try_from(payload).unwrap();
        assert!(new_user.is_admin);
        assert!(!new_user.is_active);
    }

    #[test]
    fn test_new_user_from_invalid_payload_is_validation_error() {
        let payload = UserCreate {
            email: "ada@example.com".to_string(),
            username: None,
            password: "short".to_string(),
        };

        let err = NewUser::try_from(payload).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_user_read_hides_password_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("hashed_password").is_none());

        let read = UserRead::from(sample_user());
        assert_eq!(read.id, 7);
        assert_eq!(read.username.as_deref(), Some("ada"));
    }

    #[test]
    fn test_admin_update_converts_to_user_update() {
        let update = UserUpdate::from(AdminUserUpdate {
            is_admin: Some(true),
            ..Default::default()
        });

        assert_eq!(update.is_admin, Some(true));
        assert!(update.email.is_none());

        let admin: AdminUserUpdate = serde_json::from_str(r#"{"username": null}"#).unwrap();
        assert_eq!(UserUpdate::from(admin).username, Some(None));
    }

    #[test]
    fn test_dashboard_stats_round_trip_field_names() {
        let stats = AdminDashboardStats {
            total_users: 3,
            total_questions: 10,
            total_subjects: 2,
            active_sessions: 1,
            system_status: SYSTEM_STATUS_OPERATIONAL.to_string(),
            recent_uploads: 0,
            total_course_materials: 4,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["system_status"], "operational");
        assert_eq!(json["total_course_materials"], 4);
    }

    #[test]
    fn test_profile_update_accepts_partial_payload() {
        let update: UserProfileUpdate =
            serde_json::from_str(r#"{"university": "MIT"}"#).unwrap();

        assert_eq!(update.university.as_deref(), Some("MIT"));
        assert!(update.degree.is_none());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_profile_rejects_overlong_field() {
        let profile = UserProfile {
            university: Some("x".repeat(MAX_PROFILE_FIELD_LENGTH as usize + 1)),
            ..Default::default()
        };

        let err = profile.validate().unwrap_err();
        assert!(err.field_errors().contains_key("university"));
    }
}
