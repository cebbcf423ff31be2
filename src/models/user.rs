//! User profile model and authentication payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Account role slug (string identifier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Librarian,
    // Legacy backends report plain members as "user".
    #[serde(alias = "user")]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Librarian => "librarian",
            Role::Member => "member",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "librarian" => Ok(Role::Librarian),
            "member" | "user" => Ok(Role::Member),
            _ => Err(format!("Invalid role slug: {}", s)),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or(Role::Member)
    }
}

/// User profile as returned by the backend.
///
/// The authoritative copy is always the last server response; the session
/// store only mirrors it as a cache for instant restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Response shape of the login and register endpoints.
///
/// These two endpoints return the user and token bare, without the
/// `{success, data}` envelope the resource endpoints use. Registration may
/// omit the token when the backend defers session creation to a login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: Profile,
    #[serde(default)]
    pub token: Option<String>,
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

/// Registration request.
///
/// Validated client-side before any network call as a fast-fail UX path;
/// the backend re-validates authoritatively. `terms` is a local-only gate
/// and is never sent.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
    #[serde(skip_serializing)]
    #[validate(custom(function = "validate_terms_accepted"))]
    pub terms: bool,
}

fn validate_terms_accepted(accepted: &bool) -> Result<(), ValidationError> {
    if *accepted {
        Ok(())
    } else {
        let mut err = ValidationError::new("terms");
        err.message = Some("You must accept the terms and conditions".into());
        Err(err)
    }
}

/// Update own profile request (for authenticated users)
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Current password (required by the backend to change password)
    pub current_password: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Create user request (admin only)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateAdminUser {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

/// Update user request (admin only)
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateAdminUser {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}
