/// User model
///
/// Users are either clients (who post projects and accept quotes) or providers
/// (who quote on projects and get assigned to accepted work). The role is fixed
/// at registration and never changes.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('client', 'provider');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(120) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     phone VARCHAR(20) NOT NULL,
///     role user_role NOT NULL,
///     description TEXT,
///     website VARCHAR(200),
///     instagram VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::rating::RatingSummary;
use crate::models::{trimmed, trimmed_opt};

/// Marketplace role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Posts projects and accepts quotes
    Client,

    /// Submits quotes and performs accepted work
    Provider,
}

impl UserRole {
    /// Converts role to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Provider => "provider",
        }
    }

    /// Clients own projects and decide on quotes
    pub fn can_create_projects(&self) -> bool {
        matches!(self, UserRole::Client)
    }

    /// Providers bid on projects
    pub fn can_submit_quotes(&self) -> bool {
        matches!(self, UserRole::Provider)
    }
}

/// User account
///
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, stored trimmed and lowercased; unique across all users
    pub email: String,

    /// Argon2id PHC string
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Contact phone
    pub phone: String,

    /// Immutable marketplace role
    pub role: UserRole,

    /// Free-text profile description
    pub description: Option<String>,

    /// Optional website link
    pub website: Option<String>,

    /// Optional Instagram handle
    pub instagram: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Last successful authentication (None if never logged in)
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_client(&self) -> bool {
        self.role == UserRole::Client
    }

    pub fn is_provider(&self) -> bool {
        self.role == UserRole::Provider
    }
}

/// Registration input
///
/// Holds the plaintext password only until it is hashed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Contact phone
    #[validate(length(min = 1, max = 20, message = "Phone must be 1-20 characters"))]
    pub phone: String,

    /// Requested role
    #[serde(alias = "user_type")]
    pub role: UserRole,

    /// Optional profile description
    #[serde(default)]
    pub description: Option<String>,

    /// Optional website
    #[serde(default)]
    #[validate(length(max = 200, message = "Website must be at most 200 characters"))]
    pub website: Option<String>,

    /// Optional Instagram handle
    #[serde(default)]
    #[validate(length(max = 100, message = "Instagram must be at most 100 characters"))]
    pub instagram: Option<String>,
}

impl Registration {
    /// Trims text fields; the password is left untouched
    pub fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            email: trimmed(self.email),
            phone: trimmed(self.phone),
            description: trimmed_opt(self.description),
            website: trimmed_opt(self.website),
            instagram: trimmed_opt(self.instagram),
            ..self
        }
    }
}

/// Login input
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Row data for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: UserRole,
    pub description: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
}

/// Public user projection with rating aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: UserRole,
    pub description: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,

    /// Mean received rating, rounded to one decimal
    pub average_rating: f64,

    /// Number of reviews received
    pub total_reviews: i64,

    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user: &User, rating: RatingSummary) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            user_type: user.role,
            description: user.description.clone(),
            website: user.website.clone(),
            instagram: user.instagram.clone(),
            average_rating: rating.display_average(),
            total_reviews: rating.count,
            created_at: user.created_at,
        }
    }
}

/// Normalizes an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            phone: "11999990000".to_string(),
            role,
            description: None,
            website: None,
            instagram: Some("@ana".to_string()),
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Client.can_create_projects());
        assert!(!UserRole::Client.can_submit_quotes());
        assert!(UserRole::Provider.can_submit_quotes());
        assert!(!UserRole::Provider.can_create_projects());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::Client).unwrap(), "\"client\"");
        let role: UserRole = serde_json::from_str("\"provider\"").unwrap();
        assert_eq!(role, UserRole::Provider);
        assert!(serde_json::from_str::<UserRole>("\"admin\"").is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = sample_user(UserRole::Client);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_profile_rounds_average() {
        let user = sample_user(UserRole::Provider);
        let profile = UserProfile::new(&user, RatingSummary::from_ratings(&[5, 4, 4]));

        assert_eq!(profile.average_rating, 4.3);
        assert_eq!(profile.total_reviews, 3);
        assert_eq!(profile.user_type, UserRole::Provider);
    }

    #[test]
    fn test_registration_validation() {
        let valid = Registration {
            name: "Bruno".to_string(),
            email: "bruno@example.com".to_string(),
            password: "obra2024".to_string(),
            phone: "11988887777".to_string(),
            role: UserRole::Provider,
            description: None,
            website: None,
            instagram: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = Registration {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            ..valid
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_blank_name_and_phone_rejected_after_normalizing() {
        let input = Registration {
            name: "   ".to_string(),
            email: " bruno@example.com ".to_string(),
            password: " obra2024 ".to_string(),
            phone: "\t ".to_string(),
            role: UserRole::Provider,
            description: Some("  ".to_string()),
            website: None,
            instagram: Some(" @bruno ".to_string()),
        }
        .normalized();

        assert_eq!(input.email, "bruno@example.com");
        assert_eq!(input.password, " obra2024 ");
        assert_eq!(input.description, None);
        assert_eq!(input.instagram.as_deref(), Some("@bruno"));

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("phone"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
