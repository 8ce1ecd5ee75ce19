/// Identity and credentials
///
/// Registration and login both end in a [`Session`]: a freshly signed bearer
/// token plus the user's public profile. Every other operation starts from a
/// [`User`] resolved by [`Marketplace::verify_token`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use super::Marketplace;
use crate::auth::jwt::{create_token, strip_bearer, validate_token, Claims};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{MarketError, MarketResult};
use crate::models::rating::RatingSummary;
use crate::models::user::{
    normalize_email, Credentials, NewUser, Registration, User, UserProfile, UserRole,
};
use crate::store::USERS_EMAIL_KEY;

/// Authenticated session handed back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Signed bearer token
    pub token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Token lifetime in seconds
    pub expires_in: i64,

    pub user: UserProfile,
}

impl Marketplace {
    /// Creates an account and signs the new user in
    ///
    /// # Errors
    ///
    /// - `Validation` on malformed input or a weak password
    /// - `DuplicateEmail` if the normalized email is taken
    pub async fn register(&self, input: Registration) -> MarketResult<Session> {
        let input = input.normalized();
        let mut errors = input.validate().err().unwrap_or_else(ValidationErrors::new);

        if !errors.field_errors().contains_key("password") {
            if let Err(message) = validate_password_strength(&input.password) {
                let mut error = ValidationError::new("password_strength");
                error.message = Some(message.into());
                errors.add("password", error);
            }
        }

        if !errors.is_empty() {
            warn!("Registration rejected: invalid input");
            return Err(errors.into());
        }

        let email = normalize_email(&input.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            warn!("Registration rejected: email already exists");
            return Err(MarketError::DuplicateEmail);
        }

        let password_hash = hash_password(&input.password)?;

        let user = self
            .store
            .insert_user(NewUser {
                name: input.name,
                email,
                password_hash,
                phone: input.phone,
                role: input.role,
                description: input.description,
                website: input.website,
                instagram: input.instagram,
            })
            .await
            .map_err(|e| {
                if e.is_duplicate_of(USERS_EMAIL_KEY) {
                    MarketError::DuplicateEmail
                } else {
                    e.into()
                }
            })?;

        info!(user_id = %user.id, role = user.role.as_str(), "User registered");

        self.open_session(&user, RatingSummary::default())
    }

    /// Verifies credentials and records the login time
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller.
    pub async fn authenticate(&self, credentials: Credentials) -> MarketResult<Session> {
        let email = normalize_email(&credentials.email);

        let Some(mut user) = self.store.find_user_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(MarketError::InvalidCredentials);
        };

        if !verify_password(&credentials.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(MarketError::InvalidCredentials);
        }

        self.store.touch_last_login(user.id).await?;
        user.last_login_at = Some(chrono::Utc::now());

        info!(user_id = %user.id, "User logged in");

        let rating = self.store.rating_summary(user.id).await?;
        self.open_session(&user, rating)
    }

    /// Resolves a bearer token to its user
    ///
    /// Accepts the raw Authorization header value with or without the
    /// `Bearer ` prefix.
    ///
    /// # Errors
    ///
    /// - `MissingToken` if no token was presented
    /// - `InvalidToken` if it is malformed, expired, wrongly signed, or its
    ///   user no longer exists
    pub async fn verify_token(&self, token: Option<&str>) -> MarketResult<User> {
        let token = token.map(strip_bearer).unwrap_or_default();
        if token.is_empty() {
            return Err(MarketError::MissingToken);
        }

        let claims = validate_token(token, &self.jwt_secret)?;

        self.store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| MarketError::InvalidToken("User no longer exists".to_string()))
    }

    /// Profile of the authenticated user with rating aggregates
    pub async fn current_identity(&self, actor: &User) -> MarketResult<UserProfile> {
        let rating = self.store.rating_summary(actor.id).await?;
        Ok(UserProfile::new(actor, rating))
    }

    /// Every provider with rating aggregates, ordered by name
    pub async fn list_providers(&self, _actor: &User) -> MarketResult<Vec<UserProfile>> {
        let providers = self.store.list_users_by_role(UserRole::Provider).await?;

        let mut profiles = Vec::with_capacity(providers.len());
        for provider in &providers {
            let rating = self.store.rating_summary(provider.id).await?;
            profiles.push(UserProfile::new(provider, rating));
        }
        Ok(profiles)
    }

    fn open_session(&self, user: &User, rating: RatingSummary) -> MarketResult<Session> {
        let claims = Claims::with_expiration(user.id, self.token_lifetime);
        let token = create_token(&claims, &self.jwt_secret)?;

        Ok(Session {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_lifetime.num_seconds(),
            user: UserProfile::new(user, rating),
        })
    }
}
