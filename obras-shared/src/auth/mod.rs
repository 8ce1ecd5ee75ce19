/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength checks
/// - [`jwt`]: HS256 bearer token issue and validation
///
/// Resolving a token to a user lives in the marketplace service
/// (`Marketplace::verify_token`), since it needs the store.
///
/// # Example
///
/// ```no_run
/// use obras_shared::auth::password::{hash_password, verify_password};
/// use obras_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password1")?;
/// assert!(verify_password("user_password1", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4()), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
