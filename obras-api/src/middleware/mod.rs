/// HTTP middleware
///
/// - `auth`: resolves the bearer token to the acting user
/// - `security`: hardening response headers

pub mod auth;
pub mod security;
