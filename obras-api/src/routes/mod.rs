/// API route handlers, one module per resource
///
/// - `health`: liveness and storage connectivity
/// - `auth`: registration, login and current identity
/// - `projects`: project creation, listing, quotes and completion
/// - `quotes`: quote submission, acceptance and the provider's own quotes
/// - `users`: provider directory
/// - `reviews`: review submission

pub mod auth;
pub mod health;
pub mod projects;
pub mod quotes;
pub mod reviews;
pub mod users;
