//! # Obras Shared Library
//!
//! Domain core of the construction-services marketplace: clients post
//! projects, providers quote on them, an accepted quote moves the project
//! into progress, and both sides review each other once the work is done.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects, quotes, reviews and rating aggregates
//! - `auth`: Password hashing and bearer tokens
//! - `store`: Persistence port with PostgreSQL and in-memory adapters
//! - `services`: The `Marketplace` service implementing every user action
//! - `db`: Connection pool and migrations
//! - `error`: Domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{MarketError, MarketResult};
pub use services::Marketplace;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
