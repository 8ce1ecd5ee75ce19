/// Database plumbing: connection pool and embedded migrations
///
/// Queries themselves live in [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
