//! # Obras API Server Library
//!
//! HTTP surface of the marketplace: configuration, router, authentication
//! middleware and the mapping from domain errors to JSON responses.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Environment-driven configuration
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Bearer authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
