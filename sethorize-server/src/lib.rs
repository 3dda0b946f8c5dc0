//! # Sethorize Server
//!
//! OAuth 2.0 authorization server with multi-tenant user management.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP routing and middleware
//! - **SQLx**: async PostgreSQL access
//! - **Tokio**: async runtime
//! - **Tracing**: structured logging
//!
//! Access tokens are RS256 JWTs signed with a process-local RSA key; auth
//! codes and refresh tokens travel as base64 `id:secret` composites and are
//! stored as argon2id hashes.

pub mod bootstrap;
pub mod logging;
pub mod router;
pub mod routes;

pub use router::build_router;
pub use sethorize_auth as auth;
pub use sethorize_config as config;
pub use sethorize_crypto as crypto;
pub use sethorize_db as db;
pub use sethorize_middleware as middleware;
