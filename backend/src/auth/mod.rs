//! Authentication module guarding routes with permission-scoped bearer tokens.
//!
//! This module provides the public interface of the authorization guard:
//! token extraction, verification against trusted keys, permission checks
//! and the route layer that composes them.

pub mod errors;
pub mod middleware;
pub mod models;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use middleware::*;
pub use models::*;
pub use service::*;
