//! Module for the drink ordering API.
//!
//! One public listing and four routes guarded by per-route permissions.

pub mod handlers;
pub mod routes;
