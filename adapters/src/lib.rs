//! Core `adapters` crate for abstracting the origin of trusted signing keys.
//!
//! This crate defines the `KeySource` trait, which outlines how the
//! authorization guard looks up the key that verifies a bearer token, and
//! provides the concrete implementations (JWKS document, shared secret).

pub mod errors;
pub mod jwks;
pub mod models;
pub mod secret;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;

pub use errors::AdapterError;
pub use jwks::JwksKeySource;
pub use models::{KeySourceKind, TrustedKey};
pub use secret::SharedSecretKeySource;

#[async_trait]
pub trait KeySource: Send + Sync {
    /// Looks up the key registered under `kid`. Called on the request path,
    /// so implementations must not block on I/O.
    fn key_for(&self, kid: &str) -> Option<TrustedKey>;

    /// The algorithm tokens are expected to be signed with.
    fn algorithm(&self) -> Algorithm;

    fn kind(&self) -> KeySourceKind;

    /// Reloads the key set from its origin and returns how many keys are
    /// trusted afterwards. On failure the previous key set stays in place.
    async fn refresh(&self) -> Result<usize, AdapterError>;
}
