//! Generic data models for the `adapters` crate.
//!
//! These models define the key material handed to the authorization guard,
//! independent of whether it came from a published JWKS document or a
//! locally configured shared secret.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey};

/// A verification key the guard is allowed to trust.
#[derive(Clone)]
pub struct TrustedKey {
    pub kid: String,
    pub algorithm: Algorithm,
    pub key: DecodingKey,
}

// DecodingKey carries raw key material; keep it out of debug output.
impl fmt::Debug for TrustedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustedKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySourceKind {
    Jwks,
    SharedSecret,
}

impl fmt::Display for KeySourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySourceKind::Jwks => f.write_str("jwks"),
            KeySourceKind::SharedSecret => f.write_str("shared-secret"),
        }
    }
}

/// Returns true for the HMAC family of algorithms.
pub fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}
