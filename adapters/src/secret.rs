//! Shared-secret key source.
//!
//! For deployments where tokens are minted by a trusted internal service with
//! an HMAC secret instead of by an external identity provider. The secret is
//! bound to a single key identifier so the guard's `kid` requirement holds for
//! both kinds of source.

use std::fmt;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey};

use crate::errors::AdapterError;
use crate::models::{is_hmac, KeySourceKind, TrustedKey};
use crate::KeySource;

const HEX_PREFIX: &str = "hex:";

pub struct SharedSecretKeySource {
    kid: String,
    algorithm: Algorithm,
    key: DecodingKey,
}

impl SharedSecretKeySource {
    /// `secret` is taken as raw bytes unless it starts with `hex:`, in which
    /// case the remainder is hex-decoded.
    pub fn new(
        secret: &str,
        kid: impl Into<String>,
        algorithm: Algorithm,
    ) -> Result<Self, AdapterError> {
        if !is_hmac(algorithm) {
            return Err(AdapterError::UnsupportedAlgorithm(algorithm));
        }

        let bytes = decode_secret(secret)?;
        if bytes.is_empty() {
            return Err(AdapterError::InvalidSecret("secret is empty".to_string()));
        }

        let kid = kid.into();
        if kid.is_empty() {
            return Err(AdapterError::InvalidSecret("key id is empty".to_string()));
        }

        Ok(Self {
            kid,
            algorithm,
            key: DecodingKey::from_secret(&bytes),
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, AdapterError> {
    match secret.strip_prefix(HEX_PREFIX) {
        Some(encoded) => {
            hex::decode(encoded.trim()).map_err(|err| AdapterError::InvalidSecret(err.to_string()))
        }
        None => Ok(secret.as_bytes().to_vec()),
    }
}

impl fmt::Debug for SharedSecretKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecretKeySource")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeySource for SharedSecretKeySource {
    fn key_for(&self, kid: &str) -> Option<TrustedKey> {
        (kid == self.kid).then(|| TrustedKey {
            kid: self.kid.clone(),
            algorithm: self.algorithm,
            key: self.key.clone(),
        })
    }

    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn kind(&self) -> KeySourceKind {
        KeySourceKind::SharedSecret
    }

    async fn refresh(&self) -> Result<usize, AdapterError> {
        Ok(1)
    }
}
