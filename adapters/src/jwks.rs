//! JWKS-backed key source.
//!
//! Loads the public signing keys an identity provider publishes as a JSON Web
//! Key Set. The set is indexed by key identifier and can be re-read from its
//! file while the service is running.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::errors::AdapterError;
use crate::models::{is_hmac, KeySourceKind, TrustedKey};
use crate::KeySource;

pub struct JwksKeySource {
    origin: Option<PathBuf>,
    algorithm: Algorithm,
    keys: RwLock<HashMap<String, TrustedKey>>,
}

impl JwksKeySource {
    /// Builds a key source from an in-memory JWKS document. Such a source has
    /// nothing to refresh from.
    pub fn from_json(document: &str, algorithm: Algorithm) -> Result<Self, AdapterError> {
        ensure_asymmetric(algorithm)?;
        let keys = parse_key_set(document, algorithm)?;
        Ok(Self {
            origin: None,
            algorithm,
            keys: RwLock::new(keys),
        })
    }

    pub async fn from_path(path: impl AsRef<Path>, algorithm: Algorithm) -> Result<Self, AdapterError> {
        ensure_asymmetric(algorithm)?;
        let path = path.as_ref().to_path_buf();
        let keys = load_key_set(&path, algorithm).await?;
        info!("loaded {} signing key(s) from {}", keys.len(), path.display());
        Ok(Self {
            origin: Some(path),
            algorithm,
            keys: RwLock::new(keys),
        })
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    pub fn key_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.keys.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for JwksKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwksKeySource")
            .field("origin", &self.origin)
            .field("algorithm", &self.algorithm)
            .field("key_ids", &self.key_ids())
            .finish()
    }
}

#[async_trait]
impl KeySource for JwksKeySource {
    fn key_for(&self, kid: &str) -> Option<TrustedKey> {
        self.keys.read().get(kid).cloned()
    }

    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn kind(&self) -> KeySourceKind {
        KeySourceKind::Jwks
    }

    async fn refresh(&self) -> Result<usize, AdapterError> {
        let Some(path) = &self.origin else {
            return Ok(self.len());
        };

        let keys = load_key_set(path, self.algorithm).await?;
        let count = keys.len();
        *self.keys.write() = keys;
        debug!("refreshed {} signing key(s) from {}", count, path.display());
        Ok(count)
    }
}

fn ensure_asymmetric(algorithm: Algorithm) -> Result<(), AdapterError> {
    if is_hmac(algorithm) {
        return Err(AdapterError::UnsupportedAlgorithm(algorithm));
    }
    Ok(())
}

async fn load_key_set(
    path: &Path,
    algorithm: Algorithm,
) -> Result<HashMap<String, TrustedKey>, AdapterError> {
    let document = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AdapterError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_key_set(&document, algorithm)
}

/// Parses a JWKS document into verification keys indexed by `kid`.
///
/// Keys without an identifier, or published for encryption only, are skipped.
/// Any remaining key that cannot be turned into a decoding key fails the whole
/// set, so a half-broken document never replaces a working one.
fn parse_key_set(
    document: &str,
    algorithm: Algorithm,
) -> Result<HashMap<String, TrustedKey>, AdapterError> {
    let set: JwkSet = serde_json::from_str(document)?;
    let mut keys = HashMap::with_capacity(set.keys.len());

    for jwk in &set.keys {
        let Some(kid) = jwk.common.key_id.clone() else {
            warn!("skipping JWKS entry without a key id");
            continue;
        };

        if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
            debug!("skipping encryption key {}", kid);
            continue;
        }

        let key = DecodingKey::from_jwk(jwk).map_err(|err| AdapterError::InvalidKey {
            kid: kid.clone(),
            reason: err.to_string(),
        })?;

        keys.insert(
            kid.clone(),
            TrustedKey {
                kid,
                algorithm,
                key,
            },
        );
    }

    if keys.is_empty() {
        return Err(AdapterError::EmptyKeySet);
    }

    Ok(keys)
}
