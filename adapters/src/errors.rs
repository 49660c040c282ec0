//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur while loading, parsing or
//! refreshing trusted signing keys, providing a unified error type for every
//! key source implementation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to read key set from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse key set: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("key {kid} is not usable: {reason}")]
    InvalidKey { kid: String, reason: String },

    #[error("key set does not contain any usable signing key")]
    EmptyKeySet,

    #[error("algorithm {0:?} is not supported by this key source")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),

    #[error("shared secret is invalid: {0}")]
    InvalidSecret(String),
}
