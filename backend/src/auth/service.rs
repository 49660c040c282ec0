//! Core token verification logic for the authorization guard.
//!
//! `TokenVerifier` decodes a bearer token, selects the trusted key named by
//! its `kid`, checks the signature and the registered claims, and returns the
//! typed payload. It performs no I/O: keys are read from the shared
//! `KeySource`, which is refreshed out of band.

use std::fmt;
use std::sync::Arc;

use barista_adapters::KeySource;
use jsonwebtoken::{decode, decode_header, Validation};
use tracing::debug;

use super::errors::AuthError;
use super::models::Claims;

pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl TokenVerifier {
    /// Tokens must be signed with the key source's algorithm, name `audience`
    /// and, when given, come from `issuer`. Expiry is checked without leeway.
    pub fn new(keys: Arc<dyn KeySource>, audience: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(keys.algorithm());
        validation.leeway = 0;

        // Replaces the whole required set, so it must list every claim the
        // checks below rely on being present.
        let mut required = vec!["exp", "aud"];
        if issuer.is_some() {
            required.push("iss");
        }
        validation.set_required_spec_claims(&required);

        validation.set_audience(&[audience]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self { keys, validation }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|err| {
            debug!(error = %err, "bearer token header could not be decoded");
            AuthError::Malformed
        })?;

        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let trusted = self.keys.key_for(&kid).ok_or_else(|| {
            debug!(kid = %kid, "bearer token names an unknown key");
            AuthError::UnknownKey
        })?;

        let data = decode::<Claims>(token, &trusted.key, &self.validation).map_err(|err| {
            debug!(kid = %kid, error = %err, "bearer token rejected");
            AuthError::from_jwt(&err)
        })?;

        Ok(data.claims)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("key_source", &self.keys.kind())
            .field("algorithm", &self.keys.algorithm())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barista_adapters::SharedSecretKeySource;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "barista-unit-secret";

    fn now() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    fn verifier() -> TokenVerifier {
        let keys = SharedSecretKeySource::new(SECRET, "unit", Algorithm::HS256).unwrap();
        TokenVerifier::new(Arc::new(keys), "drinks", Some("https://barista.example/"))
    }

    fn sign(kid: Option<&str>, secret: &str, claims: serde_json::Value) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = kid.map(str::to_string);
        encode(&header, &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims(exp: u64) -> serde_json::Value {
        json!({
            "sub": "barista",
            "aud": "drinks",
            "iss": "https://barista.example/",
            "exp": exp,
            "permissions": ["get:drinks-detail"]
        })
    }

    #[test]
    fn accepts_a_well_formed_token() {
        let token = sign(Some("unit"), SECRET, claims(now() + 600));
        let decoded = verifier().verify(&token).unwrap();
        assert_eq!(decoded.sub.as_deref(), Some("barista"));
        assert!(decoded.has_permission("get:drinks-detail"));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(verifier().verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(verifier().verify("a.b.c"), Err(AuthError::Malformed));
    }

    #[test]
    fn kid_is_required_and_must_be_known() {
        let token = sign(None, SECRET, claims(now() + 600));
        assert_eq!(verifier().verify(&token), Err(AuthError::MissingKeyId));

        let token = sign(Some("elsewhere"), SECRET, claims(now() + 600));
        assert_eq!(verifier().verify(&token), Err(AuthError::UnknownKey));
    }

    #[test]
    fn wrong_secret_fails_the_signature() {
        let token = sign(Some("unit"), "not-the-secret", claims(now() + 600));
        assert_eq!(verifier().verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn issuer_mismatch_is_invalid_claims() {
        let mut payload = claims(now() + 600);
        payload["iss"] = json!("https://impostor.example/");
        let token = sign(Some("unit"), SECRET, payload);
        assert_eq!(verifier().verify(&token), Err(AuthError::InvalidClaims));
    }

    #[test]
    fn audience_and_issuer_must_be_present() {
        for claim in ["aud", "iss"] {
            let mut payload = claims(now() + 600);
            payload.as_object_mut().unwrap().remove(claim);
            let token = sign(Some("unit"), SECRET, payload);
            assert_eq!(verifier().verify(&token), Err(AuthError::InvalidClaims), "{}", claim);
        }
    }

    #[test]
    fn issuer_is_optional_when_not_configured() {
        let keys = SharedSecretKeySource::new(SECRET, "unit", Algorithm::HS256).unwrap();
        let verifier = TokenVerifier::new(Arc::new(keys), "drinks", None);

        let mut payload = claims(now() + 600);
        payload.as_object_mut().unwrap().remove("iss");
        let token = sign(Some("unit"), SECRET, payload);
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn missing_expiry_is_malformed() {
        let mut payload = claims(0);
        payload.as_object_mut().unwrap().remove("exp");
        let token = sign(Some("unit"), SECRET, payload);
        assert_eq!(verifier().verify(&token), Err(AuthError::Malformed));
    }
}
