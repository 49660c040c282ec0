//! Middleware for protecting authenticated routes and handling authorization.
//!
//! The guard runs three steps per request, in order, stopping at the first
//! failure: extract the bearer token from the `Authorization` header, verify
//! it with the `TokenVerifier`, then check the route's required permission
//! against the token's `permissions` claim. On success the decoded `Claims`
//! are placed in the request extensions, so the wrapped handler receives them
//! through `Extension<Claims>`. On failure the handler is never called and the
//! `AuthError` is rendered as the standard error envelope.
//!
//! ```ignore
//! Router::new().route(
//!     "/drinks-detail",
//!     get(get_drinks_detail).route_layer(requires_auth(verifier, "get:drinks-detail")),
//! )
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use tower::{Layer, Service};
use tracing::debug;

use super::errors::AuthError;
use super::models::Claims;
use super::service::TokenVerifier;

const BEARER: &str = "bearer";

/// Returns the raw token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::NotBearerToken)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::MissingHeader),
        [scheme, ..] if !scheme.eq_ignore_ascii_case(BEARER) => Err(AuthError::InvalidScheme),
        [_] => Err(AuthError::TokenNotFound),
        [_, token] => Ok(*token),
        _ => Err(AuthError::NotBearerToken),
    }
}

pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::MissingPermissions)?;

    if !permissions.contains(permission) {
        return Err(AuthError::PermissionDenied);
    }

    Ok(())
}

/// Runs the full guard pipeline against a set of request headers.
pub fn authorize(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
    permission: &str,
) -> Result<Claims, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = verifier.verify(token)?;
    check_permissions(permission, &claims)?;
    Ok(claims)
}

/// Builds the layer that guards a route with `permission`.
pub fn requires_auth(verifier: Arc<TokenVerifier>, permission: &'static str) -> RequireAuthLayer {
    RequireAuthLayer {
        verifier,
        permission,
    }
}

#[derive(Clone)]
pub struct RequireAuthLayer {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl<S> Layer<S> for RequireAuthLayer {
    type Service = RequireAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireAuth {
            inner,
            verifier: self.verifier.clone(),
            permission: self.permission,
        }
    }
}

#[derive(Clone)]
pub struct RequireAuth<S> {
    inner: S,
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl<S> Service<Request> for RequireAuth<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        match authorize(request.headers(), &self.verifier, self.permission) {
            Ok(claims) => {
                debug!(
                    subject = claims.subject(),
                    permission = self.permission,
                    "request authorized"
                );
                request.extensions_mut().insert(claims);

                // The clone that was polled ready is the one that must serve
                // the call.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(request).await })
            }
            Err(err) => {
                debug!(
                    code = err.code(),
                    status = err.status().as_u16(),
                    permission = self.permission,
                    "request rejected by auth guard"
                );
                Box::pin(async move { Ok(err.into_response()) })
            }
        }
    }
}
