//! Defines the HTTP routes for the drink ordering API.
//!
//! Each guarded method gets its own `requires_auth` layer, so one path can mix
//! public and protected methods.

use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use super::handlers::{create_drink, delete_drink, get_drinks_detail, list_drinks, update_drink};
use crate::auth::{requires_auth, TokenVerifier};
use crate::AppState;

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

pub fn drinks_router(verifier: Arc<TokenVerifier>) -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(list_drinks)
                .merge(post(create_drink).route_layer(requires_auth(verifier.clone(), POST_DRINKS))),
        )
        .route(
            "/drinks-detail",
            get(get_drinks_detail).route_layer(requires_auth(verifier.clone(), GET_DRINKS_DETAIL)),
        )
        .route(
            "/drinks/:id",
            patch(update_drink)
                .route_layer(requires_auth(verifier.clone(), PATCH_DRINKS))
                .merge(delete(delete_drink).route_layer(requires_auth(verifier, DELETE_DRINKS))),
        )
}
