//! Handler functions for the drink ordering API.
//!
//! Guarded handlers receive the caller's decoded `Claims` from the auth layer
//! as an extra argument; the permission check has already passed by the time
//! they run.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::Claims;
use crate::database::{Drink, DrinkSummary, RecipePart};
use crate::errors::ApiError;
use crate::AppState;

/// A recipe may be posted as a single part or as a list of parts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    One(RecipePart),
    Many(Vec<RecipePart>),
}

impl RecipeInput {
    fn into_parts(self) -> Vec<RecipePart> {
        match self {
            RecipeInput::One(part) => vec![part],
            RecipeInput::Many(parts) => parts,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewDrink {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Deserialize)]
pub struct DrinkUpdate {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    fn new(drinks: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            drinks,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: u64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `GET /drinks`, public.
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkSummary>>, ApiError> {
    let drinks = state.drinks.list().await;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(DrinksResponse::new(drinks.iter().map(Drink::short).collect()))
}

/// `GET /drinks-detail`, requires `get:drinks-detail`.
pub async fn get_drinks_detail(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    debug!(subject = claims.subject(), "listing drink details");

    let drinks = state.drinks.list().await;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(DrinksResponse::new(drinks))
}

/// `POST /drinks`, requires `post:drinks`.
pub async fn create_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<NewDrink>, JsonRejection>,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    let Json(body) = payload?;

    let title = non_blank(body.title);
    let recipe = body
        .recipe
        .map(RecipeInput::into_parts)
        .filter(|parts| !parts.is_empty());
    let (Some(title), Some(recipe)) = (title, recipe) else {
        return Err(ApiError::Unprocessable("Title and recipe required".to_string()));
    };

    let drink = state.drinks.insert(title, recipe).await?;
    info!(id = drink.id, subject = claims.subject(), "drink created");

    Ok(DrinksResponse::new(vec![drink]))
}

/// `PATCH /drinks/:id`, requires `patch:drinks`.
pub async fn update_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<DrinkUpdate>, JsonRejection>,
) -> Result<Json<DrinksResponse<Drink>>, ApiError> {
    let Path(id) = id?;
    let Json(body) = payload?;

    let Some(title) = non_blank(body.title) else {
        return Err(ApiError::Unprocessable("Title required".to_string()));
    };
    let recipe = body.recipe.map(RecipeInput::into_parts);

    let drink = state.drinks.update(id, title, recipe).await?;
    info!(id, subject = claims.subject(), "drink updated");

    Ok(DrinksResponse::new(vec![drink]))
}

/// `DELETE /drinks/:id`, requires `delete:drinks`.
pub async fn delete_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;

    state.drinks.delete(id).await?;
    info!(id, subject = claims.subject(), "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
