use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiJson, ApiQuery},
    state::AppState,
};

use super::dto::{Ack, CaloriesQuery, IngredientsQuery, SaveRecipeRequest, SavedRecipe};
use super::services;

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/ingredients", get(search_by_ingredients))
        .route("/recipes/calories", get(search_by_calories))
        .route("/recipes/:id", get(recipe_detail))
}

pub fn saved_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/save", post(save_recipe))
        .route("/recipes/saved", get(list_saved))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn search_by_ingredients(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(q): ApiQuery<IngredientsQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(
        services::search_by_ingredients(&state, &q.ingredients).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn search_by_calories(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(q): ApiQuery<CaloriesQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(
        services::search_by_calories(&state, q.max_calories).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn recipe_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(services::recipe_detail(&state, &id).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.user_id))]
pub async fn save_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<SaveRecipeRequest>,
) -> Result<Json<Ack>, ApiError> {
    Ok(Json(
        services::save_recipe(&state, user.user_id, payload.recipe).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_saved(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SavedRecipe>>, ApiError> {
    Ok(Json(services::list_saved(&state, user.user_id).await?))
}
