use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    recipes::{
        dto::{Ack, RecipePayload, SavedRecipe},
        repo_types::SaveOutcome,
    },
    state::AppState,
};

fn upstream(e: anyhow::Error) -> ApiError {
    ApiError::Upstream(format!("{:#}", e))
}

pub async fn search_by_ingredients(state: &AppState, ingredients: &str) -> Result<Value, ApiError> {
    let ingredients = ingredients.trim();
    if ingredients.is_empty() {
        return Err(ApiError::BadRequest("ingredients is required".into()));
    }
    state
        .provider
        .search_by_ingredients(ingredients)
        .await
        .map_err(upstream)
}

pub async fn search_by_calories(state: &AppState, max_calories: f64) -> Result<Value, ApiError> {
    if !max_calories.is_finite() || max_calories < 0.0 {
        return Err(ApiError::BadRequest("maxCalories must be a non-negative number".into()));
    }
    state
        .provider
        .search_by_calories(max_calories)
        .await
        .map_err(upstream)
}

pub async fn recipe_detail(state: &AppState, raw_id: &str) -> Result<Value, ApiError> {
    let recipe_id: i64 = raw_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid recipe id: {}", raw_id)))?;
    state
        .provider
        .recipe_detail(recipe_id)
        .await
        .map_err(upstream)
}

pub async fn save_recipe(
    state: &AppState,
    user_id: Uuid,
    recipe: RecipePayload,
) -> Result<Ack, ApiError> {
    if recipe.nutrition.as_ref().is_some_and(|n| !n.is_object()) {
        return Err(ApiError::BadRequest("nutrition must be an object".into()));
    }
    let recipe_id = recipe.id;
    match state.recipes.save(user_id, recipe.into()).await? {
        SaveOutcome::Saved => {
            info!(%user_id, recipe_id, "recipe saved");
            Ok(Ack {
                message: "Recipe saved successfully".into(),
            })
        }
        SaveOutcome::AlreadySaved => {
            info!(%user_id, recipe_id, "recipe already saved");
            Err(ApiError::Conflict("Recipe already saved".into()))
        }
    }
}

pub async fn list_saved(state: &AppState, user_id: Uuid) -> Result<Vec<SavedRecipe>, ApiError> {
    let rows = state.recipes.list_saved(user_id).await?;
    Ok(rows.into_iter().map(SavedRecipe::from).collect())
}
