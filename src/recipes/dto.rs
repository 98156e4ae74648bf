use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct IngredientsQuery {
    #[serde(default)]
    pub ingredients: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaloriesQuery {
    pub max_calories: f64,
}

/// Recipe as the client posts it, usually a card from a search result.
/// Unknown fields are ignored; absent or null blobs are stored empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipePayload {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<Value>>,
    #[serde(default)]
    pub nutrition: Option<Value>,
    #[serde(default)]
    pub calories: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRecipeRequest {
    pub recipe: RecipePayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

/// One entry of the saved-recipes list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub calories: Option<f64>,
    pub ingredients: Vec<Value>,
    pub nutrition: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
}
