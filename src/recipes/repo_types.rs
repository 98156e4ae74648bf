use serde_json::Value;
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;

use crate::recipes::dto::{RecipePayload, SavedRecipe};

/// Row of the `recipes` cache table.
#[derive(Debug, Clone)]
pub struct RecipeRow {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub image: Option<String>,
    pub ingredients: Vec<Value>,
    pub nutrition_info: Value,
    pub calories: Option<f64>,
}

impl From<RecipePayload> for RecipeRow {
    fn from(p: RecipePayload) -> Self {
        Self {
            recipe_id: p.id,
            recipe_name: p.title,
            image: p.image,
            ingredients: p.ingredients.unwrap_or_default(),
            nutrition_info: p
                .nutrition
                .unwrap_or_else(|| Value::Object(Default::default())),
            calories: p.calories,
        }
    }
}

/// `recipes` joined with `saved_recipes`.
#[derive(Debug, FromRow)]
pub struct SavedRecipeRow {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub image: Option<String>,
    pub calories: Option<f64>,
    pub ingredients: Json<Vec<Value>>,
    pub nutrition_info: Json<Value>,
    pub save_date: OffsetDateTime,
}

impl From<SavedRecipeRow> for SavedRecipe {
    fn from(r: SavedRecipeRow) -> Self {
        Self {
            id: r.recipe_id,
            title: r.recipe_name,
            image: r.image,
            calories: r.calories,
            ingredients: r.ingredients.0,
            nutrition: r.nutrition_info.0,
            saved_at: r.save_date,
        }
    }
}

/// Result of a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}
