use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::recipes::repo_types::{RecipeRow, SaveOutcome, SavedRecipeRow};

#[async_trait]
pub trait SavedRecipeRepo: Send + Sync {
    /// Refreshes the shared recipe copy and links it to the user.
    async fn save(&self, user_id: Uuid, recipe: RecipeRow) -> anyhow::Result<SaveOutcome>;

    /// The user's saved recipes, newest save first.
    async fn list_saved(&self, user_id: Uuid) -> anyhow::Result<Vec<SavedRecipeRow>>;
}

#[derive(Clone)]
pub struct PgSavedRecipeRepo {
    db: PgPool,
}

impl PgSavedRecipeRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Insert the recipe, or overwrite every field of the existing copy.
async fn upsert_recipe_tx(
    tx: &mut Transaction<'_, Postgres>,
    recipe: &RecipeRow,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO recipes (recipe_id, recipe_name, image, ingredients, nutrition_info, calories)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (recipe_id)
        DO UPDATE SET
            recipe_name = EXCLUDED.recipe_name,
            image = EXCLUDED.image,
            ingredients = EXCLUDED.ingredients,
            nutrition_info = EXCLUDED.nutrition_info,
            calories = EXCLUDED.calories
        "#,
    )
    .bind(recipe.recipe_id)
    .bind(&recipe.recipe_name)
    .bind(&recipe.image)
    .bind(Json(&recipe.ingredients))
    .bind(Json(&recipe.nutrition_info))
    .bind(recipe.calories)
    .execute(&mut **tx)
    .await
    .context("upsert recipe")?;
    Ok(())
}

/// Link the recipe to the user; the primary key turns a repeat into a no-op.
async fn link_recipe_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    recipe_id: i64,
) -> anyhow::Result<SaveOutcome> {
    let res = sqlx::query(
        r#"
        INSERT INTO saved_recipes (user_id, recipe_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, recipe_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(recipe_id)
    .execute(&mut **tx)
    .await
    .context("insert saved recipe")?;

    Ok(if res.rows_affected() == 0 {
        SaveOutcome::AlreadySaved
    } else {
        SaveOutcome::Saved
    })
}

#[async_trait]
impl SavedRecipeRepo for PgSavedRecipeRepo {
    async fn save(&self, user_id: Uuid, recipe: RecipeRow) -> anyhow::Result<SaveOutcome> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        upsert_recipe_tx(&mut tx, &recipe).await?;
        let outcome = link_recipe_tx(&mut tx, user_id, recipe.recipe_id).await?;
        tx.commit().await.context("commit tx")?;
        Ok(outcome)
    }

    async fn list_saved(&self, user_id: Uuid) -> anyhow::Result<Vec<SavedRecipeRow>> {
        let rows = sqlx::query_as::<_, SavedRecipeRow>(
            r#"
            SELECT r.recipe_id, r.recipe_name, r.image, r.calories,
                   r.ingredients, r.nutrition_info, s.save_date
              FROM saved_recipes s
              JOIN recipes r ON r.recipe_id = s.recipe_id
             WHERE s.user_id = $1
             ORDER BY s.save_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list saved recipes")?;
        Ok(rows)
    }
}
