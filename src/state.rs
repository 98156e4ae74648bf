use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::recipes::provider::{RecipeProvider, SpoonacularClient};
use crate::recipes::repo::{PgSavedRecipeRepo, SavedRecipeRepo};

/// Everything a request handler may touch. Built once in `main` and handed
/// to the router; there is no other shared state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub recipes: Arc<dyn SavedRecipeRepo>,
    pub provider: Arc<dyn RecipeProvider>,
}

impl AppState {
    pub fn init(config: AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let provider = Arc::new(SpoonacularClient::new(&config.provider)?) as Arc<dyn RecipeProvider>;
        Ok(Self::from_parts(
            Arc::new(config),
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgSavedRecipeRepo::new(db)),
            provider,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        recipes: Arc<dyn SavedRecipeRepo>,
        provider: Arc<dyn RecipeProvider>,
    ) -> Self {
        Self {
            config,
            users,
            recipes,
            provider,
        }
    }
}
