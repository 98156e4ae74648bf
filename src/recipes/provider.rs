//! Client for the third-party recipe provider (Spoonacular).
//!
//! Every call forwards the caller's query plus the API key and hands the
//! provider's JSON back untouched. Failures carry a message that never
//! includes the request URL, since the URL holds the API key.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ProviderConfig;

/// Results per search call.
pub const PAGE_SIZE: u32 = 10;

#[async_trait]
pub trait RecipeProvider: Send + Sync {
    async fn search_by_ingredients(&self, ingredients: &str) -> anyhow::Result<Value>;
    async fn search_by_calories(&self, max_calories: f64) -> anyhow::Result<Value>;
    async fn recipe_detail(&self, recipe_id: i64) -> anyhow::Result<Value>;
}

#[derive(Clone)]
pub struct SpoonacularClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl SpoonacularClient {
    pub fn new(cfg: &ProviderConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build provider http client")?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            http,
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("recipe provider unreachable: {}", e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            debug!(%status, %body, "provider error body");
            anyhow::bail!("recipe provider responded with {}", status);
        }

        res.json::<Value>()
            .await
            .map_err(|e| anyhow::anyhow!("invalid provider response: {}", e.without_url()))
    }
}

#[async_trait]
impl RecipeProvider for SpoonacularClient {
    #[instrument(skip(self))]
    async fn search_by_ingredients(&self, ingredients: &str) -> anyhow::Result<Value> {
        self.get_json(
            "/recipes/findByIngredients",
            &[
                ("ingredients", ingredients.to_string()),
                ("number", PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn search_by_calories(&self, max_calories: f64) -> anyhow::Result<Value> {
        self.get_json(
            "/recipes/findByNutrients",
            &[
                ("maxCalories", max_calories.to_string()),
                ("number", PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn recipe_detail(&self, recipe_id: i64) -> anyhow::Result<Value> {
        self.get_json(
            &format!("/recipes/{}/information", recipe_id),
            &[("includeNutrition", "true".to_string())],
        )
        .await
    }
}
