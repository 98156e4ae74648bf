use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::warn;

use crate::auth::dto::{AuthResponse, MeResponse};
use crate::recipes::dto::{Ack, SavedRecipe};

use super::error::ClientError;
use super::session::{Session, SessionStore};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// HTTP client for the recipebox API. Restores the stored session on
/// construction and sends its token with every request.
pub struct RecipeboxClient {
    http: Client,
    base_url: String,
    store: SessionStore,
    session: Option<Session>,
}

impl RecipeboxClient {
    pub fn new(base_url: &str, store: SessionStore) -> Result<Self, ClientError> {
        let session = store.load();
        Ok(Self {
            http: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(s) => req.header(AUTHORIZATION, format!("Bearer {}", s.token)),
            None => req,
        }
    }

    fn require_session(&self) -> Result<(), ClientError> {
        self.session.as_ref().map(|_| ()).ok_or(ClientError::NotLoggedIn)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let res = self.authed(req).send().await?;
        Ok(read_json(res).await?)
    }

    fn remember(&mut self, auth: AuthResponse) -> Result<&Session, ClientError> {
        let session = Session::from(auth);
        self.store.save(&session)?;
        Ok(self.session.insert(session))
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<&Session, ClientError> {
        let req = self.http.post(self.url("/register")).json(&json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        let auth: AuthResponse = self.send(req).await?;
        self.remember(auth)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Session, ClientError> {
        let req = self.http.post(self.url("/login")).json(&json!({
            "username": username,
            "password": password,
        }));
        let auth: AuthResponse = self.send(req).await?;
        self.remember(auth)
    }

    /// Forgets the local session. The token itself stays valid until it expires.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session = None;
        self.store.clear()
    }

    pub async fn me(&self) -> Result<MeResponse, ClientError> {
        self.require_session()?;
        self.send(self.http.get(self.url("/me"))).await
    }

    pub async fn search_by_ingredients(&self, ingredients: &str) -> Result<Value, ClientError> {
        self.require_session()?;
        let req = self
            .http
            .get(self.url("/recipes/ingredients"))
            .query(&[("ingredients", ingredients)]);
        let cards = self.send(req).await?;
        self.remember_results(&cards);
        Ok(cards)
    }

    pub async fn search_by_calories(&self, max_calories: f64) -> Result<Value, ClientError> {
        self.require_session()?;
        let req = self
            .http
            .get(self.url("/recipes/calories"))
            .query(&[("maxCalories", max_calories)]);
        let cards = self.send(req).await?;
        self.remember_results(&cards);
        Ok(cards)
    }

    /// Keeps the cards so a later save can post them as shown.
    fn remember_results(&self, cards: &Value) {
        if let Err(e) = self.store.save_results(cards) {
            warn!(error = %e, "cannot cache search results");
        }
    }

    pub async fn recipe_detail(&self, recipe_id: i64) -> Result<Value, ClientError> {
        self.require_session()?;
        self.send(self.http.get(self.url(&format!("/recipes/{}", recipe_id))))
            .await
    }

    /// Saves a recipe card; returns the server's acknowledgement text.
    pub async fn save_recipe(&self, recipe: &Value) -> Result<String, ClientError> {
        self.require_session()?;
        let req = self
            .http
            .post(self.url("/recipes/save"))
            .json(&json!({ "recipe": recipe }));
        let ack: Ack = self.send(req).await?;
        Ok(ack.message)
    }

    /// Saves a recipe by id. A card from the last search is posted as is;
    /// otherwise the payload is built from the provider's detail record.
    pub async fn save_by_id(&self, recipe_id: i64) -> Result<String, ClientError> {
        self.require_session()?;
        let recipe = match self.store.find_card(recipe_id) {
            Some(card) => card,
            None => recipe_from_detail(&self.recipe_detail(recipe_id).await?),
        };
        self.save_recipe(&recipe).await
    }

    pub async fn saved_recipes(&self) -> Result<Vec<SavedRecipe>, ClientError> {
        self.require_session()?;
        self.send(self.http.get(self.url("/recipes/saved"))).await
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json::<T>().await?);
    }
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Builds the save payload for a recipe from its provider detail record.
pub fn recipe_from_detail(detail: &Value) -> Value {
    let calories = detail
        .pointer("/nutrition/nutrients")
        .and_then(Value::as_array)
        .and_then(|nutrients| {
            nutrients
                .iter()
                .find(|n| n.get("name").and_then(Value::as_str) == Some("Calories"))
        })
        .and_then(|n| n.get("amount"))
        .cloned()
        .unwrap_or(Value::Null);

    json!({
        "id": detail.get("id").cloned().unwrap_or(Value::Null),
        "title": detail.get("title").cloned().unwrap_or_else(|| json!("")),
        "image": detail.get("image").cloned().unwrap_or(Value::Null),
        "ingredients": detail
            .get("extendedIngredients")
            .filter(|v| v.is_array())
            .cloned()
            .unwrap_or_else(|| json!([])),
        "nutrition": detail
            .get("nutrition")
            .filter(|v| v.is_object())
            .cloned()
            .unwrap_or_else(|| json!({})),
        "calories": calories,
    })
}
