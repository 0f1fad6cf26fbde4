use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::SavedRecipesApi;
use crate::error::SavedError;

const SAVED_RECIPES_PATH: [&str; 2] = ["api", "saved-recipes"];

#[derive(Debug, Deserialize)]
struct SavedRecipesResponse {
    #[serde(default)]
    recipes: Vec<SavedRecipeEntry>,
}

#[derive(Debug, Deserialize)]
struct SavedRecipeEntry {
    id: RecipeId,
}

/// Ids come back as strings or numbers depending on the backend
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeId {
    Number(u64),
    Text(String),
}

impl From<RecipeId> for String {
    fn from(id: RecipeId) -> Self {
        match id {
            RecipeId::Number(n) => n.to_string(),
            RecipeId::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    recipe_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the saved-recipes endpoints
#[derive(Debug, Clone)]
pub struct HttpSavedRecipesApi {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpSavedRecipesApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SavedError> {
        let base_url =
            Url::parse(base_url).map_err(|e| SavedError::InvalidUrl(format!("{base_url}: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(SavedError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn endpoint(&self, extra: Option<&str>) -> Result<Url, SavedError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SavedError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(SAVED_RECIPES_PATH)
            .extend(extra);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(response: Response) -> Result<Response, SavedError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        Err(SavedError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SavedRecipesApi for HttpSavedRecipesApi {
    async fn list_saved_ids(&self) -> Result<HashSet<String>, SavedError> {
        let url = self.endpoint(None)?;
        let response = self.authorized(self.http.get(url)).send().await?;
        let body: SavedRecipesResponse = Self::check_status(response).await?.json().await?;

        let ids: HashSet<String> = body
            .recipes
            .into_iter()
            .map(|entry| String::from(entry.id))
            .filter(|id| !id.is_empty())
            .collect();

        debug!(count = ids.len(), "Fetched saved recipe ids");

        Ok(ids)
    }

    async fn save(&self, recipe_id: &str) -> Result<(), SavedError> {
        let url = self.endpoint(None)?;
        let request = self.http.post(url).json(&SaveRequest { recipe_id });
        let response = self.authorized(request).send().await?;
        Self::check_status(response).await?;

        debug!(recipe_id, "Recipe saved");
        Ok(())
    }

    async fn remove(&self, recipe_id: &str) -> Result<(), SavedError> {
        let url = self.endpoint(Some(recipe_id))?;
        let response = self.authorized(self.http.delete(url)).send().await?;
        Self::check_status(response).await?;

        debug!(recipe_id, "Recipe removed from saved");
        Ok(())
    }
}
