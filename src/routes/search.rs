use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use recommender_catalog::SearchQuery;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::routes::AppState;
use crate::routes::recipes::RecipeSummary;

#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub cuisine: Option<String>,
    /// Comma separated, any-of
    pub dietary_restrictions: Option<String>,
}

impl SearchParams {
    fn to_query(&self) -> Result<SearchQuery, AppError> {
        let out_of_range = |field: &str| AppError::ValidationError(format!("{field} is out of range"));
        let mut query = SearchQuery::new(self.query.clone());

        if let Some(page) = self.page {
            query = query.page(usize::try_from(page).map_err(|_| out_of_range("page"))?);
        }
        if let Some(limit) = self.limit {
            query = query.page_size(usize::try_from(limit).map_err(|_| out_of_range("limit"))?);
        }
        if let Some(cuisine) = self.cuisine.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            query = query.cuisine(cuisine);
        }
        if let Some(restrictions) = &self.dietary_restrictions {
            query = query.dietary_tags(
                restrictions
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty()),
            );
        }

        Ok(query)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub recipe: RecipeSummary,
    pub relevance_score: u8,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub recipes: Vec<SearchResult>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

/// GET /api/search
#[tracing::instrument(skip_all)]
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;
    params.validate()?;

    let query = params.to_query()?;
    let page = state.catalog.search(&query)?;

    tracing::debug!(
        query = %query.text,
        total = page.total,
        page = page.page,
        "Search served"
    );

    Ok(Json(SearchResponse {
        recipes: page
            .hits
            .iter()
            .map(|hit| SearchResult {
                recipe: RecipeSummary::from(hit.recipe),
                relevance_score: hit.score,
            })
            .collect(),
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        has_more: page.has_more,
    }))
}
