use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::SavedError;

/// Service that owns a user's saved recipes
#[async_trait]
pub trait SavedRecipesApi: Send + Sync {
    async fn list_saved_ids(&self) -> Result<HashSet<String>, SavedError>;

    async fn save(&self, recipe_id: &str) -> Result<(), SavedError>;

    async fn remove(&self, recipe_id: &str) -> Result<(), SavedError>;
}
