use std::sync::Arc;

use anyhow::{Context, Result};
use recommender_saved::{HttpSavedRecipesApi, SavedIdCache};

use crate::config::SavedConfig;

/// Saved recipe ids, sorted; fails when the service cannot be reached
pub async fn fetch_ids(saved: &SavedConfig) -> Result<Vec<String>> {
    let cache_config = saved.cache_config();
    let api = HttpSavedRecipesApi::new(
        &saved.base_url,
        saved.token.clone(),
        cache_config.fetch_timeout,
    )?;
    let cache = SavedIdCache::new(Arc::new(api), cache_config);

    let ids = cache
        .try_get_ids(false)
        .await
        .with_context(|| format!("retrieving saved recipe ids from {}", saved.base_url))?;

    let mut ids: Vec<String> = ids.iter().cloned().collect();
    ids.sort();

    Ok(ids)
}

pub async fn list(saved: &SavedConfig) -> Result<()> {
    let ids = fetch_ids(saved).await?;

    tracing::info!(count = ids.len(), "Saved recipe ids retrieved");

    for id in ids {
        println!("{id}");
    }

    Ok(())
}
