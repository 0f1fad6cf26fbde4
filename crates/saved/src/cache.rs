use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::SavedRecipesApi;
use crate::error::SavedError;

/// Snapshot of a user's saved recipe ids
pub type SavedIds = Arc<HashSet<String>>;

type SharedFetch = Shared<BoxFuture<'static, Result<SavedIds, Arc<SavedError>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a successful retrieval stays fresh
    pub ttl: Duration,
    /// Upper bound on a single retrieval
    pub fetch_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

struct CacheState {
    ids: SavedIds,
    last_updated: Option<Instant>,
    in_flight: Option<SharedFetch>,
}

impl CacheState {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.last_updated
            .is_some_and(|updated| updated.elapsed() < ttl)
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight handle when the retrieval task ends, panics included
struct InFlightGuard {
    state: Arc<Mutex<CacheState>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.state).in_flight = None;
    }
}

/// Read-through cache of saved recipe ids with request coalescing
///
/// At most one retrieval runs at a time; concurrent callers share it. The
/// retrieval runs on its own task, so a caller that gives up waiting does not
/// cancel it. Local `add`/`remove` made while a retrieval is running are
/// replaced by that retrieval's result.
#[derive(Clone)]
pub struct SavedIdCache {
    api: Arc<dyn SavedRecipesApi>,
    config: CacheConfig,
    state: Arc<Mutex<CacheState>>,
}

impl SavedIdCache {
    pub fn new(api: Arc<dyn SavedRecipesApi>, config: CacheConfig) -> Self {
        Self {
            api,
            config,
            state: Arc::new(Mutex::new(CacheState {
                ids: Arc::new(HashSet::new()),
                last_updated: None,
                in_flight: None,
            })),
        }
    }

    /// Saved ids, fetched only when stale or forced
    ///
    /// A failed retrieval yields an empty set; previously cached ids are kept
    /// and the next call retries.
    pub async fn get_ids(&self, force_refresh: bool) -> SavedIds {
        self.try_get_ids(force_refresh).await.unwrap_or_default()
    }

    /// Like `get_ids`, but surfaces a failed retrieval instead of an empty set
    pub async fn try_get_ids(&self, force_refresh: bool) -> Result<SavedIds, Arc<SavedError>> {
        let fetch = {
            let mut state = lock(&self.state);

            if !force_refresh && state.is_fresh(self.config.ttl) {
                return Ok(state.ids.clone());
            }

            match &state.in_flight {
                Some(fetch) => {
                    debug!("Joining in-flight saved ids retrieval");
                    fetch.clone()
                }
                None => self.start_fetch(&mut state),
            }
        };

        fetch.await
    }

    fn start_fetch(&self, state: &mut CacheState) -> SharedFetch {
        let api = self.api.clone();
        let shared_state = self.state.clone();
        let timeout = self.config.fetch_timeout;

        let task = tokio::spawn(async move {
            let _guard = InFlightGuard {
                state: shared_state.clone(),
            };

            let result = match tokio::time::timeout(timeout, api.list_saved_ids()).await {
                Ok(Ok(ids)) => Ok(Arc::new(ids)),
                Ok(Err(error)) => Err(Arc::new(error)),
                Err(_) => Err(Arc::new(SavedError::Timeout(timeout))),
            };

            match &result {
                Ok(ids) => {
                    let mut state = lock(&shared_state);
                    state.ids = ids.clone();
                    state.last_updated = Some(Instant::now());
                    debug!(count = ids.len(), "Saved ids refreshed");
                }
                Err(error) => warn!(%error, "Saved ids retrieval failed"),
            }

            result
        });

        let fetch = async move {
            match task.await {
                Ok(result) => result,
                Err(join_error) => Err(Arc::new(SavedError::Aborted(join_error.to_string()))),
            }
        }
        .boxed()
        .shared();

        state.in_flight = Some(fetch.clone());
        fetch
    }

    pub fn add(&self, recipe_id: impl Into<String>) {
        let mut state = lock(&self.state);
        Arc::make_mut(&mut state.ids).insert(recipe_id.into());
    }

    pub fn remove(&self, recipe_id: &str) {
        let mut state = lock(&self.state);
        Arc::make_mut(&mut state.ids).remove(recipe_id);
    }

    /// Mark stale so the next `get_ids` refetches; cached ids stay readable
    pub fn invalidate(&self) {
        lock(&self.state).last_updated = None;
    }

    /// Save through the service, then record locally
    pub async fn save(&self, recipe_id: &str) -> Result<(), SavedError> {
        self.api.save(recipe_id).await?;
        self.add(recipe_id);
        Ok(())
    }

    /// Unsave through the service, then drop locally
    pub async fn unsave(&self, recipe_id: &str) -> Result<(), SavedError> {
        self.api.remove(recipe_id).await?;
        self.remove(recipe_id);
        Ok(())
    }
}
