pub mod api;
pub mod cache;
pub mod error;
pub mod http;

pub use api::SavedRecipesApi;
pub use cache::{CacheConfig, SavedIdCache, SavedIds};
pub use error::SavedError;
pub use http::HttpSavedRecipesApi;
