pub mod catalog;
pub mod error;
pub mod recipe;
pub mod search;
pub mod selection;

pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use recipe::{ListField, Recipe, RecipeRecord};
pub use search::{MAX_PAGE_SIZE, SearchHit, SearchPage, SearchQuery};
pub use selection::QualityFilter;
