use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::recipe::{Recipe, RecipeRecord};

/// Lowercased text used by relevance search, one entry per recipe
#[derive(Debug, Clone)]
pub(crate) struct SearchText {
    pub name: String,
    pub ingredients: String,
}

/// Immutable, id-ordered collection of recipes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    index: HashMap<u64, usize>,
    search_text: Vec<SearchText>,
}

impl Catalog {
    /// Build a catalog, ordering recipes by id
    pub fn from_recipes(mut recipes: Vec<Recipe>) -> CatalogResult<Self> {
        recipes.sort_by_key(|recipe| recipe.id);

        let mut index = HashMap::with_capacity(recipes.len());
        for (position, recipe) in recipes.iter().enumerate() {
            if index.insert(recipe.id, position).is_some() {
                return Err(CatalogError::DuplicateId(recipe.id));
            }
        }

        let search_text = recipes
            .iter()
            .map(|recipe| SearchText {
                name: recipe.name.to_lowercase(),
                ingredients: recipe.ingredient_text().to_lowercase(),
            })
            .collect();

        Ok(Self {
            recipes,
            index,
            search_text,
        })
    }

    /// Load a JSON array of recipe records
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let records: Vec<RecipeRecord> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), records = records.len(), "Parsed catalog records");

        let catalog = Self::from_recipes(records.into_iter().map(Recipe::from).collect())?;

        info!(path = %path.display(), recipes = catalog.len(), "Catalog loaded");

        Ok(catalog)
    }

    pub fn get(&self, id: u64) -> Option<&Recipe> {
        self.index.get(&id).map(|&position| &self.recipes[position])
    }

    /// Recipes in ascending id order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn search_text(&self) -> &[SearchText] {
        &self.search_text
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn recipe(id: u64, name: &str) -> Recipe {
        Recipe {
            id,
            name: name.to_string(),
            cook_time_minutes: 10,
            n_steps: 2,
            n_ingredients: 2,
            ingredients: vec!["water".into(), "salt".into()],
            instructions: vec!["boil".into(), "season".into()],
            cuisine: None,
            dietary_tags: BTreeSet::new(),
            avg_rating: 4.5,
            num_interactions: 5,
        }
    }

    #[test]
    fn test_from_recipes_orders_by_id() {
        let catalog =
            Catalog::from_recipes(vec![recipe(3, "c"), recipe(1, "a"), recipe(2, "b")]).unwrap();

        let ids: Vec<u64> = catalog.recipes().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.get(2).map(|r| r.name.as_str()), Some("b"));
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_from_recipes_rejects_duplicate_ids() {
        let result = Catalog::from_recipes(vec![recipe(1, "a"), recipe(1, "again")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_recipes(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }
}
