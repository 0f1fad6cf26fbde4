use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::recipe::Recipe;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

const NAME_MATCH_SCORE: u8 = 2;
const INGREDIENT_MATCH_SCORE: u8 = 1;

/// Free-text search request with optional filters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub page: usize,
    pub page_size: usize,
    pub cuisine: Option<String>,
    pub dietary_tags: Vec<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            cuisine: None,
            dietary_tags: Vec::new(),
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn dietary_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dietary_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    fn validate(&self) -> CatalogResult<()> {
        if self.page < 1 {
            return Err(CatalogError::InvalidSearchParameter(
                "page must be at least 1".to_string(),
            ));
        }

        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(CatalogError::InvalidSearchParameter(format!(
                "page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub recipe: &'a Recipe,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<'a> {
    pub hits: Vec<SearchHit<'a>>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

impl<'a> SearchPage<'a> {
    fn empty(query: &SearchQuery) -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            page: query.page,
            page_size: query.page_size,
            has_more: false,
        }
    }
}

impl Catalog {
    /// Relevance search over recipe names and ingredient text
    ///
    /// Name matches score 2, ingredient matches 1, both 3. Filters narrow the
    /// candidates before `total` is counted. Hits are ordered by score, then id.
    pub fn search(&self, query: &SearchQuery) -> CatalogResult<SearchPage<'_>> {
        query.validate()?;

        let needle = query.text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(SearchPage::empty(query));
        }

        let cuisine = query
            .cuisine
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);
        let dietary: Vec<String> = query
            .dietary_tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        let mut hits: Vec<SearchHit<'_>> = self
            .recipes()
            .iter()
            .zip(self.search_text())
            .filter(|(recipe, _)| matches_cuisine(recipe, cuisine.as_deref()))
            .filter(|(recipe, _)| matches_dietary(recipe, &dietary))
            .filter_map(|(recipe, text)| {
                let mut score = 0;
                if text.name.contains(&needle) {
                    score += NAME_MATCH_SCORE;
                }
                if text.ingredients.contains(&needle) {
                    score += INGREDIENT_MATCH_SCORE;
                }
                (score > 0).then_some(SearchHit { recipe, score })
            })
            .collect();

        hits.sort_by(|a, b| b.score.cmp(&a.score).then(a.recipe.id.cmp(&b.recipe.id)));

        let total = hits.len();
        let start = (query.page - 1).saturating_mul(query.page_size);
        let hits: Vec<SearchHit<'_>> = hits.into_iter().skip(start).take(query.page_size).collect();

        Ok(SearchPage {
            hits,
            total,
            page: query.page,
            page_size: query.page_size,
            has_more: query.page.saturating_mul(query.page_size) < total,
        })
    }
}

fn matches_cuisine(recipe: &Recipe, cuisine: Option<&str>) -> bool {
    match cuisine {
        None => true,
        Some(wanted) => recipe
            .cuisine
            .as_deref()
            .is_some_and(|c| c.trim().to_lowercase() == wanted),
    }
}

fn matches_dietary(recipe: &Recipe, wanted: &[String]) -> bool {
    if wanted.is_empty() {
        return true;
    }

    recipe
        .dietary_tags
        .iter()
        .any(|tag| wanted.contains(&tag.to_lowercase()))
}
