//! Shared fixture: a small catalog with two obvious groups and a model trained on it

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use recipe_recommender::AppState;
use recommender_catalog::{Catalog, Recipe};
use recommender_clustering::{ClusterModel, Recommender, TrainingOptions, train};
use tower::ServiceExt;

fn recipe(
    id: u64,
    name: &str,
    minutes: u32,
    n_steps: u32,
    ingredients: &[&str],
    cuisine: Option<&str>,
    tags: &[&str],
) -> Recipe {
    Recipe {
        id,
        name: name.to_string(),
        cook_time_minutes: minutes,
        n_steps,
        n_ingredients: ingredients.len() as u32,
        ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
        instructions: (1..=n_steps).map(|s| format!("Step {}", s)).collect(),
        cuisine: cuisine.map(str::to_string),
        dietary_tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        avg_rating: 4.5,
        num_interactions: 12,
    }
}

fn pantry(extra: &[&'static str], count: usize) -> Vec<&'static str> {
    const STAPLES: [&str; 12] = [
        "1 onion (diced)",
        "2 carrots",
        "2 stalks celery",
        "1 cup stock",
        "1 tbsp tomato paste",
        "2 bay leaves",
        "1 tsp thyme",
        "1 cup red wine",
        "2 tbsp flour",
        "1 tsp salt",
        "1/2 tsp pepper",
        "2 tbsp oil",
    ];

    extra
        .iter()
        .copied()
        .chain(STAPLES.iter().copied())
        .take(count)
        .collect()
}

/// Quick recipes are ids 1-4, slow ones 5-8
pub fn fixture_recipes() -> Vec<Recipe> {
    vec![
        recipe(
            1,
            "Garlic Butter Noodles",
            15,
            3,
            &["8 oz noodles", "3 cloves garlic (minced)", "2 tbsp butter"],
            Some("Italian"),
            &["vegetarian"],
        ),
        recipe(
            2,
            "Tomato Toast",
            10,
            2,
            &["2 slices bread", "1 tomato", "1/2 teaspoon salt"],
            None,
            &["vegan", "vegetarian"],
        ),
        recipe(
            3,
            "Quick Garlic Shrimp",
            20,
            3,
            &["1 lb shrimp", "4 cloves garlic", "1 tbsp olive oil", "salt and pepper to taste"],
            Some("Spanish"),
            &[],
        ),
        recipe(
            4,
            "Simple Salad",
            12,
            2,
            &["2 cups lettuce", "1/4 cup vinaigrette", "1 cucumber"],
            None,
            &["vegan"],
        ),
        recipe(
            5,
            "Braised Short Ribs",
            240,
            12,
            &pantry(&["3 lbs short ribs", "6 cloves garlic"], 11),
            Some("French"),
            &[],
        ),
        recipe(
            6,
            "Slow Cooker Chili",
            200,
            10,
            &pantry(&["2 lbs beef", "2 cans beans"], 10),
            Some("Mexican"),
            &["gluten-free"],
        ),
        recipe(
            7,
            "Roast Chicken with Garlic",
            180,
            11,
            &pantry(&["1 whole chicken", "1 head garlic"], 12),
            Some("French"),
            &[],
        ),
        recipe(
            8,
            "Beef Bourguignon",
            220,
            12,
            &pantry(&["2 lbs beef chuck", "8 oz mushrooms"], 10),
            Some("French"),
            &[],
        ),
    ]
}

pub fn fixture_catalog() -> Catalog {
    Catalog::from_recipes(fixture_recipes()).expect("fixture ids are unique")
}

pub fn fixture_model(catalog: &Catalog) -> ClusterModel {
    let options = TrainingOptions {
        clusters: 2,
        ..TrainingOptions::default()
    };
    train(catalog, &options).expect("fixture trains")
}

pub fn test_state() -> AppState {
    let catalog = fixture_catalog();
    let model = fixture_model(&catalog);
    let recommender =
        Recommender::new(Arc::new(catalog), Arc::new(model)).expect("model matches catalog");

    AppState::new(recommender)
}

pub fn test_app() -> Router {
    recipe_recommender::create_app(test_state())
}

/// Write the fixture catalog as a JSON export
pub fn write_catalog(path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, serde_json::to_vec_pretty(&fixture_recipes())?)?;
    Ok(())
}

pub async fn get_json(app: Router, uri: &str) -> anyhow::Result<(StatusCode, serde_json::Value)> {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;

    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();

    Ok((status, serde_json::from_slice(&bytes)?))
}
