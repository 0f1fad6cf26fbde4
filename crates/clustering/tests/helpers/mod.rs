use std::collections::BTreeSet;

use recommender_catalog::{Catalog, Recipe};

pub fn recipe(id: u64, minutes: u32, n_steps: u32, n_ingredients: u32) -> Recipe {
    Recipe {
        id,
        name: format!("Recipe {}", id),
        cook_time_minutes: minutes,
        n_steps,
        n_ingredients,
        ingredients: (0..n_ingredients).map(|i| format!("ingredient {}", i)).collect(),
        instructions: (0..n_steps).map(|i| format!("step {}", i)).collect(),
        cuisine: None,
        dietary_tags: BTreeSet::new(),
        avg_rating: 4.5,
        num_interactions: 10,
    }
}

/// Three loose groups: quick and simple, mid-week, weekend projects
pub fn sample_catalog() -> Catalog {
    let mut recipes = Vec::new();
    let mut id = 1;

    for i in 0..10u32 {
        recipes.push(recipe(id, 10 + i, 2 + i % 2, 3 + i % 3));
        id += 1;
    }
    for i in 0..10u32 {
        recipes.push(recipe(id, 40 + 2 * i, 5 + i % 3, 7 + i % 2));
        id += 1;
    }
    for i in 0..10u32 {
        recipes.push(recipe(id, 150 + 10 * i, 10 + i % 4, 12 + i % 3));
        id += 1;
    }

    Catalog::from_recipes(recipes).expect("unique ids")
}
