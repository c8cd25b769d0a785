//! Ingredient search against the real Open Food Facts endpoint
//!
//! Needs network access. Run with:
//! `cargo test --features live_api --test live_api -- --nocapture`

#![cfg(feature = "live_api")]

use marmite::nutrition::{NutritionSource, OpenFoodFactsClient, OPEN_FOOD_FACTS_URL};
use marmite::{Catalog, IngredientSearch, SuggestionSource};
use std::sync::Arc;
use std::time::Duration;

fn client() -> OpenFoodFactsClient {
    OpenFoodFactsClient::new(OPEN_FOOD_FACTS_URL, Duration::from_secs(15)).unwrap()
}

#[tokio::test]
async fn open_food_facts_returns_named_products() {
    let results = client().search("confiture", 5).await.unwrap();
    println!("{:#?}", results);

    assert!(!results.is_empty());
    assert!(results.len() <= 5);
    for s in &results {
        assert!(!s.name.trim().is_empty());
        assert_eq!(s.source, SuggestionSource::External);
        assert!(s.calories >= 0.0);
    }
}

#[tokio::test]
async fn hybrid_search_keeps_local_tomates() {
    let search = IngredientSearch::new(Catalog::builtin(), Arc::new(client()));
    let results = search.search("tomates", 10).await;
    println!("{:#?}", results);

    let tomates: Vec<_> = results
        .iter()
        .filter(|s| s.name.to_lowercase() == "tomates")
        .collect();
    assert_eq!(tomates.len(), 1);
    assert_eq!(tomates[0].source, SuggestionSource::Local);
    assert!(results.len() <= 10);
}
