//! Ingredient lookup and nutrition data
//!
//! Suggestions come from the bundled catalog, an external food database,
//! or manual entry. `IngredientSearch` combines the first two.

mod catalog;
mod client;
mod search;
mod types;

pub use catalog::Catalog;
pub use client::{
    external_suggestion, MockSource, NutritionError, NutritionSource, OpenFoodFactsClient,
    OPEN_FOOD_FACTS_URL,
};
pub use search::{IngredientSearch, MIN_QUERY_CHARS};
pub use types::{IngredientSuggestion, SuggestionSource};
