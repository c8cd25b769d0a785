//! Marmite: recipe-sharing backend
//!
//! Users publish recipes, browse and filter them, and keep a shopping
//! list aggregated from the recipes they plan to cook.
//!
//! # Core Concepts
//!
//! - **Recipes**: ingredient lines with per-100 g nutrition; totals are derived
//! - **Shopping lists**: one per user, one item per (ingredient, unit), scaled by servings
//! - **Ingredient search**: bundled catalog first, Open Food Facts second, manual entry last
//!
//! # Example
//!
//! ```
//! use marmite::{IngredientLine, Kitchen, RecipeDraft, UserId};
//!
//! let kitchen = Kitchen::new();
//! let recipe = RecipeDraft {
//!     name: "Pain perdu".into(),
//!     prep_minutes: 10,
//!     servings: 2,
//!     ingredients: vec![IngredientLine::new("Pain rassis", 100.0, "g").with_calories(265.0)],
//!     steps: vec!["Tremper le pain".into(), "Dorer à la poêle".into()],
//!     ..Default::default()
//! }
//! .into_recipe(UserId::from("alice"))
//! .unwrap();
//! assert_eq!(recipe.total_calories, 265);
//! kitchen.insert_recipe(recipe).unwrap();
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod mcp;
mod model;
pub mod nutrition;
pub mod query;
pub mod storage;

pub use api::{ApiError, ApiResult, MarmiteApi, SetupError};
pub use auth::{AuthProvider, StaticAuth};
pub use config::{Config, ConfigError};
pub use model::{
    Difficulty, FieldError, IngredientLine, ItemId, Kitchen, KitchenError, KitchenResult,
    NutritionFacts, Recipe, RecipeDraft, RecipeId, RecipePatch, ShoppingList, ShoppingListItem,
    UserId, ValidationError, MAX_NAME_LEN, QUANTITY_EPSILON,
};
pub use nutrition::{
    Catalog, IngredientSearch, IngredientSuggestion, NutritionError, NutritionSource,
    OpenFoodFactsClient, SuggestionSource,
};
pub use query::{QueryResult, RecipeQuery};
pub use storage::{OpenStore, RecipeFilter, RecipeStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
