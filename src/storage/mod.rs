//! Storage backends for marmite
//!
//! Recipes and shopping lists persist through the `RecipeStore` trait.
//! The primary implementation is `SqliteStore`.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{OpenStore, RecipeFilter, RecipeStore, StorageError, StorageResult};
