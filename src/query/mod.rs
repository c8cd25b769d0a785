//! Query system for browsing recipes
//!
//! Filters are evaluated in memory over the engine's cache, with
//! offset/limit pagination on the sorted result.

mod find;
mod types;

pub use find::RecipeQuery;
pub use types::QueryResult;
