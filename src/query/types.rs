//! Query result structures

use crate::model::Recipe;
use serde::Serialize;

/// Result of a recipe query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Recipes on the requested page
    pub recipes: Vec<Recipe>,
    /// Total count before offset/limit were applied
    pub total_count: usize,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
