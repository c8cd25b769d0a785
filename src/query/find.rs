//! Recipe browsing queries

use super::types::QueryResult;
use crate::model::{Difficulty, Recipe, UserId};

/// Query for finding recipes by various criteria
///
/// All criteria are ANDed. Results are ordered newest first, ties broken
/// by name.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    /// Case-insensitive substring of the recipe name
    pub name_contains: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Recipe must carry this tag (compared lowercased)
    pub tag: Option<String>,
    pub author: Option<UserId>,
    /// Upper bound on prep + cook time
    pub max_total_minutes: Option<u32>,
    /// Upper bound on rounded total calories
    pub max_calories: Option<u32>,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Number of results to skip
    pub offset: Option<usize>,
}

impl RecipeQuery {
    /// Create a new empty query (matches all recipes)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_max_total_minutes(mut self, minutes: u32) -> Self {
        self.max_total_minutes = Some(minutes);
        self
    }

    pub fn with_max_calories(mut self, calories: u32) -> Self {
        self.max_calories = Some(calories);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip results (for pagination)
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Execute the query against a set of recipes
    pub fn execute(&self, recipes: impl IntoIterator<Item = Recipe>) -> QueryResult {
        let mut recipes: Vec<Recipe> = recipes.into_iter().filter(|r| self.matches(r)).collect();

        recipes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total_count = recipes.len();

        // Apply offset
        if let Some(offset) = self.offset {
            if offset < recipes.len() {
                recipes.drain(..offset);
            } else {
                recipes.clear();
            }
        }

        // Apply limit
        if let Some(limit) = self.limit {
            recipes.truncate(limit);
        }

        QueryResult {
            recipes,
            total_count,
        }
    }

    /// Check if a recipe matches all query criteria
    fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(ref fragment) = self.name_contains {
            let fragment = fragment.trim().to_lowercase();
            if !recipe.name.to_lowercase().contains(&fragment) {
                return false;
            }
        }

        if let Some(difficulty) = self.difficulty {
            if recipe.difficulty != difficulty {
                return false;
            }
        }

        if let Some(ref tag) = self.tag {
            if !recipe.has_tag(tag) {
                return false;
            }
        }

        if let Some(ref author) = self.author {
            if &recipe.author != author {
                return false;
            }
        }

        if let Some(max) = self.max_total_minutes {
            if recipe.total_minutes() > max {
                return false;
            }
        }

        if let Some(max) = self.max_calories {
            if recipe.total_calories > max {
                return false;
            }
        }

        true
    }
}
