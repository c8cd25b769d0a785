//! Storage trait definitions

use crate::model::{Difficulty, Recipe, RecipeId, ShoppingList, UserId};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Recipe already exists: {0}")]
    RecipeExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filter criteria for listing recipes
///
/// Equality filters on difficulty and author, case-insensitive substring on
/// name, plus offset/limit pagination. Results come back newest first.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the recipe name
    pub name_contains: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub author: Option<UserId>,
    /// Number of results to skip
    pub offset: Option<usize>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl RecipeFilter {
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

    pub fn with_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trait for recipe storage backends
///
/// The store is an opaque document collaborator: it persists whole
/// recipes and shopping lists and offers simple filtered listing.
/// Implementations must be thread-safe (Send + Sync).
pub trait RecipeStore: Send + Sync {
    // === Recipe Operations ===

    /// Load a recipe by ID
    fn get_recipe(&self, id: &RecipeId) -> StorageResult<Option<Recipe>>;

    /// List recipes matching the filter
    fn list_recipes(&self, filter: &RecipeFilter) -> StorageResult<Vec<Recipe>>;

    /// Insert a new recipe; fails if the ID is taken
    fn create_recipe(&self, recipe: &Recipe) -> StorageResult<()>;

    /// Overwrite an existing recipe; fails if it does not exist
    fn update_recipe(&self, recipe: &Recipe) -> StorageResult<()>;

    /// Delete a recipe, returning whether it existed
    fn delete_recipe(&self, id: &RecipeId) -> StorageResult<bool>;

    // === Shopping List Operations ===

    /// Load a user's shopping list
    fn load_shopping_list(&self, user: &UserId) -> StorageResult<Option<ShoppingList>>;

    /// Save (insert or replace) a shopping list
    fn save_shopping_list(&self, list: &ShoppingList) -> StorageResult<()>;

    /// Delete a user's shopping list
    fn delete_shopping_list(&self, user: &UserId) -> StorageResult<bool>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: RecipeStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
