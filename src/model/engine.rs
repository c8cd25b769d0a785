//! Kitchen: the in-memory engine behind the API
//!
//! Recipes and shopping lists are cached in `DashMap`s. When a store is
//! attached, every mutation is written through before the cache changes,
//! so a failed write leaves the cache untouched.

use super::draft::ValidationError;
use super::recipe::{Recipe, RecipeId};
use super::shopping::{ItemId, ShoppingList, UserId};
use crate::query::{QueryResult, RecipeQuery};
use crate::storage::{RecipeFilter, RecipeStore, StorageError};
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur in kitchen operations
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    #[error("Shopping list item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Servings multiplier must be a positive number, got {0}")]
    InvalidMultiplier(f64),

    #[error("Quantity must be a positive number, got {0}")]
    InvalidQuantity(f64),

    #[error("Item name must not be empty")]
    EmptyItemName,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for kitchen operations
pub type KitchenResult<T> = Result<T, KitchenError>;

/// The recipe engine
///
/// Owns the recipe cache and one shopping list per user.
#[derive(Default)]
pub struct Kitchen {
    recipes: DashMap<RecipeId, Recipe>,
    shopping_lists: DashMap<UserId, ShoppingList>,
    store: Option<Arc<dyn RecipeStore>>,
}

impl std::fmt::Debug for Kitchen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kitchen")
            .field("recipes", &self.recipes.len())
            .field("shopping_lists", &self.shopping_lists.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl Kitchen {
    /// Create an in-memory kitchen
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a kitchen that writes through to `store`
    pub fn with_store(store: Arc<dyn RecipeStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::default()
        }
    }

    /// Load every stored recipe into the cache.
    ///
    /// Shopping lists are loaded lazily, per user, on first access.
    pub fn load_all(&self) -> KitchenResult<usize> {
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let recipes = store.list_recipes(&RecipeFilter::default())?;
        let count = recipes.len();
        for recipe in recipes {
            self.recipes.insert(recipe.id.clone(), recipe);
        }
        info!(count, "loaded recipes from store");
        Ok(count)
    }

    // === Recipes ===

    /// Insert a new recipe
    pub fn insert_recipe(&self, recipe: Recipe) -> KitchenResult<RecipeId> {
        if let Some(store) = &self.store {
            store.create_recipe(&recipe)?;
        }
        let id = recipe.id.clone();
        debug!(recipe = %id, name = %recipe.name, "recipe inserted");
        self.recipes.insert(id.clone(), recipe);
        Ok(id)
    }

    /// Get a recipe by ID
    pub fn get_recipe(&self, id: &RecipeId) -> Option<Recipe> {
        self.recipes.get(id).map(|r| r.clone())
    }

    /// Replace an existing recipe
    pub fn replace_recipe(&self, recipe: Recipe) -> KitchenResult<()> {
        if !self.recipes.contains_key(&recipe.id) {
            return Err(KitchenError::RecipeNotFound(recipe.id));
        }
        if let Some(store) = &self.store {
            store.update_recipe(&recipe)?;
        }
        debug!(recipe = %recipe.id, "recipe replaced");
        self.recipes.insert(recipe.id.clone(), recipe);
        Ok(())
    }

    /// Remove a recipe, returning it
    pub fn remove_recipe(&self, id: &RecipeId) -> KitchenResult<Recipe> {
        if !self.recipes.contains_key(id) {
            return Err(KitchenError::RecipeNotFound(id.clone()));
        }
        if let Some(store) = &self.store {
            store.delete_recipe(id)?;
        }
        let (_, recipe) = self
            .recipes
            .remove(id)
            .ok_or_else(|| KitchenError::RecipeNotFound(id.clone()))?;
        debug!(recipe = %id, "recipe removed");
        Ok(recipe)
    }

    /// Run a query over the cached recipes
    pub fn find_recipes(&self, query: &RecipeQuery) -> QueryResult {
        let recipes: Vec<Recipe> = self.recipes.iter().map(|r| r.value().clone()).collect();
        query.execute(recipes)
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn has_recipe(&self, id: &RecipeId) -> bool {
        self.recipes.contains_key(id)
    }

    // === Shopping lists ===

    /// Get a user's list, creating an empty one on first access
    pub fn shopping_list(&self, user: &UserId) -> KitchenResult<ShoppingList> {
        self.with_shopping_list(user, |list| list.clone())
    }

    /// Mutate a user's list under its map-shard lock, then persist it.
    ///
    /// If persisting fails the cached list is restored.
    pub fn with_shopping_list<R>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut ShoppingList) -> R,
    ) -> KitchenResult<R> {
        let mut entry = match self.shopping_lists.get_mut(user) {
            Some(entry) => entry,
            None => {
                let list = self.load_or_create_list(user)?;
                self.shopping_lists.entry(user.clone()).or_insert(list)
            }
        };

        let before = entry.clone();
        let result = f(entry.value_mut());
        if *entry != before {
            if let Some(store) = &self.store {
                if let Err(e) = store.save_shopping_list(entry.value()) {
                    *entry = before;
                    return Err(e.into());
                }
            }
        }
        Ok(result)
    }

    /// Add a recipe's ingredients to a user's list
    pub fn add_recipe_to_list(
        &self,
        user: &UserId,
        recipe_id: &RecipeId,
        servings_multiplier: f64,
    ) -> KitchenResult<ShoppingList> {
        if !servings_multiplier.is_finite() || servings_multiplier <= 0.0 {
            return Err(KitchenError::InvalidMultiplier(servings_multiplier));
        }
        let recipe = self
            .get_recipe(recipe_id)
            .ok_or_else(|| KitchenError::RecipeNotFound(recipe_id.clone()))?;
        let list = self.with_shopping_list(user, |list| {
            list.add_recipe(&recipe, servings_multiplier);
            list.clone()
        })?;
        debug!(user = %user, recipe = %recipe_id, servings_multiplier, "recipe added to list");
        Ok(list)
    }

    /// Take a recipe's ingredients back off a user's list.
    ///
    /// A recipe deleted since it was added can no longer be subtracted;
    /// its reference is still dropped from the list.
    pub fn remove_recipe_from_list(
        &self,
        user: &UserId,
        recipe_id: &RecipeId,
    ) -> KitchenResult<ShoppingList> {
        let recipe = self.get_recipe(recipe_id);
        let list = self.with_shopping_list(user, |list| match &recipe {
            Some(recipe) => {
                list.remove_recipe(recipe);
                Ok(list.clone())
            }
            None if list.forget_recipe(recipe_id) => Ok(list.clone()),
            None => Err(KitchenError::RecipeNotFound(recipe_id.clone())),
        })??;
        debug!(user = %user, recipe = %recipe_id, "recipe removed from list");
        Ok(list)
    }

    /// Add a manual line to a user's list
    pub fn add_list_item(
        &self,
        user: &UserId,
        name: &str,
        quantity: f64,
        unit: &str,
        ingredient_id: Option<&str>,
    ) -> KitchenResult<ShoppingList> {
        if name.trim().is_empty() {
            return Err(KitchenError::EmptyItemName);
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(KitchenError::InvalidQuantity(quantity));
        }
        self.with_shopping_list(user, |list| {
            list.add_item(name, quantity, unit, ingredient_id);
            list.clone()
        })
    }

    pub fn toggle_list_item(&self, user: &UserId, item: &ItemId) -> KitchenResult<ShoppingList> {
        self.with_shopping_list(user, |list| match list.toggle_item(item) {
            Some(_) => Ok(list.clone()),
            None => Err(KitchenError::ItemNotFound(item.clone())),
        })?
    }

    pub fn remove_list_item(&self, user: &UserId, item: &ItemId) -> KitchenResult<ShoppingList> {
        self.with_shopping_list(user, |list| match list.remove_item(item) {
            Some(_) => Ok(list.clone()),
            None => Err(KitchenError::ItemNotFound(item.clone())),
        })?
    }

    /// Drop checked items; returns how many went
    pub fn clear_checked_items(&self, user: &UserId) -> KitchenResult<usize> {
        self.with_shopping_list(user, |list| list.clear_checked())
    }

    /// Empty a user's list entirely
    pub fn clear_shopping_list(&self, user: &UserId) -> KitchenResult<ShoppingList> {
        self.with_shopping_list(user, |list| {
            list.clear();
            list.clone()
        })
    }

    fn load_or_create_list(&self, user: &UserId) -> KitchenResult<ShoppingList> {
        if let Some(store) = &self.store {
            if let Some(list) = store.load_shopping_list(user)? {
                return Ok(list);
            }
            let list = ShoppingList::new(user.clone());
            store.save_shopping_list(&list)?;
            debug!(user = %user, "created shopping list");
            return Ok(list);
        }
        Ok(ShoppingList::new(user.clone()))
    }
}
