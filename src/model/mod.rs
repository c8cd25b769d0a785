//! Core recipe and shopping list data structures

mod draft;
mod engine;
mod ingredient;
mod recipe;
mod shopping;


pub use draft::{FieldError, RecipeDraft, RecipePatch, ValidationError, MAX_NAME_LEN};
pub use engine::{Kitchen, KitchenError, KitchenResult};
pub use ingredient::IngredientLine;
pub use recipe::{Difficulty, NutritionFacts, Recipe, RecipeId};
pub use shopping::{ItemId, ShoppingList, ShoppingListItem, UserId, QUANTITY_EPSILON};
