//! MCP tool parameter structs with schemars-derived JSON schemas.

use crate::model::{Difficulty, RecipeDraft, RecipePatch, UserId};
use crate::query::RecipeQuery;
use schemars::JsonSchema;
use serde::Deserialize;

// ── Recipe params ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecipeIdParams {
    #[schemars(description = "The recipe ID")]
    pub recipe_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateRecipeParams {
    #[schemars(description = "The recipe to publish; nutrition is computed from the ingredients")]
    pub recipe: RecipeDraft,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateRecipeParams {
    #[schemars(description = "The recipe ID")]
    pub recipe_id: String,
    #[schemars(description = "Complete replacement for every editable field")]
    pub recipe: RecipeDraft,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PatchRecipeParams {
    #[schemars(description = "The recipe ID")]
    pub recipe_id: String,
    #[schemars(description = "Fields to change; omitted fields keep their value")]
    pub changes: RecipePatch,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListRecipesParams {
    #[schemars(description = "Case-insensitive substring of the recipe name")]
    pub name: Option<String>,
    #[schemars(description = "facile, moyen or difficile")]
    pub difficulty: Option<Difficulty>,
    #[schemars(description = "Only recipes carrying this tag")]
    pub tag: Option<String>,
    #[schemars(description = "Only recipes by this user")]
    pub author: Option<String>,
    #[schemars(description = "Maximum prep + cook time in minutes")]
    pub max_total_minutes: Option<u32>,
    #[schemars(description = "Maximum total calories")]
    pub max_calories: Option<u32>,
    #[schemars(description = "Number of results to skip")]
    pub offset: Option<usize>,
    #[schemars(description = "Maximum number of results (default 20)")]
    pub limit: Option<usize>,
}

impl ListRecipesParams {
    pub fn into_query(self) -> RecipeQuery {
        RecipeQuery {
            name_contains: self.name,
            difficulty: self.difficulty,
            tag: self.tag,
            author: self.author.map(UserId::from),
            max_total_minutes: self.max_total_minutes,
            max_calories: self.max_calories,
            offset: self.offset,
            limit: Some(self.limit.unwrap_or(20)),
        }
    }
}

// ── Ingredient params ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchIngredientsParams {
    #[schemars(description = "Ingredient name or fragment (at least 2 characters)")]
    pub query: String,
    #[schemars(description = "Maximum number of suggestions")]
    pub limit: Option<usize>,
}

// ── Shopping list params ────────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddRecipeToListParams {
    #[schemars(description = "The recipe ID")]
    pub recipe_id: String,
    #[schemars(description = "Scale factor applied to every ingredient quantity (default 1)")]
    pub servings_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddListItemParams {
    #[schemars(description = "Item name")]
    pub name: String,
    #[schemars(description = "Quantity, greater than zero")]
    pub quantity: f64,
    #[schemars(description = "Unit, e.g. g, ml, pièce")]
    pub unit: String,
    #[schemars(description = "Catalog or external ingredient ID, if known")]
    pub ingredient_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ItemIdParams {
    #[schemars(description = "The shopping list item ID")]
    pub item_id: String,
}
