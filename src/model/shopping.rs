//! Per-user shopping lists aggregated from recipes

use super::ingredient::{identity_key, same_unit};
use super::recipe::{Recipe, RecipeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantities at or below this are treated as used up.
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Identifier of a user, as handed out by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a shopping list line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One consolidated line of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<String>,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub checked: bool,
}

impl ShoppingListItem {
    fn identity(&self) -> String {
        identity_key(self.ingredient_id.as_deref(), &self.name)
    }
}

/// A user's shopping list.
///
/// Holds at most one item per (ingredient identity, unit) pair, in
/// insertion order, plus the set of recipes that contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub user_id: UserId,
    pub items: Vec<ShoppingListItem>,
    pub recipes: Vec<RecipeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShoppingList {
    /// An empty list for the given user
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            recipes: Vec::new(),
            updated_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.recipes.is_empty()
    }

    pub fn contains_recipe(&self, id: &RecipeId) -> bool {
        self.recipes.contains(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&ShoppingListItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Add every ingredient of `recipe`, scaled by `servings_multiplier`.
    ///
    /// Quantities accumulate: adding the same recipe twice doubles them.
    /// Existing items keep their `checked` flag.
    pub fn add_recipe(&mut self, recipe: &Recipe, servings_multiplier: f64) {
        for line in &recipe.ingredients {
            let adjusted = line.quantity_per_serving * servings_multiplier;
            self.merge(line.ingredient_id.as_deref(), &line.name, &line.unit, adjusted);
        }
        if !self.recipes.contains(&recipe.id) {
            self.recipes.push(recipe.id.clone());
        }
        self.touch();
    }

    /// Take `recipe`'s ingredients back off the list.
    ///
    /// Subtracts the unscaled per-serving quantity of each line; the
    /// multiplier used when adding is not tracked. Items reaching zero are
    /// dropped. The recipe reference goes away whether or not lines matched.
    pub fn remove_recipe(&mut self, recipe: &Recipe) {
        for line in &recipe.ingredients {
            let identity = line.identity();
            let Some(idx) = self.position(&identity, &line.unit) else {
                continue;
            };
            self.items[idx].quantity -= line.quantity_per_serving;
            if self.items[idx].quantity <= QUANTITY_EPSILON {
                self.items.remove(idx);
            }
        }
        self.recipes.retain(|id| id != &recipe.id);
        self.touch();
    }

    /// Drop a recipe reference without touching quantities.
    pub fn forget_recipe(&mut self, id: &RecipeId) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r != id);
        let removed = self.recipes.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Add a manual line, merging with an existing (identity, unit) item.
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: f64,
        unit: &str,
        ingredient_id: Option<&str>,
    ) -> ItemId {
        let id = self.merge(ingredient_id, name, unit, quantity);
        self.touch();
        id
    }

    /// Flip an item's `checked` flag, returning the new value.
    pub fn toggle_item(&mut self, id: &ItemId) -> Option<bool> {
        let item = self.items.iter_mut().find(|i| &i.id == id)?;
        item.checked = !item.checked;
        let checked = item.checked;
        self.touch();
        Some(checked)
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Option<ShoppingListItem> {
        let idx = self.items.iter().position(|i| &i.id == id)?;
        let removed = self.items.remove(idx);
        self.touch();
        Some(removed)
    }

    /// Drop every checked item; returns how many went.
    pub fn clear_checked(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !i.checked);
        let removed = before - self.items.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recipes.clear();
        self.touch();
    }

    fn position(&self, identity: &str, unit: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.identity() == identity && same_unit(&i.unit, unit))
    }

    fn merge(&mut self, ingredient_id: Option<&str>, name: &str, unit: &str, quantity: f64) -> ItemId {
        let identity = identity_key(ingredient_id, name);
        if let Some(idx) = self.position(&identity, unit) {
            self.items[idx].quantity += quantity;
            return self.items[idx].id.clone();
        }
        let item = ShoppingListItem {
            id: ItemId::new(),
            ingredient_id: ingredient_id.map(|s| s.to_string()),
            name: name.trim().to_string(),
            quantity,
            unit: unit.trim().to_string(),
            checked: false,
        };
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
