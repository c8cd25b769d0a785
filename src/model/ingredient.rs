//! Ingredient lines embedded in recipes

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One ingredient of a recipe.
///
/// Nutrition values are per 100 g of the ingredient. Manually entered
/// ingredients default them to 0 until the user fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IngredientLine {
    /// Catalog or external database identifier, if the line came from a lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<String>,
    pub name: String,
    pub quantity_per_serving: f64,
    pub unit: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub proteins: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
}

impl IngredientLine {
    /// A manual line with zeroed nutrition
    pub fn new(name: impl Into<String>, quantity_per_serving: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient_id: None,
            name: name.into(),
            quantity_per_serving,
            unit: unit.into(),
            calories: 0.0,
            proteins: 0.0,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.ingredient_id = Some(id.into());
        self
    }

    pub fn with_calories(mut self, calories: f64) -> Self {
        self.calories = calories;
        self
    }

    /// Set proteins, carbs, fat and fiber at once
    pub fn with_macros(mut self, proteins: f64, carbs: f64, fat: f64, fiber: f64) -> Self {
        self.proteins = proteins;
        self.carbs = carbs;
        self.fat = fat;
        self.fiber = fiber;
        self
    }

    /// Identity used to match shopping list items.
    pub fn identity(&self) -> String {
        identity_key(self.ingredient_id.as_deref(), &self.name)
    }
}

/// Database id when known, otherwise the normalized name.
pub(crate) fn identity_key(ingredient_id: Option<&str>, name: &str) -> String {
    match ingredient_id {
        Some(id) if !id.trim().is_empty() => format!("id:{}", id.trim()),
        _ => format!("name:{}", name.trim().to_lowercase()),
    }
}

/// Units are free text; "G" and " g" are the same unit.
pub(crate) fn same_unit(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_prefers_database_id() {
        let a = IngredientLine::new("Tomates", 1.0, "g").with_id("off:123");
        let b = IngredientLine::new("tomates cerises", 1.0, "g").with_id("off:123");
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_falls_back_to_normalized_name() {
        let a = IngredientLine::new(" Farine ", 1.0, "g");
        let b = IngredientLine::new("farine", 1.0, "g");
        assert_eq!(a.identity(), b.identity());

        let with_id = IngredientLine::new("farine", 1.0, "g").with_id("cat:farine");
        assert_ne!(a.identity(), with_id.identity());
    }

    #[test]
    fn units_compare_trimmed_and_case_insensitive() {
        assert!(same_unit("g", " G "));
        assert!(same_unit("Cuillère", "cuillère"));
        assert!(same_unit("CUILLÈRE", "cuillère"));
        assert!(!same_unit("g", "kg"));
    }
}
