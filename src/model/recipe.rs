//! Recipe representation and derived nutrition

use super::ingredient::IngredientLine;
use super::shopping::UserId;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a recipe
///
/// Serializes as a plain string (UUID v4 by default).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    /// Create a new random RecipeId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How hard a recipe is to make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Facile,
    Moyen,
    Difficile,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Facile => "facile",
            Difficulty::Moyen => "moyen",
            Difficulty::Difficile => "difficile",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facile" => Ok(Difficulty::Facile),
            "moyen" => Ok(Difficulty::Moyen),
            "difficile" => Ok(Difficulty::Difficile),
            other => Err(format!(
                "unknown difficulty '{}' (expected facile, moyen or difficile)",
                other
            )),
        }
    }
}

/// Nutrition totals for a whole recipe, derived from its ingredient lines.
///
/// Each line contributes `value_per_100g × quantity_per_serving / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    /// `calories / servings`
    pub calories_per_serving: f64,
}

impl NutritionFacts {
    /// Sum the contributions of every line.
    pub fn compute(ingredients: &[IngredientLine], servings: u32) -> Self {
        let mut facts = Self::default();
        for line in ingredients {
            let factor = line.quantity_per_serving / 100.0;
            facts.calories += line.calories * factor;
            facts.proteins += line.proteins * factor;
            facts.carbs += line.carbs * factor;
            facts.fat += line.fat * factor;
            facts.fiber += line.fiber * factor;
        }
        if servings > 0 {
            facts.calories_per_serving = facts.calories / servings as f64;
        }
        facts
    }

    /// Calories rounded to the nearest integer
    pub fn total_calories(&self) -> u32 {
        self.calories.round().max(0.0) as u32
    }
}

/// A published recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    /// User who created the recipe; only they may edit or delete it
    pub author: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub prep_minutes: u32,
    pub cook_minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Derived; recomputed by [`Recipe::refresh_nutrition`]
    #[serde(default)]
    pub nutrition: NutritionFacts,
    /// Derived; `nutrition.calories` rounded
    #[serde(default)]
    pub total_calories: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Total time in the kitchen
    pub fn total_minutes(&self) -> u32 {
        self.prep_minutes.saturating_add(self.cook_minutes)
    }

    /// Recompute derived nutrition from the ingredient lines.
    pub fn refresh_nutrition(&mut self) {
        self.nutrition = NutritionFacts::compute(&self.ingredients, self.servings);
        self.total_calories = self.nutrition.total_calories();
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.tags.iter().any(|t| *t == wanted)
    }
}
