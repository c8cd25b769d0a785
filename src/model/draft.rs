//! Recipe form submissions and their validation

use super::ingredient::IngredientLine;
use super::recipe::{Difficulty, Recipe, RecipeId};
use super::shopping::UserId;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MAX_NAME_LEN: usize = 120;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every problem found in a submission, not just the first
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid recipe: {}", summary(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A recipe as submitted by a user, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub prep_minutes: u32,
    #[serde(default)]
    pub cook_minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; `None` fields stay as they are
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub prep_minutes: Option<u32>,
    pub cook_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub steps: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl RecipePatch {
    /// Overlay the patch on an existing recipe, producing a full draft.
    pub fn apply_to(self, recipe: &Recipe) -> RecipeDraft {
        let base = RecipeDraft::from(recipe);
        RecipeDraft {
            name: self.name.unwrap_or(base.name),
            description: self.description.or(base.description),
            difficulty: self.difficulty.unwrap_or(base.difficulty),
            prep_minutes: self.prep_minutes.unwrap_or(base.prep_minutes),
            cook_minutes: self.cook_minutes.unwrap_or(base.cook_minutes),
            servings: self.servings.unwrap_or(base.servings),
            ingredients: self.ingredients.unwrap_or(base.ingredients),
            steps: self.steps.unwrap_or(base.steps),
            tags: self.tags.unwrap_or(base.tags),
        }
    }
}

impl From<&Recipe> for RecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            difficulty: recipe.difficulty,
            prep_minutes: recipe.prep_minutes,
            cook_minutes: recipe.cook_minutes,
            servings: recipe.servings,
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
            tags: recipe.tags.clone(),
        }
    }
}

impl RecipeDraft {
    /// Check every field and return the normalized draft.
    ///
    /// Names and units are trimmed, blank steps are dropped, tags are
    /// lowercased and deduplicated.
    pub fn validate(self) -> Result<RecipeDraft, ValidationError> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                format!("must be at most {} characters", MAX_NAME_LEN),
            ));
        }

        if self.prep_minutes == 0 && self.cook_minutes == 0 {
            errors.push(FieldError::new(
                "prep_minutes",
                "prep or cook time must be greater than zero",
            ));
        }

        if self.servings == 0 {
            errors.push(FieldError::new("servings", "must be greater than zero"));
        }

        if self.ingredients.is_empty() {
            errors.push(FieldError::new("ingredients", "at least one ingredient is required"));
        }
        let mut ingredients = Vec::with_capacity(self.ingredients.len());
        for (i, mut line) in self.ingredients.into_iter().enumerate() {
            let field = |f: &str| format!("ingredients[{}].{}", i, f);
            line.name = line.name.trim().to_string();
            line.unit = line.unit.trim().to_string();
            if line.name.is_empty() {
                errors.push(FieldError::new(field("name"), "must not be empty"));
            }
            if !line.quantity_per_serving.is_finite() || line.quantity_per_serving <= 0.0 {
                errors.push(FieldError::new(
                    field("quantity_per_serving"),
                    "must be greater than zero",
                ));
            }
            for (key, value) in [
                ("calories", line.calories),
                ("proteins", line.proteins),
                ("carbs", line.carbs),
                ("fat", line.fat),
                ("fiber", line.fiber),
            ] {
                if !value.is_finite() || value < 0.0 {
                    errors.push(FieldError::new(field(key), "must be a non-negative number"));
                }
            }
            ingredients.push(line);
        }

        let steps: Vec<String> = self
            .steps
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if steps.is_empty() {
            errors.push(FieldError::new("steps", "at least one non-empty step is required"));
        }

        let mut tags: Vec<String> = Vec::new();
        for tag in &self.tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(RecipeDraft {
            name,
            description,
            difficulty: self.difficulty,
            prep_minutes: self.prep_minutes,
            cook_minutes: self.cook_minutes,
            servings: self.servings,
            ingredients,
            steps,
            tags,
        })
    }

    /// Validate and build a new recipe owned by `author`.
    pub fn into_recipe(self, author: UserId) -> Result<Recipe, ValidationError> {
        let draft = self.validate()?;
        let mut recipe = Recipe {
            id: RecipeId::new(),
            author,
            name: draft.name,
            description: draft.description,
            difficulty: draft.difficulty,
            prep_minutes: draft.prep_minutes,
            cook_minutes: draft.cook_minutes,
            servings: draft.servings,
            ingredients: draft.ingredients,
            steps: draft.steps,
            tags: draft.tags,
            nutrition: Default::default(),
            total_calories: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        recipe.refresh_nutrition();
        Ok(recipe)
    }

    /// Validate and overwrite `recipe` in place, keeping id, author and creation time.
    pub fn apply(self, recipe: &mut Recipe) -> Result<(), ValidationError> {
        let draft = self.validate()?;
        recipe.name = draft.name;
        recipe.description = draft.description;
        recipe.difficulty = draft.difficulty;
        recipe.prep_minutes = draft.prep_minutes;
        recipe.cook_minutes = draft.cook_minutes;
        recipe.servings = draft.servings;
        recipe.ingredients = draft.ingredients;
        recipe.steps = draft.steps;
        recipe.tags = draft.tags;
        recipe.updated_at = Some(Utc::now());
        recipe.refresh_nutrition();
        Ok(())
    }
}
