//! Ingredient suggestions returned by lookups

use crate::model::IngredientLine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    /// The bundled ingredient catalog
    Local,
    /// The external food database
    External,
    /// Typed in by the user, macros unknown
    Manual,
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SuggestionSource::Local => "local",
            SuggestionSource::External => "external",
            SuggestionSource::Manual => "manual",
        };
        f.pad(s)
    }
}

/// A candidate ingredient with its nutrition per 100 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IngredientSuggestion {
    /// Catalog id (`cat:…`) or external product id (`off:…`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub source: SuggestionSource,
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl IngredientSuggestion {
    /// Manual entry: the user fills in the macros later.
    pub fn manual(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into().trim().to_string(),
            source: SuggestionSource::Manual,
            calories: 0.0,
            proteins: 0.0,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
        }
    }

    /// Turn the suggestion into a recipe line.
    pub fn to_line(&self, quantity_per_serving: f64, unit: impl Into<String>) -> IngredientLine {
        let mut line = IngredientLine::new(self.name.clone(), quantity_per_serving, unit)
            .with_calories(self.calories)
            .with_macros(self.proteins, self.carbs, self.fat, self.fiber);
        if let Some(ref id) = self.id {
            line = line.with_id(id.clone());
        }
        line
    }
}
