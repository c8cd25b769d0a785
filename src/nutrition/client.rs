//! External food database client
//!
//! `NutritionSource` abstracts over how ingredient nutrition is fetched.
//! Two implementations:
//! - `OpenFoodFactsClient`: queries the Open Food Facts search endpoint (production)
//! - `MockSource`: returns preconfigured suggestions and counts calls (testing)

use super::types::{IngredientSuggestion, SuggestionSource};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Errors from nutrition source lookups.
///
/// Never surfaced past the search layer, which treats any failure as
/// "no external results".
#[derive(Debug, thiserror::Error)]
pub enum NutritionError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Something that can suggest ingredients for a search term.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    /// Up to `limit` suggestions for `query`.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<IngredientSuggestion>, NutritionError>;
}

pub const OPEN_FOOD_FACTS_URL: &str = "https://world.openfoodfacts.org";

/// Client for the Open Food Facts product search.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NutritionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("marmite/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NutritionSource for OpenFoodFactsClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<IngredientSuggestion>, NutritionError> {
        let url = format!("{}/cgi/search.pl", self.base_url);
        let page_size = limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
                ("fields", "code,product_name,nutriments"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NutritionError::Status(status.as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        let suggestions = body.into_suggestions(limit);
        debug!(query, count = suggestions.len(), "open food facts search");
        Ok(suggestions)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    nutriments: HashMap<String, Value>,
}

impl SearchResponse {
    fn into_suggestions(self, limit: usize) -> Vec<IngredientSuggestion> {
        self.products
            .into_iter()
            .filter_map(Product::into_suggestion)
            .take(limit)
            .collect()
    }
}

impl Product {
    fn into_suggestion(self) -> Option<IngredientSuggestion> {
        let name = self.product_name?.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let id = match self.code {
            Some(Value::String(code)) if !code.is_empty() => Some(format!("off:{}", code)),
            Some(Value::Number(code)) => Some(format!("off:{}", code)),
            _ => None,
        };
        let n = &self.nutriments;
        Some(IngredientSuggestion {
            id,
            name,
            source: SuggestionSource::External,
            calories: nutriment(n, "energy-kcal_100g"),
            proteins: nutriment(n, "proteins_100g"),
            carbs: nutriment(n, "carbohydrates_100g"),
            fat: nutriment(n, "fat_100g"),
            fiber: nutriment(n, "fiber_100g"),
        })
    }
}

/// Read a per-100 g value; the API sends numbers or numeric strings.
fn nutriment(nutriments: &HashMap<String, Value>, key: &str) -> f64 {
    let value = match nutriments.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0)
}

/// Mock source for testing: returns preconfigured suggestions.
#[derive(Debug, Default)]
pub struct MockSource {
    results: Vec<IngredientSuggestion>,
    failing: bool,
    calls: AtomicUsize,
    last_limit: AtomicUsize,
}

impl MockSource {
    /// A source that answers with `results` (truncated to the requested limit).
    pub fn with_results(results: Vec<IngredientSuggestion>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// A source with nothing to suggest.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A source that fails every request.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// How many searches reached this source.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The limit passed to the most recent search.
    pub fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionSource for MockSource {
    async fn search(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<IngredientSuggestion>, NutritionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        if self.failing {
            return Err(NutritionError::Unavailable(
                "mock source configured to fail".to_string(),
            ));
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

/// Helper to construct an external suggestion for testing.
pub fn external_suggestion(name: &str, calories: f64) -> IngredientSuggestion {
    IngredientSuggestion {
        id: Some(format!("off:{}", name.to_lowercase().replace(' ', "-"))),
        name: name.to_string(),
        source: SuggestionSource::External,
        calories,
        proteins: 0.0,
        carbs: 0.0,
        fat: 0.0,
        fiber: 0.0,
    }
}
