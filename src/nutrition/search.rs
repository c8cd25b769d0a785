//! Hybrid ingredient search: local catalog first, external source second

use super::catalog::Catalog;
use super::client::NutritionSource;
use super::types::IngredientSuggestion;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// Resolves ingredient names against the catalog and an optional
/// external source.
#[derive(Clone)]
pub struct IngredientSearch {
    catalog: Catalog,
    external: Option<Arc<dyn NutritionSource>>,
}

impl std::fmt::Debug for IngredientSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngredientSearch")
            .field("catalog", &self.catalog.len())
            .field("external", &self.external.is_some())
            .finish()
    }
}

impl IngredientSearch {
    pub fn new(catalog: Catalog, external: Arc<dyn NutritionSource>) -> Self {
        Self {
            catalog,
            external: Some(external),
        }
    }

    /// Search the catalog only
    pub fn local_only(catalog: Catalog) -> Self {
        Self {
            catalog,
            external: None,
        }
    }

    /// Up to `limit` suggestions for `query`.
    ///
    /// At most 70% (rounded up) come from the catalog. When the catalog
    /// yields fewer than `limit`, the external source is asked for 30%
    /// (rounded up). External failures count as zero results. Names are
    /// deduplicated case-insensitively, earlier results winning, and
    /// returned with a capitalized first letter.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<IngredientSuggestion> {
        let query = query.trim();
        if limit == 0 || query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let local = self.catalog.search(query, local_share(limit));
        let mut external = Vec::new();
        if local.len() < limit {
            if let Some(source) = &self.external {
                match source.search(query, external_share(limit)).await {
                    Ok(found) => external = found,
                    Err(e) => warn!(query, error = %e, "external ingredient search failed"),
                }
            }
        }
        debug!(query, local = local.len(), external = external.len(), "ingredient search");

        let mut seen = HashSet::new();
        local
            .into_iter()
            .chain(external)
            .filter(|s| seen.insert(s.name.trim().to_lowercase()))
            .map(|mut s| {
                s.name = capitalize(s.name.trim());
                s
            })
            .take(limit)
            .collect()
    }
}

/// ceil(limit × 0.7)
fn local_share(limit: usize) -> usize {
    limit.saturating_mul(7).div_ceil(10)
}

/// ceil(limit × 0.3)
fn external_share(limit: usize) -> usize {
    limit.saturating_mul(3).div_ceil(10)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
