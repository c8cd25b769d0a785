//! Bundled ingredient catalog
//!
//! Common French pantry ingredients with nutrition per 100 g. Searched
//! before the external database and always available offline.

use super::types::{IngredientSuggestion, SuggestionSource};

// (id, name, kcal, proteins, carbs, fat, fiber)
const BUILTIN: &[(&str, &str, f64, f64, f64, f64, f64)] = &[
    ("cat:tomates", "Tomates", 18.0, 0.9, 3.9, 0.2, 1.2),
    ("cat:tomates-cerises", "Tomates cerises", 18.0, 0.9, 3.9, 0.2, 1.2),
    ("cat:farine-ble", "Farine de blé", 364.0, 10.0, 76.0, 1.0, 2.7),
    ("cat:sucre", "Sucre", 400.0, 0.0, 100.0, 0.0, 0.0),
    ("cat:beurre", "Beurre", 717.0, 0.9, 0.1, 81.0, 0.0),
    ("cat:lait-entier", "Lait entier", 61.0, 3.2, 4.8, 3.3, 0.0),
    ("cat:oeufs", "Oeufs", 143.0, 12.6, 0.7, 9.5, 0.0),
    ("cat:huile-olive", "Huile d'olive", 884.0, 0.0, 0.0, 100.0, 0.0),
    ("cat:oignon", "Oignon", 40.0, 1.1, 9.3, 0.1, 1.7),
    ("cat:ail", "Ail", 149.0, 6.4, 33.0, 0.5, 2.1),
    ("cat:carotte", "Carotte", 41.0, 0.9, 9.6, 0.2, 2.8),
    ("cat:pomme-de-terre", "Pomme de terre", 77.0, 2.0, 17.0, 0.1, 2.2),
    ("cat:courgette", "Courgette", 17.0, 1.2, 3.1, 0.3, 1.0),
    ("cat:aubergine", "Aubergine", 25.0, 1.0, 6.0, 0.2, 3.0),
    ("cat:poivron-rouge", "Poivron rouge", 31.0, 1.0, 6.0, 0.3, 2.1),
    ("cat:epinards", "Épinards", 23.0, 2.9, 3.6, 0.4, 2.2),
    ("cat:champignons", "Champignons de Paris", 22.0, 3.1, 3.3, 0.3, 1.0),
    ("cat:riz-blanc", "Riz blanc", 360.0, 6.6, 79.0, 0.6, 1.3),
    ("cat:pates", "Pâtes", 371.0, 13.0, 75.0, 1.5, 3.2),
    ("cat:lentilles", "Lentilles vertes", 352.0, 24.6, 63.0, 1.1, 10.7),
    ("cat:pois-chiches", "Pois chiches", 364.0, 19.3, 61.0, 6.0, 17.4),
    ("cat:poulet", "Blanc de poulet", 165.0, 31.0, 0.0, 3.6, 0.0),
    ("cat:boeuf-hache", "Boeuf haché", 250.0, 26.0, 0.0, 15.0, 0.0),
    ("cat:saumon", "Saumon", 208.0, 20.0, 0.0, 13.0, 0.0),
    ("cat:creme-fraiche", "Crème fraîche", 292.0, 2.4, 2.9, 30.0, 0.0),
    ("cat:emmental", "Emmental râpé", 380.0, 28.0, 0.0, 29.0, 0.0),
    ("cat:yaourt", "Yaourt nature", 61.0, 3.5, 4.7, 3.3, 0.0),
    ("cat:chocolat-noir", "Chocolat noir", 546.0, 4.9, 61.0, 31.0, 7.0),
    ("cat:pomme", "Pomme", 52.0, 0.3, 14.0, 0.2, 2.4),
    ("cat:banane", "Banane", 89.0, 1.1, 23.0, 0.3, 2.6),
    ("cat:citron", "Citron", 29.0, 1.1, 9.3, 0.3, 2.8),
    ("cat:miel", "Miel", 304.0, 0.3, 82.0, 0.0, 0.2),
    ("cat:sel", "Sel", 0.0, 0.0, 0.0, 0.0, 0.0),
    ("cat:poivre-noir", "Poivre noir", 251.0, 10.4, 64.0, 3.3, 25.3),
];

/// An in-memory, ordered table of known ingredients
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<IngredientSuggestion>,
}

impl Catalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|&(id, name, calories, proteins, carbs, fat, fiber)| IngredientSuggestion {
                id: Some(id.to_string()),
                name: name.to_string(),
                source: SuggestionSource::Local,
                calories,
                proteins,
                carbs,
                fat,
                fiber,
            })
            .collect();
        Self { entries }
    }

    /// A catalog with custom entries, all marked as local
    pub fn from_entries(entries: impl IntoIterator<Item = IngredientSuggestion>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut e| {
                e.source = SuggestionSource::Local;
                e
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First `max` entries whose name contains `fragment`, ignoring case,
    /// in catalog order.
    pub fn search(&self, fragment: &str, max: usize) -> Vec<IngredientSuggestion> {
        let needle = fragment.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .take(max)
            .cloned()
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
