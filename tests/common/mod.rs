//! Shared fixtures for marmite integration tests
#![allow(dead_code)]

use marmite::nutrition::MockSource;
use marmite::{
    Catalog, Config, Difficulty, IngredientLine, IngredientSearch, Kitchen, MarmiteApi,
    RecipeDraft, StaticAuth,
};
use std::path::Path;
use std::sync::Arc;

/// An in-memory API acting as `user`, catalog-only search.
pub fn api_for(user: &str) -> MarmiteApi {
    MarmiteApi::new(
        Arc::new(Kitchen::new()),
        Arc::new(IngredientSearch::local_only(Catalog::builtin())),
        Arc::new(StaticAuth::user(user)),
    )
}

/// An in-memory API whose external source is `source`.
pub fn api_with_source(user: &str, source: Arc<MockSource>) -> MarmiteApi {
    MarmiteApi::new(
        Arc::new(Kitchen::new()),
        Arc::new(IngredientSearch::new(Catalog::builtin(), source)),
        Arc::new(StaticAuth::user(user)),
    )
}

/// Same kitchen, different user.
pub fn as_user(api: &MarmiteApi, user: &str) -> MarmiteApi {
    api.with_auth(Arc::new(StaticAuth::user(user)))
}

/// Config pointing at a database under `dir` and an unreachable food database.
pub fn temp_config(dir: &Path, user: &str) -> Config {
    Config {
        db_path: dir.join("marmite.db"),
        off_url: "http://127.0.0.1:9".to_string(),
        http_timeout_ms: 200,
        search_limit: 10,
        user: Some(user.to_string()),
    }
}

pub fn crepes() -> RecipeDraft {
    RecipeDraft {
        name: "Crêpes".into(),
        description: Some("Pour 4 gourmands".into()),
        difficulty: Difficulty::Facile,
        prep_minutes: 10,
        cook_minutes: 20,
        servings: 4,
        ingredients: vec![
            IngredientLine::new("Farine de blé", 62.5, "g")
                .with_id("cat:farine-ble")
                .with_calories(364.0)
                .with_macros(10.0, 76.0, 1.0, 2.7),
            IngredientLine::new("Lait entier", 125.0, "ml")
                .with_id("cat:lait-entier")
                .with_calories(61.0),
            IngredientLine::new("Oeufs", 1.0, "pièce"),
        ],
        steps: vec![
            "Mélanger la farine et les oeufs".into(),
            "Ajouter le lait petit à petit".into(),
            "Cuire à la poêle".into(),
        ],
        tags: vec!["Dessert".into(), "goûter".into()],
    }
}

pub fn gateau() -> RecipeDraft {
    RecipeDraft {
        name: "Gâteau au yaourt".into(),
        description: None,
        difficulty: Difficulty::Facile,
        prep_minutes: 15,
        cook_minutes: 35,
        servings: 6,
        ingredients: vec![
            IngredientLine::new("Farine", 40.0, "g")
                .with_id("cat:farine-ble")
                .with_calories(364.0),
            IngredientLine::new("Yaourt nature", 20.0, "g").with_calories(61.0),
            IngredientLine::new("oeufs", 0.5, "Pièce"),
        ],
        steps: vec!["Tout mélanger".into(), "Cuire 35 minutes".into()],
        tags: vec!["dessert".into()],
    }
}
