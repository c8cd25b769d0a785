//! Transport-independent API layer.
//!
//! `MarmiteApi` is the single entry point for all consumer-facing operations.
//! Transports (MCP, CLI, direct embedding) call `MarmiteApi` methods; they
//! never reach into `Kitchen` or `IngredientSearch` directly.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::model::{
    ItemId, Kitchen, KitchenError, Recipe, RecipeDraft, RecipeId, RecipePatch, ShoppingList,
    UserId, ValidationError,
};
use crate::nutrition::{
    Catalog, IngredientSearch, IngredientSuggestion, NutritionError, OpenFoodFactsClient,
};
use crate::query::{QueryResult, RecipeQuery};
use crate::storage::{OpenStore, SqliteStore, StorageError};

/// Errors surfaced to API consumers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("sign in required")]
    Unauthenticated,

    #[error("recipe {recipe} belongs to another user")]
    Forbidden { recipe: RecipeId, user: UserId },

    #[error("recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    #[error("shopping list item not found: {0}")]
    ItemNotFound(ItemId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Kitchen(KitchenError),
}

impl From<KitchenError> for ApiError {
    fn from(e: KitchenError) -> Self {
        match e {
            KitchenError::RecipeNotFound(id) => ApiError::RecipeNotFound(id),
            KitchenError::ItemNotFound(id) => ApiError::ItemNotFound(id),
            KitchenError::Invalid(v) => ApiError::Invalid(v),
            other => ApiError::Kitchen(other),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors while assembling the API from configuration
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to open database at {}: {source}", path.display())]
    Store { path: PathBuf, source: StorageError },

    #[error("failed to load recipes: {0}")]
    Load(#[from] KitchenError),

    #[error("failed to build nutrition client: {0}")]
    Nutrition(#[from] NutritionError),
}

/// Single entry point for all consumer-facing operations.
#[derive(Clone)]
pub struct MarmiteApi {
    kitchen: Arc<Kitchen>,
    search: Arc<IngredientSearch>,
    auth: Arc<dyn AuthProvider>,
}

impl MarmiteApi {
    /// Create a new API instance.
    pub fn new(
        kitchen: Arc<Kitchen>,
        search: Arc<IngredientSearch>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            kitchen,
            search,
            auth,
        }
    }

    /// Open the configured database, load its recipes and wire the
    /// catalog to the external food database.
    pub fn open(config: &Config, auth: Arc<dyn AuthProvider>) -> Result<Self, SetupError> {
        let store = SqliteStore::open(&config.db_path).map_err(|source| SetupError::Store {
            path: config.db_path.clone(),
            source,
        })?;
        let kitchen = Kitchen::with_store(Arc::new(store));
        kitchen.load_all()?;

        let client = OpenFoodFactsClient::new(config.off_url.clone(), config.http_timeout())?;
        let search = IngredientSearch::new(Catalog::builtin(), Arc::new(client));

        info!(db = %config.db_path.display(), off_url = %config.off_url, "api ready");
        Ok(Self::new(Arc::new(kitchen), Arc::new(search), auth))
    }

    /// The same API acting through another identity provider.
    pub fn with_auth(&self, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            kitchen: self.kitchen.clone(),
            search: self.search.clone(),
            auth,
        }
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.auth.current_user()
    }

    fn require_user(&self) -> ApiResult<UserId> {
        self.auth.current_user().ok_or(ApiError::Unauthenticated)
    }

    /// Fetch a recipe the acting user is allowed to modify.
    fn owned_recipe(&self, id: &str) -> ApiResult<(UserId, Recipe)> {
        let user = self.require_user()?;
        let id = RecipeId::from(id);
        let recipe = self
            .kitchen
            .get_recipe(&id)
            .ok_or(ApiError::RecipeNotFound(id))?;
        if recipe.author != user {
            return Err(ApiError::Forbidden {
                recipe: recipe.id,
                user,
            });
        }
        Ok((user, recipe))
    }

    // --- Recipes ---

    /// Publish a new recipe authored by the acting user.
    pub fn create_recipe(&self, draft: RecipeDraft) -> ApiResult<Recipe> {
        let user = self.require_user()?;
        let recipe = draft.into_recipe(user)?;
        self.kitchen.insert_recipe(recipe.clone())?;
        info!(recipe = %recipe.id, author = %recipe.author, "recipe created");
        Ok(recipe)
    }

    pub fn get_recipe(&self, id: &str) -> ApiResult<Recipe> {
        let id = RecipeId::from(id);
        self.kitchen
            .get_recipe(&id)
            .ok_or(ApiError::RecipeNotFound(id))
    }

    /// Replace every editable field of a recipe.
    pub fn update_recipe(&self, id: &str, draft: RecipeDraft) -> ApiResult<Recipe> {
        let (_, mut recipe) = self.owned_recipe(id)?;
        draft.apply(&mut recipe)?;
        self.kitchen.replace_recipe(recipe.clone())?;
        Ok(recipe)
    }

    /// Change only the fields present in `patch`.
    pub fn patch_recipe(&self, id: &str, patch: RecipePatch) -> ApiResult<Recipe> {
        let (_, mut recipe) = self.owned_recipe(id)?;
        patch.apply_to(&recipe).apply(&mut recipe)?;
        self.kitchen.replace_recipe(recipe.clone())?;
        Ok(recipe)
    }

    /// Delete a recipe. Shopping lists keep their copied items.
    pub fn delete_recipe(&self, id: &str) -> ApiResult<Recipe> {
        let (_, recipe) = self.owned_recipe(id)?;
        let removed = self.kitchen.remove_recipe(&recipe.id)?;
        info!(recipe = %removed.id, "recipe deleted");
        Ok(removed)
    }

    pub fn list_recipes(&self, query: &RecipeQuery) -> QueryResult {
        self.kitchen.find_recipes(query)
    }

    // --- Ingredients ---

    /// Hybrid catalog/external lookup. An empty result means the caller
    /// should offer manual entry.
    pub async fn search_ingredients(&self, query: &str, limit: usize) -> Vec<IngredientSuggestion> {
        self.search.search(query, limit).await
    }

    // --- Shopping list ---

    /// The acting user's list, created empty on first access.
    pub fn shopping_list(&self) -> ApiResult<ShoppingList> {
        let user = self.require_user()?;
        Ok(self.kitchen.shopping_list(&user)?)
    }

    pub fn add_recipe_to_list(&self, recipe_id: &str, servings_multiplier: f64) -> ApiResult<ShoppingList> {
        let user = self.require_user()?;
        Ok(self
            .kitchen
            .add_recipe_to_list(&user, &RecipeId::from(recipe_id), servings_multiplier)?)
    }

    pub fn remove_recipe_from_list(&self, recipe_id: &str) -> ApiResult<ShoppingList> {
        let user = self.require_user()?;
        Ok(self
            .kitchen
            .remove_recipe_from_list(&user, &RecipeId::from(recipe_id))?)
    }

    pub fn add_list_item(
        &self,
        name: &str,
        quantity: f64,
        unit: &str,
        ingredient_id: Option<&str>,
    ) -> ApiResult<ShoppingList> {
        let user = self.require_user()?;
        Ok(self
            .kitchen
            .add_list_item(&user, name, quantity, unit, ingredient_id)?)
    }

    pub fn toggle_list_item(&self, item_id: &str) -> ApiResult<ShoppingList> {
        let user = self.require_user()?;
        Ok(self.kitchen.toggle_list_item(&user, &ItemId::from(item_id))?)
    }

    pub fn remove_list_item(&self, item_id: &str) -> ApiResult<ShoppingList> {
        let user = self.require_user()?;
        Ok(self.kitchen.remove_list_item(&user, &ItemId::from(item_id))?)
    }

    /// Drop checked items from the acting user's list; returns how many went.
    pub fn clear_checked_items(&self) -> ApiResult<usize> {
        let user = self.require_user()?;
        Ok(self.kitchen.clear_checked_items(&user)?)
    }

    pub fn clear_shopping_list(&self) -> ApiResult<ShoppingList> {
        let user = self.require_user()?;
        Ok(self.kitchen.clear_shopping_list(&user)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuth;
    use crate::model::{Difficulty, IngredientLine};
    use crate::nutrition::Catalog;

    fn setup() -> (Arc<Kitchen>, MarmiteApi) {
        let kitchen = Arc::new(Kitchen::new());
        let search = Arc::new(IngredientSearch::local_only(Catalog::builtin()));
        let api = MarmiteApi::new(kitchen.clone(), search, Arc::new(StaticAuth::user("alice")));
        (kitchen, api)
    }

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Crêpes".into(),
            difficulty: Difficulty::Facile,
            prep_minutes: 10,
            cook_minutes: 20,
            servings: 4,
            ingredients: vec![
                IngredientLine::new("Farine", 62.5, "g").with_calories(364.0),
                IngredientLine::new("Lait", 125.0, "ml").with_calories(61.0),
            ],
            steps: vec!["Mélanger".into(), "Cuire".into()],
            ..Default::default()
        }
    }

    // === Scenario: recipes are created with derived nutrition ===
    #[test]
    fn create_recipe_derives_calories() {
        let (kitchen, api) = setup();
        let recipe = api.create_recipe(draft()).unwrap();

        // 364 × 0.625 + 61 × 1.25 = 227.5 + 76.25 = 303.75
        assert_eq!(recipe.total_calories, 304);
        assert_eq!(recipe.author, UserId::from("alice"));
        assert!(kitchen.has_recipe(&recipe.id));
    }

    #[test]
    fn create_recipe_requires_user() {
        let (_, api) = setup();
        let anonymous = api.with_auth(Arc::new(StaticAuth::anonymous()));
        assert!(matches!(
            anonymous.create_recipe(draft()),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn invalid_draft_is_rejected() {
        let (kitchen, api) = setup();
        let err = api
            .create_recipe(RecipeDraft {
                steps: vec![],
                ..draft()
            })
            .unwrap_err();
        match err {
            ApiError::Invalid(v) => assert!(v.has_field("steps")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(kitchen.recipe_count(), 0);
    }

    // === Scenario: only the author may edit or delete ===
    #[test]
    fn other_users_cannot_modify() {
        let (_, api) = setup();
        let recipe = api.create_recipe(draft()).unwrap();
        let bob = api.with_auth(Arc::new(StaticAuth::user("bob")));

        assert!(matches!(
            bob.update_recipe(recipe.id.as_str(), draft()),
            Err(ApiError::Forbidden { .. })
        ));
        assert!(matches!(
            bob.delete_recipe(recipe.id.as_str()),
            Err(ApiError::Forbidden { .. })
        ));
        // reading is open to everyone
        assert!(bob.get_recipe(recipe.id.as_str()).is_ok());
    }

    #[test]
    fn patch_recomputes_nutrition_and_keeps_identity() {
        let (_, api) = setup();
        let recipe = api.create_recipe(draft()).unwrap();

        let patched = api
            .patch_recipe(
                recipe.id.as_str(),
                RecipePatch {
                    ingredients: Some(vec![IngredientLine::new("Farine", 100.0, "g").with_calories(364.0)]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(patched.id, recipe.id);
        assert_eq!(patched.created_at, recipe.created_at);
        assert_eq!(patched.name, "Crêpes");
        assert_eq!(patched.total_calories, 364);
        assert!(patched.updated_at.is_some());
        assert_eq!(api.get_recipe(recipe.id.as_str()).unwrap(), patched);
    }

    #[test]
    fn update_missing_recipe() {
        let (_, api) = setup();
        assert!(matches!(
            api.update_recipe("nope", draft()),
            Err(ApiError::RecipeNotFound(_))
        ));
    }

    // === Scenario: deleting a recipe leaves shopping lists alone ===
    #[test]
    fn delete_recipe_keeps_list_items() {
        let (_, api) = setup();
        let recipe = api.create_recipe(draft()).unwrap();
        api.add_recipe_to_list(recipe.id.as_str(), 2.0).unwrap();

        api.delete_recipe(recipe.id.as_str()).unwrap();

        let list = api.shopping_list().unwrap();
        assert_eq!(list.items.len(), 2);
        assert!(matches!(
            api.get_recipe(recipe.id.as_str()),
            Err(ApiError::RecipeNotFound(_))
        ));
    }

    #[test]
    fn list_recipes_filters_by_author() {
        let (_, api) = setup();
        api.create_recipe(draft()).unwrap();
        let bob = api.with_auth(Arc::new(StaticAuth::user("bob")));
        bob.create_recipe(RecipeDraft {
            name: "Gaufres".into(),
            ..draft()
        })
        .unwrap();

        let all = api.list_recipes(&RecipeQuery::new());
        assert_eq!(all.total_count, 2);
        let bobs = api.list_recipes(&RecipeQuery::new().with_author(UserId::from("bob")));
        assert_eq!(bobs.total_count, 1);
        assert_eq!(bobs.recipes[0].name, "Gaufres");
    }

    // === Scenario: shopping lists are per user ===
    #[test]
    fn shopping_lists_are_per_user() {
        let (_, api) = setup();
        let recipe = api.create_recipe(draft()).unwrap();
        api.add_recipe_to_list(recipe.id.as_str(), 1.0).unwrap();

        let bob = api.with_auth(Arc::new(StaticAuth::user("bob")));
        assert!(bob.shopping_list().unwrap().is_empty());
        assert_eq!(api.shopping_list().unwrap().items.len(), 2);
    }

    #[test]
    fn shopping_list_requires_user() {
        let (_, api) = setup();
        let anonymous = api.with_auth(Arc::new(StaticAuth::anonymous()));
        assert!(matches!(anonymous.shopping_list(), Err(ApiError::Unauthenticated)));
        assert!(matches!(
            anonymous.add_list_item("Pain", 1.0, "pièce", None),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn list_item_errors_are_mapped() {
        let (_, api) = setup();
        assert!(matches!(
            api.toggle_list_item("missing"),
            Err(ApiError::ItemNotFound(_))
        ));
        assert!(matches!(
            api.add_recipe_to_list("missing", 1.0),
            Err(ApiError::RecipeNotFound(_))
        ));
        assert!(matches!(
            api.add_list_item("Pain", -1.0, "pièce", None),
            Err(ApiError::Kitchen(KitchenError::InvalidQuantity(_)))
        ));
    }

    #[tokio::test]
    async fn search_ingredients_uses_catalog() {
        let (_, api) = setup();
        let results = api.search_ingredients("beur", 5).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Beurre");
    }
}
