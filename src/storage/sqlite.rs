//! SQLite storage backend for marmite

use super::traits::{OpenStore, RecipeFilter, RecipeStore, StorageError, StorageResult};
use crate::model::{Recipe, RecipeId, ShoppingList, UserId};
use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Column values for one row of the `recipes` table
struct RecipeRow {
    id: String,
    name: String,
    name_lower: String,
    difficulty: &'static str,
    author: String,
    created_at: String,
    document: String,
}

impl RecipeRow {
    fn from_recipe(recipe: &Recipe) -> StorageResult<Self> {
        Ok(Self {
            id: recipe.id.as_str().to_string(),
            name: recipe.name.clone(),
            name_lower: recipe.name.to_lowercase(),
            difficulty: recipe.difficulty.as_str(),
            author: recipe.author.as_str().to_string(),
            created_at: recipe.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            document: serde_json::to_string(recipe)?,
        })
    }
}

/// SQLite-backed recipe store
///
/// Each recipe and shopping list is kept as a JSON document. The scalar
/// columns next to the document exist only for filtering and ordering.
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Recipes: full document plus indexed filter columns
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_lower TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                author TEXT NOT NULL,
                created_at TEXT NOT NULL,
                document_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recipes_difficulty ON recipes(difficulty);
            CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author);
            CREATE INDEX IF NOT EXISTS idx_recipes_created ON recipes(created_at);

            -- One shopping list per user
            CREATE TABLE IF NOT EXISTS shopping_lists (
                user_id TEXT PRIMARY KEY,
                document_json TEXT NOT NULL
            );

            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn recipe_exists(conn: &Connection, id: &str) -> StorageResult<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM recipes WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl RecipeStore for SqliteStore {
    // === Recipe Operations ===

    fn get_recipe(&self, id: &RecipeId) -> StorageResult<Option<Recipe>> {
        let conn = self.conn.lock().unwrap();
        let doc: Option<String> = conn
            .query_row(
                "SELECT document_json FROM recipes WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match doc {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn list_recipes(&self, filter: &RecipeFilter) -> StorageResult<Vec<Recipe>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = String::from("SELECT document_json FROM recipes WHERE 1 = 1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref fragment) = filter.name_contains {
            sql.push_str(" AND instr(name_lower, ?) > 0");
            params_vec.push(Box::new(fragment.trim().to_lowercase()));
        }

        if let Some(difficulty) = filter.difficulty {
            sql.push_str(" AND difficulty = ?");
            params_vec.push(Box::new(difficulty.as_str().to_string()));
        }

        if let Some(ref author) = filter.author {
            sql.push_str(" AND author = ?");
            params_vec.push(Box::new(author.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, name ASC");

        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded
        match (filter.limit, filter.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(params_refs.as_slice(), |row| row.get::<_, String>(0))?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(serde_json::from_str(&row?)?);
        }
        debug!(count = recipes.len(), "listed recipes");
        Ok(recipes)
    }

    fn create_recipe(&self, recipe: &Recipe) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        if Self::recipe_exists(&conn, recipe.id.as_str())? {
            return Err(StorageError::RecipeExists(recipe.id.to_string()));
        }

        let row = RecipeRow::from_recipe(recipe)?;
        conn.execute(
            r#"
            INSERT INTO recipes (id, name, name_lower, difficulty, author, created_at, document_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                row.id,
                row.name,
                row.name_lower,
                row.difficulty,
                row.author,
                row.created_at,
                row.document
            ],
        )?;
        Ok(())
    }

    fn update_recipe(&self, recipe: &Recipe) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        let row = RecipeRow::from_recipe(recipe)?;

        let rows = conn.execute(
            r#"
            UPDATE recipes SET
                name = ?2,
                name_lower = ?3,
                difficulty = ?4,
                author = ?5,
                created_at = ?6,
                document_json = ?7
            WHERE id = ?1
            "#,
            params![
                row.id,
                row.name,
                row.name_lower,
                row.difficulty,
                row.author,
                row.created_at,
                row.document
            ],
        )?;

        if rows == 0 {
            return Err(StorageError::RecipeNotFound(row.id));
        }
        Ok(())
    }

    fn delete_recipe(&self, id: &RecipeId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", params![id.as_str()])?;
        Ok(rows > 0)
    }

    // === Shopping List Operations ===

    fn load_shopping_list(&self, user: &UserId) -> StorageResult<Option<ShoppingList>> {
        let conn = self.conn.lock().unwrap();
        let doc: Option<String> = conn
            .query_row(
                "SELECT document_json FROM shopping_lists WHERE user_id = ?1",
                params![user.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match doc {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_shopping_list(&self, list: &ShoppingList) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        let doc = serde_json::to_string(list)?;

        conn.execute(
            r#"
            INSERT INTO shopping_lists (user_id, document_json)
            VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET
                document_json = excluded.document_json
            "#,
            params![list.user_id.as_str(), doc],
        )?;
        Ok(())
    }

    fn delete_shopping_list(&self, user: &UserId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM shopping_lists WHERE user_id = ?1",
            params![user.as_str()],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, IngredientLine, RecipeDraft};
    use chrono::{Duration, Utc};

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn create_test_recipe(name: &str, difficulty: Difficulty, author: &str) -> Recipe {
        RecipeDraft {
            name: name.into(),
            difficulty,
            prep_minutes: 10,
            cook_minutes: 20,
            servings: 4,
            ingredients: vec![IngredientLine::new("Tomates", 100.0, "g").with_calories(18.0)],
            steps: vec!["Cuire".into()],
            tags: vec!["été".into()],
            ..Default::default()
        }
        .into_recipe(UserId::from(author))
        .unwrap()
    }

    #[test]
    fn test_create_and_get_recipe() {
        let store = create_test_store();
        let recipe = create_test_recipe("Gaspacho", Difficulty::Facile, "alice");

        store.create_recipe(&recipe).unwrap();

        let loaded = store.get_recipe(&recipe.id).unwrap().unwrap();
        assert_eq!(loaded, recipe);
    }

    #[test]
    fn test_create_duplicate_fails() {
        let store = create_test_store();
        let recipe = create_test_recipe("Gaspacho", Difficulty::Facile, "alice");
        store.create_recipe(&recipe).unwrap();

        assert!(matches!(
            store.create_recipe(&recipe),
            Err(StorageError::RecipeExists(_))
        ));
    }

    #[test]
    fn test_get_missing_recipe() {
        let store = create_test_store();
        assert!(store.get_recipe(&RecipeId::from("nope")).unwrap().is_none());
    }

    #[test]
    fn test_update_recipe() {
        let store = create_test_store();
        let mut recipe = create_test_recipe("Gaspacho", Difficulty::Facile, "alice");
        store.create_recipe(&recipe).unwrap();

        recipe.name = "Gaspacho andalou".into();
        recipe.difficulty = Difficulty::Moyen;
        store.update_recipe(&recipe).unwrap();

        let loaded = store.get_recipe(&recipe.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Gaspacho andalou");
        assert_eq!(loaded.difficulty, Difficulty::Moyen);

        // filter columns follow the document
        let by_name = store
            .list_recipes(&RecipeFilter::new().with_name("ANDALOU"))
            .unwrap();
        assert_eq!(by_name.len(), 1);
        let by_level = store
            .list_recipes(&RecipeFilter::new().with_difficulty(Difficulty::Moyen))
            .unwrap();
        assert_eq!(by_level[0].id, recipe.id);
        assert!(store
            .list_recipes(&RecipeFilter::new().with_difficulty(Difficulty::Facile))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_update_missing_recipe_fails() {
        let store = create_test_store();
        let recipe = create_test_recipe("Gaspacho", Difficulty::Facile, "alice");
        assert!(matches!(
            store.update_recipe(&recipe),
            Err(StorageError::RecipeNotFound(_))
        ));
    }

    #[test]
    fn test_delete_recipe() {
        let store = create_test_store();
        let recipe = create_test_recipe("Gaspacho", Difficulty::Facile, "alice");
        store.create_recipe(&recipe).unwrap();

        assert!(store.delete_recipe(&recipe.id).unwrap());
        assert!(!store.delete_recipe(&recipe.id).unwrap());
        assert!(store.get_recipe(&recipe.id).unwrap().is_none());
    }

    #[test]
    fn test_list_recipes_filters() {
        let store = create_test_store();
        store.create_recipe(&create_test_recipe("Tarte aux pommes", Difficulty::Moyen, "alice")).unwrap();
        store.create_recipe(&create_test_recipe("Tarte TATIN", Difficulty::Difficile, "bob")).unwrap();
        store.create_recipe(&create_test_recipe("Crêpes", Difficulty::Facile, "alice")).unwrap();

        let tartes = store.list_recipes(&RecipeFilter::new().with_name("tarte")).unwrap();
        assert_eq!(tartes.len(), 2);

        let tatin = store.list_recipes(&RecipeFilter::new().with_name("tatin")).unwrap();
        assert_eq!(tatin.len(), 1);

        let faciles = store
            .list_recipes(&RecipeFilter::new().with_difficulty(Difficulty::Facile))
            .unwrap();
        assert_eq!(faciles.len(), 1);
        assert_eq!(faciles[0].name, "Crêpes");

        let by_alice = store
            .list_recipes(&RecipeFilter::new().with_author(UserId::from("alice")))
            .unwrap();
        assert_eq!(by_alice.len(), 2);

        let combined = store
            .list_recipes(
                &RecipeFilter::new()
                    .with_name("TARTE")
                    .with_author(UserId::from("alice")),
            )
            .unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].name, "Tarte aux pommes");
    }

    #[test]
    fn test_list_recipes_newest_first_with_pagination() {
        let store = create_test_store();
        let now = Utc::now();
        for i in 0..5 {
            let mut recipe = create_test_recipe(&format!("Recette {}", i), Difficulty::Facile, "alice");
            recipe.created_at = now - Duration::minutes(10 - i);
            store.create_recipe(&recipe).unwrap();
        }

        let all = store.list_recipes(&RecipeFilter::new()).unwrap();
        let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Recette 4", "Recette 3", "Recette 2", "Recette 1", "Recette 0"]);

        let page = store
            .list_recipes(&RecipeFilter::new().with_offset(1).with_limit(2))
            .unwrap();
        let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Recette 3", "Recette 2"]);

        let tail = store.list_recipes(&RecipeFilter::new().with_offset(4)).unwrap();
        assert_eq!(tail.len(), 1);
    }

    #[test]
    fn test_shopping_list_round_trip() {
        let store = create_test_store();
        let user = UserId::from("alice");
        assert!(store.load_shopping_list(&user).unwrap().is_none());

        let mut list = ShoppingList::new(user.clone());
        list.add_item("Farine", 250.0, "g", Some("cat:farine"));
        store.save_shopping_list(&list).unwrap();

        list.add_item("Lait", 1.0, "l", None);
        store.save_shopping_list(&list).unwrap();

        let loaded = store.load_shopping_list(&user).unwrap().unwrap();
        assert_eq!(loaded, list);

        assert!(store.delete_shopping_list(&user).unwrap());
        assert!(store.load_shopping_list(&user).unwrap().is_none());
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("marmite.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .create_recipe(&create_test_recipe("Gaspacho", Difficulty::Facile, "alice"))
                .unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.list_recipes(&RecipeFilter::new()).unwrap().len(), 1);
    }
}
