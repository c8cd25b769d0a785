//! Recipes and shopping lists survive a restart
//!
//! Run with: `cargo test --test persistence`

mod common;

use common::{crepes, gateau, temp_config};
use marmite::{
    Difficulty, MarmiteApi, OpenStore, RecipeFilter, RecipeQuery, RecipeStore, SqliteStore,
    StaticAuth, UserId,
};
use std::sync::Arc;

fn open(config: &marmite::Config) -> MarmiteApi {
    let auth = Arc::new(StaticAuth::from_option(config.user.clone()));
    MarmiteApi::open(config, auth).unwrap()
}

#[test]
fn recipes_and_lists_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path(), "alice");

    let (crepes_id, item_count) = {
        let api = open(&config);
        let crepes = api.create_recipe(crepes()).unwrap();
        api.create_recipe(gateau()).unwrap();
        let list = api.add_recipe_to_list(crepes.id.as_str(), 2.0).unwrap();
        (crepes.id, list.items.len())
    };

    let api = open(&config);
    assert_eq!(api.list_recipes(&RecipeQuery::new()).total_count, 2);

    let reloaded = api.get_recipe(crepes_id.as_str()).unwrap();
    assert_eq!(reloaded.name, "Crêpes");
    assert_eq!(reloaded.total_calories, 304);
    assert_eq!(reloaded.tags, vec!["dessert", "goûter"]);

    let list = api.shopping_list().unwrap();
    assert_eq!(list.items.len(), item_count);
    assert_eq!(list.recipes, vec![crepes_id]);
}

#[test]
fn edits_and_deletes_are_written_through() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path(), "alice");

    let (kept, deleted) = {
        let api = open(&config);
        let kept = api.create_recipe(crepes()).unwrap();
        let deleted = api.create_recipe(gateau()).unwrap();
        api.patch_recipe(
            kept.id.as_str(),
            marmite::RecipePatch {
                difficulty: Some(Difficulty::Moyen),
                ..Default::default()
            },
        )
        .unwrap();
        api.delete_recipe(deleted.id.as_str()).unwrap();
        (kept.id, deleted.id)
    };

    let store = SqliteStore::open(&config.db_path).unwrap();
    assert!(store.get_recipe(&deleted).unwrap().is_none());
    let stored = store.get_recipe(&kept).unwrap().unwrap();
    assert_eq!(stored.difficulty, Difficulty::Moyen);
    assert!(stored.updated_at.is_some());

    let moyens = store
        .list_recipes(&RecipeFilter::new().with_difficulty(Difficulty::Moyen))
        .unwrap();
    assert_eq!(moyens.len(), 1);
}

#[test]
fn each_user_keeps_a_separate_stored_list() {
    let dir = tempfile::tempdir().unwrap();
    let alice_config = temp_config(dir.path(), "alice");
    let bob_config = temp_config(dir.path(), "bob");

    {
        let alice = open(&alice_config);
        alice.add_list_item("Pain", 1.0, "pièce", None).unwrap();
    }
    {
        let bob = open(&bob_config);
        assert!(bob.shopping_list().unwrap().items.is_empty());
        bob.add_list_item("Lait", 2.0, "l", None).unwrap();
    }

    let store = SqliteStore::open(&alice_config.db_path).unwrap();
    let alice_list = store.load_shopping_list(&UserId::from("alice")).unwrap().unwrap();
    let bob_list = store.load_shopping_list(&UserId::from("bob")).unwrap().unwrap();
    assert_eq!(alice_list.items[0].name, "Pain");
    assert_eq!(bob_list.items[0].name, "Lait");
}
