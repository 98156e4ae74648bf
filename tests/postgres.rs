//! Repository tests against a real Postgres. Each test gets a fresh database
//! from `#[sqlx::test]`; run with `DATABASE_URL=... cargo test -- --ignored`.

use recipebox::auth::repo::{PgUserRepo, UserRepo};
use recipebox::auth::repo_types::NewUser;
use recipebox::recipes::repo::{PgSavedRecipeRepo, SavedRecipeRepo};
use recipebox::recipes::repo_types::{RecipeRow, SaveOutcome};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

fn new_user(name: &str) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{}@example.com", name),
        password_hash: "$argon2id$fake".to_string(),
    }
}

async fn user_id(pool: &PgPool, name: &str) -> Uuid {
    PgUserRepo::new(pool.clone())
        .create(new_user(name))
        .await
        .unwrap()
        .expect("fresh user")
        .id
}

fn recipe(id: i64, title: &str) -> RecipeRow {
    RecipeRow {
        recipe_id: id,
        recipe_name: title.to_string(),
        image: Some(format!("https://img.example.com/{}.jpg", id)),
        ingredients: vec![json!({ "name": "flour", "amount": 2 })],
        nutrition_info: json!({ "nutrients": [{ "name": "Calories", "amount": 310.5 }] }),
        calories: Some(310.5),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn user_create_find_and_uniqueness(pool: PgPool) {
    let repo = PgUserRepo::new(pool);

    let alice = repo.create(new_user("alice")).await.unwrap().unwrap();
    assert_eq!(alice.username, "alice");

    // Same username, or same email under another name, loses.
    assert!(repo.create(new_user("alice")).await.unwrap().is_none());
    let mut clash = new_user("alicia");
    clash.email = "alice@example.com".into();
    assert!(repo.create(clash).await.unwrap().is_none());

    assert!(repo.exists("alice", "nobody@example.com").await.unwrap());
    assert!(repo.exists("nobody", "alice@example.com").await.unwrap());
    assert!(!repo.exists("nobody", "nobody@example.com").await.unwrap());

    let found = repo.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(found.id, alice.id);
    assert!(repo.find_by_username("bob").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn saving_twice_keeps_one_link(pool: PgPool) {
    let uid = user_id(&pool, "alice").await;
    let repo = PgSavedRecipeRepo::new(pool);

    assert_eq!(repo.save(uid, recipe(7, "Pie")).await.unwrap(), SaveOutcome::Saved);
    assert_eq!(
        repo.save(uid, recipe(7, "Pie")).await.unwrap(),
        SaveOutcome::AlreadySaved
    );
    assert_eq!(repo.list_saved(uid).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_is_newest_first_and_blobs_roundtrip(pool: PgPool) {
    let uid = user_id(&pool, "alice").await;
    let other = user_id(&pool, "bob").await;
    let repo = PgSavedRecipeRepo::new(pool);

    assert!(repo.list_saved(uid).await.unwrap().is_empty());

    repo.save(uid, recipe(1, "First")).await.unwrap();
    repo.save(uid, recipe(2, "Second")).await.unwrap();
    repo.save(other, recipe(3, "Elsewhere")).await.unwrap();

    let rows = repo.list_saved(uid).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.recipe_id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(rows[0].save_date >= rows[1].save_date);

    let expected = recipe(2, "Second");
    assert_eq!(rows[0].ingredients.0, expected.ingredients);
    assert_eq!(rows[0].nutrition_info.0, expected.nutrition_info);
    assert_eq!(rows[0].calories, Some(310.5));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn resave_by_another_user_refreshes_recipe(pool: PgPool) {
    let alice = user_id(&pool, "alice").await;
    let bob = user_id(&pool, "bob").await;
    let repo = PgSavedRecipeRepo::new(pool);

    repo.save(alice, recipe(9, "Old title")).await.unwrap();

    let mut updated = recipe(9, "New title");
    updated.image = None;
    updated.calories = None;
    assert_eq!(repo.save(bob, updated).await.unwrap(), SaveOutcome::Saved);

    // One shared copy, so both users see the refreshed fields.
    let row = repo.list_saved(alice).await.unwrap().remove(0);
    assert_eq!(row.recipe_name, "New title");
    assert_eq!(row.image, None);
    assert_eq!(row.calories, None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_saves_yield_one_row(pool: PgPool) {
    let uid = user_id(&pool, "alice").await;
    let repo = PgSavedRecipeRepo::new(pool);

    // Separate connections; the second insert waits on the first's key lock.
    let (a, b) = tokio::join!(
        repo.save(uid, recipe(11, "Race")),
        repo.save(uid, recipe(11, "Race"))
    );
    let mut outcomes = vec![a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| *o == SaveOutcome::AlreadySaved);
    assert_eq!(outcomes, vec![SaveOutcome::Saved, SaveOutcome::AlreadySaved]);
    assert_eq!(repo.list_saved(uid).await.unwrap().len(), 1);
}
