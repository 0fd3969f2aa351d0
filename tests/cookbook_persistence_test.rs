use tempfile::TempDir;

use pepe_nero::{Cookbook, FileStore, UserRecipeDraft};

fn draft(name: &str, category: &str) -> UserRecipeDraft {
    UserRecipeDraft {
        name: name.to_string(),
        ingredients: "2 œufs, 200g de farine, 50cl de lait".to_string(),
        steps: "Mélanger la pâte. Laisser reposer. Cuire à la poêle.".to_string(),
        category: category.to_string(),
        preparation_time: "30 min".to_string(),
        difficulty: "Facile".to_string(),
    }
}

#[tokio::test]
async fn test_cookbook_survives_restart() {
    let dir = TempDir::new().unwrap();

    let cookbook = Cookbook::new(FileStore::new(dir.path()));
    let crepes = cookbook.add(draft("Crêpes", "Desserts")).await.unwrap();
    let gratin = cookbook.add(draft("Gratin", "Accompagnements")).await.unwrap();

    // a fresh instance over the same directory sees both, oldest first
    let reopened = Cookbook::new(FileStore::new(dir.path()));
    let listed = reopened.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, crepes.id);
    assert_eq!(listed[1].id, gratin.id);

    assert!(reopened.remove(&crepes.id).await.unwrap());
    let remaining = reopened.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Gratin");
}

#[tokio::test]
async fn test_rejected_draft_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let cookbook = Cookbook::new(FileStore::new(dir.path()));

    let mut incomplete = draft("Crêpes", "Desserts");
    incomplete.category = String::new();
    assert!(cookbook.add(incomplete).await.is_err());

    // no blob was ever written
    assert!(cookbook.list().await.unwrap().is_empty());
    assert!(!dir.path().join("recipes.json").exists());
}
