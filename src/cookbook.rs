//! The personal cookbook: recipes authored by the user, stored locally
//! as one flat blob. Records are created and deleted whole; there is no
//! editing.

use log::debug;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::error::RecipeError;
use crate::model::{UserRecipe, UserRecipeDraft};
use crate::storage::KeyValueStore;

/// Storage key for the user-authored recipe blob.
pub const COOKBOOK_KEY: &str = "recipes";

const INCOMPLETE_MESSAGE: &str = "Veuillez remplir tous les champs obligatoires.";

pub struct Cookbook<S> {
    storage: S,
    // serializes read-modify-write cycles on the blob
    write_gate: Mutex<()>,
}

impl<S: KeyValueStore> Cookbook<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_gate: Mutex::new(()),
        }
    }

    /// All authored recipes, oldest first. A missing blob is an empty
    /// cookbook.
    pub async fn list(&self) -> Result<Vec<UserRecipe>, RecipeError> {
        match self.storage.get(COOKBOOK_KEY).await? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Validates the draft, assigns it a creation-timestamp id and
    /// appends it to the stored collection. Returns the stored record.
    pub async fn add(&self, draft: UserRecipeDraft) -> Result<UserRecipe, RecipeError> {
        ensure_complete(&draft)?;

        let _guard = self.write_gate.lock().await;
        let mut recipes = self.list().await?;

        let mut id = timestamp_id();
        while recipes.iter().any(|recipe| recipe.id == id) {
            id = (id.parse::<u128>().unwrap_or(0) + 1).to_string();
        }

        let recipe = UserRecipe {
            id,
            name: draft.name,
            ingredients: draft.ingredients,
            steps: draft.steps,
            category: draft.category,
            preparation_time: draft.preparation_time,
            difficulty: draft.difficulty,
        };

        recipes.push(recipe.clone());
        self.persist(&recipes).await?;
        debug!("Added recipe {} ({})", recipe.id, recipe.name);
        Ok(recipe)
    }

    /// Removes the recipe with `id` if present. Returns whether
    /// anything was removed; an unknown id does not write.
    pub async fn remove(&self, id: &str) -> Result<bool, RecipeError> {
        let _guard = self.write_gate.lock().await;
        let mut recipes = self.list().await?;

        let before = recipes.len();
        recipes.retain(|recipe| recipe.id != id);
        if recipes.len() == before {
            return Ok(false);
        }

        self.persist(&recipes).await?;
        debug!("Removed recipe {id}");
        Ok(true)
    }

    async fn persist(&self, recipes: &[UserRecipe]) -> Result<(), RecipeError> {
        let blob = serde_json::to_string(recipes)?;
        self.storage.set(COOKBOOK_KEY, &blob).await
    }
}

fn ensure_complete(draft: &UserRecipeDraft) -> Result<(), RecipeError> {
    let required = [
        &draft.name,
        &draft.ingredients,
        &draft.steps,
        &draft.category,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(RecipeError::InvalidRecipe(INCOMPLETE_MESSAGE.to_string()));
    }
    Ok(())
}

fn timestamp_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
