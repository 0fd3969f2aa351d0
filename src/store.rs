//! Client-side state for the recipe screens: the loaded list, the
//! active filter and search, and the persisted favorites.

use futures::future::join_all;
use log::{debug, warn};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;

use crate::catalog::CatalogClient;
use crate::error::RecipeError;
use crate::model::{Recipe, RecipeDetail, RecipeState};
use crate::normalize;
use crate::storage::KeyValueStore;

/// Sentinel category meaning "no filter".
pub const ALL_CATEGORIES: &str = "Tout";

/// Storage key for the favorites blob.
pub const FAVORITES_KEY: &str = "favorites";

const LOAD_ERROR_MESSAGE: &str =
    "Impossible de charger les recettes. Veuillez réessayer plus tard.";

/// State container for recipe browsing. All mutation goes through the
/// methods below; the favorites in memory never diverge from the last
/// blob the gateway accepted.
pub struct RecipeStore<S> {
    catalog: CatalogClient,
    storage: S,
    default_area: String,
    state: RwLock<RecipeState>,
    // serializes the persist-then-commit sequence of favorite toggles
    favorites_gate: Mutex<()>,
    // serializes whole-list loads so their writes cannot interleave
    load_gate: Mutex<()>,
}

impl<S: KeyValueStore> RecipeStore<S> {
    /// `default_area` is the cuisine fetched when no category filter is
    /// active.
    pub fn new(catalog: CatalogClient, storage: S, default_area: impl Into<String>) -> Self {
        Self {
            catalog,
            storage,
            default_area: default_area.into(),
            state: RwLock::new(RecipeState::default()),
            favorites_gate: Mutex::new(()),
            load_gate: Mutex::new(()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RecipeState> {
        self.state.read().expect("state lock poisoned")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RecipeState> {
        self.state.write().expect("state lock poisoned")
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> RecipeState {
        self.read_state().clone()
    }

    /// Replaces the search query. Filtering is local; no fetch happens.
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.write_state().search_query = query.into();
    }

    /// Recipes matching the current search query, case-insensitive on
    /// the name, recomputed on every call.
    pub fn filtered_recipes(&self) -> Vec<Recipe> {
        let state = self.read_state();
        let query = state.search_query.to_lowercase();
        state
            .recipes
            .iter()
            .filter(|recipe| query.is_empty() || recipe.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Loads the recipe list for a source-catalog category, or for the
    /// default cuisine when `category` is `None`, and replaces
    /// `recipes` wholesale. A failed per-item detail lookup drops that
    /// item only; a failed list fetch leaves the previous list in place
    /// and records a user-facing error.
    pub async fn load_recipes(&self, category: Option<&str>) -> Result<(), RecipeError> {
        let _guard = self.load_gate.lock().await;
        {
            let mut state = self.write_state();
            state.loading = true;
            state.error = None;
        }

        match self.fetch_recipes(category).await {
            Ok(recipes) => {
                let mut state = self.write_state();
                state.recipes = recipes;
                state.loading = false;
                Ok(())
            }
            Err(err) => {
                warn!("Failed to load recipes: {err}");
                let mut state = self.write_state();
                state.error = Some(LOAD_ERROR_MESSAGE.to_string());
                state.loading = false;
                Err(err)
            }
        }
    }

    async fn fetch_recipes(&self, category: Option<&str>) -> Result<Vec<Recipe>, RecipeError> {
        let refs = match category {
            Some(category) => self.catalog.filter_by_category(category).await?,
            None => self.catalog.filter_by_area(&self.default_area).await?,
        };

        // one detail request per meal, all in flight at once; join on
        // the full set and keep the survivors in list order
        let outcomes = join_all(refs.iter().map(|meal| self.catalog.lookup(&meal.id))).await;

        let mut recipes = Vec::with_capacity(refs.len());
        for (meal, outcome) in refs.iter().zip(outcomes) {
            match outcome {
                Ok(Some(raw)) => recipes.push(normalize::summarize(&raw)),
                Ok(None) => debug!("Meal {} has no detail record, dropping", meal.id),
                Err(err) => warn!("Dropping meal {}: {err}", meal.id),
            }
        }
        Ok(recipes)
    }

    /// Switches the category filter. `"Tout"` reloads the default
    /// cuisine; a known localized label reloads the matching source
    /// category; an unknown label clears the list instead of leaving a
    /// stale one behind.
    pub async fn set_category(&self, category: &str) -> Result<(), RecipeError> {
        self.write_state().selected_category = category.to_string();

        if category == ALL_CATEGORIES {
            return self.load_recipes(None).await;
        }

        match normalize::source_category(category) {
            Some(key) => self.load_recipes(Some(key)).await,
            None => {
                debug!("Unknown category {category:?}, clearing list");
                self.write_state().recipes.clear();
                Ok(())
            }
        }
    }

    /// Reads the persisted favorites and replaces the in-memory set
    /// wholesale. A missing blob is an empty collection.
    pub async fn load_favorites(&self) -> Result<(), RecipeError> {
        let favorites: Vec<Recipe> = match self.storage.get(FAVORITES_KEY).await? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => Vec::new(),
        };
        self.write_state().favorites = favorites;
        Ok(())
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.read_state().favorites.iter().any(|fav| fav.id == id)
    }

    /// Removes `recipe` from the favorites if present (by id), appends
    /// it otherwise. The new collection is persisted first; in-memory
    /// state only changes once the write has succeeded, so a storage
    /// failure leaves the favorites exactly as they were.
    pub async fn toggle_favorite(&self, recipe: &Recipe) -> Result<(), RecipeError> {
        let _guard = self.favorites_gate.lock().await;

        let mut favorites = self.read_state().favorites.clone();
        if favorites.iter().any(|fav| fav.id == recipe.id) {
            favorites.retain(|fav| fav.id != recipe.id);
        } else {
            favorites.push(recipe.clone());
        }

        let blob = serde_json::to_string(&favorites)?;
        self.storage.set(FAVORITES_KEY, &blob).await?;

        self.write_state().favorites = favorites;
        Ok(())
    }

    /// Full record for one recipe id.
    pub async fn recipe_detail(&self, id: &str) -> Result<RecipeDetail, RecipeError> {
        match self.catalog.lookup(id).await? {
            Some(raw) => Ok(normalize::detail(&raw)),
            None => Err(RecipeError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use mockito::{Server, ServerGuard};

    fn store_for(server: &ServerGuard) -> RecipeStore<MemoryStore> {
        let catalog = CatalogClient::with_base_url(server.url(), None);
        RecipeStore::new(catalog, MemoryStore::new(), "Italian")
    }

    fn sample_recipe(id: &str, name: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            image: String::new(),
            description: String::new(),
            preparation_time: 15,
            difficulty: Difficulty::Facile,
            category: "Pâtes".to_string(),
        }
    }

    fn meal_body(id: &str, name: &str) -> String {
        format!(
            r#"{{"meals": [{{
                "idMeal": "{id}",
                "strMeal": "{name}",
                "strMealThumb": "https://example.com/{id}.jpg",
                "strInstructions": "Cook pasta. Add sauce. Serve.",
                "strCategory": "Pasta",
                "strArea": "Italian",
                "strIngredient1": "pasta",
                "strMeasure1": "500g",
                "strIngredient2": "sauce",
                "strMeasure2": ""
            }}]}}"#
        )
    }

    async fn mock_filter(server: &mut ServerGuard, query: &str, ids: &[&str]) {
        let meals: Vec<String> = ids.iter().map(|id| format!(r#"{{"idMeal": "{id}"}}"#)).collect();
        server
            .mock("GET", format!("/filter.php?{query}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"meals": [{}]}}"#, meals.join(",")))
            .create_async()
            .await;
    }

    async fn mock_lookup(server: &mut ServerGuard, id: &str, name: &str) {
        server
            .mock("GET", format!("/lookup.php?i={id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(meal_body(id, name))
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_load_recipes_drops_failed_detail() {
        let mut server = Server::new_async().await;
        mock_filter(&mut server, "a=Italian", &["1", "2"]).await;
        mock_lookup(&mut server, "1", "Spaghetti Carbonara").await;
        server
            .mock("GET", "/lookup.php?i=2")
            .with_status(500)
            .create_async()
            .await;

        let store = store_for(&server);
        store.load_recipes(None).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.recipes.len(), 1);
        assert_eq!(state.recipes[0].name, "Spaghetti Carbonara");
        assert_eq!(state.error, None);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_load_recipes_normalizes_payload() {
        let mut server = Server::new_async().await;
        mock_filter(&mut server, "a=Italian", &["1"]).await;
        mock_lookup(&mut server, "1", "Spaghetti Carbonara").await;

        let store = store_for(&server);
        store.load_recipes(None).await.unwrap();

        let recipe = &store.snapshot().recipes[0];
        assert_eq!(recipe.id, "1");
        assert_eq!(recipe.category, "Pâtes");
        // 2 ingredients, 3 steps -> 19 minutes, clamped floor is below
        assert_eq!(recipe.preparation_time, 19);
        assert_eq!(recipe.difficulty, Difficulty::Facile);
        assert!(recipe.description.ends_with("..."));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_list() {
        let mut server = Server::new_async().await;
        mock_filter(&mut server, "c=Pasta", &["1"]).await;
        mock_lookup(&mut server, "1", "Spaghetti Carbonara").await;
        server
            .mock("GET", "/filter.php?a=Italian")
            .with_status(500)
            .create_async()
            .await;

        let store = store_for(&server);
        store.load_recipes(Some("Pasta")).await.unwrap();
        assert_eq!(store.snapshot().recipes.len(), 1);

        let result = store.load_recipes(None).await;
        assert!(matches!(result, Err(RecipeError::HttpStatus(500))));

        let state = store.snapshot();
        assert_eq!(state.recipes.len(), 1);
        assert_eq!(
            state.error.as_deref(),
            Some("Impossible de charger les recettes. Veuillez réessayer plus tard.")
        );
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_set_category_resolves_first_source_key() {
        let mut server = Server::new_async().await;
        mock_filter(&mut server, "c=Beef", &["7"]).await;
        mock_lookup(&mut server, "7", "Boeuf Bourguignon").await;

        let store = store_for(&server);
        store.set_category("Viandes").await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.selected_category, "Viandes");
        assert_eq!(state.recipes.len(), 1);
    }

    #[tokio::test]
    async fn test_set_category_unknown_clears_list() {
        let mut server = Server::new_async().await;
        mock_filter(&mut server, "a=Italian", &["1"]).await;
        mock_lookup(&mut server, "1", "Spaghetti Carbonara").await;

        let store = store_for(&server);
        store.load_recipes(None).await.unwrap();
        assert_eq!(store.snapshot().recipes.len(), 1);

        store.set_category("Inconnu").await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.selected_category, "Inconnu");
        assert!(state.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_set_category_tout_reloads_default_area() {
        let mut server = Server::new_async().await;
        let filter_mock = server
            .mock("GET", "/filter.php?a=Italian")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"meals": null}"#)
            .create_async()
            .await;

        let store = store_for(&server);
        store.set_category(ALL_CATEGORIES).await.unwrap();

        assert_eq!(store.snapshot().selected_category, "Tout");
        filter_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_query_filters_by_name() {
        let server = Server::new_async().await;
        let store = store_for(&server);
        {
            let mut state = store.write_state();
            state.recipes = vec![
                sample_recipe("1", "Pizza Margherita"),
                sample_recipe("2", "Salade"),
            ];
        }

        store.set_search_query("piz");
        let filtered = store.filtered_recipes();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Pizza Margherita");

        store.set_search_query("");
        assert_eq!(store.filtered_recipes().len(), 2);
    }

    #[tokio::test]
    async fn test_load_favorites_absent_blob_is_empty() {
        let server = Server::new_async().await;
        let store = store_for(&server);

        store.load_favorites().await.unwrap();
        assert!(store.snapshot().favorites.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_favorite_round_trip() {
        let server = Server::new_async().await;
        let store = store_for(&server);
        let recipe = sample_recipe("1", "Pizza Margherita");

        store.toggle_favorite(&recipe).await.unwrap();
        assert!(store.is_favorite("1"));

        store.toggle_favorite(&recipe).await.unwrap();
        assert!(!store.is_favorite("1"));
        assert!(store.snapshot().favorites.is_empty());
    }

    #[tokio::test]
    async fn test_favorites_keep_insertion_order_and_persist() {
        let server = Server::new_async().await;
        let store = store_for(&server);

        store
            .toggle_favorite(&sample_recipe("1", "Pizza Margherita"))
            .await
            .unwrap();
        store
            .toggle_favorite(&sample_recipe("2", "Salade"))
            .await
            .unwrap();

        let favorites = store.snapshot().favorites;
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].id, "1");
        assert_eq!(favorites[1].id, "2");

        // the persisted blob is exactly the in-memory collection
        let blob = store.storage.get(FAVORITES_KEY).await.unwrap().unwrap();
        let stored: Vec<Recipe> = serde_json::from_str(&blob).unwrap();
        assert_eq!(stored, favorites);
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, RecipeError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), RecipeError> {
            Err(RecipeError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "write denied",
            )))
        }
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_favorites_untouched() {
        let server = Server::new_async().await;
        let catalog = CatalogClient::with_base_url(server.url(), None);
        let store = RecipeStore::new(catalog, FailingStore, "Italian");
        {
            let mut state = store.write_state();
            state.favorites = vec![sample_recipe("1", "Pizza Margherita")];
        }
        let before = store.snapshot().favorites;

        let result = store.toggle_favorite(&sample_recipe("2", "Salade")).await;
        assert!(matches!(result, Err(RecipeError::IoError(_))));
        assert_eq!(store.snapshot().favorites, before);
    }

    #[tokio::test]
    async fn test_recipe_detail_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/lookup.php?i=404")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"meals": null}"#)
            .create_async()
            .await;

        let store = store_for(&server);
        let result = store.recipe_detail("404").await;
        assert!(matches!(result, Err(RecipeError::NotFound(id)) if id == "404"));
    }

    #[tokio::test]
    async fn test_recipe_detail_found() {
        let mut server = Server::new_async().await;
        mock_lookup(&mut server, "1", "Spaghetti Carbonara").await;

        let store = store_for(&server);
        let detail = store.recipe_detail("1").await.unwrap();
        assert_eq!(detail.name, "Spaghetti Carbonara");
        assert_eq!(detail.category, "Pasta");
        assert_eq!(detail.instructions.len(), 3);
        assert_eq!(detail.ingredients.len(), 2);
    }
}
