pub mod catalog;
pub mod config;
pub mod cookbook;
pub mod error;
pub mod model;
pub mod normalize;
pub mod storage;
pub mod store;

pub use catalog::{CatalogClient, MealRef, RawMeal, DEFAULT_BASE_URL};
pub use config::AppConfig;
pub use cookbook::{Cookbook, COOKBOOK_KEY};
pub use error::RecipeError;
pub use model::{
    Difficulty, Ingredient, Recipe, RecipeDetail, RecipeState, UserRecipe, UserRecipeDraft,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{RecipeStore, ALL_CATEGORIES, FAVORITES_KEY};

/// Fetches one recipe from the public catalog with default settings and
/// normalizes it for a detail view.
pub async fn fetch_recipe_detail(id: &str) -> Result<RecipeDetail, RecipeError> {
    let catalog = CatalogClient::new(None);
    match catalog.lookup(id).await? {
        Some(raw) => Ok(normalize::detail(&raw)),
        None => Err(RecipeError::NotFound(id.to_string())),
    }
}
