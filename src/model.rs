use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty grade derived from the preparation-time heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Facile,
    Moyen,
    Difficile,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Facile => "Facile",
            Difficulty::Moyen => "Moyen",
            Difficulty::Difficile => "Difficile",
        };
        f.write_str(label)
    }
}

/// A catalog recipe as shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    /// Estimated minutes, always within 15..=120
    pub preparation_time: u32,
    pub difficulty: Difficulty,
    /// Localized category label
    pub category: String,
}

/// One ingredient line; the measure may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub ingredient: String,
    pub measure: String,
}

/// A fully resolved catalog recipe for detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: String,
    pub name: String,
    /// Source category label, not localized
    pub category: String,
    /// Cuisine of origin
    pub area: String,
    pub instructions: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub image: String,
    pub video: Option<String>,
}

/// Snapshot of everything the recipe screens render from.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeState {
    pub recipes: Vec<Recipe>,
    pub selected_category: String,
    pub search_query: String,
    /// Set semantics keyed by id, kept in insertion order
    pub favorites: Vec<Recipe>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for RecipeState {
    fn default() -> Self {
        RecipeState {
            recipes: Vec::new(),
            selected_category: crate::store::ALL_CATEGORIES.to_string(),
            search_query: String::new(),
            favorites: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// A locally authored recipe. Free-text fields throughout; there is no
/// structured ingredient list and no update-in-place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecipe {
    pub id: String,
    pub name: String,
    pub ingredients: String,
    pub steps: String,
    pub category: String,
    pub preparation_time: String,
    pub difficulty: String,
}

/// Input for [`crate::cookbook::Cookbook::add`]: a [`UserRecipe`]
/// before an id has been assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecipeDraft {
    pub name: String,
    pub ingredients: String,
    pub steps: String,
    pub category: String,
    pub preparation_time: String,
    pub difficulty: String,
}
