use thiserror::Error;

/// Errors that can occur while fetching, storing or authoring recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Failed to reach the recipe catalog
    #[error("Failed to fetch from catalog: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The catalog answered with a non-success status
    #[error("Catalog returned HTTP status {0}")]
    HttpStatus(u16),

    /// A detail lookup produced no record
    #[error("Recipe {0} not found")]
    NotFound(String),

    /// Local storage read/write failure
    #[error("Storage error: {0}")]
    IoError(#[from] std::io::Error),

    /// A persisted blob could not be decoded
    #[error("Failed to decode stored data: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// A user-authored recipe is missing required fields
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
